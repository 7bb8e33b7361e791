//! # tg-core
//!
//! Core types and error types for Timeguard.
//!
//! This crate provides the foundational types shared across all Timeguard crates:
//! - Entity structs for timesheet entries, assignments, projects, and comments
//! - Budget kind and status code enums with an explicit severity scale
//! - The `AssignmentStatus` snapshot produced by status oracles
//! - Inclusive date ranges used to scope a reconciliation
//! - The weekly sheet input format
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod range;
pub mod sheet;
pub mod status;
