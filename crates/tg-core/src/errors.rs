//! Cross-cutting error types for Timeguard.
//!
//! Domain-specific errors (`DatabaseError`, `GuardError`, `ConfigError`) are
//! defined in their respective crates. Everything converges on `anyhow` in
//! `tg-cli`.

use thiserror::Error;

/// Errors raised by core types when constructed from untrusted input.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}
