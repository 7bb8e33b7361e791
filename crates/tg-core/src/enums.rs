//! Budget kinds, status codes, and alert kinds for Timeguard.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`,
//! which is also the representation stored in SQL and used in configuration files.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// BudgetKind
// ---------------------------------------------------------------------------

/// How the allotted hours of an assignment are enforced.
///
/// A fixed assignment has a hard ceiling. A flex assignment may run into an
/// additional overrun allowance before it is considered over budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BudgetKind {
    Fixed,
    Flex,
}

impl BudgetKind {
    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Flex => "flex",
        }
    }
}

impl fmt::Display for BudgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// StatusCode
// ---------------------------------------------------------------------------

/// A single code in an assignment status snapshot.
///
/// Budget codes form an ordered severity scale:
///
/// ```text
/// in_allotted (1) < in_overrun (2) < over_allotted (3) < over_overrun (4)
/// ```
///
/// Booking-period codes (`before_start`, `after_deadline`) sit outside the
/// budget scale and have severity 0. Which codes make a snapshot invalid is
/// decided by the status oracle's configured policy, not by this enum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum StatusCode {
    BeforeStart,
    AfterDeadline,
    InAllotted,
    InOverrun,
    OverAllotted,
    OverOverrun,
}

impl StatusCode {
    /// All codes, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::BeforeStart,
        Self::AfterDeadline,
        Self::InAllotted,
        Self::InOverrun,
        Self::OverAllotted,
        Self::OverOverrun,
    ];

    /// Position on the budget severity scale. Non-budget codes are 0.
    #[must_use]
    pub const fn severity(self) -> u8 {
        match self {
            Self::BeforeStart | Self::AfterDeadline => 0,
            Self::InAllotted => 1,
            Self::InOverrun => 2,
            Self::OverAllotted => 3,
            Self::OverOverrun => 4,
        }
    }

    /// Whether this code belongs to the budget scale at all.
    #[must_use]
    pub const fn is_budget_code(self) -> bool {
        self.severity() > 0
    }

    /// Whether this code sits at or above `threshold` on the budget scale.
    ///
    /// Non-budget codes never qualify, whatever the threshold.
    #[must_use]
    pub const fn is_at_or_above(self, threshold: Self) -> bool {
        self.is_budget_code() && self.severity() >= threshold.severity()
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BeforeStart => "before_start",
            Self::AfterDeadline => "after_deadline",
            Self::InAllotted => "in_allotted",
            Self::InOverrun => "in_overrun",
            Self::OverAllotted => "over_allotted",
            Self::OverOverrun => "over_overrun",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AlertKind
// ---------------------------------------------------------------------------

/// The kind of message sent to a project manager when a budget threshold is crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// A fixed assignment went over its allotted hours.
    FixedAllottedReached,
    /// A flex assignment used up its allotted hours and started on the overrun.
    FlexAllottedReached,
    /// A flex assignment used up its allotted hours and the overrun allowance.
    FlexOverrunReached,
    /// Any other configured threshold crossing.
    ThresholdReached,
}

impl AlertKind {
    /// Pick the alert kind for a newly reached code on an assignment of `kind`.
    #[must_use]
    pub const fn for_transition(kind: BudgetKind, reached: StatusCode) -> Self {
        match (kind, reached) {
            (BudgetKind::Fixed, StatusCode::OverAllotted) => Self::FixedAllottedReached,
            (BudgetKind::Flex, StatusCode::InOverrun) => Self::FlexAllottedReached,
            (BudgetKind::Flex, StatusCode::OverOverrun) => Self::FlexOverrunReached,
            _ => Self::ThresholdReached,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FixedAllottedReached => "fixed_allotted_reached",
            Self::FlexAllottedReached => "flex_allotted_reached",
            Self::FlexOverrunReached => "flex_overrun_reached",
            Self::ThresholdReached => "threshold_reached",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
