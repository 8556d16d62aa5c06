//! Engine error type
//!
//! The engine normalizes age/count inputs defensively instead of rejecting
//! them; genuine failures are confined to configuration-table lookups, which
//! fail fast rather than silently defaulting.

use thiserror::Error;

/// Errors produced by configuration-table lookups
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// State code absent from the cost-multiplier table
    #[error("unknown state code '{0}': not present in the state cost factor table")]
    UnknownState(String),

    /// Category identifier absent from the closed category set
    #[error("unknown coverage category '{0}'")]
    UnknownCategory(String),
}
