//! Error types for countdown configuration.

use crate::unit::UnitKind;
use thiserror::Error;

/// Structural problems with a countdown configuration.
///
/// These are reported when a configuration is resolved or a driver is built,
/// never from a tick. A target instant in the past is not an error; it is a
/// countdown that is already complete.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// No units were requested.
    #[error("unit subset must name at least one unit")]
    EmptyUnits,

    /// The same unit appears twice in the requested subset.
    #[error("unit {0} is requested more than once")]
    DuplicateUnit(UnitKind),

    /// A unit appears after a unit that follows it in canonical order.
    #[error("unit {unit} must come before {previous}")]
    OutOfOrder {
        /// The misplaced unit.
        unit: UnitKind,
        /// The unit it was listed after.
        previous: UnitKind,
    },

    /// A unit name could not be parsed.
    #[error("unknown unit {0:?}")]
    UnknownUnit(String),

    /// The tick interval is zero.
    #[error("tick interval must be positive")]
    NonPositiveInterval,

    /// The flip duration is zero, negative or not finite.
    #[error("flip duration must be a positive number of seconds, got {0}")]
    InvalidFlipDuration(f64),
}
