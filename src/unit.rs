//! Time units shown by the flip clock.
//!
//! A countdown is split into an ordered set of units. The canonical order is
//! days, hours, minutes, seconds and milliseconds; every requested unit subset
//! must follow it.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// One unit of the countdown display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UnitKind {
    /// 86 400 000 milliseconds.
    Days,
    /// 3 600 000 milliseconds.
    Hours,
    /// 60 000 milliseconds.
    Minutes,
    /// 1 000 milliseconds.
    Seconds,
    /// A single millisecond.
    Milliseconds,
}

impl UnitKind {
    /// Every unit in canonical (highest to lowest) order.
    pub const ALL: [UnitKind; 5] = [
        UnitKind::Days,
        UnitKind::Hours,
        UnitKind::Minutes,
        UnitKind::Seconds,
        UnitKind::Milliseconds,
    ];

    /// The unit set used when the caller does not pick one.
    pub const DEFAULT_SET: [UnitKind; 4] = [
        UnitKind::Days,
        UnitKind::Hours,
        UnitKind::Minutes,
        UnitKind::Seconds,
    ];

    /// Number of milliseconds in one of this unit.
    pub const fn factor_ms(self) -> i64 {
        match self {
            UnitKind::Days => 86_400_000,
            UnitKind::Hours => 3_600_000,
            UnitKind::Minutes => 60_000,
            UnitKind::Seconds => 1_000,
            UnitKind::Milliseconds => 1,
        }
    }

    /// Zero-padded width of the unit when it is not the leading unit.
    ///
    /// The leading unit may grow beyond this width to fit its value.
    pub const fn fixed_width(self) -> usize {
        match self {
            UnitKind::Milliseconds => 3,
            _ => 2,
        }
    }

    /// Label shown under the unit when no override is supplied.
    pub const fn default_label(self) -> &'static str {
        match self {
            UnitKind::Days => "Days",
            UnitKind::Hours => "Hours",
            UnitKind::Minutes => "Minutes",
            UnitKind::Seconds => "Seconds",
            UnitKind::Milliseconds => "Milliseconds",
        }
    }

    /// Position of the unit in the canonical order.
    pub const fn canonical_index(self) -> usize {
        match self {
            UnitKind::Days => 0,
            UnitKind::Hours => 1,
            UnitKind::Minutes => 2,
            UnitKind::Seconds => 3,
            UnitKind::Milliseconds => 4,
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                UnitKind::Days => "days",
                UnitKind::Hours => "hours",
                UnitKind::Minutes => "minutes",
                UnitKind::Seconds => "seconds",
                UnitKind::Milliseconds => "milliseconds",
            }
        )
    }
}

impl FromStr for UnitKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "d" | "day" | "days" => Ok(UnitKind::Days),
            "h" | "hour" | "hours" => Ok(UnitKind::Hours),
            "m" | "min" | "minute" | "minutes" => Ok(UnitKind::Minutes),
            "s" | "sec" | "second" | "seconds" => Ok(UnitKind::Seconds),
            "ms" | "millisecond" | "milliseconds" => Ok(UnitKind::Milliseconds),
            _ => Err(ConfigError::UnknownUnit(s.to_string())),
        }
    }
}

/// The value of a single unit after decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitValue {
    /// Which unit this value belongs to.
    pub unit: UnitKind,
    /// Non-negative magnitude of the unit.
    pub value: u64,
    /// Number of digit blocks used to show `value`, zero-padded.
    pub digit_count: usize,
}

impl UnitValue {
    /// Returns the value as a zero-padded decimal string of `digit_count` chars.
    pub fn padded(&self) -> String {
        format!("{:0width$}", self.value, width = self.digit_count)
    }
}

/// Number of decimal digits needed to print `value`.
pub(crate) fn decimal_width(value: u64) -> usize {
    let mut width = 1;
    let mut rest = value / 10;
    while rest > 0 {
        width += 1;
        rest /= 10;
    }
    width
}
