//! Splitting a millisecond delta into unit values.
//!
//! Decomposition is greedy from the highest requested unit to the lowest. Units
//! that are not requested never lose time: anything above the leading unit is
//! expressed in the leading unit (26 hours stay 26 hours when days are not
//! shown), and anything below the smallest requested unit is truncated. A unit
//! skipped in the middle of the list folds into the next smaller requested unit
//! (hours and seconds without minutes show 1:02:05 as 1 and 125), which may
//! then need more digits than its usual width.
//!
//! ```rust
//! use flipclock_widgets::decompose::decompose;
//! use flipclock_widgets::unit::UnitKind;
//!
//! let d = decompose(90_000, &UnitKind::DEFAULT_SET);
//! assert_eq!(d.value_of(UnitKind::Minutes), Some(1));
//! assert_eq!(d.value_of(UnitKind::Seconds), Some(30));
//! assert!(!d.completed);
//! ```

use crate::unit::{decimal_width, UnitKind, UnitValue};

/// The result of decomposing one delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition {
    /// Unit values in the order they were requested.
    pub values: Vec<UnitValue>,
    /// Whether the delta was zero or negative.
    pub completed: bool,
}

impl Decomposition {
    /// Returns the value for `unit`, if that unit was requested.
    pub fn get(&self, unit: UnitKind) -> Option<&UnitValue> {
        self.values.iter().find(|v| v.unit == unit)
    }

    /// Returns the numeric value for `unit`, if that unit was requested.
    pub fn value_of(&self, unit: UnitKind) -> Option<u64> {
        self.get(unit).map(|v| v.value)
    }

    /// Milliseconds represented by all unit values together.
    pub fn total_ms(&self) -> i64 {
        self.values
            .iter()
            .map(|v| v.value as i64 * v.unit.factor_ms())
            .sum()
    }
}

/// Splits `delta_ms` into values for `units`.
///
/// `units` is expected in canonical order without duplicates; configurations
/// are checked for that before they reach a driver. A delta of zero or less
/// yields all zeros and `completed = true`.
pub fn decompose(delta_ms: i64, units: &[UnitKind]) -> Decomposition {
    debug_assert!(
        units.windows(2).all(|w| w[0] < w[1]),
        "units must be in canonical order"
    );

    let completed = delta_ms <= 0;
    let mut remaining = delta_ms.max(0);
    let mut values = Vec::with_capacity(units.len());

    for &unit in units {
        let factor = unit.factor_ms();
        let value = (remaining / factor) as u64;
        remaining -= value as i64 * factor;

        // The leading unit grows, and so does a unit absorbing a skipped one.
        let digit_count = unit.fixed_width().max(decimal_width(value));

        values.push(UnitValue {
            unit,
            value,
            digit_count,
        });
    }

    Decomposition { values, completed }
}
