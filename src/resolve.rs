//! Resolving display options into a render-plan skeleton.
//!
//! The skeleton fixes which units are shown, in what order, with which labels
//! and visibility. It is built once per configuration change and reused by
//! every tick until the next change.
//!
//! Label and visibility overrides follow an exact-match-or-ignore policy: a list
//! whose length matches the unit count is applied positionally, any other list
//! is ignored and the defaults are used.

use crate::config::DisplayOptions;
use crate::error::ConfigError;
use crate::unit::UnitKind;
use tracing::warn;

/// One unit slot of a skeleton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkeletonUnit {
    /// The unit shown in this slot.
    pub kind: UnitKind,
    /// Label drawn under the unit.
    pub label: String,
    /// Whether the unit is drawn at all.
    pub visible: bool,
}

/// The value-free shape of a render plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSkeleton {
    /// Unit slots in canonical order.
    pub units: Vec<SkeletonUnit>,
    /// Whether labels are drawn.
    pub show_labels: bool,
    /// Whether separators are drawn between adjacent units.
    pub show_separators: bool,
}

impl PlanSkeleton {
    /// The unit kinds of the skeleton, in order.
    pub fn unit_kinds(&self) -> Vec<UnitKind> {
        self.units.iter().map(|u| u.kind).collect()
    }
}

/// Checks that `units` is non-empty, unique and in canonical order.
pub fn validate_units(units: &[UnitKind]) -> Result<(), ConfigError> {
    let Some(first) = units.first() else {
        return Err(ConfigError::EmptyUnits);
    };

    let mut seen = [false; UnitKind::ALL.len()];
    seen[first.canonical_index()] = true;

    let mut previous = *first;
    for &unit in &units[1..] {
        if std::mem::replace(&mut seen[unit.canonical_index()], true) {
            return Err(ConfigError::DuplicateUnit(unit));
        }
        if unit < previous {
            return Err(ConfigError::OutOfOrder { unit, previous });
        }
        previous = unit;
    }
    Ok(())
}

/// Builds the skeleton for `display`.
///
/// ```rust
/// use flipclock_widgets::config::DisplayOptions;
/// use flipclock_widgets::resolve::resolve;
///
/// let display = DisplayOptions {
///     labels: Some(vec!["D".into(), "H".into(), "S".into()]),
///     ..DisplayOptions::default()
/// };
/// let skeleton = resolve(&display).unwrap();
/// let labels: Vec<_> = skeleton.units.iter().map(|u| u.label.as_str()).collect();
/// assert_eq!(labels, ["Days", "Hours", "Minutes", "Seconds"]);
/// ```
pub fn resolve(display: &DisplayOptions) -> Result<PlanSkeleton, ConfigError> {
    validate_units(&display.units)?;
    let count = display.units.len();

    let labels = match &display.labels {
        Some(labels) if labels.len() == count => Some(labels),
        Some(labels) => {
            warn!(
                given = labels.len(),
                expected = count,
                "label override ignored, count does not match units"
            );
            None
        }
        None => None,
    };

    let render_map = match &display.render_map {
        Some(map) if map.len() == count => Some(map),
        Some(map) => {
            warn!(
                given = map.len(),
                expected = count,
                "render map ignored, count does not match units"
            );
            None
        }
        None => None,
    };

    let units = display
        .units
        .iter()
        .enumerate()
        .map(|(i, &kind)| SkeletonUnit {
            kind,
            label: labels
                .map(|l| l[i].clone())
                .unwrap_or_else(|| kind.default_label().to_string()),
            visible: render_map.map(|m| m[i]).unwrap_or(true),
        })
        .collect();

    Ok(PlanSkeleton {
        units,
        show_labels: display.show_labels,
        show_separators: display.show_separators,
    })
}
