//! The render plan handed to renderers on every tick.
//!
//! A plan is built in one go from a skeleton and a decomposition and is never
//! mutated afterwards. Renderers receive a fresh plan per tick or per
//! configuration change.

use crate::decompose::Decomposition;
use crate::flip::{diff_digits, Digit};
use crate::resolve::PlanSkeleton;
use crate::unit::UnitKind;
use std::time::Duration;

/// One unit of a render plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitPlan {
    /// The unit shown.
    pub kind: UnitKind,
    /// Label drawn under the unit.
    pub label: String,
    /// Digit blocks, most significant first.
    pub digits: Vec<Digit>,
    /// Whether the unit is drawn.
    pub visible: bool,
}

impl UnitPlan {
    /// The current value as shown by the digits.
    pub fn text(&self) -> String {
        self.digits.iter().map(|d| d.current).collect()
    }

    /// Whether any digit of this unit flips.
    pub fn is_animating(&self) -> bool {
        self.digits.iter().any(|d| d.animate)
    }
}

/// Everything a renderer needs to draw one frame of the clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPlan {
    /// Units in canonical order, hidden ones included.
    pub units: Vec<UnitPlan>,
    /// Whether labels are drawn.
    pub show_labels: bool,
    /// Whether separators are drawn; when false they keep their width.
    pub show_separators: bool,
    /// Whether the countdown is over.
    pub completed: bool,
    /// Length of every flip in this plan.
    pub flip_duration: Duration,
    /// Emission order; strictly increasing for one driver.
    pub sequence: u64,
}

impl RenderPlan {
    /// Combines a skeleton with decomposed values.
    ///
    /// Digits are diffed unit by unit against `previous`. A unit missing from
    /// `previous` (first render, or newly added by a reconfiguration) is drawn
    /// without animation.
    pub fn assemble(
        skeleton: &PlanSkeleton,
        current: &Decomposition,
        previous: Option<&Decomposition>,
        flip_duration: Duration,
        sequence: u64,
    ) -> Self {
        let units = skeleton
            .units
            .iter()
            .filter_map(|slot| {
                let value = current.get(slot.kind)?;
                let before = previous.and_then(|p| p.get(slot.kind));
                Some(UnitPlan {
                    kind: slot.kind,
                    label: slot.label.clone(),
                    digits: diff_digits(before, value),
                    visible: slot.visible,
                })
            })
            .collect();

        Self {
            units,
            show_labels: skeleton.show_labels,
            show_separators: skeleton.show_separators,
            completed: current.completed,
            flip_duration,
            sequence,
        }
    }

    /// Whether any visible digit flips.
    pub fn is_animating(&self) -> bool {
        self.visible_units().any(UnitPlan::is_animating)
    }

    /// Units that are drawn.
    pub fn visible_units(&self) -> impl Iterator<Item = &UnitPlan> {
        self.units.iter().filter(|u| u.visible)
    }

    /// The plan entry for `kind`.
    pub fn unit(&self, kind: UnitKind) -> Option<&UnitPlan> {
        self.units.iter().find(|u| u.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplayOptions;
    use crate::decompose::decompose;
    use crate::resolve::resolve;

    #[test]
    fn test_assemble_first_render() {
        let skeleton = resolve(&DisplayOptions::default()).unwrap();
        let plan = RenderPlan::assemble(
            &skeleton,
            &decompose(90_000, &skeleton.unit_kinds()),
            None,
            Duration::from_millis(700),
            0,
        );
        let texts: Vec<String> = plan.units.iter().map(UnitPlan::text).collect();
        assert_eq!(texts, ["00", "00", "01", "30"]);
        assert!(!plan.is_animating());
        assert!(!plan.completed);
        assert_eq!(plan.unit(UnitKind::Minutes).map(|u| u.label.as_str()), Some("Minutes"));
    }

    #[test]
    fn test_assemble_carries_across_units() {
        let skeleton = resolve(&DisplayOptions::default()).unwrap();
        let units = skeleton.unit_kinds();
        let before = decompose(60_000, &units);
        let after = decompose(59_000, &units);
        let plan = RenderPlan::assemble(&skeleton, &after, Some(&before), Duration::ZERO, 1);

        let minutes = plan.unit(UnitKind::Minutes).unwrap();
        let seconds = plan.unit(UnitKind::Seconds).unwrap();
        assert_eq!(
            minutes.digits.iter().map(|d| d.animate).collect::<Vec<_>>(),
            vec![false, true]
        );
        assert!(seconds.digits.iter().all(|d| d.animate));
        assert!(!plan.unit(UnitKind::Days).unwrap().is_animating());
    }

    #[test]
    fn test_hidden_units_do_not_count_as_animating() {
        let display = DisplayOptions {
            render_map: Some(vec![true, true, true, false]),
            ..DisplayOptions::default()
        };
        let skeleton = resolve(&display).unwrap();
        let units = skeleton.unit_kinds();
        let plan = RenderPlan::assemble(
            &skeleton,
            &decompose(58_000, &units),
            Some(&decompose(59_000, &units)),
            Duration::ZERO,
            1,
        );
        assert!(plan.unit(UnitKind::Seconds).unwrap().is_animating());
        assert!(!plan.is_animating());
        assert_eq!(plan.visible_units().count(), 3);
    }
}
