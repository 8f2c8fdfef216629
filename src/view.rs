//! Terminal rendering of a render plan.
//!
//! Each digit is a three-row block. While a flip is in flight the block keeps
//! showing the outgoing character with its top edge raised, then switches to
//! the incoming character with its bottom edge dropped, then settles:
//!
//! ```text
//! ╭─╮ ╭─╮     ╭━╮ ╭─╮     ╭─╮ ╭─╮
//! │5│ │9│  →  │5│ │9│  →  │6│ │0│
//! ╰─╯ ╰─╯     ╰─╯ ╰─╯     ╰━╯ ╰━╯
//! ```
//!
//! Units are separated by a colon column. A disabled separator still takes up
//! its column so the layout does not move when it is toggled.

use crate::flip::{Digit, FlipPhase};
use crate::plan::{RenderPlan, UnitPlan};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;
use unicode_width::UnicodeWidthStr;

const BLOCK_ROWS: usize = 3;
const SEPARATOR_GLYPH: &str = ":";
const SEPARATOR_WIDTH: usize = 3;

/// Styles used when drawing the clock.
#[derive(Debug, Clone)]
pub struct FlipStyles {
    /// Settled digit characters.
    pub digit: Style,
    /// Digit characters of a block that is flipping.
    pub flipping: Style,
    /// Block borders.
    pub frame: Style,
    /// Labels under the units.
    pub label: Style,
    /// Separator glyphs.
    pub separator: Style,
}

impl Default for FlipStyles {
    fn default() -> Self {
        Self {
            digit: Style::new().bold(true),
            flipping: Style::new()
                .bold(true)
                .foreground(lipgloss::Color::from("#EE6FF8")),
            frame: Style::new().foreground(lipgloss::Color::from("#5A56E0")),
            label: Style::new().faint(true),
            separator: Style::new().bold(true),
        }
    }
}

/// Draws one digit block as three rows of width three.
pub fn render_digit(digit: &Digit, phase: FlipPhase, styles: &FlipStyles) -> [String; 3] {
    let flipping = digit.animate && matches!(phase, FlipPhase::Flipping { .. });

    if !flipping {
        return [
            styles.frame.render("╭─╮"),
            framed(&styles.digit.render(&digit.current.to_string()), styles),
            styles.frame.render("╰─╯"),
        ];
    }

    if phase.shows_current() {
        [
            styles.frame.render("╭─╮"),
            framed(&styles.flipping.render(&digit.current.to_string()), styles),
            styles.frame.render("╰━╯"),
        ]
    } else {
        let outgoing = digit.previous.unwrap_or(digit.current);
        [
            styles.frame.render("╭━╮"),
            framed(&styles.flipping.render(&outgoing.to_string()), styles),
            styles.frame.render("╰─╯"),
        ]
    }
}

fn framed(inner: &str, styles: &FlipStyles) -> String {
    format!(
        "{}{}{}",
        styles.frame.render("│"),
        inner,
        styles.frame.render("│")
    )
}

// Left and right padding needed to center `width` cells in `column` cells.
fn centering(width: usize, column: usize) -> (usize, usize) {
    let spare = column.saturating_sub(width);
    (spare / 2, spare - spare / 2)
}

struct Column {
    rows: Vec<String>,
}

fn unit_column(unit: &UnitPlan, phase: FlipPhase, show_labels: bool, styles: &FlipStyles) -> Column {
    let blocks_width = unit.digits.len() * 3;
    let label_width = UnicodeWidthStr::width(unit.label.as_str());
    let width = if show_labels {
        blocks_width.max(label_width)
    } else {
        blocks_width
    };

    let mut rows = vec![String::new(); BLOCK_ROWS];
    for digit in &unit.digits {
        for (row, part) in rows.iter_mut().zip(render_digit(digit, phase, styles)) {
            row.push_str(&part);
        }
    }

    let (left, right) = centering(blocks_width, width);
    let mut rows: Vec<String> = rows
        .into_iter()
        .map(|row| format!("{}{}{}", " ".repeat(left), row, " ".repeat(right)))
        .collect();

    if show_labels {
        let (left, right) = centering(label_width, width);
        rows.push(format!(
            "{}{}{}",
            " ".repeat(left),
            styles.label.render(&unit.label),
            " ".repeat(right)
        ));
    }

    Column { rows }
}

fn separator_column(visible: bool, show_labels: bool, styles: &FlipStyles) -> Column {
    let blank = " ".repeat(SEPARATOR_WIDTH);
    let glyph = if visible {
        format!(" {} ", styles.separator.render(SEPARATOR_GLYPH))
    } else {
        blank.clone()
    };

    let mut rows = vec![blank.clone(), glyph, blank.clone()];
    if show_labels {
        rows.push(blank);
    }
    Column { rows }
}

/// Draws the whole clock for `plan` at the given flip phase.
///
/// Hidden units are skipped. Returns an empty string when nothing is visible.
pub fn render_plan(plan: &RenderPlan, phase: FlipPhase, styles: &FlipStyles) -> String {
    let mut columns = Vec::new();
    for (i, unit) in plan.visible_units().enumerate() {
        if i > 0 {
            columns.push(separator_column(
                plan.show_separators,
                plan.show_labels,
                styles,
            ));
        }
        columns.push(unit_column(unit, phase, plan.show_labels, styles));
    }

    let Some(height) = columns.first().map(|c| c.rows.len()) else {
        return String::new();
    };

    (0..height)
        .map(|row| {
            columns
                .iter()
                .map(|c| c.rows[row].as_str())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplayOptions;
    use crate::decompose::decompose;
    use crate::resolve::resolve;
    use crate::unit::UnitKind;
    use std::time::Duration;

    fn plain(s: &str) -> String {
        lipgloss::strip_ansi(s)
    }

    fn plan_for(display: DisplayOptions, delta: i64, previous: Option<i64>) -> RenderPlan {
        let skeleton = resolve(&display).unwrap();
        let units = skeleton.unit_kinds();
        let before = previous.map(|p| decompose(p, &units));
        RenderPlan::assemble(
            &skeleton,
            &decompose(delta, &units),
            before.as_ref(),
            Duration::from_millis(700),
            1,
        )
    }

    fn digit(previous: char, current: char) -> Digit {
        Digit {
            position: 0,
            previous: Some(previous),
            current,
            animate: previous != current,
        }
    }

    #[test]
    fn test_settled_digit_block() {
        let rows = render_digit(&digit('5', '4'), FlipPhase::Settled, &FlipStyles::default());
        let rows: Vec<String> = rows.iter().map(|r| plain(r)).collect();
        assert_eq!(rows, ["╭─╮", "│4│", "╰─╯"]);
    }

    #[test]
    fn test_flipping_digit_block_halves() {
        let styles = FlipStyles::default();
        let early = render_digit(&digit('5', '4'), FlipPhase::Flipping { progress: 0.2 }, &styles);
        assert_eq!(plain(&early[0]), "╭━╮");
        assert_eq!(plain(&early[1]), "│5│");

        let late = render_digit(&digit('5', '4'), FlipPhase::Flipping { progress: 0.8 }, &styles);
        assert_eq!(plain(&late[1]), "│4│");
        assert_eq!(plain(&late[2]), "╰━╯");
    }

    #[test]
    fn test_static_digit_ignores_phase() {
        let rows = render_digit(
            &digit('7', '7'),
            FlipPhase::Flipping { progress: 0.1 },
            &FlipStyles::default(),
        );
        assert_eq!(plain(&rows[0]), "╭─╮");
        assert_eq!(plain(&rows[1]), "│7│");
    }

    #[test]
    fn test_render_plan_layout() {
        let display = DisplayOptions {
            units: vec![UnitKind::Minutes, UnitKind::Seconds],
            labels: Some(vec!["MIN".into(), "SEC".into()]),
            ..DisplayOptions::default()
        };
        let out = plain(&render_plan(
            &plan_for(display, 90_000, None),
            FlipPhase::Settled,
            &FlipStyles::default(),
        ));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "╭─╮╭─╮   ╭─╮╭─╮");
        assert_eq!(lines[1], "│0││1│ : │3││0│");
        assert_eq!(lines[2], "╰─╯╰─╯   ╰─╯╰─╯");
        assert_eq!(lines[3], format!(" MIN{}SEC  ", " ".repeat(6)));
    }

    #[test]
    fn test_disabled_separator_keeps_width() {
        let with = DisplayOptions::default();
        let without = DisplayOptions {
            show_separators: false,
            ..DisplayOptions::default()
        };
        let styles = FlipStyles::default();
        let a = plain(&render_plan(&plan_for(with, 90_000, None), FlipPhase::Settled, &styles));
        let b = plain(&render_plan(&plan_for(without, 90_000, None), FlipPhase::Settled, &styles));

        assert!(a.contains(':'));
        assert!(!b.contains(':'));
        for (x, y) in a.lines().zip(b.lines()) {
            assert_eq!(UnicodeWidthStr::width(x), UnicodeWidthStr::width(y));
        }
    }

    #[test]
    fn test_labels_hidden() {
        let display = DisplayOptions {
            show_labels: false,
            ..DisplayOptions::default()
        };
        let out = plain(&render_plan(
            &plan_for(display, 90_000, None),
            FlipPhase::Settled,
            &FlipStyles::default(),
        ));
        assert_eq!(out.lines().count(), 3);
        assert!(!out.contains("Days"));
    }

    #[test]
    fn test_default_labels_rendered() {
        let out = plain(&render_plan(
            &plan_for(DisplayOptions::default(), 86_405_000, None),
            FlipPhase::Settled,
            &FlipStyles::default(),
        ));
        for label in ["Days", "Hours", "Minutes", "Seconds"] {
            assert!(out.contains(label), "missing {} in\n{}", label, out);
        }
    }

    #[test]
    fn test_hidden_unit_skipped() {
        let display = DisplayOptions {
            render_map: Some(vec![false, true, true, true]),
            ..DisplayOptions::default()
        };
        let out = plain(&render_plan(
            &plan_for(display, 90_000, None),
            FlipPhase::Settled,
            &FlipStyles::default(),
        ));
        assert!(!out.contains("Days"));
        assert_eq!(out.lines().next().map(|l| l.matches('╭').count()), Some(6));
    }

    #[test]
    fn test_nothing_visible() {
        let display = DisplayOptions {
            render_map: Some(vec![false; 4]),
            ..DisplayOptions::default()
        };
        let plan = plan_for(display, 90_000, None);
        assert_eq!(render_plan(&plan, FlipPhase::Settled, &FlipStyles::default()), "");
    }

    #[test]
    fn test_mid_flip_shows_outgoing_values() {
        let display = DisplayOptions {
            units: vec![UnitKind::Seconds],
            ..DisplayOptions::default()
        };
        let plan = plan_for(display, 58_000, Some(59_000));
        let out = plain(&render_plan(
            &plan,
            FlipPhase::Flipping { progress: 0.25 },
            &FlipStyles::default(),
        ));
        assert!(out.contains("│5││9│"), "{}", out);
    }
}
