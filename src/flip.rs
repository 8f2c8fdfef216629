//! Per-digit flip classification and flip timing.
//!
//! `diff_digits` compares the previously rendered value of a unit with its
//! current value and reports, for every digit position, whether the block has
//! to flip. It does no timing itself. All digits that flip in one tick share a
//! single duration, tracked by [`FlipTimer`], so a carry across several units
//! lands in the same frame.

use crate::unit::UnitValue;
use std::time::Duration;

/// One digit position of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Digit {
    /// Zero is the most significant position.
    pub position: usize,
    /// The character shown at this position on the previous tick.
    pub previous: Option<char>,
    /// The character to show now.
    pub current: char,
    /// Whether the block flips from `previous` to `current`.
    pub animate: bool,
}

/// Classifies each digit of `current` against `previous`.
///
/// Without a previous value nothing animates. The width always comes from
/// `current`; the previous string is right-aligned to it, so a unit shrinking
/// from `100` to `99` compares `"00"` with `"99"` and never animates a digit
/// that is no longer drawn.
///
/// ```rust
/// use flipclock_widgets::flip::diff_digits;
/// use flipclock_widgets::unit::{UnitKind, UnitValue};
///
/// let prev = UnitValue { unit: UnitKind::Seconds, value: 59, digit_count: 2 };
/// let cur = UnitValue { unit: UnitKind::Seconds, value: 0, digit_count: 2 };
/// let digits = diff_digits(Some(&prev), &cur);
/// assert!(digits.iter().all(|d| d.animate));
/// ```
pub fn diff_digits(previous: Option<&UnitValue>, current: &UnitValue) -> Vec<Digit> {
    let current_chars: Vec<char> = current.padded().chars().collect();
    let width = current_chars.len();
    let previous_chars = previous.map(|p| align_right(&p.padded(), width));

    current_chars
        .iter()
        .enumerate()
        .map(|(position, &current)| {
            let previous = previous_chars.as_ref().map(|chars| chars[position]);
            Digit {
                position,
                previous,
                current,
                animate: previous.is_some_and(|p| p != current),
            }
        })
        .collect()
}

// Keeps the last `width` chars, zero-filling on the left when shorter.
fn align_right(padded: &str, width: usize) -> Vec<char> {
    let chars: Vec<char> = padded.chars().collect();
    if chars.len() >= width {
        chars[chars.len() - width..].to_vec()
    } else {
        let mut out = vec!['0'; width - chars.len()];
        out.extend(chars);
        out
    }
}

/// Progress of the flip currently shown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlipPhase {
    /// A flip is in flight; `progress` runs from 0.0 to 1.0.
    Flipping {
        /// Fraction of the flip duration that has elapsed.
        progress: f32,
    },
    /// No flip is in flight.
    Settled,
}

impl FlipPhase {
    /// Whether the flap has passed its halfway point and shows the new face.
    pub fn shows_current(&self) -> bool {
        match self {
            FlipPhase::Flipping { progress } => *progress >= 0.5,
            FlipPhase::Settled => true,
        }
    }
}

/// Tracks elapsed time of a flip against its duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlipTimer {
    elapsed: Duration,
    duration: Duration,
}

impl FlipTimer {
    /// Starts a flip lasting `duration`.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration,
        }
    }

    /// A timer that is already settled.
    #[must_use]
    pub fn settled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Moves the flip forward by `delta`.
    pub fn advance(&mut self, delta: Duration) {
        self.elapsed = self.elapsed.saturating_add(delta);
    }

    /// Time spent in this flip so far.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Time left until the flip settles.
    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.elapsed)
    }

    /// Current phase. Zero-length flips are settled from the start.
    #[must_use]
    pub fn phase(&self) -> FlipPhase {
        if self.elapsed >= self.duration {
            FlipPhase::Settled
        } else {
            let p = self.elapsed.as_secs_f32() / self.duration.as_secs_f32();
            FlipPhase::Flipping {
                progress: p.clamp(0.0, 1.0),
            }
        }
    }

    /// Whether the flip has finished.
    pub fn is_settled(&self) -> bool {
        self.phase() == FlipPhase::Settled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::UnitKind;

    fn uv(unit: UnitKind, value: u64, digit_count: usize) -> UnitValue {
        UnitValue {
            unit,
            value,
            digit_count,
        }
    }

    fn flags(digits: &[Digit]) -> Vec<bool> {
        digits.iter().map(|d| d.animate).collect()
    }

    #[test]
    fn test_first_render_is_static() {
        let digits = diff_digits(None, &uv(UnitKind::Seconds, 42, 2));
        assert_eq!(flags(&digits), vec![false, false]);
        assert!(digits.iter().all(|d| d.previous.is_none()));
        assert_eq!(digits[0].current, '4');
        assert_eq!(digits[1].current, '2');
    }

    #[test]
    fn test_rollover_flips_both_positions() {
        let digits = diff_digits(
            Some(&uv(UnitKind::Seconds, 59, 2)),
            &uv(UnitKind::Seconds, 0, 2),
        );
        assert_eq!(flags(&digits), vec![true, true]);
        assert_eq!(digits[0].previous, Some('5'));
        assert_eq!(digits[1].previous, Some('9'));
    }

    #[test]
    fn test_only_changed_position_flips() {
        let digits = diff_digits(
            Some(&uv(UnitKind::Minutes, 1, 2)),
            &uv(UnitKind::Minutes, 0, 2),
        );
        assert_eq!(flags(&digits), vec![false, true]);
    }

    #[test]
    fn test_unchanged_value_is_static() {
        let v = uv(UnitKind::Hours, 12, 2);
        assert_eq!(flags(&diff_digits(Some(&v), &v)), vec![false, false]);
    }

    #[test]
    fn test_shrinking_width_has_no_phantom_digit() {
        let digits = diff_digits(
            Some(&uv(UnitKind::Days, 100, 3)),
            &uv(UnitKind::Days, 99, 2),
        );
        assert_eq!(digits.len(), 2);
        assert_eq!(digits[0].previous, Some('0'));
        assert_eq!(flags(&digits), vec![true, true]);
    }

    #[test]
    fn test_growing_width_pads_previous() {
        let digits = diff_digits(
            Some(&uv(UnitKind::Days, 99, 2)),
            &uv(UnitKind::Days, 100, 3),
        );
        assert_eq!(digits.len(), 3);
        assert_eq!(digits[0].previous, Some('0'));
        assert_eq!(flags(&digits), vec![true, true, true]);
    }

    #[test]
    fn test_flip_timer_phases() {
        let mut timer = FlipTimer::new(Duration::from_millis(600));
        assert_eq!(timer.phase(), FlipPhase::Flipping { progress: 0.0 });
        assert!(!timer.phase().shows_current());

        timer.advance(Duration::from_millis(300));
        assert_eq!(timer.remaining(), Duration::from_millis(300));
        assert!(timer.phase().shows_current());
        assert!(!timer.is_settled());

        timer.advance(Duration::from_millis(300));
        assert_eq!(timer.phase(), FlipPhase::Settled);
        assert_eq!(timer.elapsed(), Duration::from_millis(600));
        assert_eq!(timer.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_zero_length_flip_is_settled() {
        assert!(FlipTimer::settled().is_settled());
    }
}
