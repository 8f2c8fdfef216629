//! Countdown configuration.
//!
//! A [`CountdownConfig`] is supplied once per countdown. It is validated when a
//! driver or widget is built; ticks never re-check it.
//!
//! ```rust
//! use flipclock_widgets::config::CountdownConfig;
//! use flipclock_widgets::unit::UnitKind;
//! use std::time::Duration;
//!
//! let config = CountdownConfig::new(0, 90_000)
//!     .with_units(vec![UnitKind::Minutes, UnitKind::Seconds])
//!     .with_labels(vec!["MIN".to_string(), "SEC".to_string()])
//!     .with_interval(Duration::from_millis(500));
//! assert!(config.validate().is_ok());
//! ```

use crate::clock::unix_millis;
use crate::error::ConfigError;
use crate::resolve::validate_units;
use crate::unit::UnitKind;
use std::time::{Duration, SystemTime};

/// Default time between ticks.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Default length of a digit flip, in seconds.
pub const DEFAULT_FLIP_DURATION_SECS: f64 = 0.7;

/// The display half of a configuration.
///
/// This is what can change while a countdown is running without restarting
/// it; see [`crate::driver::CountdownDriver::reconfigure`].
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayOptions {
    /// Units to show, in canonical order.
    pub units: Vec<UnitKind>,
    /// Labels replacing the defaults, one per unit.
    pub labels: Option<Vec<String>>,
    /// Per-unit visibility, one flag per unit.
    pub render_map: Option<Vec<bool>>,
    /// Whether labels are drawn under the units.
    pub show_labels: bool,
    /// Whether separators are drawn between the units.
    pub show_separators: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            units: UnitKind::DEFAULT_SET.to_vec(),
            labels: None,
            render_map: None,
            show_labels: true,
            show_separators: true,
        }
    }
}

/// Everything needed to run one countdown.
#[derive(Debug, Clone, PartialEq)]
pub struct CountdownConfig {
    /// Start instant, Unix epoch milliseconds. Used for the first paint.
    pub from: i64,
    /// Target instant, Unix epoch milliseconds.
    pub to: i64,
    /// Time between ticks. Default 1 second.
    pub interval: Duration,
    /// Units, labels and visibility.
    pub display: DisplayOptions,
    /// Length of a digit flip in seconds. Default 0.7.
    pub flip_duration_secs: f64,
    /// Swap to the completed view once the countdown is over. Default true.
    pub hide_on_complete: bool,
}

impl CountdownConfig {
    /// A countdown from `from` to `to` (epoch milliseconds) with defaults.
    pub fn new(from: i64, to: i64) -> Self {
        Self {
            from,
            to,
            interval: DEFAULT_INTERVAL,
            display: DisplayOptions::default(),
            flip_duration_secs: DEFAULT_FLIP_DURATION_SECS,
            hide_on_complete: true,
        }
    }

    /// A countdown starting now and ending after `duration`.
    pub fn from_now(duration: Duration) -> Self {
        let now = unix_millis(SystemTime::now());
        let length = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX);
        Self::new(now, now.saturating_add(length))
    }

    /// Sets the tick interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the unit subset.
    pub fn with_units(mut self, units: Vec<UnitKind>) -> Self {
        self.display.units = units;
        self
    }

    /// Overrides the unit labels.
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.display.labels = Some(labels);
        self
    }

    /// Sets per-unit visibility.
    pub fn with_render_map(mut self, render_map: Vec<bool>) -> Self {
        self.display.render_map = Some(render_map);
        self
    }

    /// Shows or hides labels.
    pub fn with_show_labels(mut self, show: bool) -> Self {
        self.display.show_labels = show;
        self
    }

    /// Shows or hides separators.
    pub fn with_show_separators(mut self, show: bool) -> Self {
        self.display.show_separators = show;
        self
    }

    /// Sets the flip duration in seconds.
    pub fn with_flip_duration(mut self, secs: f64) -> Self {
        self.flip_duration_secs = secs;
        self
    }

    /// Chooses whether the completed view replaces the clock.
    pub fn with_hide_on_complete(mut self, hide: bool) -> Self {
        self.hide_on_complete = hide;
        self
    }

    /// The flip duration as a [`Duration`].
    ///
    /// Only meaningful on a validated configuration.
    pub fn flip_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.flip_duration_secs).unwrap_or(Duration::ZERO)
    }

    /// Whether the countdown is over before it starts.
    pub fn completes_immediately(&self) -> bool {
        self.to <= self.from
    }

    /// Checks the structural rules for a configuration.
    ///
    /// `to` before `from` is accepted; such a countdown completes on its first
    /// tick.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval.is_zero() {
            return Err(ConfigError::NonPositiveInterval);
        }
        if !self.flip_duration_secs.is_finite() || self.flip_duration_secs <= 0.0 {
            return Err(ConfigError::InvalidFlipDuration(self.flip_duration_secs));
        }
        validate_units(&self.display.units)
    }
}
