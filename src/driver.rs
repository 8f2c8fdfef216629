//! The countdown tick loop.
//!
//! A [`CountdownDriver`] turns ticks into render plans. On every tick it asks
//! its clock for the time, recomputes the remaining delta from the fixed target
//! instant, decomposes it, diffs the result against what was shown on the
//! previous tick and returns a fresh [`RenderPlan`].
//!
//! ```text
//! Idle ──tick──▶ Running ──tick (delta <= 0)──▶ Completed
//!   └────────────tick (delta <= 0)─────────────────▲
//! ```
//!
//! Completion is reported once. After that every tick returns
//! [`TickOutcome::Finished`] and the tick schedule, if any, has been released.
//!
//! # Example
//!
//! ```rust
//! use flipclock_widgets::clock::ManualClock;
//! use flipclock_widgets::config::CountdownConfig;
//! use flipclock_widgets::driver::{CountdownDriver, TickOutcome};
//! use std::time::Duration;
//!
//! let clock = ManualClock::new(0);
//! let mut driver = CountdownDriver::with_clock(CountdownConfig::new(0, 2_000), clock.clone())?;
//!
//! clock.advance(Duration::from_secs(1));
//! assert!(matches!(driver.tick(), TickOutcome::Render(_)));
//!
//! clock.advance(Duration::from_secs(1));
//! assert!(matches!(driver.tick(), TickOutcome::Completed(_)));
//! assert!(matches!(driver.tick(), TickOutcome::Finished));
//! # Ok::<(), flipclock_widgets::error::ConfigError>(())
//! ```

use crate::clock::{Clock, SystemClock};
use crate::config::{CountdownConfig, DisplayOptions};
use crate::decompose::{decompose, Decomposition};
use crate::error::ConfigError;
use crate::plan::RenderPlan;
use crate::resolve::{resolve, PlanSkeleton};
use crate::tick::{TickCallback, TickHandle, TickSource};
use tracing::{debug, info, trace, warn};

/// Lifecycle of a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Built, no tick yet.
    Idle,
    /// At least one tick ran and the countdown is not over.
    Running,
    /// The countdown is over. Terminal.
    Completed,
}

/// What a tick produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown is still running; draw this plan.
    Render(RenderPlan),
    /// The countdown just finished; draw this plan. Returned exactly once.
    Completed(RenderPlan),
    /// The countdown finished on an earlier tick; nothing to draw.
    Finished,
}

impl TickOutcome {
    /// The plan carried by this outcome, if any.
    pub fn plan(&self) -> Option<&RenderPlan> {
        match self {
            TickOutcome::Render(plan) | TickOutcome::Completed(plan) => Some(plan),
            TickOutcome::Finished => None,
        }
    }
}

struct Schedule {
    source: Box<dyn TickSource>,
    handle: TickHandle,
}

/// Drives one countdown from its configuration to completion.
pub struct CountdownDriver<C: Clock = SystemClock> {
    config: CountdownConfig,
    clock: C,
    skeleton: PlanSkeleton,
    state: DriverState,
    previous: Decomposition,
    shown_delta: i64,
    prior_delta: Option<i64>,
    last_plan: RenderPlan,
    sequence: u64,
    schedule: Option<Schedule>,
}

impl CountdownDriver<SystemClock> {
    /// A driver on the system clock.
    pub fn new(config: CountdownConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> CountdownDriver<C> {
    /// A driver reading time from `clock`.
    ///
    /// Validates `config` and prepares the first paint from `to - from`. No
    /// tick runs and nothing is scheduled.
    pub fn with_clock(config: CountdownConfig, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        let skeleton = resolve(&config.display)?;

        let shown_delta = initial_delta(&config);
        let initial = decompose(shown_delta, &config.display.units);
        let last_plan =
            RenderPlan::assemble(&skeleton, &initial, None, config.flip_duration(), 0);

        debug!(
            from = config.from,
            to = config.to,
            interval_ms = config.interval.as_millis() as u64,
            "countdown driver created"
        );

        Ok(Self {
            config,
            clock,
            skeleton,
            state: DriverState::Idle,
            previous: initial,
            shown_delta,
            prior_delta: None,
            last_plan,
            sequence: 0,
            schedule: None,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// The configuration the driver was built with, display changes included.
    pub fn config(&self) -> &CountdownConfig {
        &self.config
    }

    /// The plan for the first paint, before any tick.
    pub fn initial_plan(&self) -> RenderPlan {
        let initial = decompose(initial_delta(&self.config), &self.config.display.units);
        RenderPlan::assemble(
            &self.skeleton,
            &initial,
            None,
            self.config.flip_duration(),
            0,
        )
    }

    /// The most recently produced plan.
    pub fn current_plan(&self) -> &RenderPlan {
        &self.last_plan
    }

    /// Milliseconds left according to the clock; negative once past `to`.
    pub fn remaining_ms(&self) -> i64 {
        self.config.to.saturating_sub(self.clock.now_ms())
    }

    /// Whether a tick schedule is held.
    pub fn is_scheduled(&self) -> bool {
        self.schedule.is_some()
    }

    /// Asks `source` to call `callback` every configured interval.
    ///
    /// A driver holds at most one schedule; a second call while one is held,
    /// or a call after completion, is ignored.
    pub fn start<S>(&mut self, mut source: S, callback: TickCallback)
    where
        S: TickSource + 'static,
    {
        if self.schedule.is_some() {
            warn!("countdown already scheduled, ignoring start");
            return;
        }
        if self.state == DriverState::Completed {
            debug!("countdown already completed, not scheduling");
            return;
        }
        let handle = source.start(self.config.interval, callback);
        self.schedule = Some(Schedule {
            source: Box::new(source),
            handle,
        });
    }

    /// Runs one tick.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state == DriverState::Completed {
            trace!("tick after completion ignored");
            return TickOutcome::Finished;
        }

        let delta = if self.config.completes_immediately() {
            0
        } else {
            self.remaining_ms()
        };
        let current = decompose(delta, &self.config.display.units);
        self.sequence += 1;

        // Completing straight from Idle never animates.
        let previous = match self.state {
            DriverState::Idle if current.completed => None,
            _ => Some(&self.previous),
        };
        let prior_delta = previous.map(|_| self.shown_delta);

        let plan = RenderPlan::assemble(
            &self.skeleton,
            &current,
            previous,
            self.config.flip_duration(),
            self.sequence,
        );
        debug!(sequence = self.sequence, delta, "countdown tick");

        self.previous = current;
        self.prior_delta = prior_delta;
        self.shown_delta = delta;
        self.last_plan = plan.clone();

        if plan.completed {
            self.state = DriverState::Completed;
            self.release_schedule();
            info!(sequence = self.sequence, "countdown completed");
            TickOutcome::Completed(plan)
        } else {
            self.state = DriverState::Running;
            TickOutcome::Render(plan)
        }
    }

    /// Replaces the display options.
    ///
    /// The tick schedule is kept and time does not advance: the returned plan
    /// shows the values of the last tick in the new layout, with the same flips
    /// in flight. When the unit set changes, the stored previous values are
    /// re-expressed in the new units so the next tick diffs against what is on
    /// screen.
    pub fn reconfigure(&mut self, display: DisplayOptions) -> Result<RenderPlan, ConfigError> {
        self.skeleton = resolve(&display)?;
        self.config.display = display;

        let units = &self.config.display.units;
        self.previous = decompose(self.shown_delta, units);
        let prior = self.prior_delta.map(|delta| decompose(delta, units));

        self.sequence += 1;
        let plan = RenderPlan::assemble(
            &self.skeleton,
            &self.previous,
            prior.as_ref(),
            self.config.flip_duration(),
            self.sequence,
        );
        debug!(sequence = self.sequence, "countdown display reconfigured");
        self.last_plan = plan.clone();
        Ok(plan)
    }

    /// Releases the tick schedule. Calling it again does nothing.
    pub fn dispose(&mut self) {
        if self.release_schedule() {
            info!("countdown disposed");
        }
    }

    fn release_schedule(&mut self) -> bool {
        match self.schedule.take() {
            Some(mut schedule) => {
                schedule.source.stop(schedule.handle);
                true
            }
            None => false,
        }
    }
}

// Delta shown before the first tick.
fn initial_delta(config: &CountdownConfig) -> i64 {
    if config.completes_immediately() {
        0
    } else {
        config.to.saturating_sub(config.from)
    }
}

impl<C: Clock> Drop for CountdownDriver<C> {
    fn drop(&mut self) {
        self.release_schedule();
    }
}

impl<C: Clock> std::fmt::Debug for CountdownDriver<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountdownDriver")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("sequence", &self.sequence)
            .field("scheduled", &self.schedule.is_some())
            .finish_non_exhaustive()
    }
}
