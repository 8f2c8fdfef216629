//! Flip clock countdown component for Bubble Tea applications.
//!
//! The component wraps a [`CountdownDriver`] and schedules its ticks with
//! bubbletea-rs commands. Digits that change on a tick flip over the configured
//! duration; frames for that animation are scheduled between ticks without
//! moving the tick cadence.
//!
//! # Basic Usage
//!
//! ```rust
//! use flipclock_widgets::config::CountdownConfig;
//! use flipclock_widgets::flipclock;
//! use std::time::Duration;
//!
//! let clock = flipclock::new(CountdownConfig::from_now(Duration::from_secs(90)))
//!     .expect("valid configuration")
//!     .with_completed_view("Lift off!");
//! assert!(!clock.completed());
//! assert!(clock.view().contains("Minutes"));
//! ```
//!
//! # bubbletea-rs Integration
//!
//! ```rust
//! use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
//! use flipclock_widgets::config::CountdownConfig;
//! use flipclock_widgets::flipclock::{self, CompletedMsg, Model};
//! use std::time::Duration;
//!
//! struct App {
//!     clock: Model,
//!     done: bool,
//! }
//!
//! impl BubbleTeaModel for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let clock = flipclock::new(CountdownConfig::from_now(Duration::from_secs(10)))
//!             .expect("valid configuration");
//!         let cmd = clock.init();
//!         (Self { clock, done: false }, Some(cmd))
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         if let Some(completed) = msg.downcast_ref::<CompletedMsg>() {
//!             if completed.id == self.clock.id() {
//!                 self.done = true;
//!             }
//!         }
//!         self.clock.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.clock.view()
//!     }
//! }
//! ```

use crate::clock::{Clock, SystemClock};
use crate::config::{CountdownConfig, DisplayOptions};
use crate::driver::{CountdownDriver, DriverState, TickOutcome};
use crate::error::ConfigError;
use crate::flip::{FlipPhase, FlipTimer};
use crate::key::Binding;
use crate::plan::RenderPlan;
use crate::view::{render_plan, FlipStyles};
use bubbletea_rs::{tick as bubbletea_tick, Cmd, KeyMsg, Model as BubbleTeaModel, Msg};
use crossterm::event::KeyCode;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tracing::{debug, trace};

// Internal ID management for flip clock instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Animation frames per second while a flip is in flight.
const FPS: u32 = 30;

/// Delay used for messages that should be delivered right away.
const IMMEDIATE: Duration = Duration::from_nanos(1);

fn frame_interval() -> Duration {
    Duration::from_secs(1) / FPS
}

/// Message that advances the countdown by one tick.
///
/// Each clock only accepts ticks carrying its own ID and its current tag, so
/// stale or foreign ticks never speed up a countdown.
#[derive(Debug, Clone)]
pub struct TickMsg {
    /// Identifier of the clock this tick belongs to.
    pub id: i64,
    tag: i64,
}

/// Message that advances an in-flight flip animation by one frame.
#[derive(Debug, Clone)]
pub struct FrameMsg {
    /// Identifier of the clock this frame belongs to.
    pub id: i64,
    tag: i64,
}

/// Sent once when a countdown reaches zero.
#[derive(Debug, Clone)]
pub struct CompletedMsg {
    /// Identifier of the clock that completed.
    pub id: i64,
}

/// Runtime key bindings of the clock.
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Shows or hides the unit labels.
    pub toggle_labels: Binding,
    /// Shows or hides the separators.
    pub toggle_separators: Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            toggle_labels: Binding::new(vec![KeyCode::Char('l')]).with_help("l", "toggle labels"),
            toggle_separators: Binding::new(vec![KeyCode::Char('s')])
                .with_help("s", "toggle separators"),
        }
    }
}

/// A flip clock counting down to a target instant.
pub struct Model<C: Clock = SystemClock> {
    driver: CountdownDriver<C>,
    plan: RenderPlan,
    flip: FlipTimer,
    since_tick: Duration,

    /// Styles used by [`Model::view`].
    pub styles: FlipStyles,
    /// Key bindings handled by [`Model::update`].
    pub keymap: KeyMap,
    completed_view: Option<String>,

    id: i64,
    tag: i64,
    disposed: bool,
}

/// Creates a flip clock on the system clock.
pub fn new(config: CountdownConfig) -> Result<Model, ConfigError> {
    Model::with_clock(config, SystemClock)
}

impl<C: Clock> Model<C> {
    /// Creates a flip clock reading time from `clock`.
    pub fn with_clock(config: CountdownConfig, clock: C) -> Result<Self, ConfigError> {
        let driver = CountdownDriver::with_clock(config, clock)?;
        let plan = driver.initial_plan();
        Ok(Self {
            driver,
            plan,
            flip: FlipTimer::settled(),
            since_tick: Duration::ZERO,
            styles: FlipStyles::default(),
            keymap: KeyMap::default(),
            completed_view: None,
            id: next_id(),
            tag: 0,
            disposed: false,
        })
    }

    /// Sets what to show once the countdown is over.
    ///
    /// Only used when the configuration has `hide_on_complete` set.
    pub fn with_completed_view(mut self, view: impl Into<String>) -> Self {
        self.completed_view = Some(view.into());
        self
    }

    /// Replaces the styles.
    pub fn with_styles(mut self, styles: FlipStyles) -> Self {
        self.styles = styles;
        self
    }

    /// Unique identifier of this clock.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The plan currently on screen.
    pub fn plan(&self) -> &RenderPlan {
        &self.plan
    }

    /// Lifecycle state of the underlying driver.
    pub fn state(&self) -> DriverState {
        self.driver.state()
    }

    /// Whether the countdown is over, including a target already in the past.
    pub fn completed(&self) -> bool {
        self.plan.completed
    }

    /// Phase of the flip currently shown.
    pub fn flip_phase(&self) -> FlipPhase {
        self.flip.phase()
    }

    /// Whether [`Model::dispose`] has been called.
    pub fn disposed(&self) -> bool {
        self.disposed
    }

    /// Starts the countdown.
    ///
    /// The first tick fires after one interval; a countdown whose target is
    /// not after its start ticks at once so it completes immediately.
    pub fn init(&self) -> Cmd {
        let delay = if self.driver.config().completes_immediately() {
            IMMEDIATE
        } else {
            self.driver.config().interval
        };
        self.tick_after(delay)
    }

    fn tick_after(&self, delay: Duration) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(delay.max(IMMEDIATE), move |_| Box::new(TickMsg { id, tag }) as Msg)
    }

    // The last frame lands exactly when the flip settles.
    fn frame_step(&self) -> Duration {
        frame_interval().min(self.flip.remaining())
    }

    fn next_frame(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(self.frame_step(), move |_| {
            Box::new(FrameMsg { id, tag }) as Msg
        })
    }

    fn completed_cmd(&self) -> Cmd {
        let id = self.id;
        bubbletea_tick(IMMEDIATE, move |_| Box::new(CompletedMsg { id }) as Msg)
    }

    // Starts the flip for a fresh plan and picks the next command.
    fn show(&mut self, plan: RenderPlan) -> Cmd {
        let interval = self.driver.config().interval;
        self.since_tick = Duration::ZERO;
        let flip_length = plan.flip_duration.min(interval);
        // A flip shorter than one frame could never be drawn, and waiting for
        // its frame would stretch the tick interval.
        self.flip = if plan.is_animating() && flip_length >= frame_interval() {
            FlipTimer::new(flip_length)
        } else {
            FlipTimer::settled()
        };
        self.plan = plan;

        if !self.flip.is_settled() {
            self.next_frame()
        } else if self.driver.state() == DriverState::Completed {
            self.completed_cmd()
        } else {
            self.tick_after(interval)
        }
    }

    /// Processes tick, frame and key messages.
    pub fn update(&mut self, msg: Msg) -> std::option::Option<Cmd> {
        if self.disposed {
            return std::option::Option::None;
        }

        if let Some(tick_msg) = msg.downcast_ref::<TickMsg>() {
            if tick_msg.id != self.id || tick_msg.tag != self.tag {
                trace!(id = self.id, "stale tick ignored");
                return std::option::Option::None;
            }
            self.tag += 1;

            return match self.driver.tick() {
                TickOutcome::Render(plan) | TickOutcome::Completed(plan) => {
                    std::option::Option::Some(self.show(plan))
                }
                TickOutcome::Finished => std::option::Option::None,
            };
        }

        if let Some(frame_msg) = msg.downcast_ref::<FrameMsg>() {
            if frame_msg.id != self.id || frame_msg.tag != self.tag {
                return std::option::Option::None;
            }
            self.tag += 1;

            let step = self.frame_step();
            self.flip.advance(step);
            self.since_tick = self.since_tick.saturating_add(step);

            if !self.flip.is_settled() {
                return std::option::Option::Some(self.next_frame());
            }
            if self.driver.state() == DriverState::Completed {
                return std::option::Option::Some(self.completed_cmd());
            }
            let rest = self.driver.config().interval.saturating_sub(self.since_tick);
            return std::option::Option::Some(self.tick_after(rest));
        }

        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            if self.keymap.toggle_labels.matches(key_msg) {
                self.toggle_labels();
            } else if self.keymap.toggle_separators.matches(key_msg) {
                self.toggle_separators();
            }
        }

        std::option::Option::None
    }

    /// Renders the clock, or the completed view once the countdown is over.
    pub fn view(&self) -> String {
        if self.plan.completed && self.driver.config().hide_on_complete {
            if let Some(view) = &self.completed_view {
                return view.clone();
            }
        }
        render_plan(&self.plan, self.flip.phase(), &self.styles)
    }

    /// Changes units, labels or visibility without restarting the countdown.
    pub fn reconfigure(&mut self, display: DisplayOptions) -> Result<(), ConfigError> {
        self.plan = self.driver.reconfigure(display)?;
        Ok(())
    }

    fn display(&self) -> DisplayOptions {
        self.driver.config().display.clone()
    }

    /// Shows or hides the unit labels.
    pub fn set_show_labels(&mut self, show: bool) {
        let display = DisplayOptions {
            show_labels: show,
            ..self.display()
        };
        // The unit set is unchanged, so this cannot fail.
        if let Err(err) = self.reconfigure(display) {
            debug!(%err, "label toggle rejected");
        }
    }

    /// Shows or hides the separators.
    pub fn set_show_separators(&mut self, show: bool) {
        let display = DisplayOptions {
            show_separators: show,
            ..self.display()
        };
        if let Err(err) = self.reconfigure(display) {
            debug!(%err, "separator toggle rejected");
        }
    }

    /// Flips label visibility.
    pub fn toggle_labels(&mut self) {
        self.set_show_labels(!self.plan.show_labels);
    }

    /// Flips separator visibility.
    pub fn toggle_separators(&mut self) {
        self.set_show_separators(!self.plan.show_separators);
    }

    /// Replaces the label override.
    pub fn set_labels(&mut self, labels: Vec<String>) -> Result<(), ConfigError> {
        let display = DisplayOptions {
            labels: Some(labels),
            ..self.display()
        };
        self.reconfigure(display)
    }

    /// Stops the countdown for good. Pending ticks and frames are ignored.
    ///
    /// Calling it more than once does nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.tag += 1;
        self.driver.dispose();
        debug!(id = self.id, "flip clock disposed");
    }
}

impl<C: Clock> std::fmt::Debug for Model<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("driver", &self.driver)
            .field("plan", &self.plan)
            .field("flip", &self.flip)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, std::option::Option<Cmd>) {
        let config = CountdownConfig::from_now(Duration::from_secs(60));
        match new(config) {
            Ok(model) => {
                let cmd = model.init();
                (model, std::option::Option::Some(cmd))
            }
            // The default configuration always validates.
            Err(err) => unreachable!("default flip clock config rejected: {err}"),
        }
    }

    fn update(&mut self, msg: Msg) -> std::option::Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::unit::UnitKind;
    use crossterm::event::KeyModifiers;
    use lipgloss_extras::lipgloss;

    const T: i64 = 1_700_000_000_000;

    fn clock_model(from: i64, to: i64) -> (Model<ManualClock>, ManualClock) {
        let clock = ManualClock::new(from);
        let model = Model::with_clock(CountdownConfig::new(from, to), clock.clone())
            .expect("valid config");
        (model, clock)
    }

    fn tick_msg(model: &Model<ManualClock>) -> Msg {
        Box::new(TickMsg {
            id: model.id(),
            tag: model.tag,
        })
    }

    fn frame_msg(model: &Model<ManualClock>) -> Msg {
        Box::new(FrameMsg {
            id: model.id(),
            tag: model.tag,
        })
    }

    fn plain(model: &Model<ManualClock>) -> String {
        lipgloss::strip_ansi(&model.view())
    }

    #[test]
    fn test_new_model() {
        let (model, _) = clock_model(T, T + 24 * 3_600_000 + 5_000);
        assert!(model.id() > 0);
        assert!(!model.completed());
        assert_eq!(model.state(), DriverState::Idle);
        assert_eq!(model.flip_phase(), FlipPhase::Settled);
        let view = plain(&model);
        for label in ["Days", "Hours", "Minutes", "Seconds"] {
            assert!(view.contains(label), "missing {}", label);
        }
    }

    #[test]
    fn test_unique_ids() {
        let (a, _) = clock_model(T, T + 1_000);
        let (b, _) = clock_model(T, T + 1_000);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = CountdownConfig::new(T, T + 1_000).with_units(vec![]);
        assert!(matches!(new(config), Err(ConfigError::EmptyUnits)));
    }

    #[test]
    fn test_past_target_shows_completed_view_at_once() {
        let clock = ManualClock::new(T);
        let model = Model::with_clock(CountdownConfig::new(T, T - 5_000), clock)
            .expect("valid config")
            .with_completed_view("Completed");
        assert!(model.completed());
        assert_eq!(model.view(), "Completed");
    }

    #[test]
    fn test_completed_view_respects_hide_on_complete() {
        let clock = ManualClock::new(T);
        let config = CountdownConfig::new(T, T - 5_000).with_hide_on_complete(false);
        let model = Model::with_clock(config, clock)
            .expect("valid config")
            .with_completed_view("Completed");
        assert!(lipgloss::strip_ansi(&model.view()).contains("│0│"));
    }

    #[test]
    fn test_tick_without_change_schedules_next_tick() {
        let (mut model, _) = clock_model(T, T + 90_000);
        let cmd = model.update(tick_msg(&model));
        assert!(cmd.is_some());
        assert_eq!(model.state(), DriverState::Running);
        assert_eq!(model.flip_phase(), FlipPhase::Settled);
    }

    #[test]
    fn test_tick_with_change_starts_flip() {
        let (mut model, clock) = clock_model(T, T + 90_000);
        clock.advance(Duration::from_secs(1));
        assert!(model.update(tick_msg(&model)).is_some());
        assert!(model.plan().is_animating());
        assert!(matches!(model.flip_phase(), FlipPhase::Flipping { .. }));

        // 0.7 s at 30 fps takes 22 frames.
        let mut frames = 0;
        while model.flip_phase() != FlipPhase::Settled {
            assert!(model.update(frame_msg(&model)).is_some());
            frames += 1;
            assert!(frames <= 22, "flip did not settle");
        }
        assert_eq!(frames, 22);
        assert_eq!(model.since_tick, model.plan().flip_duration);
    }

    #[test]
    fn test_frame_interval() {
        assert_eq!(frame_interval(), Duration::from_nanos(33_333_333));
    }

    #[test]
    fn test_stale_and_foreign_messages_ignored() {
        let (mut model, clock) = clock_model(T, T + 90_000);
        let stale = tick_msg(&model);
        assert!(model.update(tick_msg(&model)).is_some());

        clock.advance(Duration::from_secs(1));
        assert!(model.update(stale).is_none());

        let foreign = Box::new(TickMsg {
            id: model.id() + 999,
            tag: model.tag,
        }) as Msg;
        assert!(model.update(foreign).is_none());
        assert!(!model.plan().is_animating());
    }

    #[test]
    fn test_completion_sends_completed_msg_once() {
        let (mut model, clock) = clock_model(T, T + 2_000);
        clock.advance(Duration::from_secs(1));
        model.update(tick_msg(&model));
        while model.flip_phase() != FlipPhase::Settled {
            model.update(frame_msg(&model));
        }

        clock.advance(Duration::from_secs(1));
        assert!(model.update(tick_msg(&model)).is_some());
        assert!(model.completed());
        assert_eq!(model.state(), DriverState::Completed);

        // The last flip plays out, then completion is announced.
        assert!(model.plan().is_animating());
        while model.flip_phase() != FlipPhase::Settled {
            assert!(model.update(frame_msg(&model)).is_some());
        }
        assert!(model.update(tick_msg(&model)).is_none());
    }

    #[test]
    fn test_completion_from_idle_is_immediate() {
        let (mut model, clock) = clock_model(T, T + 1_000);
        clock.advance(Duration::from_secs(5));
        assert!(model.update(tick_msg(&model)).is_some());
        assert!(model.completed());
        assert!(!model.plan().is_animating());
        assert_eq!(model.flip_phase(), FlipPhase::Settled);
    }

    #[test]
    fn test_key_toggles_keep_countdown_running() {
        let (mut model, clock) = clock_model(T, T + 90_000);
        model.update(tick_msg(&model));
        clock.advance(Duration::from_secs(1));
        model.update(tick_msg(&model));
        let tag = model.tag;

        let press = |c| {
            Box::new(KeyMsg {
                key: KeyCode::Char(c),
                modifiers: KeyModifiers::NONE,
            }) as Msg
        };
        assert!(model.update(press('l')).is_none());
        assert!(!model.plan().show_labels);
        assert!(!plain(&model).contains("Seconds"));

        assert!(model.update(press('s')).is_none());
        assert!(!model.plan().show_separators);
        assert!(!plain(&model).contains(':'));

        // Flip in flight and tick chain untouched.
        assert!(model.plan().is_animating());
        assert!(matches!(model.flip_phase(), FlipPhase::Flipping { .. }));
        assert_eq!(model.tag, tag);
        assert_eq!(model.state(), DriverState::Running);
    }

    #[test]
    fn test_set_labels() {
        let (mut model, _) = clock_model(T, T + 90_000);
        model
            .set_labels(vec!["D".into(), "H".into(), "M".into(), "S".into()])
            .expect("valid labels");
        let view = plain(&model);
        assert!(!view.contains("Days"));
        assert!(view.contains(" D "));

        model
            .set_labels(vec!["D".into(), "H".into()])
            .expect("mismatched labels fall back");
        assert!(plain(&model).contains("Days"));
    }

    #[test]
    fn test_reconfigure_units() {
        let (mut model, _) = clock_model(T, T + 26 * 3_600_000);
        let display = DisplayOptions {
            units: vec![UnitKind::Hours, UnitKind::Minutes, UnitKind::Seconds],
            ..DisplayOptions::default()
        };
        model.reconfigure(display).expect("valid display");
        assert_eq!(
            model.plan().unit(UnitKind::Hours).map(|u| u.text()),
            Some("26".to_string())
        );
        assert!(model
            .reconfigure(DisplayOptions {
                units: vec![UnitKind::Seconds, UnitKind::Hours],
                ..DisplayOptions::default()
            })
            .is_err());
    }

    #[test]
    fn test_dispose_is_idempotent_and_stops_ticks() {
        let (mut model, _) = clock_model(T, T + 90_000);
        let pending = tick_msg(&model);
        model.dispose();
        model.dispose();
        assert!(model.disposed());
        assert!(model.update(pending).is_none());
        assert!(model.update(tick_msg(&model)).is_none());
    }

    #[tokio::test]
    async fn test_flip_shorter_than_a_frame_is_not_animated() {
        let clock = ManualClock::new(T);
        let config = CountdownConfig::new(T, T + 5_000)
            .with_units(vec![UnitKind::Seconds, UnitKind::Milliseconds])
            .with_interval(Duration::from_millis(10));
        let mut model = Model::with_clock(config, clock.clone()).expect("valid config");

        clock.advance(Duration::from_millis(10));
        let cmd = model.update(tick_msg(&model)).expect("next command");
        assert!(model.plan().is_animating());
        assert_eq!(model.flip_phase(), FlipPhase::Settled);

        // Straight to the next tick, no frame in between.
        let msg = cmd.await.expect("a message");
        let tick = msg.downcast_ref::<TickMsg>().expect("a TickMsg");
        assert_eq!(tick.tag, model.tag);
    }

    #[tokio::test]
    async fn test_short_interval_keeps_cadence() {
        let config = CountdownConfig::from_now(Duration::from_secs(60))
            .with_units(vec![UnitKind::Seconds, UnitKind::Milliseconds])
            .with_interval(Duration::from_millis(10));
        let mut model = new(config).expect("valid config");

        let start = std::time::Instant::now();
        let mut ticks = 0;
        let mut cmd = Some(model.init());
        while let Some(next) = cmd {
            if start.elapsed() >= Duration::from_millis(300) {
                break;
            }
            let Some(msg) = next.await else { break };
            if msg.downcast_ref::<TickMsg>().is_some() {
                ticks += 1;
            }
            cmd = model.update(msg);
        }
        assert!(ticks >= 20, "only {} ticks in 300ms at a 10ms interval", ticks);
    }

    #[tokio::test]
    async fn test_init_delivers_tick() {
        let clock = ManualClock::new(T);
        let config = CountdownConfig::new(T, T + 5_000).with_interval(Duration::from_millis(5));
        let model = Model::with_clock(config, clock).expect("valid config");

        let msg = model.init().await.expect("tick message");
        let tick = msg.downcast_ref::<TickMsg>().expect("a TickMsg");
        assert_eq!(tick.id, model.id());
    }
}
