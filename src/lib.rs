#![warn(missing_docs)]

//! # flipclock-widgets
//!
//! A split-flap countdown clock for terminal applications built with
//! [bubbletea-rs](https://github.com/joshka/bubbletea-rs).
//!
//! The clock shows the time left until a target instant as rows of flip digit
//! blocks grouped into units (days, hours, minutes, seconds and optionally
//! milliseconds). Digits that change on a tick flip over a shared duration, so
//! a carry across several units lands in the same frame.
//!
//! ## Layers
//!
//! | Module | Role |
//! |--------|------|
//! | [`decompose`] | Millisecond delta to unit values |
//! | [`flip`] | Which digit positions flip, and flip timing |
//! | [`resolve`] | Units, labels and visibility to a plan skeleton |
//! | [`driver`] | The tick loop and completion detection |
//! | [`view`] | Drawing a render plan with Lip Gloss styles |
//! | [`flipclock`] | The bubbletea-rs component tying it together |
//!
//! The lower layers have no dependency on bubbletea-rs. A host with its own
//! event loop can use [`driver::CountdownDriver`] directly together with a
//! [`tick::TickSource`].
//!
//! ## Quick Start
//!
//! ```rust
//! use flipclock_widgets::prelude::*;
//! use std::time::Duration;
//!
//! let config = CountdownConfig::from_now(Duration::from_secs(3 * 3600))
//!     .with_units(vec![UnitKind::Hours, UnitKind::Minutes, UnitKind::Seconds])
//!     .with_labels(vec!["HRS".into(), "MIN".into(), "SEC".into()]);
//!
//! let clock = flipclock_new(config).expect("valid configuration");
//! let _cmd = clock.init(); // hand this to the bubbletea-rs runtime
//! assert!(clock.view().contains("HRS"));
//! ```
//!
//! ## Driving without bubbletea-rs
//!
//! ```rust
//! use flipclock_widgets::prelude::*;
//! use flipclock_widgets::clock::ManualClock;
//! use std::time::Duration;
//!
//! let clock = ManualClock::new(0);
//! let mut driver = CountdownDriver::with_clock(CountdownConfig::new(0, 90_000), clock.clone())
//!     .expect("valid configuration");
//!
//! clock.advance(Duration::from_secs(31));
//! if let TickOutcome::Render(plan) = driver.tick() {
//!     let seconds = plan.unit(UnitKind::Seconds).unwrap();
//!     assert_eq!(seconds.text(), "59");
//!     assert!(seconds.is_animating());
//! }
//! ```

pub mod clock;
pub mod config;
pub mod decompose;
pub mod driver;
pub mod error;
pub mod flip;
pub mod flipclock;
pub mod key;
pub mod plan;
pub mod resolve;
pub mod tick;
pub mod unit;
pub mod view;

pub use config::{CountdownConfig, DisplayOptions};
pub use driver::{CountdownDriver, DriverState, TickOutcome};
pub use error::ConfigError;
pub use flipclock::{
    new as flipclock_new, CompletedMsg as FlipClockCompletedMsg, FrameMsg as FlipClockFrameMsg,
    KeyMap as FlipClockKeyMap, Model as FlipClock, TickMsg as FlipClockTickMsg,
};
pub use plan::{RenderPlan, UnitPlan};
pub use unit::{UnitKind, UnitValue};

/// Prelude module for convenient imports.
///
/// ```rust
/// use flipclock_widgets::prelude::*;
/// ```
pub mod prelude {
    pub use crate::clock::{Clock, SystemClock};
    pub use crate::config::{CountdownConfig, DisplayOptions};
    pub use crate::decompose::{decompose, Decomposition};
    pub use crate::driver::{CountdownDriver, DriverState, TickOutcome};
    pub use crate::error::ConfigError;
    pub use crate::flip::{diff_digits, Digit, FlipPhase};
    pub use crate::flipclock::{
        new as flipclock_new, CompletedMsg as FlipClockCompletedMsg, Model as FlipClock,
    };
    pub use crate::plan::{RenderPlan, UnitPlan};
    pub use crate::resolve::resolve;
    pub use crate::tick::{ThreadTickSource, TickSource};
    pub use crate::unit::{UnitKind, UnitValue};
    pub use crate::view::{render_plan, FlipStyles};
}
