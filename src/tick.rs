//! Periodic tick sources.
//!
//! The driver never schedules anything itself. It asks a [`TickSource`] to call
//! a callback every interval and hands the returned [`TickHandle`] back when it
//! wants the calls to stop. The callback usually just wakes the host (sends a
//! message, posts an event), and the host then calls
//! [`crate::driver::CountdownDriver::tick`] on its own thread so ticks stay
//! serialized.
//!
//! ```rust
//! use flipclock_widgets::tick::{ManualTickSource, TickSource};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let mut source = ManualTickSource::new();
//! let count = Arc::new(AtomicUsize::new(0));
//! let seen = count.clone();
//! let handle = source.start(Duration::from_secs(1), Box::new(move || {
//!     seen.fetch_add(1, Ordering::SeqCst);
//! }));
//! source.fire();
//! source.stop(handle);
//! source.fire();
//! assert_eq!(count.load(Ordering::SeqCst), 1);
//! ```

use std::collections::HashMap;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::trace;

/// Callback invoked on every tick.
pub type TickCallback = Box<dyn FnMut() + Send + 'static>;

/// Identifies one started schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

impl TickHandle {
    /// The raw identifier.
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Calls a callback periodically until told to stop.
pub trait TickSource: Send {
    /// Starts calling `callback` every `interval`.
    fn start(&mut self, interval: Duration, callback: TickCallback) -> TickHandle;

    /// Stops the schedule behind `handle`. Unknown handles are ignored.
    fn stop(&mut self, handle: TickHandle);
}

enum WorkerCommand {
    Shutdown,
}

struct Worker {
    commands: Sender<WorkerCommand>,
    thread: JoinHandle<()>,
}

/// Runs each schedule on its own thread.
///
/// The thread waits on a command channel until the next deadline and calls the
/// callback when the wait times out. Stopping sends `Shutdown` and never joins,
/// so a schedule can be stopped from anywhere, including from its own
/// callback's effects.
#[derive(Default)]
pub struct ThreadTickSource {
    next_id: u64,
    workers: HashMap<u64, Worker>,
}

impl ThreadTickSource {
    /// An empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of schedules that have not been stopped.
    pub fn active(&self) -> usize {
        self.workers.len()
    }
}

impl std::fmt::Debug for ThreadTickSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadTickSource")
            .field("next_id", &self.next_id)
            .field("active", &self.workers.len())
            .finish()
    }
}

impl TickSource for ThreadTickSource {
    fn start(&mut self, interval: Duration, mut callback: TickCallback) -> TickHandle {
        self.next_id += 1;
        let id = self.next_id;
        let (commands, rx) = mpsc::channel::<WorkerCommand>();

        let thread = thread::spawn(move || {
            let mut deadline = Instant::now() + interval;
            loop {
                let wait = deadline.saturating_duration_since(Instant::now());
                match rx.recv_timeout(wait) {
                    Ok(WorkerCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                    Err(RecvTimeoutError::Timeout) => {
                        callback();
                        deadline += interval;
                    }
                }
            }
            trace!(id, "tick thread exited");
        });

        self.workers.insert(id, Worker { commands, thread });
        TickHandle(id)
    }

    fn stop(&mut self, handle: TickHandle) {
        if let Some(worker) = self.workers.remove(&handle.0) {
            // A thread that already exited has dropped its receiver.
            let _ = worker.commands.send(WorkerCommand::Shutdown);
            trace!(
                id = handle.0,
                finished = worker.thread.is_finished(),
                "tick schedule stopped"
            );
        }
    }
}

impl Drop for ThreadTickSource {
    fn drop(&mut self) {
        let ids: Vec<u64> = self.workers.keys().copied().collect();
        for id in ids {
            self.stop(TickHandle(id));
        }
    }
}

#[derive(Default)]
struct ManualInner {
    next_id: u64,
    schedules: Vec<(u64, Duration, TickCallback)>,
    stops: usize,
}

/// A tick source driven by hand.
///
/// Nothing happens until [`ManualTickSource::fire`] is called. Clones share the
/// same schedules, so one clone can be handed to a driver and another kept to
/// pump ticks and inspect what was started and stopped.
#[derive(Clone, Default)]
pub struct ManualTickSource {
    inner: Arc<Mutex<ManualInner>>,
}

impl ManualTickSource {
    /// An empty source.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ManualInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Invokes every active callback once.
    pub fn fire(&self) {
        let mut inner = self.lock();
        for (_, _, callback) in inner.schedules.iter_mut() {
            callback();
        }
    }

    /// Number of active schedules.
    pub fn active(&self) -> usize {
        self.lock().schedules.len()
    }

    /// Intervals of the active schedules.
    pub fn intervals(&self) -> Vec<Duration> {
        self.lock().schedules.iter().map(|(_, i, _)| *i).collect()
    }

    /// Number of successful `stop` calls so far.
    pub fn stops(&self) -> usize {
        self.lock().stops
    }
}

impl std::fmt::Debug for ManualTickSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualTickSource")
            .field("active", &self.active())
            .field("stops", &self.stops())
            .finish()
    }
}

impl TickSource for ManualTickSource {
    fn start(&mut self, interval: Duration, callback: TickCallback) -> TickHandle {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.schedules.push((id, interval, callback));
        TickHandle(id)
    }

    fn stop(&mut self, handle: TickHandle) {
        let mut inner = self.lock();
        let before = inner.schedules.len();
        inner.schedules.retain(|(id, _, _)| *id != handle.0);
        if inner.schedules.len() < before {
            inner.stops += 1;
        }
    }
}
