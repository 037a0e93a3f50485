//! Scheduler Module
//!
//! One-shot deferred execution with per-call cancellation, used by the
//! cache engine to enforce entry expiry without polling.
//!
//! Each scheduling call arms an independent timer and hands back its own
//! [`Cancellation`]; per call the timer moves `Armed -> Fired` or
//! `Armed -> Cancelled`, both terminal. Callbacks run on the scheduler's
//! own context, never on the caller's stack.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::trace;

use crate::error::{CacheError, Result};

// == Task Type ==
/// A deferred unit of work handed to a scheduler.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

// == Scheduler Trait ==
/// Contract for scheduling a single-shot deferred task.
pub trait Scheduler: Send + Sync {
    /// Schedules `task` to run once after `delay_seconds` have elapsed,
    /// on a context distinct from the caller.
    ///
    /// Returns a [`Cancellation`] handle for this scheduling call only:
    /// scheduling the same underlying work twice yields two independent
    /// timers with two independent handles. A negative or non-finite
    /// delay is rejected with
    /// [`CacheError::InvalidDuration`](crate::CacheError::InvalidDuration).
    fn run_once_after(&self, delay_seconds: f64, task: Task) -> Result<Cancellation>;
}

// == Cancellation Handle ==
/// Handle that cancels one scheduled task.
///
/// Calling [`cancel`](Cancellation::cancel) before the timer fires
/// prevents the task from ever running. Calling it after the task has
/// fired, or calling it repeatedly, is a no-op, never an error. Dropping
/// the handle does *not* cancel the timer.
pub struct Cancellation {
    cancel: Box<dyn Fn() + Send + Sync>,
}

impl Cancellation {
    /// Wraps a cancel action. The action must itself be idempotent.
    pub fn new(cancel: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Box::new(cancel),
        }
    }

    /// Cancels the scheduled task if it has not fired yet.
    pub fn cancel(&self) {
        (self.cancel)()
    }
}

impl std::fmt::Debug for Cancellation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Cancellation")
    }
}

// == Delay Validation ==
/// Converts a delay in seconds to a `Duration`, rejecting negative,
/// NaN, infinite, and overflowing values.
pub(crate) fn delay_from_secs(delay_seconds: f64) -> Result<Duration> {
    if !delay_seconds.is_finite() || delay_seconds < 0.0 {
        return Err(CacheError::InvalidDuration(delay_seconds));
    }
    Duration::try_from_secs_f64(delay_seconds).map_err(|_| CacheError::InvalidDuration(delay_seconds))
}

// == Tokio Scheduler ==
/// Production [`Scheduler`] backed by the tokio timer wheel.
///
/// Each scheduled task becomes a spawned task that sleeps for the delay
/// and then runs the work unless its cancellation flag was set in the
/// meantime. Cancelling also aborts the sleeping task so cancelled
/// timers do not linger until their deadline.
///
/// A cancel racing the fire is safe in either order: the flag is checked
/// immediately before the work runs, and a cancel landing after that
/// check simply lets the work run, which the contract permits.
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Creates a scheduler on the current tokio runtime.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime. Use
    /// [`with_handle`](TokioScheduler::with_handle) to target an explicit
    /// runtime from non-async code.
    pub fn new() -> Self {
        Self {
            handle: Handle::current(),
        }
    }

    /// Creates a scheduler spawning onto the given runtime handle.
    pub fn with_handle(handle: Handle) -> Self {
        Self { handle }
    }
}

impl Default for TokioScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for TokioScheduler {
    fn run_once_after(&self, delay_seconds: f64, task: Task) -> Result<Cancellation> {
        let delay = delay_from_secs(delay_seconds)?;

        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        let timer = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if !flag.load(Ordering::SeqCst) {
                task();
            }
        });

        trace!(delay_seconds, "armed one-shot timer");

        Ok(Cancellation::new(move || {
            cancelled.store(true, Ordering::SeqCst);
            timer.abort();
        }))
    }
}
