//! Wall clock and repeating timers.
//!
//! The browser implementations ([`SystemClock`], [`IntervalScheduler`]) sit
//! behind traits so the elapsed-time ticker runs natively in tests.

use std::rc::Rc;

use chrono::{DateTime, Utc};
use gloo_timers::callback::Interval;

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// `Date.now()` in the browser, the system clock elsewhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Runs a callback periodically until the returned handle is cancelled.
pub trait Scheduler {
    fn repeat(&self, period_ms: u32, tick: Box<dyn FnMut()>) -> TickerHandle;
}

/// Cancels a repeating callback. Dropping the handle cancels it too.
pub struct TickerHandle {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl TickerHandle {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// `setInterval` through gloo.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntervalScheduler;

impl Scheduler for IntervalScheduler {
    fn repeat(&self, period_ms: u32, mut tick: Box<dyn FnMut()>) -> TickerHandle {
        let interval = Interval::new(period_ms, move || tick());
        // Dropping an `Interval` clears it.
        TickerHandle::new(move || drop(interval))
    }
}

/// Whole seconds between `started_at` and `now`, never negative.
pub fn elapsed_seconds(started_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - started_at).num_seconds().max(0)
}

/// At most one running ticker reporting elapsed seconds since a start time.
#[derive(Default)]
pub struct ElapsedTimer {
    ticker: Option<TickerHandle>,
}

impl ElapsedTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// Starts ticking every `period_ms`. Returns `false` and keeps the
    /// current ticker if one is already running.
    pub fn start<F>(
        &mut self,
        scheduler: &dyn Scheduler,
        period_ms: u32,
        clock: Rc<dyn Clock>,
        started_at: DateTime<Utc>,
        mut on_tick: F,
    ) -> bool
    where
        F: FnMut(i64) + 'static,
    {
        if self.ticker.is_some() {
            log::warn!("elapsed timer already running, ignoring second start");
            return false;
        }
        let tick = move || on_tick(elapsed_seconds(started_at, clock.now()));
        self.ticker = Some(scheduler.repeat(period_ms, Box::new(tick)));
        true
    }

    /// Stops the ticker. Returns whether one was running.
    pub fn stop(&mut self) -> bool {
        match self.ticker.take() {
            Some(ticker) => {
                ticker.cancel();
                true
            }
            None => false,
        }
    }
}
