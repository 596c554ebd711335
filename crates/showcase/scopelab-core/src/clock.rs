//! Clock/timer collaborator.
//!
//! The core never touches a runtime directly: delays are futures handed out by
//! a [`Clock`], and timestamps come from the same place. Futures are local
//! (`!Send`); everything runs on one cooperative thread.

use std::cell::RefCell;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use futures::future::{self, FutureExt, LocalBoxFuture};

/// Future resolved once a requested delay has elapsed.
pub type SleepFuture = LocalBoxFuture<'static, ()>;

pub trait Clock {
    /// Current wall-clock time in the local zone.
    fn now(&self) -> DateTime<Local>;

    /// Resolve after `delay`, yielding control meanwhile.
    fn sleep(&self, delay: Duration) -> SleepFuture;
}

/// Clock whose sleeps resolve immediately while advancing a virtual time.
/// Every requested delay is recorded in order.
#[derive(Debug)]
pub struct ImmediateClock {
    now: RefCell<DateTime<Local>>,
    sleeps: RefCell<Vec<Duration>>,
}

impl ImmediateClock {
    pub fn new() -> Self {
        Self::starting_at(Local::now())
    }

    pub fn starting_at(start: DateTime<Local>) -> Self {
        Self {
            now: RefCell::new(start),
            sleeps: RefCell::new(Vec::new()),
        }
    }

    /// Start at the given local time-of-day on a fixed date.
    pub fn at_time(time: NaiveTime) -> Self {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1)
            .map(|d| d.and_time(time))
            .and_then(|dt| dt.and_local_timezone(Local).earliest())
            .unwrap_or_else(Local::now);
        Self::starting_at(start)
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }

    pub fn elapsed(&self) -> Duration {
        self.sleeps.borrow().iter().sum()
    }
}

impl Default for ImmediateClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ImmediateClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.borrow()
    }

    fn sleep(&self, delay: Duration) -> SleepFuture {
        self.sleeps.borrow_mut().push(delay);
        if let Ok(step) = chrono::Duration::from_std(delay) {
            let mut now = self.now.borrow_mut();
            *now += step;
        }
        future::ready(()).boxed_local()
    }
}

/// Wall clock backed by the tokio timer.
#[cfg(feature = "tokio")]
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

#[cfg(feature = "tokio")]
impl Clock for TokioClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&self, delay: Duration) -> SleepFuture {
        tokio::time::sleep(delay).boxed_local()
    }
}
