//! Admission control for upstream calls.
//!
//! Two independent limits compose here:
//!
//! - a counting semaphore bounds how many calls are in flight at once;
//! - a sliding-window [`RateLimiter`] bounds how many calls start within any
//!   `period`.
//!
//! [`Gate::admit()`] takes the semaphore slot first and only then asks the
//! rate window, so the recorded admission time is the moment the request is
//! actually sent. Waiting on either limit suspends the task; nothing blocks
//! the runtime.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::{Mutex, Semaphore, SemaphorePermit};
use tokio::time::Instant;

use crate::{Result, TourismError};

/// Sliding-window limiter: at most `max_calls` admissions per `period`.
#[derive(Debug)]
pub struct RateLimiter {
    max_calls: usize,
    period: Duration,
    admitted: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(max_calls: u32, period: Duration) -> Self {
        Self {
            max_calls: max_calls.max(1) as usize,
            period,
            admitted: Mutex::new(VecDeque::new()),
        }
    }

    /// Wait until the window has room, then record this admission.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut admitted = self.admitted.lock().await;
                let now = Instant::now();
                while admitted
                    .front()
                    .is_some_and(|t| now.duration_since(*t) >= self.period)
                {
                    admitted.pop_front();
                }
                match admitted.front() {
                    Some(oldest) if admitted.len() >= self.max_calls => {
                        self.period - now.duration_since(*oldest)
                    }
                    _ => {
                        admitted.push_back(now);
                        return;
                    }
                }
            };
            tokio::time::sleep(wait).await;
        }
    }
}

/// Semaphore plus rate window; a call must pass both before it is sent.
#[derive(Debug)]
pub struct Gate {
    slots: Semaphore,
    limiter: RateLimiter,
}

impl Gate {
    pub fn new(concurrency_limit: usize, rate_limit_calls: u32, rate_limit_period: Duration) -> Self {
        Self {
            slots: Semaphore::new(concurrency_limit.max(1)),
            limiter: RateLimiter::new(rate_limit_calls, rate_limit_period),
        }
    }

    /// Wait for an in-flight slot and a rate-window admission.
    ///
    /// The returned permit holds the slot until dropped.
    pub async fn admit(&self) -> Result<SemaphorePermit<'_>> {
        let permit = self
            .slots
            .acquire()
            .await
            .map_err(|_| TourismError::ClientClosed)?;
        self.limiter.acquire().await;
        Ok(permit)
    }

    /// Refuse all further admissions; waiting callers fail with
    /// [`TourismError::ClientClosed`].
    pub fn close(&self) {
        self.slots.close();
    }

    /// Slots currently free.
    pub fn available_slots(&self) -> usize {
        self.slots.available_permits()
    }
}
