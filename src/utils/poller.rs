use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::errors::AutopilotError;

#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Paces the control loop: sleeps a fixed interval between polls and fails
/// once the wall-clock timeout, the poll budget, or a cancellation is hit.
pub struct Poller {
    interval: Duration,
    timeout: Option<Duration>,
    max_polls: Option<u64>,
    cancel: CancelToken,
    started: Instant,
    polls: u64,
}

impl Poller {
    pub fn new(interval: Duration) -> Self {
        Poller {
            interval,
            timeout: None,
            max_polls: None,
            cancel: CancelToken::new(),
            started: Instant::now(),
            polls: 0,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_polls(mut self, max_polls: u64) -> Self {
        self.max_polls = Some(max_polls);
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// Starts the timeout clock and the poll budget over.
    pub fn restart(&mut self) {
        self.started = Instant::now();
        self.polls = 0;
    }

    pub fn check(&self, activity: &str) -> Result<(), AutopilotError> {
        if self.cancel.is_cancelled() {
            return Err(AutopilotError::Cancelled(activity.to_string()));
        }
        if let Some(timeout) = self.timeout {
            if self.started.elapsed() >= timeout {
                return Err(AutopilotError::Timeout(activity.to_string()));
            }
        }
        if let Some(max_polls) = self.max_polls {
            if self.polls >= max_polls {
                return Err(AutopilotError::Timeout(format!(
                    "{activity} (gave up after {max_polls} polls)"
                )));
            }
        }
        Ok(())
    }

    pub fn pause(&mut self, activity: &str) -> Result<(), AutopilotError> {
        self.check(activity)?;
        self.polls += 1;
        if !self.interval.is_zero() {
            thread::sleep(self.interval);
        }
        Ok(())
    }

    /// Sleeps for `duration` regardless of the poll interval.
    pub fn sleep(&self, duration: Duration, activity: &str) -> Result<(), AutopilotError> {
        self.check(activity)?;
        if !duration.is_zero() {
            thread::sleep(duration);
        }
        Ok(())
    }
}
