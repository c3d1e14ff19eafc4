//! Advisory repeat-singer throttle
//!
//! Remembers only the most recent accepted submission, in memory. If the same
//! singer comes back within the window and nobody else was accepted in
//! between, the submission is rejected with the minutes left to wait. Any
//! accepted submission by another singer resets the window, and a restart
//! clears it entirely. This is a UX nicety, not a fairness control.

use knq_common::{Error, Result};
use std::time::{Duration, Instant};

/// How long the same singer has to wait between back-to-back submissions
pub const REPEAT_WINDOW: Duration = Duration::from_secs(5 * 60);

/// Tracks the last accepted submission
#[derive(Debug, Default)]
pub struct SubmissionThrottle {
    last: Option<(String, Instant)>,
}

impl SubmissionThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a submission by `singer` would be a back-to-back repeat
    ///
    /// Singer names compare case-insensitively on their trimmed form.
    pub fn check(&self, singer: &str, now: Instant) -> Result<()> {
        let key = normalize(singer);

        if let Some((last_singer, accepted_at)) = &self.last {
            if *last_singer == key {
                let elapsed = now.duration_since(*accepted_at);
                if elapsed < REPEAT_WINDOW {
                    let remaining = REPEAT_WINDOW - elapsed;
                    let minutes = remaining.as_secs().div_ceil(60).max(1);
                    return Err(Error::Throttled(format!(
                        "{} was just added to the queue; wait about {} more minute(s) \
                         or let someone else sign up first",
                        singer.trim(),
                        minutes
                    )));
                }
            }
        }

        Ok(())
    }

    /// Record an accepted submission
    pub fn record(&mut self, singer: &str, now: Instant) {
        self.last = Some((normalize(singer), now));
    }
}

fn normalize(singer: &str) -> String {
    singer.trim().to_lowercase()
}
