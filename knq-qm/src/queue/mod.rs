//! Queue operations for the karaoke night

mod manager;
mod throttle;

pub use manager::{QueueManager, SubmitOutcome};
pub use throttle::{SubmissionThrottle, REPEAT_WINDOW};
