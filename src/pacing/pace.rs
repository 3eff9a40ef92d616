//! # Pace: a fixed-duration activity subdivided into observable steps.
//!
//! [`Pace`] describes how a seat runs one timed activity (thinking or
//! dining): a total duration split into `steps` equal sleeps, with progress
//! published after each step. The delay of each individual step may be
//! jittered via [`JitterPolicy`]; the step *count* is what drives the
//! progress percentage, so progress always lands on 100 regardless of
//! jitter.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use roundtable::Pace;
//!
//! let pace = Pace::new(Duration::from_secs(1), 10);
//! assert_eq!(pace.step_delay(), Duration::from_millis(100));
//! assert_eq!(pace.progress(5), 50);
//! assert_eq!(pace.progress(10), 100);
//! ```

use std::time::Duration;

use crate::pacing::jitter::JitterPolicy;

/// Pacing of one timed activity.
#[derive(Clone, Copy, Debug)]
pub struct Pace {
    /// Total activity duration (before jitter).
    pub duration: Duration,
    /// Number of observable progress steps (≥ 1, clamped by [`Pace::new`]).
    pub steps: u32,
    /// Jitter applied to each step's sleep.
    pub jitter: JitterPolicy,
}

impl Pace {
    /// Creates a pace with no jitter. A step count of 0 is clamped to 1.
    pub fn new(duration: Duration, steps: u32) -> Self {
        Self {
            duration,
            steps: steps.max(1),
            jitter: JitterPolicy::None,
        }
    }

    /// Returns a copy with the given jitter policy.
    pub fn with_jitter(mut self, jitter: JitterPolicy) -> Self {
        self.jitter = jitter;
        self
    }

    /// Returns the (possibly jittered) delay for one step.
    pub fn step_delay(&self) -> Duration {
        self.jitter.apply(self.duration / self.steps)
    }

    /// Returns the progress percentage after `step` completed steps
    /// (1-based), clamped to 100.
    pub fn progress(&self, step: u32) -> u8 {
        let step = u64::from(step.min(self.steps));
        ((step * 100) / u64::from(self.steps)) as u8
    }
}

impl Default for Pace {
    /// One second split into 10 steps, no jitter.
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 10)
    }
}
