//! # Jitter policy for activity step delays.
//!
//! [`JitterPolicy`] adds randomness to the per-step sleep of a timed
//! activity so that seats started at the same instant drift apart instead of
//! hitting the ticket line in lockstep.
//!
//! - [`JitterPolicy::None`] — exact delays, fully deterministic pacing
//! - [`JitterPolicy::Full`] — random delay in `[0, step]`
//! - [`JitterPolicy::Equal`] — `step/2 + random[0, step/2]` (balanced)

use rand::Rng;
use std::time::Duration;

/// Policy controlling randomization of activity step delays.
///
/// ## Trade-offs
/// - **None**: default; phase durations stay fixed and reproducible
/// - **Full**: maximum drift, activities may finish much earlier
/// - **Equal**: drift while preserving at least half of each step
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JitterPolicy {
    /// No jitter: use the exact step delay.
    #[default]
    None,

    /// Full jitter: random delay in `[0, step]`.
    Full,

    /// Equal jitter: `step/2 + random[0, step/2]`.
    Equal,
}

impl JitterPolicy {
    /// Applies jitter to the given step delay.
    pub fn apply(&self, step: Duration) -> Duration {
        match self {
            JitterPolicy::None => step,
            JitterPolicy::Full => full_jitter(step),
            JitterPolicy::Equal => equal_jitter(step),
        }
    }
}

/// Full jitter: random[0, step]
fn full_jitter(step: Duration) -> Duration {
    let ms = step.as_millis() as u64;
    if ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::rng().random_range(0..=ms))
}

/// Equal jitter: step/2 + random[0, step/2]
fn equal_jitter(step: Duration) -> Duration {
    let ms = step.as_millis() as u64;
    if ms == 0 {
        return Duration::ZERO;
    }
    let half = ms / 2;
    let jitter = if half == 0 {
        0
    } else {
        rand::rng().random_range(0..=half)
    };
    Duration::from_millis(half + jitter)
}
