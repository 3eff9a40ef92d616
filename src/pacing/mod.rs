//! Pacing of the timed activities (thinking, dining).

mod jitter;
mod pace;

pub use jitter::JitterPolicy;
pub use pace::Pace;
