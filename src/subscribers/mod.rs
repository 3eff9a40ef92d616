//! Event subscribers: the extension point for observing the run.

mod log;
mod subscribe;
mod tracker;

pub use log::LogWriter;
pub use subscribe::{Subscribe, SubscriberSet};
pub use tracker::{SeatStats, SeatTracker};
