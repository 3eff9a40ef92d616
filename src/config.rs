//! # Global runtime configuration.
//!
//! Provides [`Config`], the centralized settings for one table run.
//!
//! Config is used in two ways:
//! 1. **Table creation**: `Table::new(config, subscribers)` validates it and
//!    sizes the ring, board, and bus from it.
//! 2. **Seat pacing**: [`Config::think_pace`] / [`Config::dine_pace`] derive
//!    the per-seat activity pacing.
//!
//! ## Validation
//! [`Config::validate`] rejects rings smaller than [`MIN_SEATS`] and zero
//! durations/steps before any task is spawned; the table constructor calls
//! it for you.

use std::time::Duration;

use crate::error::ConfigError;
use crate::pacing::{JitterPolicy, Pace};

/// Smallest ring size the protocol contract covers.
///
/// Below five seats the "distinct neighbors" assumption behind the
/// circular-wait argument degenerates (two seats share both forks, three
/// leave no slack), so such rings are rejected at configuration time.
pub const MIN_SEATS: usize = 5;

/// Global configuration for one table run.
///
/// ## Field semantics
/// - `seats`: ring size N (seats == forks); minimum [`MIN_SEATS`]
/// - `think` / `dine`: total duration of the timed activities; non-zero
/// - `steps`: observable progress subdivisions per activity; non-zero
/// - `jitter`: per-step randomization (default off — fixed durations)
/// - `grace`: maximum wait for seats to finish their in-flight cycle after
///   shutdown is requested
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by the Bus)
/// - `refresh`: console redraw cadence
#[derive(Clone, Debug)]
pub struct Config {
    /// Ring size: number of seats and forks.
    pub seats: usize,

    /// Total duration of the thinking activity.
    pub think: Duration,

    /// Total duration of the dining activity.
    pub dine: Duration,

    /// Observable progress steps per activity.
    pub steps: u32,

    /// Jitter applied to each activity step's sleep.
    pub jitter: JitterPolicy,

    /// Maximum time to wait for seats to drain after shutdown is requested.
    ///
    /// A seat between claiming and releasing forks always finishes its cycle
    /// before observing shutdown, so the grace must comfortably exceed one
    /// worst-case cycle at the configured pacing.
    pub grace: Duration,

    /// Capacity of the event bus broadcast ring buffer.
    pub bus_capacity: usize,

    /// Console redraw cadence.
    pub refresh: Duration,
}

impl Config {
    /// Checks the configuration, returning the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seats < MIN_SEATS {
            return Err(ConfigError::TooFewSeats { seats: self.seats });
        }
        if self.think.is_zero() {
            return Err(ConfigError::ZeroDuration { name: "think" });
        }
        if self.dine.is_zero() {
            return Err(ConfigError::ZeroDuration { name: "dine" });
        }
        if self.steps == 0 {
            return Err(ConfigError::ZeroSteps);
        }
        Ok(())
    }

    /// Pacing of the thinking activity.
    #[inline]
    pub fn think_pace(&self) -> Pace {
        Pace::new(self.think, self.steps).with_jitter(self.jitter)
    }

    /// Pacing of the dining activity.
    #[inline]
    pub fn dine_pace(&self) -> Pace {
        Pace::new(self.dine, self.steps).with_jitter(self.jitter)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `seats = 5` (the smallest valid ring)
    /// - `think = dine = 1s`, `steps = 10` (100 ms per progress tick)
    /// - `jitter = None` (fixed durations)
    /// - `grace = 10s` (several worst-case cycles at default pacing)
    /// - `bus_capacity = 1024`
    /// - `refresh = 300ms`
    fn default() -> Self {
        Self {
            seats: MIN_SEATS,
            think: Duration::from_secs(1),
            dine: Duration::from_secs(1),
            steps: 10,
            jitter: JitterPolicy::None,
            grace: Duration::from_secs(10),
            bus_capacity: 1024,
            refresh: Duration::from_millis(300),
        }
    }
}
