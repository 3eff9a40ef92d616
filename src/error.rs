//! Error types used by the roundtable runtime.
//!
//! This module defines two error enums:
//!
//! - [`ConfigError`] — rejected startup configuration, reported before any
//!   seat task is spawned.
//! - [`RuntimeError`] — errors raised by the supervision runtime itself,
//!   such as a shutdown sequence exceeding its grace period.
//!
//! Protocol invariant violations (dequeuing while not at the head of the
//! line, releasing a fork held by someone else) are *not* represented here:
//! they are programming errors and panic immediately rather than surfacing
//! as recoverable values.

use std::time::Duration;
use thiserror::Error;

use crate::config::MIN_SEATS;

/// # Errors produced by configuration validation.
///
/// All of these are fatal: the process prints the error and exits with a
/// non-zero status before any philosopher starts.
#[non_exhaustive]
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Ring size below the minimum required for distinct neighbors.
    #[error("ring size {seats} is below the minimum of {min}", min = MIN_SEATS)]
    TooFewSeats {
        /// The rejected ring size.
        seats: usize,
    },

    /// A phase duration of zero would collapse the state machine.
    #[error("{name} duration must be non-zero")]
    ZeroDuration {
        /// Which duration field was zero (`"think"` or `"dine"`).
        name: &'static str,
    },

    /// Progress must be divisible into at least one observable step.
    #[error("progress steps must be non-zero")]
    ZeroSteps,
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use roundtable::ConfigError;
    ///
    /// let err = ConfigError::TooFewSeats { seats: 3 };
    /// assert_eq!(err.as_label(), "config_too_few_seats");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::TooFewSeats { .. } => "config_too_few_seats",
            ConfigError::ZeroDuration { .. } => "config_zero_duration",
            ConfigError::ZeroSteps => "config_zero_steps",
        }
    }
}

/// # Errors produced by the supervision runtime.
///
/// These represent failures of the runtime itself, not of the protocol:
/// the only one today is a shutdown drain that did not finish in time.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Shutdown grace period was exceeded; some seats were still running.
    #[error("shutdown grace {grace:?} exceeded; stuck seats: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Seats that had not finished their in-flight cycle in time.
        stuck: Vec<usize>,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use roundtable::RuntimeError;
    /// use std::time::Duration;
    ///
    /// let err = RuntimeError::GraceExceeded { grace: Duration::from_secs(5), stuck: vec![2] };
    /// assert_eq!(err.as_label(), "runtime_grace_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }
}
