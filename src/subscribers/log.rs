//! # LogWriter — simple event printer.
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout, one line
//! per event. Used for headless runs, tests and demos; the live console
//! owns the terminal, so the two are never active together.
//!
//! ## Example output
//! ```text
//! [phase] seat=0 phase=thinking
//! [turn-requested] seat=0
//! [turn-granted] seat=0
//! [claimed] fork=0 seat=0
//! [claimed] fork=1 seat=0
//! [freed] fork=0 seat=0
//! [cycle] seat=0 cycles=1
//! [shutdown-requested]
//! [all-seats-stopped]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event printer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Constructs a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::PhaseChanged => {
                if let (Some(seat), Some(phase)) = (e.seat, e.phase) {
                    println!("[phase] seat={seat} phase={phase}");
                }
            }
            EventKind::TurnRequested => {
                if let Some(seat) = e.seat {
                    println!("[turn-requested] seat={seat}");
                }
            }
            EventKind::TurnGranted => {
                if let Some(seat) = e.seat {
                    println!("[turn-granted] seat={seat}");
                }
            }
            EventKind::ForkClaimed => {
                if let (Some(fork), Some(seat)) = (e.fork, e.seat) {
                    println!("[claimed] fork={fork} seat={seat}");
                }
            }
            EventKind::ForkFreed => {
                if let (Some(fork), Some(seat)) = (e.fork, e.seat) {
                    println!("[freed] fork={fork} seat={seat}");
                }
            }
            EventKind::CycleCompleted => {
                if let (Some(seat), Some(cycle)) = (e.seat, e.cycle) {
                    println!("[cycle] seat={seat} cycles={cycle}");
                }
            }
            EventKind::SeatStopped => {
                if let Some(seat) = e.seat {
                    println!("[seat-stopped] seat={seat}");
                }
            }
            EventKind::ShutdownRequested => {
                println!("[shutdown-requested]");
            }
            EventKind::AllSeatsStopped => {
                println!("[all-seats-stopped]");
            }
            EventKind::GraceExceeded => {
                println!("[grace-exceeded]");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
