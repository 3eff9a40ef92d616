//! # Runtime events emitted by seats, the fork ring, and the ticket line.
//!
//! The [`EventKind`] enum classifies events across three categories:
//! - **Seat lifecycle**: phase transitions, completed cycles, seat exit
//! - **Arbitration**: ticket-line turns and fork claims/releases
//! - **Shutdown**: shutdown request and drain outcome
//!
//! The [`Event`] struct carries optional metadata (seat id, fork id, phase,
//! cycle count) set per kind via builder methods.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Arbitration events are constructed while the corresponding
//! lock (fork or ticket line) is held, so for a given fork or for the line
//! as a whole, `seq` order equals mutation order. Use `seq` to restore that
//! order when events are consumed out of order.
//!
//! ## Example
//! ```rust
//! use roundtable::{Event, EventKind, Phase};
//!
//! let ev = Event::new(EventKind::PhaseChanged)
//!     .with_seat(3)
//!     .with_phase(Phase::Dining);
//!
//! assert_eq!(ev.kind, EventKind::PhaseChanged);
//! assert_eq!(ev.seat, Some(3));
//! assert_eq!(ev.phase, Some(Phase::Dining));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::board::Phase;

/// Global sequence counter for event ordering. Starts at 1 so that 0 can
/// mean "nothing seen yet" in consumers that track the last applied seq.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(1);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Seat lifecycle ===
    /// A seat entered a new observable phase.
    ///
    /// Sets:
    /// - `seat`: seat id
    /// - `phase`: the phase being entered
    /// - `seq`: global sequence
    PhaseChanged,

    /// A seat finished a full think-dine cycle (forks released, ticket
    /// returned).
    ///
    /// Sets:
    /// - `seat`: seat id
    /// - `cycle`: completed-cycle count after this cycle
    /// - `seq`: global sequence
    CycleCompleted,

    /// A seat's task observed shutdown and exited its loop.
    ///
    /// Sets:
    /// - `seat`: seat id
    /// - `seq`: global sequence
    SeatStopped,

    // === Arbitration ===
    /// A seat joined the ticket line. Published under the line's lock, so
    /// `seq` order across these events equals arrival order.
    ///
    /// Sets:
    /// - `seat`: seat id
    /// - `seq`: global sequence
    TurnRequested,

    /// A seat reached the head of the line and may begin claiming forks.
    ///
    /// Sets:
    /// - `seat`: seat id
    /// - `seq`: global sequence
    TurnGranted,

    /// A fork was claimed. Published under that fork's lock.
    ///
    /// Sets:
    /// - `fork`: fork id
    /// - `seat`: the new holder
    /// - `seq`: global sequence
    ForkClaimed,

    /// A fork was released. Published under that fork's lock.
    ///
    /// Sets:
    /// - `fork`: fork id
    /// - `seat`: the previous holder
    /// - `seq`: global sequence
    ForkFreed,

    // === Shutdown ===
    /// Shutdown requested (console quit, OS signal, or external cancel).
    ///
    /// Sets:
    /// - `seq`: global sequence
    ShutdownRequested,

    /// All seats finished their in-flight cycle within the grace period.
    ///
    /// Sets:
    /// - `seq`: global sequence
    AllSeatsStopped,

    /// Grace period exceeded; some seats were still running.
    ///
    /// Sets:
    /// - `seq`: global sequence
    GraceExceeded,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Event classification.
    pub kind: EventKind,
    /// Seat id, if applicable.
    pub seat: Option<usize>,
    /// Fork id, if applicable.
    pub fork: Option<usize>,
    /// Phase being entered (for [`EventKind::PhaseChanged`]).
    pub phase: Option<Phase>,
    /// Completed-cycle count (for [`EventKind::CycleCompleted`]).
    pub cycle: Option<u64>,
}

impl Event {
    /// Creates a new event of the given kind with the next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            kind,
            seat: None,
            fork: None,
            phase: None,
            cycle: None,
        }
    }

    /// Attaches a seat id.
    #[inline]
    pub fn with_seat(mut self, seat: usize) -> Self {
        self.seat = Some(seat);
        self
    }

    /// Attaches a fork id.
    #[inline]
    pub fn with_fork(mut self, fork: usize) -> Self {
        self.fork = Some(fork);
        self
    }

    /// Attaches a phase.
    #[inline]
    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Attaches a completed-cycle count.
    #[inline]
    pub fn with_cycle(mut self, cycle: u64) -> Self {
        self.cycle = Some(cycle);
        self
    }
}
