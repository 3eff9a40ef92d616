//! # Shared state board for external observation.
//!
//! [`StateBoard`] is the read side of the simulation: one cell per seat
//! (phase, progress, completed cycles) and one availability flag per fork.
//! The renderer polls it; the protocol never reads it back.
//!
//! ## Rules
//! - **Single writer per field**: a seat's cell is written only by that
//!   seat's task; a fork's flag only by [`ForkRing`](crate::ForkRing) while
//!   holding that fork's lock. No internal locking is needed.
//! - **Lock-free reads**: every field is an atomic with relaxed ordering.
//!   Readers may observe torn combinations *across* fields (a seat already
//!   marked Dining while its fork still reads free) — acceptable for a
//!   status display, and the only consistency the board promises.
//! - [`StateBoard::snapshot`] copies the whole board field by field; it is a
//!   convenience for renderers, not a consistent cut.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};

/// Observable phase of a seat.
///
/// `Waiting` covers the whole span from requesting a turn in the ticket
/// line until both forks are claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    /// Running the timed thinking activity.
    Thinking = 0,
    /// In the ticket line or claiming forks.
    Waiting = 1,
    /// Holding both forks, running the timed dining activity.
    Dining = 2,
}

impl Phase {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Phase::Thinking,
            1 => Phase::Waiting,
            _ => Phase::Dining,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Phase::Thinking => "thinking",
            Phase::Waiting => "waiting",
            Phase::Dining => "dining",
        };
        f.write_str(label)
    }
}

/// One seat's cell. Written only by the owning seat's task.
struct Seat {
    phase: AtomicU8,
    progress: AtomicU8,
    cycles: AtomicU64,
}

impl Seat {
    fn new() -> Self {
        Self {
            phase: AtomicU8::new(Phase::Thinking as u8),
            progress: AtomicU8::new(0),
            cycles: AtomicU64::new(0),
        }
    }
}

/// Copy of one seat's cell, taken by [`StateBoard::snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatSnapshot {
    /// Observable phase at snapshot time.
    pub phase: Phase,
    /// Progress through the current timed activity, `0..=100`.
    pub progress: u8,
    /// Completed think-dine cycles since startup.
    pub cycles: u64,
}

/// Copy of the whole board, taken by [`StateBoard::snapshot`].
///
/// Indexed by seat id and fork id respectively. Fields may be mutually
/// inconsistent (see module docs).
#[derive(Debug, Clone)]
pub struct BoardSnapshot {
    /// Per-seat cells.
    pub seats: Vec<SeatSnapshot>,
    /// Per-fork availability (`true` = free).
    pub forks: Vec<bool>,
}

/// Shared status board: per-seat phase/progress/cycles, per-fork availability.
///
/// Created once at startup for the configured ring size; seats and forks are
/// indexed `0..N`. Out-of-range indices are programming errors and panic.
pub struct StateBoard {
    seats: Box<[Seat]>,
    forks: Box<[AtomicBool]>,
}

impl StateBoard {
    /// Creates a board for `seats` seats and as many forks, all forks free,
    /// every seat Thinking at 0%.
    pub fn new(seats: usize) -> Self {
        Self {
            seats: (0..seats).map(|_| Seat::new()).collect(),
            forks: (0..seats).map(|_| AtomicBool::new(true)).collect(),
        }
    }

    /// Number of seats (== number of forks).
    pub fn seats(&self) -> usize {
        self.seats.len()
    }

    /// Sets a seat's observable phase and resets its progress to 0.
    pub fn set_phase(&self, seat: usize, phase: Phase) {
        let cell = &self.seats[seat];
        cell.phase.store(phase as u8, Ordering::Relaxed);
        cell.progress.store(0, Ordering::Relaxed);
    }

    /// Sets a seat's progress percentage, clamped to 100.
    pub fn set_progress(&self, seat: usize, pct: u8) {
        self.seats[seat].progress.store(pct.min(100), Ordering::Relaxed);
    }

    /// Increments a seat's completed-cycle counter and returns the new count.
    pub fn bump_cycles(&self, seat: usize) -> u64 {
        self.seats[seat].cycles.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Returns a seat's completed-cycle counter.
    pub fn cycles(&self, seat: usize) -> u64 {
        self.seats[seat].cycles.load(Ordering::Relaxed)
    }

    /// Sets a fork's availability flag. Called by the ring only, while
    /// holding that fork's lock.
    pub fn set_fork_free(&self, fork: usize, free: bool) {
        self.forks[fork].store(free, Ordering::Relaxed);
    }

    /// Returns a fork's availability flag.
    pub fn fork_free(&self, fork: usize) -> bool {
        self.forks[fork].load(Ordering::Relaxed)
    }

    /// Copies the board field by field (not a consistent cut).
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            seats: self
                .seats
                .iter()
                .map(|cell| SeatSnapshot {
                    phase: Phase::from_u8(cell.phase.load(Ordering::Relaxed)),
                    progress: cell.progress.load(Ordering::Relaxed),
                    cycles: cell.cycles.load(Ordering::Relaxed),
                })
                .collect(),
            forks: self
                .forks
                .iter()
                .map(|flag| flag.load(Ordering::Relaxed))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_idle_and_free() {
        let board = StateBoard::new(5);
        let snap = board.snapshot();
        assert_eq!(snap.seats.len(), 5);
        assert_eq!(snap.forks.len(), 5);
        for seat in &snap.seats {
            assert_eq!(seat.phase, Phase::Thinking);
            assert_eq!(seat.progress, 0);
            assert_eq!(seat.cycles, 0);
        }
        assert!(snap.forks.iter().all(|&free| free));
    }

    #[test]
    fn test_phase_change_resets_progress() {
        let board = StateBoard::new(5);
        board.set_progress(2, 70);
        assert_eq!(board.snapshot().seats[2].progress, 70);

        board.set_phase(2, Phase::Dining);
        let snap = board.snapshot();
        assert_eq!(snap.seats[2].phase, Phase::Dining);
        assert_eq!(snap.seats[2].progress, 0);
    }

    #[test]
    fn test_progress_clamped_to_100() {
        let board = StateBoard::new(5);
        board.set_progress(0, 250);
        assert_eq!(board.snapshot().seats[0].progress, 100);
    }

    #[test]
    fn test_cycles_accumulate() {
        let board = StateBoard::new(5);
        assert_eq!(board.bump_cycles(4), 1);
        assert_eq!(board.bump_cycles(4), 2);
        assert_eq!(board.cycles(4), 2);
        assert_eq!(board.cycles(0), 0);
    }

    #[test]
    fn test_fork_flags_roundtrip() {
        let board = StateBoard::new(5);
        board.set_fork_free(1, false);
        assert!(!board.fork_free(1));
        assert!(board.fork_free(0));
        board.set_fork_free(1, true);
        assert!(board.fork_free(1));
    }
}
