//! # Seat lifecycle tracker with sequence-based ordering.
//!
//! Maintains authoritative per-seat state (alive, completed cycles) from the
//! event stream, using event sequence numbers to reject stale or reordered
//! deliveries.
//!
//! ## Architecture
//! ```text
//! Table ──► Bus ──► listener ──► SeatTracker::on_event()
//!                                       │
//!                                       ▼
//!                              Vec<SeatState>  (seat → {seq, alive, cycles})
//! ```
//!
//! ## Rules
//! - `PhaseChanged` marks a seat alive; `SeatStopped` marks it stopped;
//!   `CycleCompleted` records the cycle count. Other events are ignored.
//! - Events with `seq <= last_seq` for that seat are **rejected** (stale).
//! - Reads (`snapshot`, `stuck`) are eventually consistent with the bus.

use async_trait::async_trait;

use tokio::sync::RwLock;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Per-seat state for ordering validation.
#[derive(Debug, Clone, Copy)]
struct SeatState {
    /// Last seen sequence number for this seat.
    last_seq: u64,
    /// Whether the seat's task is still running.
    alive: bool,
    /// Completed cycles as reported by `CycleCompleted`.
    cycles: u64,
}

/// Per-seat statistics, as returned by [`SeatTracker::snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatStats {
    /// Seat id.
    pub seat: usize,
    /// Whether the seat's task was still running at snapshot time.
    pub alive: bool,
    /// Completed cycles.
    pub cycles: u64,
}

/// Tracker of seat liveness and throughput.
///
/// Used by the table's shutdown path to name seats that did not finish
/// within the grace period, and by tests as the liveness counter.
pub struct SeatTracker {
    state: RwLock<Vec<SeatState>>,
}

impl SeatTracker {
    /// Creates a tracker for `seats` seats, all initially stopped.
    pub fn new(seats: usize) -> Self {
        Self {
            state: RwLock::new(vec![
                SeatState {
                    last_seq: 0,
                    alive: false,
                    cycles: 0,
                };
                seats
            ]),
        }
    }

    /// Applies one event if it is newer than the last seen for its seat.
    ///
    /// Returns whether the event changed tracked state.
    async fn update(&self, ev: &Event) -> bool {
        let Some(seat) = ev.seat else {
            return false;
        };

        let mut state = self.state.write().await;
        let Some(entry) = state.get_mut(seat) else {
            return false;
        };
        if ev.seq <= entry.last_seq {
            return false;
        }

        match ev.kind {
            EventKind::PhaseChanged => {
                entry.last_seq = ev.seq;
                entry.alive = true;
                true
            }
            EventKind::SeatStopped => {
                entry.last_seq = ev.seq;
                entry.alive = false;
                true
            }
            EventKind::CycleCompleted => {
                entry.last_seq = ev.seq;
                if let Some(cycle) = ev.cycle {
                    entry.cycles = entry.cycles.max(cycle);
                }
                true
            }
            _ => {
                entry.last_seq = ev.seq;
                false
            }
        }
    }

    /// Returns per-seat statistics.
    pub async fn snapshot(&self) -> Vec<SeatStats> {
        self.state
            .read()
            .await
            .iter()
            .enumerate()
            .map(|(seat, st)| SeatStats {
                seat,
                alive: st.alive,
                cycles: st.cycles,
            })
            .collect()
    }

    /// Returns the seats still marked alive (stuck-seat report during
    /// shutdown).
    pub async fn stuck(&self) -> Vec<usize> {
        self.state
            .read()
            .await
            .iter()
            .enumerate()
            .filter(|(_, st)| st.alive)
            .map(|(seat, _)| seat)
            .collect()
    }
}

#[async_trait]
impl Subscribe for SeatTracker {
    async fn on_event(&self, event: &Event) {
        self.update(event).await;
    }

    fn name(&self) -> &'static str {
        "seat-tracker"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Phase;

    #[tokio::test]
    async fn test_phase_marks_alive_and_stop_clears_it() {
        let tracker = SeatTracker::new(5);

        tracker
            .update(&Event::new(EventKind::PhaseChanged).with_seat(1).with_phase(Phase::Thinking))
            .await;
        assert_eq!(tracker.stuck().await, vec![1]);

        tracker
            .update(&Event::new(EventKind::SeatStopped).with_seat(1))
            .await;
        assert!(tracker.stuck().await.is_empty());
    }

    #[tokio::test]
    async fn test_stale_events_rejected() {
        let tracker = SeatTracker::new(5);

        let newer = Event::new(EventKind::SeatStopped).with_seat(2);
        let older = Event::new(EventKind::PhaseChanged)
            .with_seat(2)
            .with_phase(Phase::Waiting);
        // `older` was constructed later, so swap seq to simulate reordering.
        let mut older = older;
        older.seq = newer.seq.saturating_sub(1).max(1);

        assert!(tracker.update(&newer).await);
        assert!(!tracker.update(&older).await, "stale event applied");
        assert!(tracker.stuck().await.is_empty());
    }

    #[tokio::test]
    async fn test_cycles_recorded() {
        let tracker = SeatTracker::new(5);
        tracker
            .update(&Event::new(EventKind::CycleCompleted).with_seat(3).with_cycle(7))
            .await;
        let stats = tracker.snapshot().await;
        assert_eq!(stats[3].cycles, 7);
        assert_eq!(stats[0].cycles, 0);
    }

    #[tokio::test]
    async fn test_unknown_seat_ignored() {
        let tracker = SeatTracker::new(2);
        assert!(
            !tracker
                .update(&Event::new(EventKind::SeatStopped).with_seat(9))
                .await
        );
    }
}
