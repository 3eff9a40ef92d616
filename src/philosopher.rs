//! # Philosopher: the per-seat actor state machine.
//!
//! One [`Philosopher`] runs per seat as its own tokio task and cycles
//! through the arbitration protocol, publishing every transition to the
//! [`StateBoard`] and the event bus.
//!
//! ## Cycle
//! ```text
//! loop {
//!   ├─► token cancelled? ──► publish SeatStopped, exit
//!   ├─► Thinking   (timed, progress 0→100)
//!   ├─► Waiting    enqueue → await_turn            (FIFO gate)
//!   ├─►            acquire(left) → acquire(right)  (fixed global order)
//!   ├─► Dining     (timed, progress 0→100)
//!   └─► Releasing  release(left), release(right), dequeue
//!                  bump cycle counter, publish CycleCompleted
//! }
//! ```
//!
//! ## Rules
//! - Forks are claimed **left-then-right for every seat**. The ticket line
//!   admits one seat at a time into the claiming phase, and the claim order
//!   is globally consistent; together these exclude circular wait.
//! - Shutdown is observed **only at the top of the cycle**. A seat that has
//!   started a cycle always finishes it and releases everything it holds,
//!   so no fork is ever abandoned while held.
//! - The ticket is returned (dequeue) only after both forks are released,
//!   preserving the serialization the liveness argument relies on.

use std::sync::Arc;

use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::board::{Phase, StateBoard};
use crate::events::{Bus, Event, EventKind};
use crate::pacing::Pace;
use crate::sync::{ForkRing, TicketQueue};

/// Per-seat actor driving the arbitration protocol.
pub struct Philosopher {
    seat: usize,
    ring: Arc<ForkRing>,
    queue: Arc<TicketQueue>,
    board: Arc<StateBoard>,
    bus: Bus,
    think: Pace,
    dine: Pace,
}

impl Philosopher {
    /// Creates the actor for `seat`.
    pub fn new(
        seat: usize,
        ring: Arc<ForkRing>,
        queue: Arc<TicketQueue>,
        board: Arc<StateBoard>,
        bus: Bus,
        think: Pace,
        dine: Pace,
    ) -> Self {
        Self {
            seat,
            ring,
            queue,
            board,
            bus,
            think,
            dine,
        }
    }

    /// Left fork: same index as the seat.
    fn left(&self) -> usize {
        self.seat
    }

    /// Right fork: next index around the ring.
    fn right(&self) -> usize {
        (self.seat + 1) % self.ring.len()
    }

    /// Runs the cycle until shutdown is observed at a cycle boundary.
    ///
    /// Returns the seat id so the supervisor can account for finished
    /// seats.
    pub async fn run(self, token: CancellationToken) -> usize {
        loop {
            if token.is_cancelled() {
                break;
            }

            self.enter(Phase::Thinking);
            self.pace(&self.think).await;

            self.enter(Phase::Waiting);
            self.queue.enqueue(self.seat).await;
            self.queue.await_turn(self.seat).await;

            self.ring.acquire(self.left(), self.seat).await;
            self.ring.acquire(self.right(), self.seat).await;

            self.enter(Phase::Dining);
            self.pace(&self.dine).await;

            self.ring.release(self.left(), self.seat).await;
            self.ring.release(self.right(), self.seat).await;
            self.queue.dequeue(self.seat).await;

            let cycle = self.board.bump_cycles(self.seat);
            self.bus.publish(
                Event::new(EventKind::CycleCompleted)
                    .with_seat(self.seat)
                    .with_cycle(cycle),
            );
        }

        self.bus
            .publish(Event::new(EventKind::SeatStopped).with_seat(self.seat));
        self.seat
    }

    /// Publishes a phase transition to the board and the bus.
    fn enter(&self, phase: Phase) {
        self.board.set_phase(self.seat, phase);
        self.bus.publish(
            Event::new(EventKind::PhaseChanged)
                .with_seat(self.seat)
                .with_phase(phase),
        );
    }

    /// Runs one timed activity, publishing progress after each step.
    async fn pace(&self, pace: &Pace) {
        for step in 1..=pace.steps {
            time::sleep(pace.step_delay()).await;
            self.board.set_progress(self.seat, pace.progress(step));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn pieces(seats: usize) -> (Arc<ForkRing>, Arc<TicketQueue>, Arc<StateBoard>, Bus) {
        let bus = Bus::new(256);
        let board = Arc::new(StateBoard::new(seats));
        let ring = Arc::new(ForkRing::new(seats, board.clone(), bus.clone()));
        let queue = Arc::new(TicketQueue::new(bus.clone()));
        (ring, queue, board, bus)
    }

    fn fast_pace() -> Pace {
        Pace::new(Duration::from_millis(10), 2)
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_seat_exits_without_cycling() {
        let (ring, queue, board, bus) = pieces(5);
        let p = Philosopher::new(0, ring, queue, board.clone(), bus, fast_pace(), fast_pace());

        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(p.run(token).await, 0);
        assert_eq!(board.cycles(0), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lone_seat_completes_cycles_and_frees_forks() {
        let (ring, queue, board, bus) = pieces(5);
        let p = Philosopher::new(
            2,
            ring,
            queue.clone(),
            board.clone(),
            bus,
            fast_pace(),
            fast_pace(),
        );

        let token = CancellationToken::new();
        let handle = tokio::spawn(p.run(token.clone()));

        time::sleep(Duration::from_millis(200)).await;
        token.cancel();
        handle.await.unwrap();

        assert!(board.cycles(2) >= 1, "seat never completed a cycle");
        let snap = board.snapshot();
        assert!(snap.forks.iter().all(|&free| free), "forks left held");
        assert!(queue.is_empty().await, "ticket left in line");
    }
}
