//! # TicketQueue: FIFO gate into the fork-acquisition phase.
//!
//! Two per-fork locks alone cannot prevent starvation: a fast seat can beat
//! a slow neighbor to their shared fork every single cycle. The ticket line
//! converts that race into a strict FIFO — a seat enqueues when it wants
//! forks, may begin claiming only once it reaches the head, and leaves the
//! line after releasing. Each seat's wait is therefore bounded by the number
//! of seats ahead of it, each completing at most one full claim-dine-release
//! cycle.
//!
//! ## Rules
//! - The FIFO is mutated only inside [`enqueue`](TicketQueue::enqueue) and
//!   [`dequeue`](TicketQueue::dequeue), under the line's mutex.
//! - `TurnRequested`/`TurnGranted` are published under the same mutex, so
//!   their `seq` order equals the line's true arrival/grant order.
//! - Both `enqueue` and `dequeue` wake all parked callers; each re-checks
//!   whether it is now at the head (notification enabled before the check,
//!   so no wakeup is lost).
//! - Dequeuing while not at the head, or enqueuing twice without leaving,
//!   is a protocol violation and panics.

use std::collections::VecDeque;

use tokio::sync::{Mutex, Notify};

use crate::events::{Bus, Event, EventKind};

/// FIFO ticket line of seat ids.
pub struct TicketQueue {
    line: Mutex<VecDeque<usize>>,
    moved: Notify,
    bus: Bus,
}

impl TicketQueue {
    /// Creates an empty line.
    pub fn new(bus: Bus) -> Self {
        Self {
            line: Mutex::new(VecDeque::new()),
            moved: Notify::new(),
            bus,
        }
    }

    /// Appends `seat` to the line and wakes all parked callers.
    ///
    /// Panics if `seat` is already in the line.
    pub async fn enqueue(&self, seat: usize) {
        {
            let mut line = self.line.lock().await;
            assert!(
                !line.contains(&seat),
                "seat {seat} enqueued while already in line"
            );
            line.push_back(seat);
            self.bus
                .publish(Event::new(EventKind::TurnRequested).with_seat(seat));
        }
        self.moved.notify_waiters();
    }

    /// Blocks until `seat` is at the head of the line.
    pub async fn await_turn(&self, seat: usize) {
        let moved = self.moved.notified();
        tokio::pin!(moved);
        loop {
            // Enable before checking so a line movement between the check
            // and the await cannot be missed.
            moved.as_mut().enable();
            {
                let line = self.line.lock().await;
                if line.front() == Some(&seat) {
                    self.bus
                        .publish(Event::new(EventKind::TurnGranted).with_seat(seat));
                    return;
                }
            }
            moved.as_mut().await;
            moved.set(self.moved.notified());
        }
    }

    /// Removes `seat` from the head of the line and wakes all parked
    /// callers.
    ///
    /// Panics if `seat` is not the head — the caller skipped
    /// [`await_turn`](TicketQueue::await_turn) or dequeued twice.
    pub async fn dequeue(&self, seat: usize) {
        {
            let mut line = self.line.lock().await;
            let head = line.pop_front();
            assert_eq!(
                head,
                Some(seat),
                "seat {seat} dequeued while head is {head:?}"
            );
        }
        self.moved.notify_waiters();
    }

    /// Returns `seat`'s position in the line (0 = head), if present.
    pub async fn position(&self, seat: usize) -> Option<usize> {
        self.line.lock().await.iter().position(|&s| s == seat)
    }

    /// Number of seats currently in the line.
    pub async fn len(&self) -> usize {
        self.line.lock().await.len()
    }

    /// True when no seat is waiting for a turn.
    pub async fn is_empty(&self) -> bool {
        self.line.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn queue() -> Arc<TicketQueue> {
        Arc::new(TicketQueue::new(Bus::new(64)))
    }

    #[tokio::test]
    async fn test_positions_follow_arrival_order() {
        let q = queue();
        q.enqueue(3).await;
        q.enqueue(1).await;
        q.enqueue(4).await;

        assert_eq!(q.position(3).await, Some(0));
        assert_eq!(q.position(1).await, Some(1));
        assert_eq!(q.position(4).await, Some(2));
        assert_eq!(q.position(0).await, None);
        assert_eq!(q.len().await, 3);
    }

    #[tokio::test]
    async fn test_head_is_granted_immediately() {
        let q = queue();
        q.enqueue(2).await;
        // Head of the line: must not block.
        tokio::time::timeout(Duration::from_secs(1), q.await_turn(2))
            .await
            .expect("head seat was not granted its turn");
    }

    #[tokio::test]
    async fn test_second_waits_for_head_to_leave() {
        let q = queue();
        q.enqueue(0).await;
        q.enqueue(1).await;

        let second = {
            let q = q.clone();
            tokio::spawn(async move { q.await_turn(1).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!second.is_finished(), "seat 1 granted before head left");

        q.await_turn(0).await;
        q.dequeue(0).await;

        tokio::time::timeout(Duration::from_secs(1), second)
            .await
            .expect("seat 1 not woken after head left")
            .unwrap();
        assert_eq!(q.position(1).await, Some(0));
    }

    #[tokio::test]
    async fn test_dequeue_drains_in_fifo_order() {
        let q = queue();
        for seat in [4, 2, 0] {
            q.enqueue(seat).await;
        }
        for seat in [4, 2, 0] {
            q.await_turn(seat).await;
            q.dequeue(seat).await;
        }
        assert!(q.is_empty().await);
    }

    #[tokio::test]
    #[should_panic(expected = "dequeued while head")]
    async fn test_non_head_dequeue_panics() {
        let q = queue();
        q.enqueue(0).await;
        q.enqueue(1).await;
        q.dequeue(1).await;
    }

    #[tokio::test]
    #[should_panic(expected = "already in line")]
    async fn test_duplicate_enqueue_panics() {
        let q = queue();
        q.enqueue(0).await;
        q.enqueue(0).await;
    }
}
