//! # ForkRing: N exclusively-held forks arranged in a cycle.
//!
//! Each fork tracks its holder under its own async mutex and parks waiters
//! on its own [`Notify`]. Claiming is a single critical section per fork:
//! check the holder and set it in one lock scope, so two claimants can never
//! both believe they hold the same fork.
//!
//! ## Wakeup discipline
//! [`ForkRing::acquire`] enables its notification *before* re-checking the
//! holder, then awaits; [`ForkRing::release`] wakes **all** parked waiters,
//! who re-check. This is the classic lost-wakeup-free condition wait:
//!
//! ```text
//! loop {
//!   ├─► freed.enable()                (register first)
//!   ├─► lock holder
//!   │     ├─ free  → claim, return
//!   │     └─ held  → unlock
//!   ├─► freed.await                   (woken by release)
//!   └─► freed = notify.notified()     (fresh registration)
//! }
//! ```
//!
//! ## Rules
//! - A fork's holder is mutated only inside `acquire`/`release`, under that
//!   fork's mutex.
//! - Board availability and the `ForkClaimed`/`ForkFreed` events are
//!   published inside the same lock scope, so per-fork event `seq` order
//!   equals mutation order.
//! - Claiming a fork you already hold, or releasing one you don't, is a
//!   protocol violation and panics.
//! - No timeouts: blocking is intentional, bounded by the ticket line's
//!   fairness.

use std::sync::Arc;

use tokio::sync::{Mutex, Notify};

use crate::board::StateBoard;
use crate::events::{Bus, Event, EventKind};

/// One fork: the current holder (None = free) and a wakeup for waiters.
struct Slot {
    holder: Mutex<Option<usize>>,
    freed: Notify,
}

impl Slot {
    fn new() -> Self {
        Self {
            holder: Mutex::new(None),
            freed: Notify::new(),
        }
    }
}

/// Ring of N exclusively-held forks, indexed `0..N`.
///
/// Owns all fork state; callers interact only through
/// [`acquire`](ForkRing::acquire), [`try_acquire`](ForkRing::try_acquire)
/// and [`release`](ForkRing::release).
pub struct ForkRing {
    forks: Box<[Slot]>,
    board: Arc<StateBoard>,
    bus: Bus,
}

impl ForkRing {
    /// Creates a ring of `count` free forks.
    pub fn new(count: usize, board: Arc<StateBoard>, bus: Bus) -> Self {
        Self {
            forks: (0..count).map(|_| Slot::new()).collect(),
            board,
            bus,
        }
    }

    /// Number of forks in the ring.
    pub fn len(&self) -> usize {
        self.forks.len()
    }

    /// True for an empty ring (never the case after validated config).
    pub fn is_empty(&self) -> bool {
        self.forks.is_empty()
    }

    /// Blocks until `fork` is free, then claims it for `seat`.
    ///
    /// Panics if `seat` already holds the fork (double claim).
    pub async fn acquire(&self, fork: usize, seat: usize) {
        let slot = &self.forks[fork];
        let freed = slot.freed.notified();
        tokio::pin!(freed);
        loop {
            // Enable before checking so a release between the check and
            // the await cannot be missed.
            freed.as_mut().enable();
            {
                let mut holder = slot.holder.lock().await;
                match *holder {
                    None => {
                        self.claim(fork, seat, &mut holder);
                        return;
                    }
                    Some(current) => {
                        assert_ne!(
                            current, seat,
                            "seat {seat} claimed fork {fork} twice"
                        );
                    }
                }
            }
            freed.as_mut().await;
            freed.set(slot.freed.notified());
        }
    }

    /// Claims `fork` for `seat` iff it is currently free.
    ///
    /// Returns `true` on success. Never blocks on the fork being held;
    /// panics on a double claim like [`acquire`](ForkRing::acquire).
    pub async fn try_acquire(&self, fork: usize, seat: usize) -> bool {
        let slot = &self.forks[fork];
        let mut holder = slot.holder.lock().await;
        match *holder {
            None => {
                self.claim(fork, seat, &mut holder);
                true
            }
            Some(current) => {
                assert_ne!(current, seat, "seat {seat} claimed fork {fork} twice");
                false
            }
        }
    }

    /// Releases `fork` and wakes all parked waiters, who re-check.
    ///
    /// Panics if `seat` is not the current holder.
    pub async fn release(&self, fork: usize, seat: usize) {
        let slot = &self.forks[fork];
        {
            let mut holder = slot.holder.lock().await;
            match holder.take() {
                Some(current) if current == seat => {}
                other => panic!(
                    "seat {seat} released fork {fork} held by {other:?}"
                ),
            }
            self.board.set_fork_free(fork, true);
            self.bus
                .publish(Event::new(EventKind::ForkFreed).with_fork(fork).with_seat(seat));
        }
        slot.freed.notify_waiters();
    }

    /// Marks the claim inside the fork's lock scope.
    fn claim(&self, fork: usize, seat: usize, holder: &mut Option<usize>) {
        *holder = Some(seat);
        self.board.set_fork_free(fork, false);
        self.bus
            .publish(Event::new(EventKind::ForkClaimed).with_fork(fork).with_seat(seat));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn ring(count: usize) -> Arc<ForkRing> {
        let board = Arc::new(StateBoard::new(count));
        Arc::new(ForkRing::new(count, board, Bus::new(64)))
    }

    #[tokio::test]
    async fn test_acquire_marks_fork_busy() {
        let board = Arc::new(StateBoard::new(5));
        let ring = ForkRing::new(5, board.clone(), Bus::new(64));

        ring.acquire(2, 2).await;
        assert!(!board.fork_free(2));

        ring.release(2, 2).await;
        assert!(board.fork_free(2));
    }

    #[tokio::test]
    async fn test_try_acquire_does_not_block() {
        let ring = ring(5);
        assert!(ring.try_acquire(0, 0).await);
        assert!(!ring.try_acquire(0, 4).await);
        ring.release(0, 0).await;
        assert!(ring.try_acquire(0, 4).await);
    }

    #[tokio::test]
    async fn test_release_wakes_waiter() {
        let ring = ring(5);
        ring.acquire(1, 1).await;

        let contender = {
            let ring = ring.clone();
            tokio::spawn(async move { ring.acquire(1, 0).await })
        };

        // Give the contender time to park on the fork.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        ring.release(1, 1).await;
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .expect("waiter not woken by release")
            .unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_mutual_exclusion_under_contention() {
        let ring = ring(5);
        let inside = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for seat in 0..4 {
            let ring = ring.clone();
            let inside = inside.clone();
            tasks.push(tokio::spawn(async move {
                for _ in 0..50 {
                    ring.acquire(3, seat).await;
                    let now = inside.fetch_add(1, Ordering::SeqCst);
                    assert_eq!(now, 0, "two holders inside the critical section");
                    tokio::task::yield_now().await;
                    inside.fetch_sub(1, Ordering::SeqCst);
                    ring.release(3, seat).await;
                }
            }));
        }
        for t in tasks {
            t.await.unwrap();
        }
    }

    #[tokio::test]
    #[should_panic(expected = "released fork")]
    async fn test_foreign_release_panics() {
        let ring = ring(5);
        ring.acquire(0, 0).await;
        ring.release(0, 3).await;
    }

    #[tokio::test]
    #[should_panic(expected = "claimed fork 0 twice")]
    async fn test_double_claim_panics() {
        let ring = ring(5);
        ring.acquire(0, 0).await;
        ring.try_acquire(0, 0).await;
    }
}
