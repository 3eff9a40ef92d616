//! # Table: spawns the seats and drives graceful shutdown.
//!
//! The [`Table`] owns the event bus, the [`StateBoard`], the [`ForkRing`],
//! the [`TicketQueue`] and a [`SubscriberSet`]. It spawns one
//! [`Philosopher`] task per seat and supervises the run until shutdown.
//!
//! ## High-level architecture
//! ```text
//! Table::run(token):
//!   - listener(): Bus.subscribe() ─► SubscriberSet::emit(&Event)
//!   - spawn seats:
//!       Seat 0 ... Seat N-1
//!         └──► Philosopher::run(token.child_token())   (JoinSet)
//!
//! Event flow:
//!   Seat/ForkRing/TicketQueue ── publish ──► Bus ──► listener ──► subscribers
//!                                                        └─► SeatTracker
//!
//! Shutdown path (console `q`, OS signal, or external cancel):
//!   ├─► Bus.publish(ShutdownRequested)
//!   ├─► token.cancel()            → observed at each seat's cycle top
//!   └─► wait_with_grace(cfg.grace):
//!          ├─ all seats joined  → Bus.publish(AllSeatsStopped), Ok(())
//!          └─ grace exceeded    → Bus.publish(GraceExceeded),
//!                                 Err(RuntimeError::GraceExceeded { stuck })
//! ```
//!
//! ## Rules
//! - Seats never see each other: all coordination goes through the ring and
//!   the line the table hands them.
//! - A cancelled seat always finishes its in-flight cycle first, so after a
//!   clean drain every fork is free and the line is empty.

use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::board::StateBoard;
use crate::config::Config;
use crate::error::{ConfigError, RuntimeError};
use crate::events::{Bus, Event, EventKind};
use crate::philosopher::Philosopher;
use crate::signals;
use crate::subscribers::{SeatTracker, Subscribe, SubscriberSet};
use crate::sync::{ForkRing, TicketQueue};

/// Supervisor for one table run.
pub struct Table {
    cfg: Config,
    bus: Bus,
    board: Arc<StateBoard>,
    ring: Arc<ForkRing>,
    queue: Arc<TicketQueue>,
    subs: Arc<SubscriberSet>,
    tracker: Arc<SeatTracker>,
}

impl Table {
    /// Validates `cfg` and builds the table.
    ///
    /// A [`SeatTracker`] is always registered in addition to the provided
    /// subscribers; it feeds the stuck-seat report and the final tally.
    pub fn new(
        cfg: Config,
        mut subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Result<Self, ConfigError> {
        cfg.validate()?;

        let bus = Bus::new(cfg.bus_capacity_clamped());
        let board = Arc::new(StateBoard::new(cfg.seats));
        let ring = Arc::new(ForkRing::new(cfg.seats, board.clone(), bus.clone()));
        let queue = Arc::new(TicketQueue::new(bus.clone()));
        let tracker = Arc::new(SeatTracker::new(cfg.seats));
        subscribers.push(tracker.clone());

        Ok(Self {
            cfg,
            bus,
            board,
            ring,
            queue,
            subs: Arc::new(SubscriberSet::new(subscribers)),
            tracker,
        })
    }

    /// Shared handle to the state board (for renderers).
    pub fn board(&self) -> Arc<StateBoard> {
        self.board.clone()
    }

    /// Shared handle to the seat tracker (final tally, diagnostics).
    pub fn tracker(&self) -> Arc<SeatTracker> {
        self.tracker.clone()
    }

    /// A clone of the event bus (for additional receivers, e.g. tests).
    pub fn bus(&self) -> Bus {
        self.bus.clone()
    }

    /// Runs the table until either:
    /// - `token` is cancelled (console quit or embedding code),
    /// - an OS termination signal arrives, or
    /// - every seat exits on its own (cannot happen before cancellation in
    ///   normal operation; the cycle is infinite).
    ///
    /// On the shutdown paths, waits up to [`Config::grace`] for the seats
    /// to finish their in-flight cycle.
    pub async fn run(&self, token: CancellationToken) -> Result<(), RuntimeError> {
        self.listener();

        let mut set = JoinSet::new();
        for seat in 0..self.cfg.seats {
            let philosopher = Philosopher::new(
                seat,
                self.ring.clone(),
                self.queue.clone(),
                self.board.clone(),
                self.bus.clone(),
                self.cfg.think_pace(),
                self.cfg.dine_pace(),
            );
            set.spawn(philosopher.run(token.child_token()));
        }

        self.drive_shutdown(&mut set, &token).await
    }

    /// Subscribes to the bus and forwards events to the subscriber set.
    fn listener(&self) {
        let mut rx = self.bus.subscribe();
        let subs = Arc::clone(&self.subs);
        tokio::spawn(async move {
            while let Ok(ev) = rx.recv().await {
                subs.emit(&ev).await;
            }
        });
    }

    /// Waits for a shutdown trigger or for all seats to exit on their own.
    async fn drive_shutdown(
        &self,
        set: &mut JoinSet<usize>,
        token: &CancellationToken,
    ) -> Result<(), RuntimeError> {
        tokio::select! {
            _ = signals::shutdown_signal() => {
                self.bus.publish(Event::new(EventKind::ShutdownRequested));
                token.cancel();
                self.wait_with_grace(set).await
            }
            _ = token.cancelled() => {
                self.bus.publish(Event::new(EventKind::ShutdownRequested));
                self.wait_with_grace(set).await
            }
            _ = async { while set.join_next().await.is_some() {} } => {
                self.bus.publish(Event::new(EventKind::AllSeatsStopped));
                Ok(())
            }
        }
    }

    /// Waits for all seats to finish within the configured grace period.
    ///
    /// Publishes [`EventKind::AllSeatsStopped`] on success, or
    /// [`EventKind::GraceExceeded`] on timeout and returns
    /// [`RuntimeError::GraceExceeded`] naming the stuck seats.
    async fn wait_with_grace(&self, set: &mut JoinSet<usize>) -> Result<(), RuntimeError> {
        let grace = self.cfg.grace;
        let drained = async { while set.join_next().await.is_some() {} };

        match tokio::time::timeout(grace, drained).await {
            Ok(()) => {
                self.bus.publish(Event::new(EventKind::AllSeatsStopped));
                Ok(())
            }
            Err(_) => {
                self.bus.publish(Event::new(EventKind::GraceExceeded));
                let stuck = self.tracker.stuck().await;
                Err(RuntimeError::GraceExceeded { grace, stuck })
            }
        }
    }
}
