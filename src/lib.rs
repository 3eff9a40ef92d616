//! # roundtable
//!
//! **Roundtable** is a fair, deadlock-free arbiter for a ring of shared
//! resources — the classic dining-philosophers setup — with a live console
//! view of every seat's state.
//!
//! N seats share N forks arranged in a cycle (seat *i* needs forks *i* and
//! *(i+1) mod N*). Each seat runs as its own tokio task and loops through
//! think → wait → dine; a FIFO ticket line decides *who may start claiming
//! forks next*, which is what makes the arbitration fair and starvation-free.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ Philosopher 0│   │ Philosopher 1│   │ Philosopher N│
//!     │ (seat task)  │   │ (seat task)  │   │ (seat task)  │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            │   enqueue/await_turn/dequeue        │
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  TicketQueue (FIFO turn gate — head may start claiming forks)     │
//! └───────────────────────────────────────────────────────────────────┘
//!            │   acquire(left) then acquire(right) │
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  ForkRing (per-fork holder + wakeup, single critical section)     │
//! └───────────────────────────────────────────────────────────────────┘
//!            │                                     │
//!            │ phase/progress/cycles    fork availability
//!            ▼                                     ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  StateBoard (single-writer atomics, lock-free reads)              │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                ▼
//!                       Console (crossterm, polls
//!                       snapshots, `q` cancels)
//!
//! Every transition is also published as a sequenced Event:
//!   Seats / ForkRing / TicketQueue ──► Bus ──► listener ──► subscribers
//!                                                   (LogWriter, SeatTracker)
//! ```
//!
//! ### Why it cannot deadlock or starve
//! ```text
//! - Entry into the fork-claiming phase is serialized: only the head of
//!   the ticket line may begin, and it leaves the line only after putting
//!   both forks back.
//! - Fork order is globally consistent: every seat claims left then right.
//! - Together: no circular wait can form, and a seat enqueued at position k
//!   waits at most k full claim-dine-release cycles — a bounded, fair wait.
//! ```
//!
//! ### Lifecycle
//! ```text
//! Config ──► Table::new ──► Table::run(token)
//!
//! per seat: loop {
//!   ├─► token cancelled? ──► exit (only at the cycle top)
//!   ├─► Thinking  (timed, progress published)
//!   ├─► Waiting   (ticket line, then claim left + right)
//!   ├─► Dining    (timed, progress published)
//!   └─► Releasing (forks back, ticket returned, cycle counted)
//! }
//!
//! shutdown (console `q` / OS signal / external cancel):
//!   cancel token ─► each seat finishes its in-flight cycle ─► drained
//!   within Config::grace → Ok, else RuntimeError::GraceExceeded
//! ```
//!
//! ## Features
//! | Area           | Description                                          | Key types                      |
//! |----------------|------------------------------------------------------|--------------------------------|
//! | **Arbitration**| FIFO turn gate + per-fork exclusive claims.          | [`TicketQueue`], [`ForkRing`]  |
//! | **Seats**      | The repeating think/wait/dine state machine.         | [`Philosopher`]                |
//! | **Observation**| Lock-free status snapshots and sequenced events.     | [`StateBoard`], [`Bus`], [`Event`] |
//! | **Subscribers**| Hook into the event stream (logging, tracking).      | [`Subscribe`], [`SeatTracker`] |
//! | **Supervision**| Spawning, signal handling, graceful drain.           | [`Table`], [`Config`]          |
//! | **Pacing**     | Timed activities with progress steps and jitter.     | [`Pace`], [`JitterPolicy`]     |
//!
//! ## Optional features
//! - `console` *(default)*: the crossterm-based live renderer ([`Console`]).
//!
//! ## Example
//! ```no_run
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use roundtable::{Config, Table};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config {
//!         seats: 5,
//!         think: Duration::from_millis(500),
//!         dine: Duration::from_millis(500),
//!         ..Config::default()
//!     };
//!
//!     let table = Table::new(cfg, Vec::new())?;
//!     let token = CancellationToken::new();
//!
//!     // Cancel from anywhere (a UI, a timer, a signal) to stop the run.
//!     let stopper = token.clone();
//!     tokio::spawn(async move {
//!         tokio::time::sleep(Duration::from_secs(5)).await;
//!         stopper.cancel();
//!     });
//!
//!     table.run(token).await?;
//!     Ok(())
//! }
//! ```

mod board;
mod config;
mod error;
mod events;
mod pacing;
mod philosopher;
mod signals;
mod subscribers;
mod sync;
mod table;

// ---- Public re-exports ----

pub use board::{BoardSnapshot, Phase, SeatSnapshot, StateBoard};
pub use config::{Config, MIN_SEATS};
pub use error::{ConfigError, RuntimeError};
pub use events::{Bus, Event, EventKind};
pub use pacing::{JitterPolicy, Pace};
pub use philosopher::Philosopher;
pub use subscribers::{LogWriter, SeatStats, SeatTracker, Subscribe, SubscriberSet};
pub use sync::{ForkRing, TicketQueue};
pub use table::Table;

// Optional: the crossterm-based live renderer.
// Enable with: `--features console` (on by default).
#[cfg(feature = "console")]
mod console;
#[cfg(feature = "console")]
pub use console::Console;
