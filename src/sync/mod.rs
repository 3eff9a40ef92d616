//! Arbitration primitives: the fork ring and the FIFO ticket line.

mod forks;
mod queue;

pub use forks::ForkRing;
pub use queue::TicketQueue;
