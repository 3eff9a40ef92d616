//! # Core subscriber trait and fan-out set.
//!
//! `Subscribe` is the extension point for plugging custom event handlers
//! into the runtime; [`SubscriberSet`] fans each event out to every
//! registered subscriber from the table's single listener task.
//!
//! ## Contract
//! - Handlers run on the listener task: keep them cheap and non-blocking,
//!   or they delay delivery to the subscribers after them.
//! - Delivery is fire-and-forget with respect to publishers — a slow
//!   subscriber can lag the bus (and skip events), never stall a seat.
//!
//! ## Example (skeleton)
//! ```rust
//! use async_trait::async_trait;
//! use roundtable::{Event, Subscribe};
//!
//! struct Audit;
//!
//! #[async_trait]
//! impl Subscribe for Audit {
//!     async fn on_event(&self, _ev: &Event) {
//!         // record the event...
//!     }
//!     fn name(&self) -> &'static str {
//!         "audit"
//!     }
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event subscribers.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles a single event.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for diagnostics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Immutable set of subscribers sharing one delivery loop.
pub struct SubscriberSet {
    subs: Vec<Arc<dyn Subscribe>>,
}

impl SubscriberSet {
    /// Creates a set from the given subscribers.
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        Self { subs }
    }

    /// Delivers one event to every subscriber, in registration order.
    pub async fn emit(&self, ev: &Event) {
        for sub in &self.subs {
            sub.on_event(ev).await;
        }
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.subs.len()
    }

    /// True when no subscriber is registered.
    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }
}
