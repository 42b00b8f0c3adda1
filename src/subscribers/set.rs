//! # Subscriber fan-out.

use std::sync::Arc;

use crate::events::Event;
use crate::subscribers::Subscribe;

/// Delivers each event to every subscriber, in registration order.
///
/// Delivery is sequential: the runtime publishes low-rate lifecycle events
/// only, so per-subscriber queues would buy nothing here.
pub struct SubscriberSet {
    subs: Vec<Arc<dyn Subscribe>>,
}

impl SubscriberSet {
    /// Creates a set from the given subscribers.
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        Self { subs }
    }

    /// True if nobody is listening.
    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    /// Hands the event to every subscriber.
    pub async fn emit(&self, event: &Event) {
        for sub in &self.subs {
            sub.on_event(event).await;
        }
    }
}
