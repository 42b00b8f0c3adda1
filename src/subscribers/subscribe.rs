//! # Subscriber trait.

use async_trait::async_trait;

use crate::events::Event;

/// Observes runtime events.
///
/// Handlers run on the supervisor's listener task and are awaited one after
/// another: keep them fast and never block. A subscriber cannot influence the
/// run; it only watches.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event.
    async fn on_event(&self, event: &Event);
}
