//! Runtime events and the broadcast bus that carries them.
//!
//! Tasks and the supervisor publish [`Event`]s to the [`Bus`]; subscribers
//! observe them through [`SubscriberSet`](crate::SubscriberSet). Nothing in
//! the runtime prints directly.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
