//! Event subscribers: observe the runtime without touching it.
//!
//! The supervisor forwards every bus event to a [`SubscriberSet`]; user code
//! implements [`Subscribe`] for logging, metrics, or test assertions.

mod set;
mod subscribe;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
