//! Core runtime: liveness flags, the task registry, stop triggers, the
//! built-in loops, and the [`Supervisor`] that drives them.

mod builder;
mod builtin;
mod flag;
mod registry;
mod supervisor;
mod trigger;

pub use builder::SupervisorBuilder;
pub use flag::LivenessFlag;
pub use registry::{TaskRegistry, RESERVED_NAMES};
pub use supervisor::Supervisor;
pub use trigger::{ManualTrigger, SignalTrigger, StopTrigger, TriggerError};
