//! # poselink: cooperative task supervision for pose-streaming clients.
//!
//! A client device (a headset, a tracker, a controller bridge) holds one
//! connection to a pose server and runs several periodic loops over it:
//! stream poses out, watch the inbound channel, react to a quit gesture.
//! `poselink` supervises those loops as named, individually stoppable tasks
//! sharing a single transport.
//!
//! ```text
//!                      ┌─────────────────────────────┐
//!                      │          Supervisor         │
//!                      │  dial → handshake → spawn   │
//!                      └──────┬───────────────┬──────┘
//!                             │               │ events
//!              ┌──────────────┼─────────┐     ▼
//!              ▼              ▼         ▼   ┌─────┐   ┌─────────────┐
//!         ┌────────┐    ┌─────────┐ ┌──────┤ Bus ├──►│ Subscribers │
//!         │ close  │    │  send   │ │ recv │└─────┘   └─────────────┘
//!         │ (stop  │    │ (yours) │ │      │ ...user tasks...
//!         │cascade)│    └────┬────┘ └──┬───┘
//!         └────────┘         │         │
//!                            ▼         ▼
//!                      ┌─────────────────────┐
//!                      │  Transport (frames) │
//!                      └─────────────────────┘
//! ```
//!
//! ## Model
//! - **[`LivenessFlag`]** — one per task, terminal: once stopped it never
//!   restarts. Tasks loop `while flag.is_alive()` and suspend via
//!   [`tick`](LivenessFlag::tick) once per iteration.
//! - **[`TaskRegistry`]** — insertion-ordered name table, frozen before the
//!   run. Three built-ins are always seeded first: `close` (shutdown
//!   watcher), `send` (abstract, replace it via
//!   [`SupervisorBuilder::with_send`]), `recv` (fills the last-received
//!   mailbox).
//! - **[`Transport`]** — the framed duplex connection, dialed once; the
//!   bundled [`TcpDial`] speaks text frames terminated by tab-CR-LF
//!   (`\t\r\n`).
//! - **[`Supervisor`]** — runs everything concurrently and owns the
//!   shutdown sequence: trigger → stop cascade → bounded grace →
//!   `CLOSE` frame → close.
//!
//! ## Lifecycle
//! `Idle → Connecting → Running → Stopping → Closed`, one way. A dial or
//! handshake failure surfaces from [`Supervisor::run`] before anything
//! starts; after that, task failures are local events and the run ends only
//! through the stop cascade (or every task draining on its own).
//!
//! ## Example
//! ```no_run
//! use std::time::Duration;
//!
//! use poselink::{Config, Supervisor, TaskContext, TaskDecl, TaskError, TaskFn};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sup = Supervisor::builder(Config::default())
//!         .with_send(TaskFn::arc(|ctx: TaskContext| async move {
//!             while ctx.is_alive() {
//!                 ctx.link().write_frame(b"pose 0.0 0.0 0.0").await?;
//!                 ctx.tick().await;
//!             }
//!             Ok(())
//!         }))
//!         .register(TaskDecl::cooperative(
//!             "battery",
//!             Duration::from_secs(1),
//!             TaskFn::arc(|ctx: TaskContext| async move {
//!                 while ctx.is_alive() {
//!                     // read a sensor, update state...
//!                     ctx.tick().await;
//!                 }
//!                 Ok::<_, TaskError>(())
//!             }),
//!         ))?
//!         .build();
//!
//!     // Ctrl-C (the default trigger) starts the stop cascade.
//!     sup.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//! - `logging` — enables [`LogWriter`], a stdout subscriber for demos.

mod config;
mod core;
mod error;
mod events;
mod subscribers;
mod tasks;
mod transport;

pub use config::Config;
pub use core::{
    LivenessFlag, ManualTrigger, SignalTrigger, StopTrigger, Supervisor, SupervisorBuilder,
    TaskRegistry, TriggerError, RESERVED_NAMES,
};
pub use error::{RegistryError, RuntimeError, TaskError, TransportError};
pub use events::{Bus, Event, EventKind};
pub use subscribers::{Subscribe, SubscriberSet};
pub use tasks::{BlockingRef, Task, TaskBody, TaskContext, TaskDecl, TaskFn, TaskRef, TaskSet};
pub use transport::{Dial, TcpDial, TcpTransport, Transport, CLOSE_FRAME, FRAME_TERMINATOR};

#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
