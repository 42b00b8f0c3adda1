//! # Task abstraction.
//!
//! A [`Task`] is a named unit of repeating cooperative work. Its `run`
//! method receives a [`TaskContext`] carrying the task's own
//! [`LivenessFlag`](crate::LivenessFlag), the shared transport handle, and
//! the last-received mailbox. The body is expected to loop while the flag is
//! alive and suspend once per iteration via [`TaskContext::tick`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TaskError;
use crate::tasks::TaskContext;

/// Asynchronous, cooperatively stoppable unit of work.
///
/// Implementors should poll `ctx.is_alive()` every loop iteration and exit
/// promptly once it turns false; there is no hard-cancel primitive.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use poselink::{Task, TaskContext, TaskError};
///
/// struct Heartbeat;
///
/// #[async_trait]
/// impl Task for Heartbeat {
///     async fn run(&self, ctx: TaskContext) -> Result<(), TaskError> {
///         while ctx.is_alive() {
///             ctx.link().write_frame(b"hb").await?;
///             ctx.tick().await;
///         }
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Task: Send + Sync + 'static {
    /// Executes the task loop until its flag stops or the loop fails.
    async fn run(&self, ctx: TaskContext) -> Result<(), TaskError>;
}

/// Shared handle to a task, suitable for storing in the registry.
pub type TaskRef = Arc<dyn Task>;
