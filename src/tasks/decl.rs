//! # Task declarations: the registration unit.
//!
//! A [`TaskDecl`] names a unit of work, fixes its poll interval, and carries
//! its body. Bodies come in two kinds ([`TaskBody`]):
//!
//! - **Cooperative**: an async [`TaskRef`] scheduled inline on the runtime;
//!   it must suspend once per loop iteration.
//! - **Blocking**: a synchronous closure dispatched to the worker pool for
//!   non-cooperative work. It cannot suspend, so it is expected to check its
//!   flag between discrete chunks of work only.
//!
//! [`TaskSet`] is the static-table population path: a task-providing type
//! declares its tasks explicitly instead of being scanned for methods.

use std::sync::Arc;
use std::time::Duration;

use crate::error::TaskError;
use crate::tasks::{TaskContext, TaskRef};

/// Shared handle to a blocking task body.
pub type BlockingRef = Arc<dyn Fn(TaskContext) -> Result<(), TaskError> + Send + Sync>;

/// How a task's body is executed.
#[derive(Clone)]
pub enum TaskBody {
    /// Scheduled inline; suspends cooperatively via [`TaskContext::tick`].
    Cooperative(TaskRef),
    /// Dispatched to the worker pool via `spawn_blocking`.
    Blocking(BlockingRef),
}

/// One task registration: `{name, poll interval, body}`.
#[derive(Clone)]
pub struct TaskDecl {
    /// Unique task name.
    pub name: String,
    /// Sleep interval between loop iterations.
    pub poll_interval: Duration,
    /// The work itself.
    pub body: TaskBody,
}

impl TaskDecl {
    /// Declares a cooperative task.
    pub fn cooperative(name: impl Into<String>, poll_interval: Duration, task: TaskRef) -> Self {
        Self {
            name: name.into(),
            poll_interval,
            body: TaskBody::Cooperative(task),
        }
    }

    /// Declares a blocking task bound to the worker pool.
    pub fn blocking<F>(name: impl Into<String>, poll_interval: Duration, f: F) -> Self
    where
        F: Fn(TaskContext) -> Result<(), TaskError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            poll_interval,
            body: TaskBody::Blocking(Arc::new(f)),
        }
    }
}

/// A type that declares its task set as an explicit table.
///
/// This is the population strategy for statically known task sets: reserved
/// names in the returned table are silently skipped by
/// [`TaskRegistry::register_set`](crate::TaskRegistry::register_set),
/// duplicates are still rejected.
pub trait TaskSet {
    /// The tasks this provider contributes, in the order they should run.
    fn tasks(&self) -> Vec<TaskDecl>;
}
