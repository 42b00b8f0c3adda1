//! Task abstractions: the [`Task`] trait, closure-backed [`TaskFn`], the
//! per-task [`TaskContext`], and the declaration types used to register work
//! with the supervisor before it runs.

mod context;
mod decl;
mod task;
mod task_fn;

pub use context::TaskContext;
pub use decl::{BlockingRef, TaskBody, TaskDecl, TaskSet};
pub use task::{Task, TaskRef};
pub use task_fn::TaskFn;
