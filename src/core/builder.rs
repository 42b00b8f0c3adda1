//! # Supervisor builder: the pre-run registration surface.
//!
//! All tasks attach here, before [`SupervisorBuilder::build`]; the task set
//! is frozen once the supervisor runs. The three built-ins are seeded first,
//! in their canonical order and with their configured poll intervals:
//! `close` (shutdown), `send`, `recv`.

use std::sync::Arc;

use crate::config::Config;
use crate::core::registry::{Builtin, TaskRegistry};
use crate::core::trigger::StopTrigger;
use crate::core::Supervisor;
use crate::error::RegistryError;
use crate::subscribers::Subscribe;
use crate::tasks::{TaskDecl, TaskRef, TaskSet};
use crate::transport::{Dial, TcpDial};

/// Builds a [`Supervisor`].
///
/// ## Example
/// ```
/// use poselink::{Config, Supervisor, TaskContext, TaskDecl, TaskError, TaskFn};
/// use std::time::Duration;
///
/// let sup = Supervisor::builder(Config::default())
///     .with_send(TaskFn::arc(|ctx: TaskContext| async move {
///         while ctx.is_alive() {
///             ctx.link().write_frame(b"pose 0 0 0").await?;
///             ctx.tick().await;
///         }
///         Ok(())
///     }))
///     .register(TaskDecl::cooperative(
///         "battery",
///         Duration::from_secs(1),
///         TaskFn::arc(|ctx: TaskContext| async move {
///             while ctx.is_alive() {
///                 ctx.tick().await;
///             }
///             Ok::<_, TaskError>(())
///         }),
///     ))
///     .unwrap()
///     .build();
/// # let _ = sup;
/// ```
pub struct SupervisorBuilder {
    cfg: Config,
    registry: TaskRegistry,
    subscribers: Vec<Arc<dyn Subscribe>>,
    trigger: Option<Arc<dyn StopTrigger>>,
    dial: Arc<dyn Dial>,
}

impl SupervisorBuilder {
    pub(crate) fn new(cfg: Config) -> Self {
        let mut registry = TaskRegistry::new();
        registry.register_builtin("close", cfg.shutdown_poll, Builtin::Shutdown);
        registry.register_builtin("send", cfg.send_interval, Builtin::Send);
        registry.register_builtin("recv", cfg.recv_interval, Builtin::Recv);
        Self {
            cfg,
            registry,
            subscribers: Vec::new(),
            trigger: None,
            dial: Arc::new(TcpDial),
        }
    }

    /// Attaches one task. Fails on duplicate or reserved names; the builder
    /// is returned unchanged inside the error-free path only.
    pub fn register(mut self, decl: TaskDecl) -> Result<Self, RegistryError> {
        self.registry.register(decl)?;
        Ok(self)
    }

    /// Attaches every task a provider declares. Reserved names in the table
    /// are silently skipped; duplicates still fail.
    pub fn with_tasks(mut self, provider: &dyn TaskSet) -> Result<Self, RegistryError> {
        self.registry.register_set(provider)?;
        Ok(self)
    }

    /// Replaces the abstract send task with a concrete protocol's loop.
    ///
    /// Without this, the built-in send task fails immediately with
    /// [`TaskError::NotImplemented`](crate::TaskError::NotImplemented).
    pub fn with_send(mut self, task: TaskRef) -> Self {
        self.registry.override_send(task);
        self
    }

    /// Sets the external stop trigger. Defaults to
    /// [`SignalTrigger`](crate::SignalTrigger) (OS termination signals).
    pub fn with_trigger(mut self, trigger: Arc<dyn StopTrigger>) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Sets the dialer. Defaults to [`TcpDial`](crate::TcpDial).
    pub fn with_dial(mut self, dial: Arc<dyn Dial>) -> Self {
        self.dial = dial;
        self
    }

    /// Sets the event subscribers.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Finalizes the supervisor.
    pub fn build(self) -> Supervisor {
        Supervisor::from_parts(
            self.cfg,
            self.registry,
            self.subscribers,
            self.trigger,
            self.dial,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use crate::error::TaskError;
    use crate::tasks::{TaskContext, TaskFn};

    fn noop(name: &str) -> TaskDecl {
        TaskDecl::cooperative(
            name,
            Duration::from_millis(5),
            TaskFn::arc(|_ctx: TaskContext| async { Ok::<_, TaskError>(()) }),
        )
    }

    #[test]
    fn test_builtins_are_seeded_in_canonical_order() {
        let builder = SupervisorBuilder::new(Config::default());
        let names: Vec<_> = builder.registry.names().collect();
        assert_eq!(names, vec!["close", "send", "recv"]);
    }

    #[test]
    fn test_builtin_names_collide_with_user_registration() {
        let err = SupervisorBuilder::new(Config::default())
            .register(noop("send"))
            .err()
            .unwrap();
        assert!(matches!(err, RegistryError::DuplicateTask { .. }));
    }

    #[test]
    fn test_reserved_names_fail_loudly() {
        let err = SupervisorBuilder::new(Config::default())
            .register(noop("register"))
            .err()
            .unwrap();
        assert!(matches!(err, RegistryError::ReservedName { .. }));
    }
}
