//! # Task registry: the table of known tasks.
//!
//! Maps task names to their [`LivenessFlag`]s and bodies, preserving
//! insertion order. Populated before the supervisor runs; the name set is
//! immutable once [`Supervisor::run`](crate::Supervisor::run) starts
//! (individual flags still mutate).
//!
//! ## Reserved names
//! The lifecycle entry points ([`RESERVED_NAMES`]) can never be schedulable
//! tasks. The two registration paths treat them differently, deliberately:
//!
//! - [`register`](TaskRegistry::register) (explicit API) fails loudly with
//!   [`RegistryError::ReservedName`] — explicit mis-registration is a
//!   programmer error.
//! - [`register_set`](TaskRegistry::register_set) (static-table population)
//!   silently skips them, so a provider's table can coexist with the
//!   lifecycle names without special-casing.
//!
//! This asymmetry is observable behavior and intentionally not unified.

use std::collections::HashMap;
use std::time::Duration;

use crate::core::LivenessFlag;
use crate::error::RegistryError;
use crate::tasks::{TaskBody, TaskDecl, TaskRef, TaskSet};

/// Names that must never be treated as schedulable tasks.
pub const RESERVED_NAMES: [&str; 2] = ["run", "register"];

/// Which built-in loop an entry stands for, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Builtin {
    Send,
    Recv,
    Shutdown,
}

/// The stored body of a registered task.
pub(crate) enum RegisteredBody {
    /// One of the supervisor's built-in loops.
    Builtin(Builtin),
    /// User-supplied work.
    User(TaskBody),
}

struct TaskEntry {
    flag: LivenessFlag,
    body: RegisteredBody,
}

/// Insertion-ordered table of task names, flags, and bodies.
#[derive(Default)]
pub struct TaskRegistry {
    order: Vec<String>,
    entries: HashMap<String, TaskEntry>,
}

impl TaskRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `name` is a lifecycle entry point.
    pub fn is_reserved(name: &str) -> bool {
        RESERVED_NAMES.contains(&name)
    }

    /// Registers one task declaration.
    ///
    /// Fails with [`RegistryError::ReservedName`] for lifecycle names and
    /// [`RegistryError::DuplicateTask`] for names already present. The
    /// registry is unchanged after a failed attempt.
    pub fn register(&mut self, decl: TaskDecl) -> Result<(), RegistryError> {
        if Self::is_reserved(&decl.name) {
            return Err(RegistryError::ReservedName { name: decl.name });
        }
        self.insert(decl.name, decl.poll_interval, RegisteredBody::User(decl.body))
    }

    /// Registers every declaration from a provider's static table.
    ///
    /// Reserved names are silently skipped (not errors on this path);
    /// duplicates still fail.
    pub fn register_set(&mut self, provider: &dyn TaskSet) -> Result<(), RegistryError> {
        for decl in provider.tasks() {
            if Self::is_reserved(&decl.name) {
                continue;
            }
            self.insert(decl.name, decl.poll_interval, RegisteredBody::User(decl.body))?;
        }
        Ok(())
    }

    /// Returns the liveness flag of a registered task.
    pub fn flag(&self, name: &str) -> Result<LivenessFlag, RegistryError> {
        self.entries
            .get(name)
            .map(|e| e.flag.clone())
            .ok_or_else(|| RegistryError::UnknownTask {
                name: name.to_string(),
            })
    }

    /// Task names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of registered tasks.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Seeds a built-in entry. Used by the builder before user registration.
    pub(crate) fn register_builtin(&mut self, name: &'static str, poll_interval: Duration, which: Builtin) {
        // Built-in names are fixed and seeded exactly once.
        self.insert(name.to_string(), poll_interval, RegisteredBody::Builtin(which))
            .expect("built-in task seeded twice");
    }

    /// Replaces the abstract send body with a concrete protocol's loop.
    pub(crate) fn override_send(&mut self, task: TaskRef) {
        if let Some(entry) = self.entries.get_mut("send") {
            entry.body = RegisteredBody::User(TaskBody::Cooperative(task));
        }
    }

    pub(crate) fn body(&self, name: &str) -> Option<&RegisteredBody> {
        self.entries.get(name).map(|e| &e.body)
    }

    /// Snapshot of every `(name, flag)` pair, in registration order.
    pub(crate) fn flags(&self) -> Vec<(String, LivenessFlag)> {
        self.order
            .iter()
            .map(|name| (name.clone(), self.entries[name].flag.clone()))
            .collect()
    }

    fn insert(
        &mut self,
        name: String,
        poll_interval: Duration,
        body: RegisteredBody,
    ) -> Result<(), RegistryError> {
        if self.entries.contains_key(&name) {
            return Err(RegistryError::DuplicateTask { name });
        }
        self.order.push(name.clone());
        self.entries.insert(
            name,
            TaskEntry {
                flag: LivenessFlag::new(poll_interval),
                body,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use crate::error::TaskError;
    use crate::tasks::{TaskContext, TaskFn};

    fn decl(name: &str) -> TaskDecl {
        TaskDecl::cooperative(
            name,
            Duration::from_millis(5),
            TaskFn::arc(|_ctx: TaskContext| async { Ok::<_, TaskError>(()) }),
        )
    }

    struct Table(Vec<TaskDecl>);

    impl TaskSet for Table {
        fn tasks(&self) -> Vec<TaskDecl> {
            self.0.clone()
        }
    }

    #[test]
    fn test_register_preserves_insertion_order() {
        let mut reg = TaskRegistry::new();
        reg.register(decl("gyro")).unwrap();
        reg.register(decl("pose")).unwrap();
        reg.register(decl("battery")).unwrap();
        let names: Vec<_> = reg.names().collect();
        assert_eq!(names, vec!["gyro", "pose", "battery"]);
        assert!(reg.flag("pose").unwrap().is_alive());
    }

    #[test]
    fn test_duplicate_rejected_and_registry_unchanged() {
        let mut reg = TaskRegistry::new();
        reg.register(decl("pose")).unwrap();
        let err = reg.register(decl("pose")).unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateTask {
                name: "pose".into()
            }
        );
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.names().collect::<Vec<_>>(), vec!["pose"]);
    }

    #[test]
    fn test_reserved_name_rejected_on_explicit_path() {
        let mut reg = TaskRegistry::new();
        let err = reg.register(decl("run")).unwrap_err();
        assert_eq!(err, RegistryError::ReservedName { name: "run".into() });
        assert!(reg.is_empty());
    }

    #[test]
    fn test_unknown_task_lookup() {
        let reg = TaskRegistry::new();
        let err = reg.flag("ghost").unwrap_err();
        assert_eq!(
            err,
            RegistryError::UnknownTask {
                name: "ghost".into()
            }
        );
    }

    #[test]
    fn test_set_path_silently_skips_reserved() {
        let mut reg = TaskRegistry::new();
        let table = Table(vec![decl("run"), decl("pose"), decl("register")]);
        reg.register_set(&table).unwrap();
        assert_eq!(reg.names().collect::<Vec<_>>(), vec!["pose"]);
    }

    #[test]
    fn test_set_path_still_rejects_duplicates() {
        let mut reg = TaskRegistry::new();
        reg.register(decl("pose")).unwrap();
        let table = Table(vec![decl("pose")]);
        let err = reg.register_set(&table).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateTask { .. }));
    }

    #[test]
    fn test_override_send_replaces_builtin_body() {
        let mut reg = TaskRegistry::new();
        reg.register_builtin("send", Duration::from_millis(10), Builtin::Send);
        assert!(matches!(
            reg.body("send"),
            Some(RegisteredBody::Builtin(Builtin::Send))
        ));
        let task: Arc<dyn crate::Task> =
            TaskFn::arc(|_ctx: TaskContext| async { Ok::<_, TaskError>(()) });
        reg.override_send(task);
        assert!(matches!(
            reg.body("send"),
            Some(RegisteredBody::User(TaskBody::Cooperative(_)))
        ));
    }
}
