//! # Supervisor: ordered startup, joint execution, ordered shutdown.
//!
//! The [`Supervisor`] owns the transport handle, the task registry, and the
//! event bus. Its lifecycle is a straight line:
//!
//! ```text
//! Idle ──run()──► Connecting ──handshake ok──► Running ──► Stopping ──► Closed
//!                     │
//!                     └─ dial/handshake failure ──► Closed (error surfaced,
//!                        nothing started, no cleanup needed)
//! ```
//!
//! ## Running
//! One concurrent unit per registry entry, spawned into a `JoinSet` in
//! registration order. All tasks start after the handshake; there is no
//! other ordering guarantee between them. The shutdown task is spawned with
//! its own handle so the supervisor can observe the `Running → Stopping`
//! transition.
//!
//! ## Stopping
//! Driven by the shutdown task's cascade (every flag stopped, each reported
//! as newly signaled or already stopped). The supervisor then waits a fixed
//! grace period for the join set; tasks that overrun are abandoned — their
//! results are ignored and the transport is closed underneath them.
//!
//! ## Closed
//! Best-effort terminal `CLOSE` frame, best-effort close (failures reported,
//! never escalated: the connection may already be gone), then `run()`
//! returns. `run(self)` consumes the supervisor, so a finished run cannot be
//! restarted.
//!
//! ## Known limitation
//! Cascading stop is solely the shutdown task's job. If its trigger never
//! fires while some other task loops forever, `run()` waits indefinitely.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::{JoinHandle, JoinSet};

use crate::config::Config;
use crate::core::builtin;
use crate::core::registry::{Builtin, RegisteredBody, TaskRegistry};
use crate::core::trigger::{SignalTrigger, StopTrigger};
use crate::core::LivenessFlag;
use crate::error::{RuntimeError, TaskError};
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::{Subscribe, SubscriberSet};
use crate::tasks::{BlockingRef, TaskBody, TaskContext};
use crate::transport::{Dial, CLOSE_FRAME};

/// Coordinates the registered tasks over one shared connection.
pub struct Supervisor {
    cfg: Config,
    bus: Bus,
    subs: Arc<SubscriberSet>,
    registry: TaskRegistry,
    dial: Arc<dyn Dial>,
    trigger: Option<Arc<dyn StopTrigger>>,
}

impl Supervisor {
    /// Starts building a supervisor from construction options.
    pub fn builder(cfg: Config) -> crate::core::SupervisorBuilder {
        crate::core::SupervisorBuilder::new(cfg)
    }

    pub(crate) fn from_parts(
        cfg: Config,
        registry: TaskRegistry,
        subscribers: Vec<Arc<dyn Subscribe>>,
        trigger: Option<Arc<dyn StopTrigger>>,
        dial: Arc<dyn Dial>,
    ) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        Self {
            cfg,
            bus,
            subs: Arc::new(SubscriberSet::new(subscribers)),
            registry,
            dial,
            trigger,
        }
    }

    /// The event bus. Subscribe before calling [`run`](Self::run) to observe
    /// the whole lifecycle.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// The task registry (read-only at this point).
    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    /// Connects, runs every registered task concurrently, and returns once
    /// the shutdown cascade has completed and the transport close has been
    /// attempted exactly once.
    ///
    /// Errors only surface from the `Idle → Running` edge (dial, handshake);
    /// after that, failures are per-task and reported on the bus.
    pub async fn run(self) -> Result<(), RuntimeError> {
        let Supervisor {
            cfg,
            bus,
            subs,
            registry,
            dial,
            trigger,
        } = self;

        // Idle -> Connecting: dial once, no retry, then identify ourselves.
        let link = dial
            .dial(&cfg.addr, cfg.port)
            .await
            .map_err(RuntimeError::Connect)?;
        link.write_frame(cfg.id_message.as_bytes())
            .await
            .map_err(RuntimeError::Handshake)?;
        // The listener must be subscribed before the first publish, or
        // attached subscribers miss the Connected event.
        spawn_subscriber_listener(&bus, &subs);
        bus.publish(Event::new(EventKind::Connected));

        // Connecting -> Running: one unit per registry entry.
        let trigger = trigger.unwrap_or_else(|| Arc::new(SignalTrigger::spawn()));
        let (last_tx, last_rx) = watch::channel(Vec::new());
        let mut set = JoinSet::new();
        let mut shutdown: Option<JoinHandle<()>> = None;

        let names: Vec<String> = registry.names().map(str::to_string).collect();
        for name in names {
            let flag = registry.flag(&name).expect("registered name has a flag");
            let ctx = TaskContext::new(flag.clone(), link.clone(), last_rx.clone());
            match registry.body(&name).expect("registered name has a body") {
                RegisteredBody::Builtin(Builtin::Shutdown) => {
                    shutdown = Some(spawn_shutdown(
                        &bus,
                        name,
                        trigger.clone(),
                        flag,
                        registry.flags(),
                        cfg.fallback_delay,
                    ));
                }
                RegisteredBody::Builtin(Builtin::Recv) => {
                    spawn_loop(&mut set, &bus, name, builtin::recv_loop(ctx, last_tx.clone()));
                }
                RegisteredBody::Builtin(Builtin::Send) => {
                    spawn_loop(&mut set, &bus, name, builtin::send_stub(ctx));
                }
                RegisteredBody::User(TaskBody::Cooperative(task)) => {
                    let task = task.clone();
                    spawn_loop(&mut set, &bus, name, async move { task.run(ctx).await });
                }
                RegisteredBody::User(TaskBody::Blocking(f)) => {
                    spawn_worker(&mut set, &bus, name, f.clone(), ctx);
                }
            }
        }
        let mut shutdown = shutdown.expect("shutdown task is always seeded");
        let close_flag = registry.flag("close").expect("close flag is always seeded");

        // Running -> Stopping: either the shutdown task cascades, or every
        // other task drains on its own and we stop the shutdown loop too.
        tokio::select! {
            _ = &mut shutdown => {}
            _ = drain(&mut set) => {
                close_flag.stop();
                let _ = (&mut shutdown).await;
            }
        }

        // Grace: bounded wait for the rest to observe their flags.
        if tokio::time::timeout(cfg.grace, drain(&mut set)).await.is_ok() {
            bus.publish(Event::new(EventKind::AllStoppedWithin));
        } else {
            bus.publish(Event::new(EventKind::GraceExceeded));
            set.abort_all();
            drain(&mut set).await;
        }

        // Stopping -> Closed: best-effort terminal frame, then close.
        let mut closed = Event::new(EventKind::TransportClosed);
        if let Err(e) = link.write_frame(CLOSE_FRAME).await {
            closed = closed.with_reason(format!("terminal frame not delivered: {e}"));
        }
        if let Err(e) = link.close().await {
            closed = closed.with_reason(e.to_string());
        }
        bus.publish(closed);
        Ok(())
    }
}

/// Awaits every task currently in the set.
async fn drain(set: &mut JoinSet<()>) {
    while set.join_next().await.is_some() {}
}

/// Spawns a cooperative task body, bracketing it with lifecycle events.
fn spawn_loop<F>(set: &mut JoinSet<()>, bus: &Bus, name: String, body: F)
where
    F: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    let bus = bus.clone();
    set.spawn(async move {
        bus.publish(Event::new(EventKind::TaskStarting).with_task(name.clone()));
        match body.await {
            Ok(()) => bus.publish(Event::new(EventKind::TaskStopped).with_task(name)),
            Err(e) => bus.publish(
                Event::new(EventKind::TaskFailed)
                    .with_task(name)
                    .with_reason(e.to_string()),
            ),
        }
    });
}

/// Dispatches a blocking body to the worker pool.
///
/// Worker-bound tasks cannot suspend cooperatively; they are expected to
/// check their flag between discrete chunks of work only.
fn spawn_worker(set: &mut JoinSet<()>, bus: &Bus, name: String, f: BlockingRef, ctx: TaskContext) {
    let bus = bus.clone();
    set.spawn(async move {
        bus.publish(Event::new(EventKind::TaskStarting).with_task(name.clone()));
        match tokio::task::spawn_blocking(move || f(ctx)).await {
            Ok(Ok(())) => bus.publish(Event::new(EventKind::TaskStopped).with_task(name)),
            Ok(Err(e)) => bus.publish(
                Event::new(EventKind::TaskFailed)
                    .with_task(name)
                    .with_reason(e.to_string()),
            ),
            Err(join_err) => bus.publish(
                Event::new(EventKind::TaskFailed)
                    .with_task(name)
                    .with_reason(format!("worker panicked: {join_err}")),
            ),
        }
    });
}

/// Spawns the shutdown task with its own handle so `run()` can observe the
/// `Running -> Stopping` transition.
fn spawn_shutdown(
    bus: &Bus,
    name: String,
    trigger: Arc<dyn StopTrigger>,
    flag: LivenessFlag,
    flags: Vec<(String, LivenessFlag)>,
    fallback_delay: std::time::Duration,
) -> JoinHandle<()> {
    let bus = bus.clone();
    tokio::spawn(async move {
        bus.publish(Event::new(EventKind::TaskStarting).with_task(name.clone()));
        builtin::shutdown_loop(trigger, flag, flags, bus.clone(), fallback_delay).await;
        bus.publish(Event::new(EventKind::TaskStopped).with_task(name));
    })
}

/// Forwards bus events to the subscriber set (fire-and-forget).
fn spawn_subscriber_listener(bus: &Bus, subs: &Arc<SubscriberSet>) {
    if subs.is_empty() {
        return;
    }
    let mut rx = bus.subscribe();
    let subs = Arc::clone(subs);
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(ev) => subs.emit(&ev).await,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}
