//! # Built-in task loops: send (abstract), recv, shutdown.
//!
//! These are the three loops every supervisor carries:
//!
//! - **send** — abstract. The stub here fails immediately with
//!   [`TaskError::NotImplemented`]; a concrete protocol replaces it via
//!   [`SupervisorBuilder::with_send`](crate::SupervisorBuilder::with_send).
//! - **recv** — reads frames into the last-received mailbox. A read failure
//!   stops only the recv flag: a broken receive path is a one-way failure,
//!   never a cascade.
//! - **shutdown** — watches the stop trigger and owns the stop cascade.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::core::trigger::StopTrigger;
use crate::core::LivenessFlag;
use crate::error::TaskError;
use crate::events::{Bus, Event, EventKind};
use crate::tasks::TaskContext;

/// Default body of the abstract send task.
///
/// Fails on its first poll; the wrapper reports `TaskFailed` and the run
/// continues without a sender (per-task failure, no cascade).
pub(crate) async fn send_stub(_ctx: TaskContext) -> Result<(), TaskError> {
    Err(TaskError::NotImplemented)
}

/// Receive loop: read one frame, publish it to the mailbox, suspend.
///
/// The mailbox is last-write-wins; nothing is queued. On a read error the
/// loop stops its own flag and exits with the error.
pub(crate) async fn recv_loop(
    ctx: TaskContext,
    last: watch::Sender<Vec<u8>>,
) -> Result<(), TaskError> {
    while ctx.is_alive() {
        match ctx.link().read_frame().await {
            Ok(frame) => {
                let _ = last.send(frame);
                ctx.tick().await;
            }
            Err(e) => {
                ctx.stop();
                return Err(TaskError::Transport(e));
            }
        }
    }
    Ok(())
}

/// Shutdown loop: poll the trigger, then cascade the stop signal.
///
/// While its own flag is alive it polls the trigger once per interval. On
/// trigger — or after the fixed fallback delay when the trigger cannot be
/// queried — it stops its own flag first, then every other registered flag,
/// reporting each as newly signaled or already stopped.
pub(crate) async fn shutdown_loop(
    trigger: Arc<dyn StopTrigger>,
    own: LivenessFlag,
    flags: Vec<(String, LivenessFlag)>,
    bus: Bus,
    fallback_delay: Duration,
) {
    while own.is_alive() {
        match trigger.is_requested() {
            Ok(true) => break,
            Ok(false) => own.tick().await,
            Err(e) => {
                bus.publish(
                    Event::new(EventKind::TriggerFallback)
                        .with_reason(format!("stopping in {fallback_delay:?}: {e}")),
                );
                tokio::time::sleep(fallback_delay).await;
                break;
            }
        }
    }

    bus.publish(Event::new(EventKind::StopRequested));
    own.stop();
    for (name, flag) in flags {
        if flag.is_alive() {
            flag.stop();
            bus.publish(Event::new(EventKind::StopSignaled).with_task(name));
        } else {
            bus.publish(Event::new(EventKind::StopSkipped).with_task(name));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::sync::broadcast::error::TryRecvError;

    use crate::core::trigger::{ManualTrigger, TriggerError};
    use crate::transport::testing::{MockTransport, OnEmpty};

    fn ctx_with(
        transport: Arc<MockTransport>,
        poll: Duration,
    ) -> (TaskContext, watch::Sender<Vec<u8>>) {
        let (tx, rx) = watch::channel(Vec::new());
        let flag = LivenessFlag::new(poll);
        (TaskContext::new(flag, transport, rx), tx)
    }

    fn drain(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<Event> {
        let mut events = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(ev) => events.push(ev),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                Err(TryRecvError::Lagged(_)) => continue,
            }
        }
        events
    }

    #[tokio::test]
    async fn test_send_stub_fails_not_implemented() {
        let transport = MockTransport::new(vec![], OnEmpty::Error);
        let (ctx, _tx) = ctx_with(transport, Duration::from_millis(1));
        let err = send_stub(ctx).await.unwrap_err();
        assert!(matches!(err, TaskError::NotImplemented));
    }

    #[tokio::test(start_paused = true)]
    async fn test_recv_stores_last_frame_then_stops_itself_on_error() {
        let transport = MockTransport::new(
            vec![b"pose 1".to_vec(), b"pose 2".to_vec()],
            OnEmpty::Error,
        );
        let (ctx, tx) = ctx_with(transport, Duration::from_millis(1));
        let bystander = LivenessFlag::new(Duration::from_millis(1));
        let mailbox = tx.subscribe();

        let flag = ctx.flag().clone();
        let err = recv_loop(ctx, tx).await.unwrap_err();

        // last-write-wins: only the freshest frame is observable
        assert_eq!(*mailbox.borrow(), b"pose 2".to_vec());
        assert!(matches!(err, TaskError::Transport(_)));
        // the failure is local: recv stopped itself, nobody else
        assert!(!flag.is_alive());
        assert!(bystander.is_alive());
    }

    #[tokio::test(start_paused = true)]
    async fn test_recv_exits_within_one_poll_of_stop() {
        let transport = MockTransport::new(vec![], OnEmpty::Pending);
        let (ctx, tx) = ctx_with(transport, Duration::from_millis(1));
        ctx.stop();
        // flag already stopped: the loop must not even attempt a read
        let res = recv_loop(ctx, tx).await;
        assert!(res.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cascade_reports_signaled_and_skipped() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let trigger = ManualTrigger::new();
        trigger.request_stop();

        let own = LivenessFlag::new(Duration::from_millis(100));
        let running = LivenessFlag::new(Duration::from_millis(1));
        let dead = LivenessFlag::new(Duration::from_millis(1));
        dead.stop();
        let flags = vec![
            ("close".to_string(), own.clone()),
            ("recv".to_string(), dead.clone()),
            ("pose".to_string(), running.clone()),
        ];

        shutdown_loop(
            Arc::new(trigger),
            own.clone(),
            flags,
            bus,
            Duration::from_secs(10),
        )
        .await;

        assert!(!own.is_alive());
        assert!(!running.is_alive());

        let events = drain(&mut rx);
        let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::StopRequested,
                EventKind::StopSkipped,  // close: stopped itself first
                EventKind::StopSkipped,  // recv: already dead
                EventKind::StopSignaled, // pose: newly signaled
            ]
        );
        assert_eq!(events[3].task.as_deref(), Some("pose"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_falls_back_when_trigger_unavailable() {
        struct Broken;
        impl StopTrigger for Broken {
            fn is_requested(&self) -> Result<bool, TriggerError> {
                Err(TriggerError {
                    reason: "no keyboard".to_string(),
                })
            }
        }

        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let own = LivenessFlag::new(Duration::from_millis(100));
        let started = tokio::time::Instant::now();

        shutdown_loop(
            Arc::new(Broken),
            own.clone(),
            vec![],
            bus,
            Duration::from_secs(10),
        )
        .await;

        assert!(started.elapsed() >= Duration::from_secs(10));
        assert!(!own.is_alive());
        let events = drain(&mut rx);
        assert_eq!(events[0].kind, EventKind::TriggerFallback);
        assert_eq!(events[1].kind, EventKind::StopRequested);
    }
}
