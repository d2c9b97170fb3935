use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::KernelConfig;
use crate::kernel::coordinator::Coordinator;
use crate::kernel::event::{SessionEvent, SessionId, TurnOutput};
use crate::kernel::time::Timestamp;

const EVENT_BUFFER: usize = 100;

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("unknown session {0}")]
    UnknownSession(SessionId),
    #[error("session {0} is closed")]
    Closed(SessionId),
}

struct SessionHandle {
    tx: mpsc::Sender<SessionEvent>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// The session arena: one isolated context per call, keyed by session id.
///
/// Each session gets its own tokio task that drains that session's events in
/// arrival order, so no two segments for one call ever race. Sessions share
/// nothing mutable; across sessions everything runs concurrently with no
/// locks. Hangup or cancellation stops in-flight work before it reaches the
/// execution boundary.
pub struct SessionSupervisor {
    config: KernelConfig,
    outputs: mpsc::Sender<(SessionId, TurnOutput)>,
    sessions: HashMap<SessionId, SessionHandle>,
}

impl SessionSupervisor {
    pub fn new(config: KernelConfig, outputs: mpsc::Sender<(SessionId, TurnOutput)>) -> Self {
        Self {
            config,
            outputs,
            sessions: HashMap::new(),
        }
    }

    /// Spawns the actor for a new call session. Re-opening an existing id is
    /// a no-op.
    pub fn open(&mut self, session_id: SessionId) {
        if self.sessions.contains_key(&session_id) {
            warn!(session = %session_id, "session already open");
            return;
        }
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_session(
            session_id,
            self.config.clone(),
            rx,
            self.outputs.clone(),
            cancel.clone(),
        ));
        info!(session = %session_id, "session opened");
        self.sessions.insert(session_id, SessionHandle { tx, cancel, task });
    }

    /// Forwards one event into the session's ordered queue.
    pub async fn route(
        &mut self,
        session_id: SessionId,
        event: SessionEvent,
    ) -> Result<(), SessionError> {
        let handle = self
            .sessions
            .get(&session_id)
            .ok_or(SessionError::UnknownSession(session_id))?;
        if handle.tx.send(event).await.is_err() {
            // Actor ended (hangup already processed); reap the handle.
            self.sessions.remove(&session_id);
            return Err(SessionError::Closed(session_id));
        }
        Ok(())
    }

    /// Hard cancellation: stops the actor without draining its queue. Any
    /// decision still in flight is discarded, never dispatched.
    pub fn close(&mut self, session_id: SessionId) {
        if let Some(handle) = self.sessions.remove(&session_id) {
            handle.cancel.cancel();
        }
    }

    pub fn is_open(&self, session_id: SessionId) -> bool {
        self.sessions
            .get(&session_id)
            .map(|h| !h.task.is_finished())
            .unwrap_or(false)
    }

    pub fn shutdown(&mut self) {
        for (_, handle) in self.sessions.drain() {
            handle.cancel.cancel();
        }
    }
}

async fn run_session(
    session_id: SessionId,
    config: KernelConfig,
    mut rx: mpsc::Receiver<SessionEvent>,
    outputs: mpsc::Sender<(SessionId, TurnOutput)>,
    cancel: CancellationToken,
) {
    let mut coordinator = Coordinator::new(session_id, &config, Timestamp::now());
    let mut sweep = tokio::time::interval(Duration::from_secs(config.sweep_interval_secs.max(1)));
    sweep.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!(session = %session_id, "session cancelled");
                break;
            }
            _ = sweep.tick() => {
                coordinator.handle_event(SessionEvent::Sweep, Timestamp::now());
            }
            maybe = rx.recv() => {
                let Some(event) = maybe else { break };
                let hangup = event == SessionEvent::Hangup;
                let turn = coordinator.handle_event(event, Timestamp::now());
                for output in turn {
                    if outputs.send((session_id, output)).await.is_err() {
                        warn!(session = %session_id, "output channel closed");
                        return;
                    }
                }
                if hangup {
                    break;
                }
            }
        }
    }
}
