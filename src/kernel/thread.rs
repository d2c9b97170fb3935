use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::kernel::intent::{Intent, IntentId, IntentRegistry, IntentStatus};
use crate::kernel::time::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadId(pub Uuid);

impl ThreadId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ThreadId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Groups a call's intents so goals paused by an interruption can resume in
/// the same conversational context later.
///
/// `intent_ids` keeps terminal ids for history; listings filter them out
/// instead of removing them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContinuityThread {
    pub id: ThreadId,
    pub label: String,
    pub intent_ids: Vec<IntentId>,
    pub created_at: Timestamp,
    pub last_touched_at: Timestamp,
    pub is_active: bool,
}

#[derive(Debug, Error, PartialEq)]
pub enum ThreadError {
    #[error("unknown thread {0}")]
    UnknownThread(ThreadId),
}

/// Per-session thread registry. At most one thread is active at any instant.
pub struct ThreadManager {
    threads: HashMap<ThreadId, ContinuityThread>,
    active: Option<ThreadId>,
}

impl ThreadManager {
    pub fn new() -> Self {
        Self {
            threads: HashMap::new(),
            active: None,
        }
    }

    /// Returns the active thread, touching it; creates one lazily if the
    /// session has none yet.
    pub fn ensure_active_thread(&mut self, label: &str, now: Timestamp) -> ThreadId {
        if let Some(id) = self.active {
            if let Some(thread) = self.threads.get_mut(&id) {
                thread.last_touched_at = now;
                return id;
            }
        }
        let thread = ContinuityThread {
            id: ThreadId::new(),
            label: label.to_string(),
            intent_ids: Vec::new(),
            created_at: now,
            last_touched_at: now,
            is_active: true,
        };
        let id = thread.id;
        debug!(thread_id = %id, label, "thread created");
        self.threads.insert(id, thread);
        self.active = Some(id);
        id
    }

    /// Creates a side thread without activating it. `switch_thread` is the
    /// only way it becomes active.
    pub fn create_thread(&mut self, label: &str, now: Timestamp) -> ThreadId {
        let thread = ContinuityThread {
            id: ThreadId::new(),
            label: label.to_string(),
            intent_ids: Vec::new(),
            created_at: now,
            last_touched_at: now,
            is_active: false,
        };
        let id = thread.id;
        self.threads.insert(id, thread);
        id
    }

    /// Idempotently records an intent on the active thread and touches it.
    pub fn attach_intent(&mut self, intent_id: IntentId, now: Timestamp) {
        let thread_id = self.ensure_active_thread("main", now);
        let thread = self
            .threads
            .get_mut(&thread_id)
            .expect("active thread exists");
        if !thread.intent_ids.contains(&intent_id) {
            thread.intent_ids.push(intent_id);
        }
        thread.last_touched_at = now;
    }

    /// Switching must reflect an explicit user signal; there is no heuristic
    /// path that changes the active thread. The deactivated thread keeps its
    /// intent list untouched, only its `is_active` flag flips.
    pub fn switch_thread(&mut self, thread_id: ThreadId, now: Timestamp) -> Result<(), ThreadError> {
        if !self.threads.contains_key(&thread_id) {
            return Err(ThreadError::UnknownThread(thread_id));
        }
        if let Some(previous) = self.active {
            if let Some(thread) = self.threads.get_mut(&previous) {
                thread.is_active = false;
            }
        }
        let thread = self.threads.get_mut(&thread_id).expect("checked above");
        thread.is_active = true;
        thread.last_touched_at = now;
        self.active = Some(thread_id);
        debug!(thread_id = %thread_id, "thread switched");
        Ok(())
    }

    /// The continuity guarantee: when the caller is cut off, every Active
    /// intent on the active thread moves to Paused — preserved, not dropped
    /// and not silently completed. Intents on other threads are untouched.
    /// Returns the ids that were paused.
    pub fn handle_interruption(
        &mut self,
        registry: &mut IntentRegistry,
        now: Timestamp,
    ) -> Vec<IntentId> {
        let mut paused = Vec::new();
        for id in self.active_intent_ids() {
            let is_active = registry
                .get(id, now)
                .map(|i| i.status == IntentStatus::Active)
                .unwrap_or(false);
            if is_active && registry.update_status(id, IntentStatus::Paused).is_ok() {
                paused.push(id);
            }
        }
        if !paused.is_empty() {
            debug!(count = paused.len(), "interruption paused intents");
        }
        paused
    }

    /// Resume-on-return: every Paused intent on the active thread goes back
    /// to Active once the thread regains focus.
    pub fn resume(&mut self, registry: &mut IntentRegistry, now: Timestamp) -> Vec<IntentId> {
        let mut resumed = Vec::new();
        for id in self.active_intent_ids() {
            let is_paused = registry
                .get(id, now)
                .map(|i| i.status == IntentStatus::Paused)
                .unwrap_or(false);
            if is_paused && registry.update_status(id, IntentStatus::Active).is_ok() {
                resumed.push(id);
            }
        }
        resumed
    }

    /// Non-terminal intents on the active thread, in attachment order.
    /// Terminal ids are filtered from the listing, never removed from the
    /// thread.
    pub fn intents_on_active(
        &self,
        registry: &mut IntentRegistry,
        now: Timestamp,
    ) -> Vec<Intent> {
        self.active_intent_ids()
            .into_iter()
            .filter_map(|id| registry.get(id, now).cloned())
            .filter(|i| !i.status.is_terminal())
            .collect()
    }

    /// The strongest currently-active goal, for menu navigation and the
    /// conversational context. Ties resolve to the latest attachment.
    pub fn active_goal_summary(
        &self,
        registry: &mut IntentRegistry,
        now: Timestamp,
    ) -> Option<String> {
        self.intents_on_active(registry, now)
            .into_iter()
            .filter(|i| i.status == IntentStatus::Active)
            .max_by(|a, b| {
                a.confidence
                    .partial_cmp(&b.confidence)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|i| i.inferred_goal)
    }

    pub fn active_thread(&self) -> Option<&ContinuityThread> {
        self.active.and_then(|id| self.threads.get(&id))
    }

    pub fn thread(&self, id: ThreadId) -> Option<&ContinuityThread> {
        self.threads.get(&id)
    }

    fn active_intent_ids(&self) -> Vec<IntentId> {
        self.active_thread()
            .map(|t| t.intent_ids.clone())
            .unwrap_or_default()
    }
}

impl Default for ThreadManager {
    fn default() -> Self {
        Self::new()
    }
}
