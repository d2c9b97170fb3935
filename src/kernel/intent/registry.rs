use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::config::TtlConfig;
use crate::kernel::time::Timestamp;

use super::types::{Intent, IntentId, IntentKind, IntentStatus};

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("unknown intent {0}")]
    UnknownIntent(IntentId),
    #[error("intent {id} is terminal ({status:?})")]
    TerminalStatus { id: IntentId, status: IntentStatus },
    #[error("illegal transition {from:?} -> {to:?} for intent {id}")]
    IllegalTransition {
        id: IntentId,
        from: IntentStatus,
        to: IntentStatus,
    },
}

/// Per-session store of inferred goals and their TTL lifecycle.
///
/// Expiry is checked on both access paths: lazily when a single record is
/// read, and as a bulk sweep before any active listing. Whichever path runs
/// first, a stale-but-unswept intent is never reported as active.
pub struct IntentRegistry {
    ttl: TtlConfig,
    intents: HashMap<IntentId, Intent>,
}

impl IntentRegistry {
    pub fn new(ttl: TtlConfig) -> Self {
        Self {
            ttl,
            intents: HashMap::new(),
        }
    }

    pub fn create(
        &mut self,
        source_utterance: &str,
        inferred_goal: &str,
        kind: IntentKind,
        confidence: f32,
        now: Timestamp,
    ) -> Intent {
        let intent = Intent {
            id: IntentId::new(),
            source_utterance: source_utterance.to_string(),
            inferred_goal: inferred_goal.to_string(),
            kind,
            confidence,
            created_at: now,
            expires_at: now.plus(self.ttl.ttl(kind)),
            status: IntentStatus::Active,
            requires_confirmation: true,
        };
        debug!(intent_id = %intent.id, ?kind, "intent created");
        self.intents.insert(intent.id, intent.clone());
        intent
    }

    /// Read one record, flipping it to Expired first if its TTL has lapsed.
    /// Expiry here is a normal outcome, not a lookup failure; history is
    /// retained.
    pub fn get(&mut self, id: IntentId, now: Timestamp) -> Option<&Intent> {
        let intent = self.intents.get_mut(&id)?;
        if !intent.status.is_terminal() && now > intent.expires_at {
            debug!(intent_id = %id, "intent expired on read");
            intent.status = IntentStatus::Expired;
        }
        Some(intent)
    }

    /// Forward-only transitions: Active -> {Paused, Resolved, Abandoned,
    /// Expired}, Paused -> {Active, Expired, Abandoned}. Anything out of a
    /// terminal status is rejected.
    pub fn update_status(&mut self, id: IntentId, to: IntentStatus) -> Result<(), RegistryError> {
        let intent = self
            .intents
            .get_mut(&id)
            .ok_or(RegistryError::UnknownIntent(id))?;
        let from = intent.status;

        if from.is_terminal() {
            return Err(RegistryError::TerminalStatus { id, status: from });
        }
        let allowed = match from {
            IntentStatus::Active => matches!(
                to,
                IntentStatus::Paused
                    | IntentStatus::Resolved
                    | IntentStatus::Abandoned
                    | IntentStatus::Expired
            ),
            IntentStatus::Paused => matches!(
                to,
                IntentStatus::Active | IntentStatus::Expired | IntentStatus::Abandoned
            ),
            _ => false,
        };
        if !allowed {
            return Err(RegistryError::IllegalTransition { id, from, to });
        }

        // A pause/resume does not extend the record's lifetime; only the
        // status moves, `expires_at` stands.
        debug!(intent_id = %id, ?from, ?to, "intent transition");
        intent.status = to;
        Ok(())
    }

    /// Bulk expiry sweep, then every record still Active.
    pub fn active_intents(&mut self, now: Timestamp) -> Vec<&Intent> {
        self.sweep(now);
        let mut active: Vec<&Intent> = self
            .intents
            .values()
            .filter(|i| i.status == IntentStatus::Active)
            .collect();
        active.sort_by_key(|i| i.created_at);
        active
    }

    /// Flip every lapsed non-terminal record to Expired. Idempotent: running
    /// it twice over the same records is harmless, so the background cadence
    /// needs no coordination with turn processing.
    pub fn sweep(&mut self, now: Timestamp) -> usize {
        let mut expired = 0;
        for intent in self.intents.values_mut() {
            if !intent.status.is_terminal() && now > intent.expires_at {
                intent.status = IntentStatus::Expired;
                expired += 1;
            }
        }
        if expired > 0 {
            debug!(expired, "expiry sweep");
        }
        expired
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}
