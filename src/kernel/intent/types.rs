use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::kernel::time::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntentId(pub Uuid);

impl IntentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for IntentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for IntentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// How the goal was inferred from speech. Each kind carries its own default
/// time-to-live (see `TtlConfig`): urgent 6h, implicit 24h, aspiration 12h,
/// explicit 48h.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentKind {
    ExplicitGoal,
    ImplicitGoal,
    UrgentGoal,
    Aspiration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentStatus {
    Active,
    Paused,
    Resolved,
    Expired,
    Abandoned,
}

impl IntentStatus {
    /// Terminal records are history: never re-activated, a new Intent is
    /// created instead.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved | Self::Expired | Self::Abandoned)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub id: IntentId,
    /// Verbatim speech the goal was inferred from.
    pub source_utterance: String,
    pub inferred_goal: String,
    pub kind: IntentKind,
    pub confidence: f32,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub status: IntentStatus,
    pub requires_confirmation: bool,
}
