use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::kernel::mode::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One finalized transcript unit from the speech-recognition provider.
/// Segments arrive per session in order; only `is_final` segments are
/// processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    pub confidence: f32,
    pub is_final: bool,
}

impl TranscriptSegment {
    pub fn final_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            confidence: 1.0,
            is_final: true,
        }
    }
}

/// Everything a session's actor can receive, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Segment(TranscriptSegment),
    /// Transport signal: the counter-party is an automated menu.
    MenuDetected,
    /// Transport signal: a human took over; back to the conversational path.
    HumanReached,
    /// The caller was cut off or the counter-party interrupted.
    Interrupted,
    /// The conversation regained focus after an interruption.
    UserReturned,
    Hangup,
    /// Background cadence: run the intent-expiry sweep.
    Sweep,
}

/// What the tool-execution layer is asked to do. Kinds are closed: the core
/// only ever requests task creation, note capture, a review, or a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    CreateTask,
    CaptureNote,
    ReviewItems,
    LookupItem,
}

/// Structured request to the external tool-execution layer.
///
/// The idempotency key is minted once per decision; a retry reuses it so a
/// retried call cannot duplicate a side effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub kind: ActionKind,
    pub params: serde_json::Value,
    pub requires_confirmation: bool,
    pub idempotency_key: Uuid,
}

impl ActionRequest {
    pub fn new(kind: ActionKind, params: serde_json::Value, requires_confirmation: bool) -> Self {
        Self {
            kind,
            params,
            requires_confirmation,
            idempotency_key: Uuid::new_v4(),
        }
    }
}

/// Exactly one of these goes to the telephony transport per menu decision.
/// A sent keypress cannot be recalled, so commands are validated before
/// dispatch, never rolled back after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TelephonyCommand {
    PressDigits(String),
    SpeakPhrase(String),
    Wait,
    EndCall,
}

/// Context snapshot handed to the language-model provider for one
/// conversational turn. The core supplies context; the provider supplies the
/// words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationContext {
    pub session_id: SessionId,
    pub utterance: String,
    pub mode: Mode,
    pub active_goal: Option<String>,
    pub open_goals: usize,
}

/// The Coordinator's per-turn outputs, executed at the driver boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutput {
    /// To the tool-execution layer.
    Action(ActionRequest),
    /// To the telephony transport.
    Telephony(TelephonyCommand),
    /// To the speech-synthesis provider.
    Speak(String),
    /// To the language-model provider.
    Converse(ConversationContext),
}
