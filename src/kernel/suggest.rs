use serde_json::json;
use tracing::debug;

use crate::config::SuggestionConfig;
use crate::kernel::event::ActionKind;
use crate::kernel::extract::RouterResult;
use crate::kernel::intent::{Intent, IntentKind};
use crate::kernel::mode::{Mode, ModeState};
use crate::kernel::time::Timestamp;

/// A candidate agent-initiated action. Ephemeral: only the Intent or action
/// it leads to is persisted.
///
/// `requires_confirmation` is always true — this engine proposes, it never
/// executes.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub kind: ActionKind,
    pub params: serde_json::Value,
    pub confidence: f32,
    /// Marks the action as agent-initiated when it reaches the execution
    /// layer.
    pub suggested: bool,
    pub requires_confirmation: bool,
    pub internal_reason: String,
}

/// Read-only view of the session the engine evaluates against.
pub struct SuggestionContext<'a> {
    pub mode: &'a ModeState,
    /// Non-terminal intents on the active thread, in attachment order.
    pub recent_intents: &'a [Intent],
    /// When a review action was last offered in this thread, if ever.
    pub last_review_at: Option<Timestamp>,
    pub now: Timestamp,
}

const FORGET_TRIGGERS: &[&str] = &["don't let me forget", "dont let me forget", "remind me"];
const REPEAT_CUES: &[&str] = &["again", "do it again"];

const FORGET_CONFIDENCE: f32 = 0.85;
const REVIEW_CONFIDENCE: f32 = 0.9;
const REPEAT_CONFIDENCE: f32 = 0.8;

pub struct SuggestionEngine {
    config: SuggestionConfig,
}

impl SuggestionEngine {
    pub fn new(config: SuggestionConfig) -> Self {
        Self { config }
    }

    /// Fallback layer, never a first responder: any router match returns
    /// None immediately. Rules run in order, first match wins; a winner
    /// scoring below the configured floor is suppressed entirely.
    pub fn propose(
        &self,
        ctx: &SuggestionContext,
        text: &str,
        router: RouterResult,
    ) -> Option<Suggestion> {
        if router != RouterResult::Unknown {
            return None;
        }
        let lower = text.trim().to_lowercase();

        // 1. Explicit forgetting-prevention phrase: capture it as a note.
        if FORGET_TRIGGERS.iter().any(|t| lower.contains(t)) {
            return self.gate(Suggestion {
                kind: ActionKind::CaptureNote,
                params: json!({ "note": text.trim() }),
                confidence: FORGET_CONFIDENCE,
                suggested: true,
                requires_confirmation: true,
                internal_reason: "forgetting-prevention phrase".to_string(),
            });
        }

        // 2. Stress-relief nudge: offer a review of outstanding items,
        //    suppressed while a recent offer is still fresh to avoid nagging.
        if ctx.mode.current == Mode::Stressed && !self.review_is_recent(ctx) {
            return self.gate(Suggestion {
                kind: ActionKind::ReviewItems,
                params: json!({}),
                confidence: REVIEW_CONFIDENCE,
                suggested: true,
                requires_confirmation: true,
                internal_reason: "stressed caller, no recent review".to_string(),
            });
        }

        // 3. Bare repetition cue: re-propose the last capture verbatim.
        let bare = lower.trim_end_matches(['.', '!', '?']);
        if REPEAT_CUES.contains(&bare) {
            let last_capture = ctx.recent_intents.iter().rev().find(|i| {
                matches!(i.kind, IntentKind::ExplicitGoal | IntentKind::UrgentGoal)
            })?;
            return self.gate(Suggestion {
                kind: ActionKind::CreateTask,
                params: json!({
                    "goal": last_capture.inferred_goal,
                    "repeat_of": last_capture.id,
                }),
                confidence: REPEAT_CONFIDENCE,
                suggested: true,
                requires_confirmation: true,
                internal_reason: "repetition cue".to_string(),
            });
        }

        None
    }

    fn review_is_recent(&self, ctx: &SuggestionContext) -> bool {
        let window_ms = self.config.review_window_secs * 1000;
        ctx.last_review_at
            .map(|at| ctx.now.since(at) < window_ms)
            .unwrap_or(false)
    }

    /// Below-floor suggestions vanish; they are never surfaced as
    /// low-confidence warnings.
    fn gate(&self, suggestion: Suggestion) -> Option<Suggestion> {
        if suggestion.confidence < self.config.min_confidence {
            debug!(
                reason = %suggestion.internal_reason,
                confidence = suggestion.confidence,
                "suggestion suppressed below floor"
            );
            return None;
        }
        Some(suggestion)
    }
}
