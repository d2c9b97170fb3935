use crate::kernel::event::ActionKind;
use crate::kernel::intent::IntentKind;
use crate::kernel::mode::{Mode, ModeState, URGENCY_MARKERS};

/// Outcome of the primary command router for one utterance. The Suggestion
/// Engine is a fallback layer: it only runs on `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterResult {
    Unknown,
    Matched(ActionKind),
}

/// A goal inferred from one utterance, not yet registered.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftIntent {
    pub inferred_goal: String,
    pub kind: IntentKind,
    pub confidence: f32,
}

// Marker tables, scanned over lowercased text. A marker must leave a goal
// clause behind it to count: bare "remind me" matches nothing here and falls
// through to the Suggestion Engine instead.
const EXPLICIT_MARKERS: &[&str] = &["remind me to ", "i need to ", "can you ", "add "];
const IMPLICIT_MARKERS: &[&str] = &["i have to ", "i should ", "i want to "];
const ASPIRATION_MARKERS: &[&str] = &[
    "someday",
    "at some point",
    "it would be nice",
    "been meaning to",
];

const EXPLICIT_CONFIDENCE: f32 = 0.85;
const URGENT_CONFIDENCE: f32 = 0.9;
const IMPLICIT_CONFIDENCE: f32 = 0.7;
const ASPIRATION_CONFIDENCE: f32 = 0.6;

/// Classify one utterance into zero or more draft intents plus the router
/// result the Suggestion Engine is gated on. Empty or blank text is a no-op.
pub fn extract(text: &str, mode: &ModeState) -> (RouterResult, Vec<DraftIntent>) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return (RouterResult::Unknown, Vec::new());
    }
    let lower = trimmed.to_lowercase();

    let urgency_present =
        mode.current == Mode::Urgent || URGENCY_MARKERS.iter().any(|m| lower.contains(m));

    // 1. Explicit ask: the one shape the primary router considers actionable.
    if let Some(goal) = first_goal_clause(&lower, EXPLICIT_MARKERS) {
        let (kind, confidence) = if urgency_present {
            (IntentKind::UrgentGoal, URGENT_CONFIDENCE)
        } else {
            (IntentKind::ExplicitGoal, EXPLICIT_CONFIDENCE)
        };
        let draft = DraftIntent {
            inferred_goal: goal,
            kind,
            confidence,
        };
        return (RouterResult::Matched(ActionKind::CreateTask), vec![draft]);
    }

    // 2. Aspiration markers outrank implicit phrasing: "someday I want to"
    //    is a wish, not a commitment.
    if ASPIRATION_MARKERS.iter().any(|m| lower.contains(m)) {
        let draft = DraftIntent {
            inferred_goal: strip_terminal_punctuation(&lower).to_string(),
            kind: IntentKind::Aspiration,
            confidence: ASPIRATION_CONFIDENCE,
        };
        return (RouterResult::Unknown, vec![draft]);
    }

    // 3. Declarative first-person goal with no explicit ask.
    if let Some(goal) = first_goal_clause(&lower, IMPLICIT_MARKERS) {
        let (kind, confidence) = if urgency_present {
            (IntentKind::UrgentGoal, URGENT_CONFIDENCE)
        } else {
            (IntentKind::ImplicitGoal, IMPLICIT_CONFIDENCE)
        };
        let draft = DraftIntent {
            inferred_goal: goal,
            kind,
            confidence,
        };
        return (RouterResult::Unknown, vec![draft]);
    }

    (RouterResult::Unknown, Vec::new())
}

/// The clause after the first matching marker, if it is substantive.
fn first_goal_clause(lower: &str, markers: &[&str]) -> Option<String> {
    for marker in markers {
        if let Some(at) = lower.find(marker) {
            let clause = strip_terminal_punctuation(lower[at + marker.len()..].trim());
            if clause.len() >= 3 {
                return Some(clause.to_string());
            }
        }
    }
    None
}

fn strip_terminal_punctuation(clause: &str) -> &str {
    clause.trim_end_matches(['.', '!', '?', ','])
}
