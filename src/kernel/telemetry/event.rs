use serde::{Deserialize, Serialize};

use crate::kernel::event::ActionKind;
use crate::kernel::intent::{IntentId, IntentStatus};
use crate::kernel::menu::MenuDecision;
use crate::kernel::mode::Mode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TelemetryEvent {
    ModeTransition {
        from: Mode,
        to: Mode,
    },

    IntentCreated {
        intent_id: IntentId,
    },

    IntentLifecycle {
        intent_id: IntentId,
        from: IntentStatus,
        to: IntentStatus,
    },

    /// One interruption, with how many intents it paused.
    Interruption {
        paused: usize,
    },

    Resumption {
        resumed: usize,
    },

    SuggestionOffered {
        kind: ActionKind,
    },

    MenuDecision {
        kind: MenuDecisionKind,
    },

    SweepExpired {
        count: usize,
    },

    SessionClosed,
}

/// Decision shape with the prompt, labels, and reason stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuDecisionKind {
    Wait,
    Dtmf,
    Say,
    HumanDetected,
}

impl From<&MenuDecision> for MenuDecisionKind {
    fn from(decision: &MenuDecision) -> Self {
        match decision {
            MenuDecision::Wait { .. } => MenuDecisionKind::Wait,
            MenuDecision::Dtmf { .. } => MenuDecisionKind::Dtmf,
            MenuDecision::Say { .. } => MenuDecisionKind::Say,
            MenuDecision::HumanDetected { .. } => MenuDecisionKind::HumanDetected,
        }
    }
}
