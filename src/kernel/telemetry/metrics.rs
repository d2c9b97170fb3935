use std::collections::VecDeque;

use crate::kernel::intent::IntentStatus;

use super::event::{MenuDecisionKind, TelemetryEvent};

#[derive(Debug, Clone, Default)]
pub struct TelemetrySnapshot {
    pub mode_transitions: u64,
    pub intent_stats: IntentStats,
    pub interruptions: u64,
    pub resumptions: u64,
    pub suggestions_offered: u64,
    pub menu_stats: MenuStats,
    pub swept_expired: u64,
}

#[derive(Debug, Clone, Default)]
pub struct IntentStats {
    pub created: u64,
    pub paused: u64,
    pub resumed: u64,
    pub resolved: u64,
    pub expired: u64,
    pub abandoned: u64,
}

#[derive(Debug, Clone, Default)]
pub struct MenuStats {
    pub waits: u64,
    pub keypresses: u64,
    pub spoken: u64,
    pub humans_detected: u64,
}

/// Pure fold over the recorded buffer.
pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();

    for event in events {
        match event {
            TelemetryEvent::ModeTransition { .. } => snap.mode_transitions += 1,
            TelemetryEvent::IntentCreated { .. } => snap.intent_stats.created += 1,
            TelemetryEvent::IntentLifecycle { from, to, .. } => match to {
                IntentStatus::Paused => snap.intent_stats.paused += 1,
                IntentStatus::Active if *from == IntentStatus::Paused => {
                    snap.intent_stats.resumed += 1
                }
                IntentStatus::Resolved => snap.intent_stats.resolved += 1,
                IntentStatus::Expired => snap.intent_stats.expired += 1,
                IntentStatus::Abandoned => snap.intent_stats.abandoned += 1,
                IntentStatus::Active => {}
            },
            TelemetryEvent::Interruption { .. } => snap.interruptions += 1,
            TelemetryEvent::Resumption { .. } => snap.resumptions += 1,
            TelemetryEvent::SuggestionOffered { .. } => snap.suggestions_offered += 1,
            TelemetryEvent::MenuDecision { kind } => match kind {
                MenuDecisionKind::Wait => snap.menu_stats.waits += 1,
                MenuDecisionKind::Dtmf => snap.menu_stats.keypresses += 1,
                MenuDecisionKind::Say => snap.menu_stats.spoken += 1,
                MenuDecisionKind::HumanDetected => snap.menu_stats.humans_detected += 1,
            },
            TelemetryEvent::SweepExpired { count } => snap.swept_expired += *count as u64,
            TelemetryEvent::SessionClosed => {}
        }
    }

    snap
}
