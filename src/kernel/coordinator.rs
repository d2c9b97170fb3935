use serde_json::json;
use tracing::{debug, info};

use crate::config::KernelConfig;
use crate::kernel::event::{
    ActionKind, ActionRequest, ConversationContext, SessionEvent, SessionId, TelephonyCommand,
    TranscriptSegment, TurnOutput,
};
use crate::kernel::extract::{self, RouterResult};
use crate::kernel::intent::{IntentId, IntentRegistry, IntentStatus, RegistryError};
use crate::kernel::menu::{self, MenuDecision};
use crate::kernel::mode::{build_classifier, Classifier, ModeState};
use crate::kernel::suggest::{Suggestion, SuggestionContext, SuggestionEngine};
use crate::kernel::telemetry::{
    MenuDecisionKind, TelemetryEvent, TelemetryRecorder, TelemetrySnapshot,
};
use crate::kernel::thread::ThreadManager;
use crate::kernel::time::Timestamp;

const TOPIC_SWITCH_MARKERS: &[&str] = &[
    "let's talk about something else",
    "lets talk about something else",
    "different topic",
    "change the subject",
];

/// Call lifecycle. Interruption is not a phase: it can strike either live
/// sub-state and is handled by pausing the active thread's goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPhase {
    Connecting,
    Conversation,
    MenuNavigation,
    Closed,
}

/// Sequences the state-tracking units for one call session: mode pass, then
/// intent extraction, then suggestion fallback — or the menu decision engine
/// instead while navigating an automated menu.
///
/// All outputs are returned, never executed here; the driver at the process
/// edge owns side effects. After `Closed`, every event is discarded so no
/// irreversible action can fire from an abandoned computation.
pub struct Coordinator {
    session_id: SessionId,
    phase: CallPhase,
    mode: ModeState,
    classifier: Box<dyn Classifier>,
    registry: IntentRegistry,
    threads: ThreadManager,
    suggester: SuggestionEngine,
    telemetry: TelemetryRecorder,
    last_review_at: Option<Timestamp>,
}

impl Coordinator {
    pub fn new(session_id: SessionId, config: &KernelConfig, now: Timestamp) -> Self {
        Self {
            session_id,
            phase: CallPhase::Connecting,
            mode: ModeState::initial(now),
            classifier: build_classifier(config),
            registry: IntentRegistry::new(config.ttl.clone()),
            threads: ThreadManager::new(),
            suggester: SuggestionEngine::new(config.suggestion.clone()),
            telemetry: TelemetryRecorder::new(),
            last_review_at: None,
        }
    }

    pub fn phase(&self) -> CallPhase {
        self.phase
    }

    pub fn mode(&self) -> &ModeState {
        &self.mode
    }

    pub fn registry_mut(&mut self) -> &mut IntentRegistry {
        &mut self.registry
    }

    pub fn threads_mut(&mut self) -> &mut ThreadManager {
        &mut self.threads
    }

    pub fn telemetry_snapshot(&self) -> TelemetrySnapshot {
        self.telemetry.snapshot()
    }

    /// One event, strictly in arrival order; the session actor guarantees no
    /// two calls overlap for the same session.
    pub fn handle_event(&mut self, event: SessionEvent, now: Timestamp) -> Vec<TurnOutput> {
        if self.phase == CallPhase::Closed {
            return Vec::new();
        }

        match event {
            SessionEvent::Segment(segment) => self.handle_segment(segment, now),
            SessionEvent::MenuDetected => {
                debug!(session = %self.session_id, "menu navigation engaged");
                self.phase = CallPhase::MenuNavigation;
                Vec::new()
            }
            SessionEvent::HumanReached => {
                self.phase = CallPhase::Conversation;
                Vec::new()
            }
            SessionEvent::Interrupted => {
                let paused = self.threads.handle_interruption(&mut self.registry, now);
                for id in &paused {
                    self.telemetry.record(TelemetryEvent::IntentLifecycle {
                        intent_id: *id,
                        from: IntentStatus::Active,
                        to: IntentStatus::Paused,
                    });
                }
                self.telemetry.record(TelemetryEvent::Interruption {
                    paused: paused.len(),
                });
                Vec::new()
            }
            SessionEvent::UserReturned => {
                let resumed = self.threads.resume(&mut self.registry, now);
                for id in &resumed {
                    self.telemetry.record(TelemetryEvent::IntentLifecycle {
                        intent_id: *id,
                        from: IntentStatus::Paused,
                        to: IntentStatus::Active,
                    });
                }
                self.telemetry.record(TelemetryEvent::Resumption {
                    resumed: resumed.len(),
                });
                Vec::new()
            }
            SessionEvent::Hangup => {
                info!(session = %self.session_id, "session closed");
                self.phase = CallPhase::Closed;
                self.telemetry.record(TelemetryEvent::SessionClosed);
                // Tell the transport to tear down our leg; everything else
                // in flight is discarded.
                vec![TurnOutput::Telephony(TelephonyCommand::EndCall)]
            }
            SessionEvent::Sweep => {
                let count = self.registry.sweep(now);
                if count > 0 {
                    self.telemetry.record(TelemetryEvent::SweepExpired { count });
                }
                Vec::new()
            }
        }
    }

    /// The tool-execution boundary reports a completed action here so the
    /// backing goal leaves the active set.
    pub fn resolve_intent(&mut self, id: IntentId, now: Timestamp) -> Result<(), RegistryError> {
        let from = self
            .registry
            .get(id, now)
            .map(|i| i.status)
            .ok_or(RegistryError::UnknownIntent(id))?;
        self.registry.update_status(id, IntentStatus::Resolved)?;
        self.telemetry.record(TelemetryEvent::IntentLifecycle {
            intent_id: id,
            from,
            to: IntentStatus::Resolved,
        });
        Ok(())
    }

    pub fn abandon_intent(&mut self, id: IntentId, now: Timestamp) -> Result<(), RegistryError> {
        let from = self
            .registry
            .get(id, now)
            .map(|i| i.status)
            .ok_or(RegistryError::UnknownIntent(id))?;
        self.registry
            .update_status(id, IntentStatus::Abandoned)?;
        self.telemetry.record(TelemetryEvent::IntentLifecycle {
            intent_id: id,
            from,
            to: IntentStatus::Abandoned,
        });
        Ok(())
    }

    fn handle_segment(&mut self, segment: TranscriptSegment, now: Timestamp) -> Vec<TurnOutput> {
        if !segment.is_final {
            return Vec::new();
        }
        // The first finalized segment takes the call live.
        if self.phase == CallPhase::Connecting {
            self.phase = CallPhase::Conversation;
        }

        let next = self.classifier.classify(&self.mode, &segment.text, now);
        if next.current != self.mode.current {
            debug!(session = %self.session_id, from = ?self.mode.current, to = ?next.current, "mode transition");
            self.telemetry.record(TelemetryEvent::ModeTransition {
                from: self.mode.current,
                to: next.current,
            });
        }
        self.mode = next;

        if self.phase == CallPhase::MenuNavigation {
            self.menu_turn(&segment, now)
        } else {
            self.conversation_turn(&segment, now)
        }
    }

    fn conversation_turn(
        &mut self,
        segment: &TranscriptSegment,
        now: Timestamp,
    ) -> Vec<TurnOutput> {
        // Thread switching happens only on an explicit phrase, never on a
        // heuristic guess.
        let lower = segment.text.to_lowercase();
        if TOPIC_SWITCH_MARKERS.iter().any(|m| lower.contains(m)) {
            let thread_id = self.threads.create_thread("topic", now);
            let _ = self.threads.switch_thread(thread_id, now);
            let context = ConversationContext {
                session_id: self.session_id,
                utterance: segment.text.clone(),
                mode: self.mode.current,
                active_goal: None,
                open_goals: 0,
            };
            return vec![TurnOutput::Converse(context)];
        }

        let (router, drafts) = extract::extract(&segment.text, &self.mode);
        for draft in &drafts {
            let intent = self.registry.create(
                &segment.text,
                &draft.inferred_goal,
                draft.kind,
                draft.confidence,
                now,
            );
            self.threads.attach_intent(intent.id, now);
            self.telemetry
                .record(TelemetryEvent::IntentCreated { intent_id: intent.id });
        }

        // A routed capture goes straight to the execution boundary, still
        // confirmation-gated there.
        if let RouterResult::Matched(kind) = router {
            let goal = drafts
                .first()
                .map(|d| d.inferred_goal.clone())
                .unwrap_or_else(|| segment.text.clone());
            let request = ActionRequest::new(
                kind,
                json!({ "goal": goal, "source_utterance": segment.text.clone() }),
                true,
            );
            return vec![TurnOutput::Action(request)];
        }

        // Nothing actionable found: the Suggestion Engine gets its look.
        let recent = self.threads.intents_on_active(&mut self.registry, now);
        let ctx = SuggestionContext {
            mode: &self.mode,
            recent_intents: &recent,
            last_review_at: self.last_review_at,
            now,
        };
        if let Some(suggestion) = self.suggester.propose(&ctx, &segment.text, router) {
            if suggestion.kind == ActionKind::ReviewItems {
                self.last_review_at = Some(now);
            }
            self.telemetry.record(TelemetryEvent::SuggestionOffered {
                kind: suggestion.kind,
            });
            let request =
                ActionRequest::new(suggestion.kind, suggestion.params.clone(), true);
            return vec![
                TurnOutput::Speak(spoken_offer(&suggestion)),
                TurnOutput::Action(request),
            ];
        }

        // Plain conversation: the language model supplies the words.
        let context = ConversationContext {
            session_id: self.session_id,
            utterance: segment.text.clone(),
            mode: self.mode.current,
            active_goal: self.threads.active_goal_summary(&mut self.registry, now),
            open_goals: recent.len(),
        };
        vec![TurnOutput::Converse(context)]
    }

    fn menu_turn(&mut self, segment: &TranscriptSegment, now: Timestamp) -> Vec<TurnOutput> {
        let stated = self
            .threads
            .active_goal_summary(&mut self.registry, now)
            .unwrap_or_default();
        let decision = menu::decide(&segment.text, &stated);
        let kind = MenuDecisionKind::from(&decision);
        self.telemetry.record(TelemetryEvent::MenuDecision { kind });
        debug!(session = %self.session_id, ?kind, "menu decision");

        match decision {
            MenuDecision::Wait { .. } => vec![TurnOutput::Telephony(TelephonyCommand::Wait)],
            MenuDecision::HumanDetected { .. } => {
                // Digits at a human would be wrong; fall back to talking.
                self.phase = CallPhase::Conversation;
                let context = ConversationContext {
                    session_id: self.session_id,
                    utterance: segment.text.clone(),
                    mode: self.mode.current,
                    active_goal: self.threads.active_goal_summary(&mut self.registry, now),
                    open_goals: 0,
                };
                vec![TurnOutput::Converse(context)]
            }
            MenuDecision::Dtmf { digits, .. } => {
                vec![TurnOutput::Telephony(TelephonyCommand::PressDigits(digits))]
            }
            MenuDecision::Say { phrase, .. } => {
                vec![TurnOutput::Telephony(TelephonyCommand::SpeakPhrase(phrase))]
            }
        }
    }
}

/// Short spoken confirmation question for a proposed action. The suggestion
/// itself never executes without the caller saying yes.
fn spoken_offer(suggestion: &Suggestion) -> String {
    match suggestion.kind {
        ActionKind::CaptureNote => "Want me to save a note about that?".to_string(),
        ActionKind::ReviewItems => {
            "Sounds like a lot. Want me to run through your open items?".to_string()
        }
        ActionKind::CreateTask => "Should I add that task again?".to_string(),
        ActionKind::LookupItem => "Want me to look that up?".to_string(),
    }
}
