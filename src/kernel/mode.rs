use serde::{Deserialize, Serialize};

use crate::config::{ClassifierKind, KernelConfig, StressDecay};
use crate::kernel::time::Timestamp;

/// The caller's inferred emotional/urgency posture for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Calm,
    Focused,
    Stressed,
    Urgent,
}

/// Exactly one mode is current per call. Every detection pass fully replaces
/// the state rather than merging into it.
///
/// Invariants: `confidence` in [0, 1]; `reasons` non-empty whenever
/// `current != Calm`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeState {
    pub current: Mode,
    pub confidence: f32,
    pub reasons: Vec<String>,
    pub last_updated: Timestamp,
}

impl ModeState {
    pub fn initial(now: Timestamp) -> Self {
        Self {
            current: Mode::Calm,
            confidence: 1.0,
            reasons: Vec::new(),
            last_updated: now,
        }
    }
}

/// Maps free text to a posture with a confidence score.
///
/// The rule-table implementation below is selected by configuration; callers
/// hold a `Box<dyn Classifier>` so a learned model can replace it.
pub trait Classifier: Send + Sync {
    fn classify(&self, previous: &ModeState, text: &str, now: Timestamp) -> ModeState;
}

pub fn build_classifier(config: &KernelConfig) -> Box<dyn Classifier> {
    match config.classifier {
        ClassifierKind::RuleTable => Box::new(RuleClassifier::new(config.stress_decay)),
    }
}

// Disjoint keyword families, evaluated in priority order. First family with
// any match wins; its fixed confidence is used. The urgency table is shared
// with the intent extractor, which upgrades goals spoken under urgency.
pub(crate) const URGENCY_MARKERS: &[&str] =
    &["urgent", "immediately", "asap", "right now", "hurry"];
const STRESS_MARKERS: &[&str] = &[
    "overwhelmed",
    "too much",
    "can't handle",
    "cant handle",
    "behind schedule",
    // Profanity as a distress marker, not a content judgment.
    "damn",
    "dammit",
    "shit",
    "screwed",
];
const FOCUS_MARKERS: &[&str] = &["focus", "let's go", "lets go", "quickly"];

const URGENT_CONFIDENCE: f32 = 0.95;
const STRESS_CONFIDENCE: f32 = 0.9;
const FOCUS_CONFIDENCE: f32 = 0.8;

pub struct RuleClassifier {
    stress_decay: StressDecay,
}

impl RuleClassifier {
    pub fn new(stress_decay: StressDecay) -> Self {
        Self { stress_decay }
    }
}

impl Classifier for RuleClassifier {
    /// Pure pass over one utterance. Empty or blank text is a no-op: the
    /// previous state is returned untouched.
    fn classify(&self, previous: &ModeState, text: &str, now: Timestamp) -> ModeState {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return previous.clone();
        }
        let lower = trimmed.to_lowercase();

        let families: [(Mode, &[&str], f32); 3] = [
            (Mode::Urgent, URGENCY_MARKERS, URGENT_CONFIDENCE),
            (Mode::Stressed, STRESS_MARKERS, STRESS_CONFIDENCE),
            (Mode::Focused, FOCUS_MARKERS, FOCUS_CONFIDENCE),
        ];

        for (mode, markers, confidence) in families {
            let matched: Vec<String> = markers
                .iter()
                .filter(|m| lower.contains(*m))
                .map(|m| format!("matched \"{}\"", m))
                .collect();
            if !matched.is_empty() {
                return ModeState {
                    current: mode,
                    confidence,
                    reasons: matched,
                    last_updated: now,
                };
            }
        }

        // No keyword evidence. A non-Calm mode does not snap back to Calm:
        // Urgent steps down to Focused, Stressed follows the configured
        // decay policy, Focused steps down to Calm.
        match previous.current {
            Mode::Calm => ModeState::initial(now),
            Mode::Focused => ModeState::initial(now),
            Mode::Urgent => ModeState {
                current: Mode::Focused,
                confidence: FOCUS_CONFIDENCE,
                reasons: vec!["urgency cooling off".to_string()],
                last_updated: now,
            },
            Mode::Stressed => match self.stress_decay {
                StressDecay::Sticky => ModeState {
                    current: Mode::Stressed,
                    confidence: previous.confidence,
                    reasons: previous.reasons.clone(),
                    last_updated: now,
                },
                StressDecay::StepDown => ModeState {
                    current: Mode::Focused,
                    confidence: FOCUS_CONFIDENCE,
                    reasons: vec!["stress easing".to_string()],
                    last_updated: now,
                },
            },
        }
    }
}
