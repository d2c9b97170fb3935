use serde::Deserialize;
use std::time::Duration;

use crate::kernel::intent::types::IntentKind;

/// What happens to a `Stressed` mode when an utterance carries no keyword
/// evidence at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressDecay {
    /// Stress persists until contrary evidence appears.
    Sticky,
    /// Stress lowers one step to Focused, like Urgent does.
    StepDown,
}

/// Which posture classifier backs the Mode Detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    /// Keyword rule tables. A learned model slots in here later without
    /// touching callers, which only see the `Classifier` trait.
    RuleTable,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    /// Suggestions scoring below this are suppressed entirely.
    pub min_confidence: f32,
    /// A stress-relief review is not re-offered within this window.
    pub review_window_secs: u64,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.75,
            review_window_secs: 600,
        }
    }
}

/// Default time-to-live per intent kind, in hours.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TtlConfig {
    pub urgent_hours: u64,
    pub implicit_hours: u64,
    pub aspiration_hours: u64,
    pub explicit_hours: u64,
}

impl Default for TtlConfig {
    fn default() -> Self {
        Self {
            urgent_hours: 6,
            implicit_hours: 24,
            aspiration_hours: 12,
            explicit_hours: 48,
        }
    }
}

impl TtlConfig {
    pub fn ttl(&self, kind: IntentKind) -> Duration {
        let hours = match kind {
            IntentKind::UrgentGoal => self.urgent_hours,
            IntentKind::ImplicitGoal => self.implicit_hours,
            IntentKind::Aspiration => self.aspiration_hours,
            IntentKind::ExplicitGoal => self.explicit_hours,
        };
        Duration::from_secs(hours * 3600)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    pub classifier: ClassifierKind,
    pub stress_decay: StressDecay,
    pub suggestion: SuggestionConfig,
    pub ttl: TtlConfig,
    /// Per-turn computation budget; work that would overrun it is abandoned
    /// rather than delaying the turn.
    pub turn_budget_ms: u64,
    /// Cadence of the background intent-expiry sweep per session.
    pub sweep_interval_secs: u64,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierKind::RuleTable,
            stress_decay: StressDecay::Sticky,
            suggestion: SuggestionConfig::default(),
            ttl: TtlConfig::default(),
            turn_budget_ms: 800,
            sweep_interval_secs: 60,
        }
    }
}

impl KernelConfig {
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let config = serde_json::from_str(raw)?;
        Ok(config)
    }
}
