use switchboard::config::StressDecay;
use switchboard::kernel::mode::{Classifier, Mode, ModeState, RuleClassifier};
use switchboard::kernel::time::Timestamp;

fn at(ms: u64) -> Timestamp {
    Timestamp(ms)
}

fn state(mode: Mode, confidence: f32, reasons: &[&str]) -> ModeState {
    ModeState {
        current: mode,
        confidence,
        reasons: reasons.iter().map(|r| r.to_string()).collect(),
        last_updated: at(0),
    }
}

#[test]
fn urgency_keywords_always_win() {
    let classifier = RuleClassifier::new(StressDecay::Sticky);
    let priors = [
        state(Mode::Calm, 1.0, &[]),
        state(Mode::Focused, 0.8, &["matched \"focus\""]),
        state(Mode::Stressed, 0.9, &["matched \"overwhelmed\""]),
    ];
    let utterances = [
        "this is urgent",
        "I need this done immediately",
        "can we do it asap",
        "do it right now",
        "hurry, they close at five",
    ];

    for prior in &priors {
        for utterance in &utterances {
            let next = classifier.classify(prior, utterance, at(10));
            assert_eq!(next.current, Mode::Urgent, "utterance: {}", utterance);
            assert!(next.confidence >= 0.9, "urgency confidence must be high");
            assert!(!next.reasons.is_empty(), "non-Calm mode must carry reasons");
        }
    }
}

#[test]
fn urgent_decays_one_step_to_focused() {
    let classifier = RuleClassifier::new(StressDecay::Sticky);
    let prior = state(Mode::Urgent, 0.95, &["matched \"asap\""]);

    let next = classifier.classify(&prior, "the weather is nice", at(10));
    assert_eq!(next.current, Mode::Focused, "Urgent must step down, not snap to Calm");
    assert!(!next.reasons.is_empty());
}

#[test]
fn stressed_is_sticky_without_contrary_evidence() {
    let classifier = RuleClassifier::new(StressDecay::Sticky);
    let prior = state(Mode::Stressed, 0.9, &["matched \"overwhelmed\""]);

    let next = classifier.classify(&prior, "the weather is nice", at(10));
    assert_eq!(next.current, Mode::Stressed, "stress does not resolve on one neutral sentence");
    assert_eq!(next.reasons, prior.reasons);
}

#[test]
fn stressed_steps_down_when_configured() {
    let classifier = RuleClassifier::new(StressDecay::StepDown);
    let prior = state(Mode::Stressed, 0.9, &["matched \"overwhelmed\""]);

    let next = classifier.classify(&prior, "the weather is nice", at(10));
    assert_eq!(next.current, Mode::Focused);
}

#[test]
fn stress_lifts_on_contrary_evidence() {
    let classifier = RuleClassifier::new(StressDecay::Sticky);
    let prior = state(Mode::Stressed, 0.9, &["matched \"too much\""]);

    // A focus keyword is explicit contrary evidence even under Sticky.
    let next = classifier.classify(&prior, "okay let's go, one thing at a time", at(10));
    assert_eq!(next.current, Mode::Focused);
}

#[test]
fn focused_relaxes_to_calm() {
    let classifier = RuleClassifier::new(StressDecay::Sticky);
    let prior = state(Mode::Focused, 0.8, &["matched \"quickly\""]);

    let next = classifier.classify(&prior, "the weather is nice", at(10));
    assert_eq!(next.current, Mode::Calm);
}

#[test]
fn priority_order_prefers_urgency_over_stress() {
    let classifier = RuleClassifier::new(StressDecay::Sticky);
    let prior = state(Mode::Calm, 1.0, &[]);

    let next = classifier.classify(&prior, "I'm overwhelmed, handle it immediately", at(10));
    assert_eq!(next.current, Mode::Urgent, "first family in priority order wins");
    assert!((next.confidence - 0.95).abs() < f32::EPSILON, "winning family's confidence only");
}

#[test]
fn blank_text_is_a_noop() {
    let classifier = RuleClassifier::new(StressDecay::Sticky);
    let prior = state(Mode::Stressed, 0.9, &["matched \"overwhelmed\""]);

    let next = classifier.classify(&prior, "   ", at(99));
    assert_eq!(next, prior, "empty text must leave the state untouched");
}

#[test]
fn stress_keywords_set_reasons() {
    let classifier = RuleClassifier::new(StressDecay::Sticky);
    let prior = state(Mode::Calm, 1.0, &[]);

    let next = classifier.classify(&prior, "it's all too much, I'm behind schedule", at(10));
    assert_eq!(next.current, Mode::Stressed);
    assert!(next.reasons.len() >= 2, "every matched marker is recorded");
}
