use switchboard::config::SuggestionConfig;
use switchboard::kernel::event::ActionKind;
use switchboard::kernel::extract::RouterResult;
use switchboard::kernel::intent::{Intent, IntentId, IntentKind, IntentStatus};
use switchboard::kernel::mode::{Mode, ModeState};
use switchboard::kernel::suggest::{SuggestionContext, SuggestionEngine};
use switchboard::kernel::time::Timestamp;

fn mode(current: Mode) -> ModeState {
    let reasons = if current == Mode::Calm {
        Vec::new()
    } else {
        vec!["matched \"overwhelmed\"".to_string()]
    };
    ModeState {
        current,
        confidence: 0.9,
        reasons,
        last_updated: Timestamp(0),
    }
}

fn capture_intent(goal: &str) -> Intent {
    Intent {
        id: IntentId::new(),
        source_utterance: format!("i need to {}", goal),
        inferred_goal: goal.to_string(),
        kind: IntentKind::ExplicitGoal,
        confidence: 0.85,
        created_at: Timestamp(0),
        expires_at: Timestamp(u64::MAX),
        status: IntentStatus::Active,
        requires_confirmation: true,
    }
}

fn ctx<'a>(mode: &'a ModeState, recent: &'a [Intent]) -> SuggestionContext<'a> {
    SuggestionContext {
        mode,
        recent_intents: recent,
        last_review_at: None,
        now: Timestamp(1_000_000),
    }
}

#[test]
fn silent_when_the_router_already_matched() {
    let engine = SuggestionEngine::new(SuggestionConfig::default());
    let calm = mode(Mode::Calm);
    let suggestion = engine.propose(
        &ctx(&calm, &[]),
        "don't let me forget the milk",
        RouterResult::Matched(ActionKind::CreateTask),
    );
    assert!(suggestion.is_none(), "fallback layer, never a first responder");
}

#[test]
fn forgetting_phrase_proposes_a_note() {
    let engine = SuggestionEngine::new(SuggestionConfig::default());
    let calm = mode(Mode::Calm);
    let suggestion = engine
        .propose(&ctx(&calm, &[]), "don't let me forget the milk", RouterResult::Unknown)
        .expect("forgetting phrase must trigger");

    assert_eq!(suggestion.kind, ActionKind::CaptureNote);
    assert!((suggestion.confidence - 0.85).abs() < f32::EPSILON);
    assert!(suggestion.suggested);
    assert!(suggestion.requires_confirmation);
}

#[test]
fn stressed_caller_gets_a_review_nudge() {
    let engine = SuggestionEngine::new(SuggestionConfig::default());
    let stressed = mode(Mode::Stressed);
    let suggestion = engine
        .propose(&ctx(&stressed, &[]), "everything is piling up", RouterResult::Unknown)
        .expect("stress with no recent review must nudge");

    assert_eq!(suggestion.kind, ActionKind::ReviewItems);
    assert!(suggestion.requires_confirmation);
}

#[test]
fn review_is_not_renagged_within_the_window() {
    let engine = SuggestionEngine::new(SuggestionConfig::default());
    let stressed = mode(Mode::Stressed);
    let mut context = ctx(&stressed, &[]);
    context.last_review_at = Some(Timestamp(950_000)); // 50s ago, window is 600s

    let suggestion = engine.propose(&context, "everything is piling up", RouterResult::Unknown);
    assert!(suggestion.is_none(), "recent offer suppresses the nudge");
}

#[test]
fn review_returns_after_the_window_lapses() {
    let engine = SuggestionEngine::new(SuggestionConfig::default());
    let stressed = mode(Mode::Stressed);
    let mut context = ctx(&stressed, &[]);
    context.last_review_at = Some(Timestamp(0)); // 1000s ago

    let suggestion = engine.propose(&context, "everything is piling up", RouterResult::Unknown);
    assert!(suggestion.is_some());
}

#[test]
fn bare_repetition_cue_reproposes_the_last_capture() {
    let engine = SuggestionEngine::new(SuggestionConfig::default());
    let calm = mode(Mode::Calm);
    let recent = vec![capture_intent("call the bank"), capture_intent("water the plants")];

    let suggestion = engine
        .propose(&ctx(&calm, &recent), "again", RouterResult::Unknown)
        .expect("repetition cue with a prior capture must trigger");

    assert_eq!(suggestion.kind, ActionKind::CreateTask);
    assert_eq!(suggestion.params["goal"], "water the plants", "latest capture wins");
    assert!(suggestion.requires_confirmation);
}

#[test]
fn repetition_cue_without_prior_capture_stays_silent() {
    let engine = SuggestionEngine::new(SuggestionConfig::default());
    let calm = mode(Mode::Calm);

    let suggestion = engine.propose(&ctx(&calm, &[]), "do it again", RouterResult::Unknown);
    assert!(suggestion.is_none());
}

#[test]
fn embedded_again_is_not_a_repetition_cue() {
    let engine = SuggestionEngine::new(SuggestionConfig::default());
    let calm = mode(Mode::Calm);
    let recent = vec![capture_intent("call the bank")];

    let suggestion = engine.propose(
        &ctx(&calm, &recent),
        "we talked about that again and again",
        RouterResult::Unknown,
    );
    assert!(suggestion.is_none(), "only the bare cue triggers");
}

#[test]
fn confidence_floor_suppresses_entirely() {
    let engine = SuggestionEngine::new(SuggestionConfig {
        min_confidence: 0.95,
        ..SuggestionConfig::default()
    });
    let calm = mode(Mode::Calm);

    let suggestion = engine.propose(&ctx(&calm, &[]), "remind me", RouterResult::Unknown);
    assert!(suggestion.is_none(), "below-floor suggestions vanish, no warning");
}
