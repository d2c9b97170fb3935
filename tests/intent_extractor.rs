use switchboard::kernel::event::ActionKind;
use switchboard::kernel::extract::{extract, RouterResult};
use switchboard::kernel::intent::IntentKind;
use switchboard::kernel::mode::{Mode, ModeState};
use switchboard::kernel::time::Timestamp;

fn in_mode(current: Mode) -> ModeState {
    let reasons = if current == Mode::Calm {
        Vec::new()
    } else {
        vec!["matched \"urgent\"".to_string()]
    };
    ModeState {
        current,
        confidence: 0.9,
        reasons,
        last_updated: Timestamp(0),
    }
}

#[test]
fn explicit_ask_routes_and_drafts() {
    let (router, drafts) = extract("Remind me to call the bank.", &in_mode(Mode::Calm));

    assert_eq!(router, RouterResult::Matched(ActionKind::CreateTask));
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].kind, IntentKind::ExplicitGoal);
    assert_eq!(drafts[0].inferred_goal, "call the bank");
}

#[test]
fn urgency_keyword_upgrades_the_goal() {
    let (router, drafts) = extract("I need to call the bank right now", &in_mode(Mode::Calm));

    assert_eq!(router, RouterResult::Matched(ActionKind::CreateTask));
    assert_eq!(drafts[0].kind, IntentKind::UrgentGoal);
    assert!(drafts[0].confidence >= 0.9);
}

#[test]
fn urgent_mode_upgrades_declarative_goals() {
    let (router, drafts) = extract("I have to submit the form", &in_mode(Mode::Urgent));

    assert_eq!(router, RouterResult::Unknown, "no explicit ask, nothing routed");
    assert_eq!(drafts[0].kind, IntentKind::UrgentGoal);
}

#[test]
fn aspiration_markers_outrank_implicit_phrasing() {
    let (router, drafts) = extract("Someday I want to learn Italian", &in_mode(Mode::Calm));

    assert_eq!(router, RouterResult::Unknown);
    assert_eq!(drafts[0].kind, IntentKind::Aspiration);
}

#[test]
fn declarative_goal_is_implicit() {
    let (router, drafts) = extract("I should drink more water", &in_mode(Mode::Calm));

    assert_eq!(router, RouterResult::Unknown);
    assert_eq!(drafts[0].kind, IntentKind::ImplicitGoal);
    assert_eq!(drafts[0].inferred_goal, "drink more water");
}

#[test]
fn small_talk_yields_nothing() {
    let (router, drafts) = extract("nice weather out there", &in_mode(Mode::Calm));
    assert_eq!(router, RouterResult::Unknown);
    assert!(drafts.is_empty());
}

#[test]
fn blank_text_is_a_noop() {
    let (router, drafts) = extract("   ", &in_mode(Mode::Calm));
    assert_eq!(router, RouterResult::Unknown);
    assert!(drafts.is_empty());
}

#[test]
fn bare_remind_me_is_not_an_ask() {
    // No goal clause behind the marker; the Suggestion Engine handles it.
    let (router, drafts) = extract("remind me", &in_mode(Mode::Calm));
    assert_eq!(router, RouterResult::Unknown);
    assert!(drafts.is_empty());
}
