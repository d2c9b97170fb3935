use switchboard::kernel::menu::{decide, MenuDecision, OptionKind};

#[test]
fn reservation_intent_presses_one() {
    let decision = decide(
        "For billing, press 2. For reservations, press 1.",
        "make a reservation",
    );
    match decision {
        MenuDecision::Dtmf { digits, options, prompt, .. } => {
            assert_eq!(digits, "1");
            assert_eq!(options.len(), 2, "full option list carried for audit");
            assert!(prompt.contains("For reservations"), "original prompt carried");
        }
        other => panic!("expected Dtmf, got {:?}", other),
    }
}

#[test]
fn conversational_greeting_is_a_human() {
    for intent in ["make a reservation", ""] {
        let decision = decide("Hi, this is Sam, how can I help you today?", intent);
        assert!(
            matches!(decision, MenuDecision::HumanDetected { .. }),
            "greeting wins regardless of intent, got {:?}",
            decision
        );
    }
}

#[test]
fn this_is_name_speaking_is_a_human() {
    let decision = decide("Thank you for holding, this is Maria speaking.", "billing");
    assert!(matches!(decision, MenuDecision::HumanDetected { .. }));
}

#[test]
fn zero_options_means_wait() {
    let decision = decide("Thank you for calling Acme Dental.", "book a cleaning");
    assert!(matches!(decision, MenuDecision::Wait { .. }), "more audio may arrive");
}

#[test]
fn press_n_for_x_phrasing_parses() {
    let decision = decide("Press 3 for store hours and directions.", "store hours");
    match decision {
        MenuDecision::Dtmf { digits, .. } => assert_eq!(digits, "3"),
        other => panic!("expected Dtmf, got {:?}", other),
    }
}

#[test]
fn both_phrasings_in_one_sentence() {
    let decision = decide("for billing press 2 for reservations press 1", "make a reservation");
    match decision {
        MenuDecision::Dtmf { digits, options, .. } => {
            assert_eq!(digits, "1");
            assert_eq!(options.len(), 2);
        }
        other => panic!("expected Dtmf, got {:?}", other),
    }
}

#[test]
fn quoted_say_phrasing_parses() {
    let decision = decide("To book a table, say 'reservations'.", "make a reservation");
    match decision {
        MenuDecision::Say { phrase, options, .. } => {
            assert_eq!(phrase, "reservations");
            assert_eq!(options[0].kind, OptionKind::Say);
        }
        other => panic!("expected Say, got {:?}", other),
    }
}

#[test]
fn no_overlap_escalates_to_a_human_queue() {
    let decision = decide(
        "For billing, press 2. For a representative, press 0.",
        "cancel my gym membership",
    );
    match decision {
        MenuDecision::Dtmf { digits, reason, .. } => {
            assert_eq!(digits, "0", "escalation beats blind silence");
            assert!(reason.contains("escalating"));
        }
        other => panic!("expected Dtmf, got {:?}", other),
    }
}

#[test]
fn no_overlap_and_no_escalation_waits() {
    let decision = decide("For billing, press 2.", "book a flight");
    assert!(matches!(decision, MenuDecision::Wait { .. }));
}

#[test]
fn duplicate_options_are_deduplicated() {
    let decision = decide(
        "For billing, press 2. For billing, press 2.",
        "billing question",
    );
    match decision {
        MenuDecision::Dtmf { options, .. } => assert_eq!(options.len(), 1),
        other => panic!("expected Dtmf, got {:?}", other),
    }
}

#[test]
fn decisions_are_deterministic() {
    let prompt = "For billing, press 2. For reservations, press 1. To book, say 'reservations'.";
    let first = decide(prompt, "make a reservation");
    let second = decide(prompt, "make a reservation");
    assert_eq!(first, second, "same prompt and intent must always agree");
}

#[test]
fn plural_labels_match_singular_intents() {
    let decision = decide("For reservations, press 1.", "reservation");
    match decision {
        MenuDecision::Dtmf { digits, .. } => assert_eq!(digits, "1"),
        other => panic!("expected Dtmf, got {:?}", other),
    }
}
