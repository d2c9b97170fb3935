use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// How a menu option is exercised: a DTMF keypress or a spoken phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionKind {
    Dtmf,
    Say,
}

/// One option extracted from a recognized menu prompt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MenuOption {
    pub kind: OptionKind,
    pub value: String,
    pub label: String,
}

/// The engine's verdict for one prompt. Dtmf and Say carry the full parsed
/// option list and the original prompt: a keypress is irreversible, so the
/// choice must be explainable after the fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MenuDecision {
    Wait {
        reason: String,
    },
    HumanDetected {
        reason: String,
    },
    Dtmf {
        digits: String,
        reason: String,
        options: Vec<MenuOption>,
        prompt: String,
    },
    Say {
        phrase: String,
        reason: String,
        options: Vec<MenuOption>,
        prompt: String,
    },
}

const GREETING_PATTERNS: &[&str] = &[
    "how can i help you",
    "how may i help you",
    "what can i do for you",
];

const ESCALATION_VOCAB: &[&str] = &[
    "agent",
    "representative",
    "operator",
    "customer service",
    "front desk",
];

/// Stateless, deterministic: same prompt and same intent summary always
/// produce the same decision, whatever the scoring function becomes later.
pub fn decide(prompt: &str, stated_intent: &str) -> MenuDecision {
    let lower = prompt.to_lowercase();

    // A conversational greeting means a human answered. Pressing digits at
    // a human would be wrong, so menu parsing is skipped entirely.
    if sounds_human(&lower) {
        return MenuDecision::HumanDetected {
            reason: "conversational greeting in prompt".to_string(),
        };
    }

    let options = parse_options(&lower);
    if options.is_empty() {
        // More prompt audio may still arrive; keep listening.
        return MenuDecision::Wait {
            reason: "no parsable options yet".to_string(),
        };
    }

    // Highest word-overlap with the stated intent wins; ties keep the first
    // parsed option.
    let mut best: Option<(&MenuOption, usize)> = None;
    for option in &options {
        let score = overlap(stated_intent, &option.label);
        if score > best.map(|(_, s)| s).unwrap_or(0) {
            best = Some((option, score));
        }
    }

    if let Some((option, score)) = best {
        let reason = format!(
            "label \"{}\" overlaps stated intent (score {})",
            option.label, score
        );
        return select(option, reason, &options, prompt);
    }

    // Zero lexical overlap anywhere: fall back to any option that reaches
    // a human queue.
    for option in &options {
        if ESCALATION_VOCAB.iter().any(|v| option.label.contains(v)) {
            let reason = format!("no overlap; escalating via \"{}\"", option.label);
            return select(option, reason, &options, prompt);
        }
    }

    MenuDecision::Wait {
        reason: "no option matches the stated intent".to_string(),
    }
}

fn select(
    option: &MenuOption,
    reason: String,
    options: &[MenuOption],
    prompt: &str,
) -> MenuDecision {
    match option.kind {
        OptionKind::Dtmf => MenuDecision::Dtmf {
            digits: option.value.clone(),
            reason,
            options: options.to_vec(),
            prompt: prompt.to_string(),
        },
        OptionKind::Say => MenuDecision::Say {
            phrase: option.value.clone(),
            reason,
            options: options.to_vec(),
            prompt: prompt.to_string(),
        },
    }
}

fn sounds_human(lower: &str) -> bool {
    if GREETING_PATTERNS.iter().any(|p| lower.contains(p)) {
        return true;
    }
    // "this is <name> speaking" and close variants.
    lower.contains("this is") && lower.contains("speaking")
}

/// Scan for the two canonical DTMF phrasings — "press N for X" and
/// "for X, press N" — plus quoted "say 'X'" options, deduplicated.
fn parse_options(lower: &str) -> Vec<MenuOption> {
    let mut options: Vec<MenuOption> = Vec::new();
    let mut seen: HashSet<MenuOption> = HashSet::new();

    for sentence in lower.split(['.', '?', '!', ';']) {
        for option in parse_dtmf(sentence) {
            if seen.insert(option.clone()) {
                options.push(option);
            }
        }
    }
    for option in parse_say(lower) {
        if seen.insert(option.clone()) {
            options.push(option);
        }
    }

    options
}

fn parse_dtmf(sentence: &str) -> Vec<MenuOption> {
    let cleaned = sentence.replace(',', " ");
    let words: Vec<&str> = cleaned.split_whitespace().collect();
    let mut found = Vec::new();

    // Cursor past the last consumed word, so a previous option's label is
    // never mistaken for a leading "for X" clause.
    let mut consumed = 0;
    let mut i = 0;
    while i < words.len() {
        if words[i] != "press" || i + 1 >= words.len() || !is_digits(words[i + 1]) {
            i += 1;
            continue;
        }
        let digits = words[i + 1].to_string();

        // "for X, press N": a "for" clause directly precedes this press.
        let leading_for = words[consumed..i].iter().position(|w| *w == "for");
        if let Some(rel) = leading_for {
            let at = consumed + rel;
            if at + 1 < i {
                let label = words[at + 1..i].join(" ");
                found.push(MenuOption {
                    kind: OptionKind::Dtmf,
                    value: digits,
                    label,
                });
                consumed = i + 2;
                i += 2;
                continue;
            }
        }

        // "press N for X": label runs to the next "press" or sentence end.
        if words.get(i + 2) == Some(&"for") {
            let end = words[i + 3..]
                .iter()
                .position(|w| *w == "press")
                .map(|p| i + 3 + p)
                .unwrap_or(words.len());
            let mut label_words = &words[i + 3..end];
            // A trailing connective belongs to the next option.
            while let Some((last, rest)) = label_words.split_last() {
                if matches!(*last, "or" | "and" | "to") {
                    label_words = rest;
                } else {
                    break;
                }
            }
            if !label_words.is_empty() {
                found.push(MenuOption {
                    kind: OptionKind::Dtmf,
                    value: digits,
                    label: label_words.join(" "),
                });
            }
            consumed = end;
            i = end;
            continue;
        }

        consumed = i + 2;
        i += 2;
    }

    found
}

/// Quoted phrases after the word "say": `say 'reservations'` or
/// `say "agent"`.
fn parse_say(lower: &str) -> Vec<MenuOption> {
    let mut found = Vec::new();
    let mut rest = lower;
    while let Some(at) = rest.find("say") {
        // Word boundary on both sides, so "essay" never matches.
        let standalone = rest[..at].chars().next_back().map_or(true, |c| !c.is_alphanumeric())
            && rest[at + 3..].chars().next().map_or(false, |c| c.is_whitespace());
        if standalone {
            let after = rest[at + 3..].trim_start();
            if let Some(q @ ('\'' | '"')) = after.chars().next() {
                if let Some(end) = after[1..].find(q) {
                    let phrase = after[1..1 + end].trim().to_string();
                    if !phrase.is_empty() {
                        found.push(MenuOption {
                            kind: OptionKind::Say,
                            value: phrase.clone(),
                            label: phrase,
                        });
                    }
                }
            }
        }
        rest = &rest[at + 3..];
    }
    found
}

fn is_digits(word: &str) -> bool {
    !word.is_empty() && word.len() <= 4 && word.chars().all(|c| c.is_ascii_digit())
}

/// Count of shared words longer than two characters, plural-insensitive:
/// "reservation" matches "reservations".
fn overlap(stated_intent: &str, label: &str) -> usize {
    let intent_words: HashSet<String> = significant_words(stated_intent);
    significant_words(label)
        .iter()
        .filter(|w| intent_words.contains(*w))
        .count()
}

fn significant_words(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 2)
        .map(stem)
        .collect()
}

fn stem(word: &str) -> String {
    if word.len() > 3 {
        word.strip_suffix('s').unwrap_or(word).to_string()
    } else {
        word.to_string()
    }
}
