//! Intent classification.
//!
//! Two tiers of trigger rules: reminder triggers are checked first, then todo
//! triggers. The first matching rule decides the category. Anything that
//! matches neither tier is a note.

use std::sync::OnceLock;

use crate::rules::{first_match, Rule};
use crate::types::{Classification, IntentKind};

struct IntentRules {
    reminder: Vec<Rule>,
    todo: Vec<Rule>,
}

fn rules() -> &'static IntentRules {
    static RULES: OnceLock<IntentRules> = OnceLock::new();
    RULES.get_or_init(|| IntentRules {
        reminder: vec![
            Rule::new("ingatkan", r"\bingatkan"),
            Rule::new("reminder", r"\breminder\b"),
            Rule::new("remind", r"\breminds?\b"),
        ],
        todo: vec![
            // "aku mau ...", "saya harus ..."
            Rule::new(
                "intention",
                r"\b(?:aku|saya|gue|gw)\s+(?:mau|ingin|akan|harus|perlu)\b",
            ),
            Rule::new("obligation", r"\b(?:harus|perlu|wajib)\b"),
            Rule::new("todo", r"\bto[\s-]?do\b"),
            Rule::new("tugas", r"\btugas\b"),
            Rule::new("task", r"\btasks?\b"),
            Rule::new("deadline", r"\bdeadline\b"),
        ],
    })
}

/// Classify a message as reminder, todo or note.
///
/// Matching is case-insensitive; the caller is expected to have trimmed the
/// message already.
///
/// # Examples
///
/// ```
/// use quibly_core::classify::classify;
/// use quibly_core::IntentKind;
///
/// assert_eq!(classify("Ingatkan aku minum obat").kind, IntentKind::Reminder);
/// assert_eq!(classify("Aku harus cuci motor").kind, IntentKind::Todo);
/// assert_eq!(classify("Password wifi kantor: kopi123").kind, IntentKind::Note);
/// ```
#[must_use]
pub fn classify(message: &str) -> Classification {
    let lower = message.to_lowercase();
    let rules = rules();

    let tiers = [
        (IntentKind::Reminder, &rules.reminder),
        (IntentKind::Todo, &rules.todo),
    ];
    for (kind, tier) in tiers {
        if let Some(rule) = first_match(tier, &lower) {
            tracing::trace!(kind = %kind, rule = rule.id, "classified");
            return Classification {
                kind,
                matched_rule: Some(rule.id),
            };
        }
    }

    tracing::trace!("no trigger matched, filing as note");
    Classification {
        kind: IntentKind::Note,
        matched_rule: None,
    }
}
