//! Content cleanup.
//!
//! Removes the instruction and time phrasing from a message so what is left
//! reads like the item itself: "Ingatkan aku untuk belajar jam 4 sore besok"
//! becomes "Belajar".

use std::sync::OnceLock;

use regex::Regex;

use crate::types::IntentKind;

struct StripPatterns {
    reminder_instruction: Regex,
    relative_offset: Regex,
    reminder_day_tokens: Regex,
    clock_time: Vec<Regex>,
    todo_label: Regex,
    todo_intention: Regex,
    trailing_deadline: Regex,
    trailing_day_token: Regex,
    whitespace: Regex,
}

fn patterns() -> &'static StripPatterns {
    static PATTERNS: OnceLock<StripPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| StripPatterns {
        // "ingatkan aku untuk", "reminder:", "ingatkanku", "remind me to"
        reminder_instruction: Regex::new(
            r"(?i)^(?:(?:ingatkan|reminder|ingat)(?:ku)?(?:\s+(?:saya|aku|ku))?(?:\s+untuk)?|remind(?:\s+me)?(?:\s+to)?)\b[\s:,]*",
        )
        .unwrap(),
        relative_offset: Regex::new(r"(?i)\bdalam\s+\d+\s*(?:menit|jam)\b").unwrap(),
        reminder_day_tokens: Regex::new(r"(?i)\b(?:besok|hari\s+ini|lusa|minggu\s+depan)\b")
            .unwrap(),
        clock_time: vec![
            Regex::new(
                r"(?i)\b(?:jam|pukul)\s*\d{1,2}(?:[:.]\d{1,2})?(?:\s*(?:pagi|siang|sore|malam))?\b",
            )
            .unwrap(),
            Regex::new(r"(?i)\b\d{1,2}(?::\d{1,2})?\s*(?:am|pm)\b").unwrap(),
            Regex::new(r"(?i)\b\d{1,2}\s*(?:pagi|siang|sore|malam)\b").unwrap(),
        ],
        // "todo:", "to-do", "tugas:" at the start
        todo_label: Regex::new(r"(?i)^(?:to[\s-]?do\b\s*[:\-]?|(?:tugas|task)\s*[:\-])\s*")
            .unwrap(),
        // "aku harus", "saya mau", "perlu"
        todo_intention: Regex::new(
            r"(?i)^(?:(?:aku|saya|gue|gw)\s+)?(?:mau|ingin|akan|harus|perlu|wajib)\s+",
        )
        .unwrap(),
        trailing_deadline: Regex::new(
            r"(?i)[\s,]*\b(?:deadline|batas(?:\s+waktu)?|sampai|hingga|selesai|finish)[\s:]+(?:tanggal\s+|tgl\.?\s*)?\d{1,2}\s*$",
        )
        .unwrap(),
        trailing_day_token: Regex::new(
            r"(?i)[\s,]*\b(?:besok|lusa|hari\s+ini|minggu\s+ini|minggu\s+depan)\s*$",
        )
        .unwrap(),
        whitespace: Regex::new(r"\s+").unwrap(),
    })
}

/// Produce the display content for a message of the given kind.
///
/// Never returns an empty string for a message with visible characters:
/// if stripping removes everything, the trimmed original is returned.
///
/// # Examples
///
/// ```
/// use quibly_core::normalize::clean;
/// use quibly_core::IntentKind;
///
/// assert_eq!(clean("Ingatkan aku untuk belajar jam 4 sore besok", IntentKind::Reminder), "Belajar");
/// assert_eq!(clean("aku harus beli susu besok", IntentKind::Todo), "Beli susu");
/// assert_eq!(clean("  ide: app resep  ", IntentKind::Note), "Ide: app resep");
/// ```
#[must_use]
pub fn clean(message: &str, kind: IntentKind) -> String {
    let trimmed = message.trim();
    let stripped = match kind {
        IntentKind::Reminder => strip_reminder(trimmed),
        IntentKind::Todo => strip_todo(trimmed),
        IntentKind::Note => trimmed.to_string(),
    };

    let cleaned = capitalize_first(stripped.trim());
    if cleaned.is_empty() {
        tracing::debug!(kind = %kind, "cleanup removed everything, keeping original");
        trimmed.to_string()
    } else {
        cleaned
    }
}

fn strip_reminder(text: &str) -> String {
    let p = patterns();
    let mut out = p.reminder_instruction.replace(text, "").into_owned();
    out = p.relative_offset.replace_all(&out, " ").into_owned();
    out = p.reminder_day_tokens.replace_all(&out, " ").into_owned();
    for clock in &p.clock_time {
        out = clock.replace_all(&out, " ").into_owned();
    }
    p.whitespace.replace_all(out.trim(), " ").into_owned()
}

fn strip_todo(text: &str) -> String {
    let p = patterns();
    let mut out = p.todo_label.replace(text, "").into_owned();
    out = p.todo_intention.replace(&out, "").into_owned();
    out = p.trailing_deadline.replace(&out, "").into_owned();
    out = p.trailing_day_token.replace(&out, "").into_owned();
    out.trim().to_string()
}

/// Uppercase the first character, leaving the rest untouched.
fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
