//! Confirmation messages.
//!
//! Turns a [`ParseResult`] into the sentence Quibly answers with in the chat.
//! Dates are written the Indonesian way ("Senin, 19 Oktober 2026 pukul 16.00")
//! from fixed name tables, so output does not depend on the host locale.

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::types::{Intent, ParseResult};

/// Trailing glyph for reminder confirmations.
pub const REMINDER_MARK: &str = "⏰";
/// Trailing glyph for todo confirmations.
pub const TODO_MARK: &str = "✅";
/// Trailing glyph for note confirmations.
pub const NOTE_MARK: &str = "📝";

const DAY_NAMES: [&str; 7] = [
    "Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu", "Minggu",
];

const MONTH_NAMES: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// "Senin, 19 Oktober 2026"
#[must_use]
pub fn format_date(dt: NaiveDateTime) -> String {
    let day_name = DAY_NAMES[dt.weekday().num_days_from_monday() as usize];
    let month_name = MONTH_NAMES[dt.month0() as usize];
    format!("{}, {} {} {}", day_name, dt.day(), month_name, dt.year())
}

/// "Senin, 19 Oktober 2026 pukul 16.00"
#[must_use]
pub fn format_date_time(dt: NaiveDateTime) -> String {
    format!(
        "{} pukul {:02}.{:02}",
        format_date(dt),
        dt.hour(),
        dt.minute()
    )
}

/// Build the confirmation sentence for a parsed message.
///
/// # Examples
///
/// ```
/// use quibly_core::respond::describe;
/// use quibly_core::{Intent, ParseResult};
///
/// let note = ParseResult {
///     intent: Intent::Note,
///     clean_content: "Nomor loker 42".to_string(),
///     original_message: "nomor loker 42".to_string(),
/// };
/// assert_eq!(describe(&note), "Catatan \"Nomor loker 42\" telah disimpan 📝");
/// ```
#[must_use]
pub fn describe(result: &ParseResult) -> String {
    let content = &result.clean_content;
    match result.intent {
        Intent::Reminder {
            parsed_time: Some(at),
        } => format!(
            "Baik, saya akan mengingatkan Anda untuk {} pada {} {}",
            content.to_lowercase(),
            format_date_time(at),
            REMINDER_MARK
        ),
        Intent::Reminder { parsed_time: None } => format!(
            "Baik, saya akan mengingatkan Anda untuk {} {}",
            content.to_lowercase(),
            REMINDER_MARK
        ),
        Intent::Todo {
            due_date: Some(due),
        } => format!(
            "Tugas \"{}\" telah ditambahkan dengan tenggat {} {}",
            content,
            format_date(due),
            TODO_MARK
        ),
        Intent::Todo { due_date: None } => format!(
            "Tugas \"{}\" telah ditambahkan ke daftar To-Do Anda {}",
            content, TODO_MARK
        ),
        Intent::Note => format!("Catatan \"{}\" telah disimpan {}", content, NOTE_MARK),
    }
}
