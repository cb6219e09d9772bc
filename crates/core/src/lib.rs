//! Quibly Core
//!
//! Turns a free-form chat message into a reminder, a todo or a note, with
//! a cleaned-up content string and a resolved time where one applies.
//!
//! # Quick Start
//!
//! ```
//! use chrono::NaiveDate;
//! use quibly_core::{IntentKind, Quibly};
//!
//! let quibly = Quibly::new();
//! let now = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap().and_hms_opt(10, 0, 0).unwrap();
//!
//! let result = quibly.parse("Ingatkan aku untuk belajar jam 4 sore besok", now).unwrap();
//! assert_eq!(result.kind(), IntentKind::Reminder);
//! assert_eq!(result.clean_content, "Belajar");
//!
//! println!("{}", quibly.describe(&result));
//! // Baik, saya akan mengingatkan Anda untuk belajar pada Senin, 19 Oktober 2026 pukul 16.00 ⏰
//! ```
//!
//! # Saving and firing reminders
//!
//! ```
//! use chrono::{Duration, NaiveDate};
//! use quibly_core::chat::handle_message;
//! use quibly_core::store::{MemoryStore, Store};
//! use quibly_core::QuiblyConfig;
//!
//! let now = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap().and_hms_opt(10, 0, 0).unwrap();
//! let mut store = MemoryStore::new();
//! let reply = handle_message(&mut store, "ingatkan aku minum obat dalam 30 menit", now, &QuiblyConfig::default()).unwrap();
//! assert!(reply.record_id.is_some());
//! assert_eq!(store.active_reminders().unwrap()[0].parsed_time, now + Duration::minutes(30));
//! ```

pub mod chat;
pub mod classify;
pub mod clock;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod reminder;
pub mod respond;
pub mod rules;
pub mod scheduler;
pub mod store;
pub mod temporal;
pub mod types;

pub use error::{NotifyError, ParseError, StoreError};
pub use pipeline::{parse_message, parse_message_with};
pub use types::*;

use chrono::{Local, NaiveDateTime};

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// This is UTF-8 safe - it counts characters, not bytes.
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// Main entry point - a configured interpreter instance.
#[derive(Debug, Clone, Default)]
pub struct Quibly {
    config: QuiblyConfig,
}

impl Quibly {
    /// Create an interpreter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an interpreter with custom configuration.
    #[must_use]
    pub fn with_config(config: QuiblyConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &QuiblyConfig {
        &self.config
    }

    /// Interpret a message against an explicit `now`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::EmptyMessage`] for blank input.
    pub fn parse(&self, message: &str, now: NaiveDateTime) -> Result<ParseResult, ParseError> {
        parse_message_with(message, now, &self.config)
    }

    /// Interpret a message against the local clock, read once.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::EmptyMessage`] for blank input.
    pub fn parse_now(&self, message: &str) -> Result<ParseResult, ParseError> {
        self.parse(message, Local::now().naive_local())
    }

    /// Confirmation sentence for a parsed message.
    #[must_use]
    pub fn describe(&self, result: &ParseResult) -> String {
        respond::describe(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate_str("belajar", 10), "belajar");
        assert_eq!(truncate_str("kumpulkan laporan", 10), "kumpulk...");
        assert_eq!(truncate_str("ärgerlich!", 6), "ärg...");
    }

    /// Every parse yields a confirmation ending in the kind's mark.
    #[test]
    fn test_parse_then_describe() {
        let quibly = Quibly::new();
        let now = NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let cases = [
            ("ingatkan aku rapat jam 2 siang", respond::REMINDER_MARK),
            ("aku harus cuci motor", respond::TODO_MARK),
            ("wifi kantor: kopi123", respond::NOTE_MARK),
        ];
        for (msg, mark) in cases {
            let result = quibly.parse(msg, now).unwrap();
            assert!(quibly.describe(&result).ends_with(mark), "{msg}");
        }
    }

    #[test]
    fn test_config_is_used() {
        let quibly = Quibly::with_config(QuiblyConfig {
            reminder_lead_minutes: 5,
        });
        assert_eq!(quibly.config().reminder_lead_minutes, 5);
        let result = quibly.parse_now("ingatkan aku istirahat").unwrap();
        assert!(result.parsed_time().is_some());
    }
}
