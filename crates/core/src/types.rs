//! Core types for Quibly.
//!
//! These types describe what the pipeline produces for one chat message.
//! All times are local wall-clock values; the caller decides which time zone
//! "local" means.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three categories a message can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentKind {
    Reminder,
    Todo,
    /// Fallback for anything that matched no trigger.
    Note,
}

impl IntentKind {
    /// Returns the kind name as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reminder => "reminder",
            Self::Todo => "todo",
            Self::Note => "note",
        }
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the intent classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: IntentKind,
    /// Id of the rule that fired, `None` for the note fallback.
    pub matched_rule: Option<&'static str>,
}

/// A classified intent together with its category-specific time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Intent {
    Reminder {
        /// When the reminder should fire. The pipeline always fills this in.
        parsed_time: Option<NaiveDateTime>,
    },
    Todo {
        /// End-of-day deadline, if the message named one.
        due_date: Option<NaiveDateTime>,
    },
    Note,
}

impl Intent {
    #[must_use]
    pub fn kind(&self) -> IntentKind {
        match self {
            Self::Reminder { .. } => IntentKind::Reminder,
            Self::Todo { .. } => IntentKind::Todo,
            Self::Note => IntentKind::Note,
        }
    }
}

/// Structured interpretation of a single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    #[serde(flatten)]
    pub intent: Intent,
    pub clean_content: String,
    pub original_message: String,
}

impl ParseResult {
    #[must_use]
    pub fn kind(&self) -> IntentKind {
        self.intent.kind()
    }

    /// Reminder time, `None` for todos and notes.
    #[must_use]
    pub fn parsed_time(&self) -> Option<NaiveDateTime> {
        match self.intent {
            Intent::Reminder { parsed_time } => parsed_time,
            _ => None,
        }
    }

    /// Todo deadline, `None` for reminders and notes.
    #[must_use]
    pub fn due_date(&self) -> Option<NaiveDateTime> {
        match self.intent {
            Intent::Todo { due_date } => due_date,
            _ => None,
        }
    }
}

/// How a reminder time was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSource {
    /// `dalam N menit|jam`, added straight onto `now`.
    RelativeOffset,
    /// A clock-time expression matched by the named rule.
    ClockTime {
        rule: &'static str,
        /// Days added by a day token (`besok`, `lusa`, `minggu depan`).
        day_offset: i64,
        /// Set when the time had already passed today and was moved to tomorrow.
        rolled_over: bool,
    },
}

/// Result of clock-time resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTime {
    pub at: NaiveDateTime,
    pub source: TimeSource,
}

/// Pipeline settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuiblyConfig {
    /// How far after `now` a reminder without a time expression fires.
    pub reminder_lead_minutes: i64,
}

impl QuiblyConfig {
    /// Lead time as a duration, falling back to one hour if the configured
    /// value cannot be represented.
    #[must_use]
    pub fn reminder_lead(&self) -> Duration {
        Duration::try_minutes(self.reminder_lead_minutes).unwrap_or_else(|| Duration::hours(1))
    }
}

impl Default for QuiblyConfig {
    fn default() -> Self {
        Self {
            reminder_lead_minutes: 60,
        }
    }
}

/// Result of due-date resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDate {
    /// Always 23:59:59.999 on the due day.
    pub at: NaiveDateTime,
    pub rule: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_result_serializes_flat() {
        let at = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(16, 0, 0)
            .unwrap();
        let result = ParseResult {
            intent: Intent::Reminder {
                parsed_time: Some(at),
            },
            clean_content: "Belajar".to_string(),
            original_message: "ingatkan aku belajar jam 4 sore besok".to_string(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["type"], "reminder");
        assert_eq!(json["parsed_time"], "2026-10-19T16:00:00");
        assert_eq!(json["clean_content"], "Belajar");
    }

    #[test]
    fn test_accessors_follow_variant() {
        let todo = ParseResult {
            intent: Intent::Todo { due_date: None },
            clean_content: "Beli susu".to_string(),
            original_message: "aku harus beli susu".to_string(),
        };
        assert_eq!(todo.kind(), IntentKind::Todo);
        assert_eq!(todo.parsed_time(), None);
        assert_eq!(todo.due_date(), None);
        assert_eq!(IntentKind::Note.to_string(), "note");
    }
}
