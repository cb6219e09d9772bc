//! FFI-safe types for UniFFI export.
//!
//! Times cross the boundary as ISO-8601 local strings with milliseconds
//! (`2026-10-19T16:00:00.000`) since UniFFI has no naive date-time type.

use chrono::NaiveDateTime;
use quibly_core::{IntentKind, ParseError, ParseResult};

/// Format used for every time handed to the host app.
pub(crate) const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Formats accepted from the host app, most specific first.
const ACCEPTED_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

#[derive(uniffi::Enum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiIntentKind {
    Reminder,
    Todo,
    Note,
}

impl From<IntentKind> for FfiIntentKind {
    fn from(k: IntentKind) -> Self {
        match k {
            IntentKind::Reminder => Self::Reminder,
            IntentKind::Todo => Self::Todo,
            IntentKind::Note => Self::Note,
        }
    }
}

/// One interpreted message.
#[derive(uniffi::Record, Debug, Clone, PartialEq, Eq)]
pub struct FfiParseResult {
    pub kind: FfiIntentKind,
    /// Reminder time, set for reminders only.
    pub parsed_time: Option<String>,
    /// End-of-day deadline, set for todos that named one.
    pub due_date: Option<String>,
    pub clean_content: String,
    pub original_message: String,
    /// Confirmation sentence to show in the chat.
    pub reply: String,
}

impl From<ParseResult> for FfiParseResult {
    fn from(r: ParseResult) -> Self {
        let reply = quibly_core::respond::describe(&r);
        Self {
            kind: r.kind().into(),
            parsed_time: r.parsed_time().map(format_iso),
            due_date: r.due_date().map(format_iso),
            clean_content: r.clean_content,
            original_message: r.original_message,
            reply,
        }
    }
}

#[derive(uniffi::Error, thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FfiError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("invalid time '{value}', expected YYYY-MM-DDTHH:MM[:SS]")]
    InvalidTime { value: String },
}

impl From<ParseError> for FfiError {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::EmptyMessage => Self::EmptyMessage,
        }
    }
}

pub(crate) fn format_iso(dt: NaiveDateTime) -> String {
    dt.format(ISO_FORMAT).to_string()
}

pub(crate) fn parse_iso(value: &str) -> Result<NaiveDateTime, FfiError> {
    ACCEPTED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| FfiError::InvalidTime {
            value: value.to_string(),
        })
}
