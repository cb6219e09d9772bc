//! Message interpretation.
//!
//! Ties the classifier, the temporal resolvers and the normalizer together:
//! one raw message in, one [`ParseResult`] out.

use chrono::NaiveDateTime;

use crate::classify::classify;
use crate::error::ParseError;
use crate::normalize::clean;
use crate::temporal::{parse_due_date, parse_time_of_day};
use crate::types::{Intent, IntentKind, ParseResult, QuiblyConfig};

/// Interpret a message with the default configuration.
///
/// `now` is the caller's local wall-clock time, captured once; every time
/// expression in the message is resolved against it.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use quibly_core::pipeline::parse_message;
/// use quibly_core::IntentKind;
///
/// let now = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap().and_hms_opt(10, 0, 0).unwrap();
/// let result = parse_message("Ingatkan aku untuk belajar jam 4 sore besok", now).unwrap();
/// assert_eq!(result.kind(), IntentKind::Reminder);
/// assert_eq!(result.clean_content, "Belajar");
/// assert_eq!(result.parsed_time().unwrap().to_string(), "2026-10-19 16:00:00");
/// ```
///
/// # Errors
///
/// Returns [`ParseError::EmptyMessage`] if `raw` has no visible characters.
pub fn parse_message(raw: &str, now: NaiveDateTime) -> Result<ParseResult, ParseError> {
    parse_message_with(raw, now, &QuiblyConfig::default())
}

/// Interpret a message using `config` for defaults.
///
/// A reminder without a usable time expression fires
/// `config.reminder_lead()` after `now`. Todos never get an imputed deadline.
///
/// # Errors
///
/// Returns [`ParseError::EmptyMessage`] if `raw` has no visible characters.
pub fn parse_message_with(
    raw: &str,
    now: NaiveDateTime,
    config: &QuiblyConfig,
) -> Result<ParseResult, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyMessage);
    }

    let classification = classify(trimmed);
    let intent = match classification.kind {
        IntentKind::Reminder => {
            let parsed_time = parse_time_of_day(trimmed, now)
                .map(|resolved| resolved.at)
                .or_else(|| {
                    tracing::debug!("no time expression, using default lead time");
                    now.checked_add_signed(config.reminder_lead())
                });
            Intent::Reminder { parsed_time }
        }
        IntentKind::Todo => Intent::Todo {
            due_date: parse_due_date(trimmed, now).map(|resolved| resolved.at),
        },
        IntentKind::Note => Intent::Note,
    };

    let result = ParseResult {
        intent,
        clean_content: clean(trimmed, classification.kind),
        original_message: raw.to_string(),
    };
    tracing::debug!(
        kind = %result.kind(),
        rule = classification.matched_rule.unwrap_or("-"),
        content = %result.clean_content,
        "parsed message"
    );
    Ok(result)
}
