//! One chat turn: interpret, persist, answer.

use chrono::NaiveDateTime;

use crate::error::StoreError;
use crate::pipeline::parse_message_with;
use crate::respond::describe;
use crate::store::{MessageRole, Store};
use crate::types::{Intent, ParseResult, QuiblyConfig};

/// Answer sent when the message could not be saved.
pub const FALLBACK_REPLY: &str = "Maaf, terjadi kesalahan. Silakan coba lagi.";

/// What Quibly answers to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Interpretation of the message, unaffected by store failures.
    pub result: ParseResult,
    /// Text shown to the user.
    pub text: String,
    /// Id of the saved reminder, todo or note; `None` if saving failed.
    pub record_id: Option<String>,
}

/// Handle one message typed by the user.
///
/// Logs the message, saves the interpreted item and logs the confirmation.
/// If the store fails the reply becomes [`FALLBACK_REPLY`] and the failure is
/// logged. Blank input is ignored and returns `None`.
pub fn handle_message(
    store: &mut dyn Store,
    raw: &str,
    now: NaiveDateTime,
    config: &QuiblyConfig,
) -> Option<Reply> {
    let result = parse_message_with(raw, now, config).ok()?;

    let (text, record_id) = match save(store, raw.trim(), &result) {
        Ok(id) => (describe(&result), Some(id)),
        Err(e) => {
            tracing::warn!(error = %e, kind = %result.kind(), "failed to save message");
            (FALLBACK_REPLY.to_string(), None)
        }
    };

    if let Err(e) = store.add_message(&text, MessageRole::Answer) {
        tracing::warn!(error = %e, "failed to log answer");
    }

    Some(Reply {
        result,
        text,
        record_id,
    })
}

fn save(store: &mut dyn Store, message: &str, result: &ParseResult) -> Result<String, StoreError> {
    store.add_message(message, MessageRole::Sender)?;
    let content = &result.clean_content;
    match result.intent {
        Intent::Reminder { parsed_time } => {
            let time = parsed_time.ok_or_else(|| {
                StoreError::Unavailable("reminder has no time to schedule".to_string())
            })?;
            store.add_reminder(content, time)
        }
        Intent::Todo { due_date } => store.add_todo(content, due_date),
        Intent::Note => store.add_note(content),
    }
}
