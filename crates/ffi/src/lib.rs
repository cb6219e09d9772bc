//! UniFFI bindings for Quibly.
//!
//! This crate exposes the message pipeline and the reminder helpers to the
//! Kotlin and Swift apps. The apps own storage and notifications; they call
//! in here to interpret a message and to decide whether a reminder fires.

mod types;

pub use types::*;

use quibly_core::{reminder, Quibly, QuiblyConfig};

uniffi::setup_scaffolding!();

// =============================================================================
// Exported Functions
// =============================================================================

/// Get the library version string.
#[uniffi::export]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Interpret one chat message at local time `now_iso`.
///
/// Reminders without a time fire one hour after `now_iso`.
#[uniffi::export]
pub fn parse_message(input: String, now_iso: String) -> Result<FfiParseResult, FfiError> {
    let now = parse_iso(&now_iso)?;
    Ok(Quibly::new().parse(&input, now)?.into())
}

/// Like [`parse_message`], with a custom lead time for reminders that name
/// no time.
#[uniffi::export]
pub fn parse_message_with_lead(
    input: String,
    now_iso: String,
    lead_minutes: i64,
) -> Result<FfiParseResult, FfiError> {
    let now = parse_iso(&now_iso)?;
    let quibly = Quibly::with_config(QuiblyConfig {
        reminder_lead_minutes: lead_minutes,
    });
    Ok(quibly.parse(&input, now)?.into())
}

/// Whether a reminder at `time_iso` should fire when checked at `now_iso`.
#[uniffi::export]
pub fn is_reminder_due(time_iso: String, now_iso: String) -> Result<bool, FfiError> {
    Ok(reminder::is_due(parse_iso(&time_iso)?, parse_iso(&now_iso)?))
}

/// Chat text posted when a reminder fires. `seed` is usually the reminder id.
#[uniffi::export]
pub fn nudge_message(content: String, seed: String) -> String {
    reminder::nudge_message(&content, &seed)
}

/// Title for reminder notifications.
#[uniffi::export]
pub fn notification_title() -> String {
    reminder::NOTIFICATION_TITLE.to_string()
}

/// Body for the notification of a reminder.
#[uniffi::export]
pub fn notification_body(content: String) -> String {
    reminder::notification_body(&content)
}
