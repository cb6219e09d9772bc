//! Firing stored reminders.
//!
//! A reminder is due when the check runs close enough to its time: up to
//! 30 seconds early or 90 seconds late. Each due reminder is delivered once
//! through a [`Notifier`], echoed into the chat log as a friendly nudge and
//! then marked completed.

use chrono::{Duration, NaiveDateTime};

use crate::error::{NotifyError, StoreError};
use crate::store::{MessageRole, ReminderRecord, Store};

/// How early a reminder may fire, in seconds.
pub const EARLY_TOLERANCE_SECS: i64 = 30;
/// How late a reminder may still fire, in seconds.
pub const LATE_TOLERANCE_SECS: i64 = 90;

/// Title of every reminder notification.
pub const NOTIFICATION_TITLE: &str = "Quibly Reminder";

const NUDGE_TEMPLATES: &[&str] = &[
    "Hey, jangan lupa untuk {content} 🔔",
    "Halo! Waktunya {content} nih 😊",
    "Ping! {content} sedang menunggu ✨",
    "Psst... {content} nih! 🤫",
    "Yuk, saatnya {content}! 🌟",
    "Halo! Ada yang perlu kamu ingat: {content} 💭",
    "Waktunya {content}! 📝",
];

/// Whether a reminder set for `time` should fire at `now`.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, NaiveDate};
/// use quibly_core::reminder::is_due;
///
/// let time = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap().and_hms_opt(16, 0, 0).unwrap();
/// assert!(is_due(time, time + Duration::seconds(60)));
/// assert!(!is_due(time, time - Duration::minutes(1)));
/// ```
#[must_use]
pub fn is_due(time: NaiveDateTime, now: NaiveDateTime) -> bool {
    let diff = now - time;
    diff >= Duration::seconds(-EARLY_TOLERANCE_SECS) && diff <= Duration::seconds(LATE_TOLERANCE_SECS)
}

/// Friendly chat text for a reminder that just fired.
///
/// The template is picked from `seed` (usually the reminder id), so the same
/// reminder always gets the same wording.
#[must_use]
pub fn nudge_message(content: &str, seed: &str) -> String {
    let sum = seed
        .bytes()
        .fold(0usize, |acc, b| acc.wrapping_add(usize::from(b)));
    let template = NUDGE_TEMPLATES[sum % NUDGE_TEMPLATES.len()];
    template.replace("{content}", content)
}

/// Body of the notification for a reminder.
#[must_use]
pub fn notification_body(content: &str) -> String {
    format!("{content} 🔔")
}

/// Delivers reminder notifications.
///
/// Delivery is fire-and-forget: an `Ok` means the notification was handed
/// off, not that anyone saw it.
pub trait Notifier {
    fn notify(&self, title: &str, body: &str, reminder_id: &str) -> Result<(), NotifyError>;
}

/// Outcome of one [`check_and_process`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Active reminders looked at.
    pub checked: usize,
    /// Reminders inside the due window.
    pub due: usize,
    /// Due reminders delivered and marked completed.
    pub processed: usize,
    /// Due reminders that hit an error and stay active.
    pub failed: usize,
}

#[derive(Debug, thiserror::Error)]
enum ProcessError {
    #[error(transparent)]
    Notify(#[from] NotifyError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Fire every active reminder that is due at `now`.
///
/// A failure on one reminder is logged and does not stop the others.
///
/// # Errors
///
/// Returns an error only if the active reminders cannot be listed.
pub fn check_and_process(
    store: &mut dyn Store,
    notifier: &dyn Notifier,
    now: NaiveDateTime,
) -> Result<CheckReport, StoreError> {
    let active = store.active_reminders()?;
    let mut report = CheckReport {
        checked: active.len(),
        ..CheckReport::default()
    };

    for reminder in active.iter().filter(|r| is_due(r.parsed_time, now)) {
        report.due += 1;
        match process(store, notifier, reminder) {
            Ok(()) => {
                tracing::debug!(id = %reminder.id, "reminder fired");
                report.processed += 1;
            }
            Err(e) => {
                tracing::warn!(id = %reminder.id, error = %e, "failed to process reminder");
                report.failed += 1;
            }
        }
    }

    tracing::trace!(
        checked = report.checked,
        due = report.due,
        processed = report.processed,
        failed = report.failed,
        "reminder check done"
    );
    Ok(report)
}

fn process(
    store: &mut dyn Store,
    notifier: &dyn Notifier,
    reminder: &ReminderRecord,
) -> Result<(), ProcessError> {
    notifier.notify(
        NOTIFICATION_TITLE,
        &notification_body(&reminder.content),
        &reminder.id,
    )?;
    store.add_message(
        &nudge_message(&reminder.content, &reminder.id),
        MessageRole::Answer,
    )?;
    store.set_reminder_completed(&reminder.id, true)?;
    Ok(())
}
