//! Terminal output for replies, listings and reminder notifications.

use chrono::{NaiveDate, NaiveDateTime};
use colored::Colorize;
use quibly_core::respond::{format_date, format_date_time};
use quibly_core::reminder::Notifier;
use quibly_core::store::{
    ChatMessage, MessageRole, NoteRecord, ReminderRecord, RoutineRecord, TodoRecord,
};
use quibly_core::temporal::end_of_day;
use quibly_core::{truncate_str, Intent, NotifyError, ParseResult};

/// Content longer than this is cut in listings.
const LIST_CONTENT_WIDTH: usize = 48;

/// Print one interpreted message and the confirmation text.
pub fn print_reply(result: &ParseResult, text: &str, record_id: Option<&str>) {
    println!(
        "{} {} {}",
        "▶".blue(),
        result.kind().as_str().green().bold(),
        result.clean_content
    );
    match result.intent {
        Intent::Reminder {
            parsed_time: Some(at),
        } => println!("  {} time: {}", "→".cyan(), format_date_time(at)),
        Intent::Todo {
            due_date: Some(due),
        } => println!("  {} due: {}", "→".cyan(), format_date(due)),
        _ => {}
    }
    println!("  {}", text);
    if let Some(id) = record_id {
        println!("  {}", format!("saved as {}", id).dimmed());
    }
}

fn checkbox(done: bool) -> &'static str {
    if done {
        "[x]"
    } else {
        "[ ]"
    }
}

fn content_cell(content: &str) -> String {
    truncate_str(content, LIST_CONTENT_WIDTH)
}

pub fn print_reminders(title: &str, reminders: &[ReminderRecord]) {
    println!("{} {} ({})", "▶".blue(), title.green().bold(), reminders.len());
    for r in reminders {
        println!(
            "  {} {}  {}  {}",
            checkbox(r.is_completed),
            format_date_time(r.parsed_time).yellow(),
            content_cell(&r.content),
            r.id.dimmed()
        );
    }
}

pub fn print_todos(title: &str, todos: &[TodoRecord]) {
    println!("{} {} ({})", "▶".blue(), title.green().bold(), todos.len());
    for t in todos {
        let due = t
            .due_date
            .map(|d| format!("  {}", format_date(d).yellow()))
            .unwrap_or_default();
        println!(
            "  {} {}{}  {}",
            checkbox(t.is_completed),
            content_cell(&t.content),
            due,
            t.id.dimmed()
        );
    }
}

pub fn print_notes(notes: &[NoteRecord]) {
    println!("{} {} ({})", "▶".blue(), "notes".green().bold(), notes.len());
    for n in notes {
        println!(
            "  {}  {}  {}",
            format_date(n.created_at).yellow(),
            content_cell(&n.content),
            n.id.dimmed()
        );
    }
}

/// Routines, with a `*` on the ones that run on `today`.
pub fn print_routines(routines: &[RoutineRecord], today: NaiveDate) {
    println!("{} {} ({})", "▶".blue(), "routines".green().bold(), routines.len());
    for r in routines {
        let state = if r.is_enabled { "on ".green() } else { "off".red() };
        let marker = if r.runs_on(today) { "*" } else { " " };
        let until = r
            .end_date
            .map(|d| format!("  until {}", format_date(d)).yellow().to_string())
            .unwrap_or_default();
        println!(
            "  {} {} {}  {}{}  {}",
            state,
            marker.cyan(),
            r.schedule().yellow(),
            content_cell(&r.message),
            until,
            r.id.dimmed()
        );
    }
}

pub fn print_messages(messages: &[ChatMessage]) {
    println!("{} {} ({})", "▶".blue(), "messages".green().bold(), messages.len());
    for m in messages {
        let stamp = m.timestamp.format("%Y-%m-%d %H:%M").to_string();
        match m.role {
            MessageRole::Sender => println!("  {} {} {}", stamp.dimmed(), ">".cyan(), m.message),
            MessageRole::Answer => println!("  {} {} {}", stamp.dimmed(), "<".magenta(), m.message),
        }
    }
}

/// Prints reminder notifications to stdout.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, title: &str, body: &str, reminder_id: &str) -> Result<(), NotifyError> {
        println!("{} {}: {}", "🔔".bold(), title.bold(), body);
        tracing::debug!(id = reminder_id, "notification printed");
        Ok(())
    }
}

/// Parse a `--now` value in local wall-clock time.
pub fn parse_now(s: &str) -> Result<NaiveDateTime, String> {
    const FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| format!("Invalid --now value '{}', expected YYYY-MM-DDTHH:MM[:SS]", s))
}

/// Parse a `--set-due` date. `none` clears the deadline; a date means the
/// end of that day.
pub fn parse_due(s: &str) -> Result<Option<NaiveDateTime>, String> {
    if s.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(end_of_day)
        .map(Some)
        .ok_or_else(|| format!("Invalid due date '{}', expected YYYY-MM-DD or none", s))
}
