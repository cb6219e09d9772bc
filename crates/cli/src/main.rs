mod config;
mod output;
mod store;

use config::Config;

use std::fmt::Display;
use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use clap::{Parser, ValueEnum};
use colored::{control::set_override, Colorize};
use quibly_core::chat::handle_message;
use quibly_core::reminder::check_and_process;
use quibly_core::scheduler::ReminderScheduler;
use quibly_core::store::{
    overdue_todos, upcoming_reminders, Collection, RoutineDay, RoutineDraft, Store,
};
use quibly_core::{ParseResult, Quibly, QuiblyConfig, StoreError};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

use crate::output::TerminalNotifier;
use crate::store::{JsonFileStore, STORE_FILE};

const LONG_ABOUT: &str = r##"
Quibly turns chat-style messages into reminders, todos and notes.

Type a sentence the way you would text a friend (Indonesian or English) and
Quibly files it, cleans up the wording and works out when it is due.

CATEGORIES:
  Reminder   "ingatkan", "reminder", "remind"      fires at a resolved time
  Todo       "aku harus", "perlu", "todo", "tugas"  optional end-of-day deadline
  Note       anything else                          saved as written

TIME EXPRESSIONS:
  Relative:  dalam 30 menit, dalam 2 jam
  Clock:     jam 9 malam, pukul 07.30, 4pm, 8 pagi
  Days:      besok, lusa, minggu depan (reminders and todos)
             hari ini, minggu ini (todos)
  Deadline:  deadline tanggal 5, sampai 20, selesai 31

EXAMPLES:
  quibly "Ingatkan aku untuk belajar jam 4 sore besok"
  quibly "aku harus kumpulkan laporan deadline tanggal 5"
  quibly "wifi kantor: kopi123"
  quibly --dry-run --json "remind me to call mom 7pm"
  quibly --list upcoming
  quibly --set-due ID 2026-10-20  Move a todo deadline ("none" clears it)
  quibly --routine "olahraga pagi" --days mon,wed,fri --start 2026-10-19T06:30
  quibly --watch                 Check reminders every minute

ROUTINES:
  Routines repeat on chosen weekdays at the time of --start, until --until.
  Days: sun, mon, tues, wed, thur, fri, sat or everyday.
  quibly --list routines          Today's routines are marked with *
  quibly --disable ID             Pause a routine (--enable resumes it)

PIPED INPUT:
  Without a MESSAGE argument, every line on stdin is one message:
    cat notes.txt | quibly

CONFIGURATION:
  Settings can be configured via CLI flags, environment variables, or config file.
  Precedence: CLI args > Environment vars > Config file > Defaults

  Setting               | CLI flag        | Env var                | Default
  ----------------------|-----------------|------------------------|---------
  reminder_lead_minutes | --lead          | QUIBLY_REMINDER_LEAD   | 60
  check_interval        | --interval      | QUIBLY_CHECK_INTERVAL  | 60
  no_color              | -C, --no-color  | QUIBLY_NO_COLOR        | false
  data_dir              | --data-dir      | QUIBLY_DATA_DIR        | platform data dir

  Config file location: quibly --config-path
  Generate default config: quibly --config-init

  Note: NO_COLOR env var is also respected (https://no-color.org/)"##;

/// What `--list` shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ListKind {
    Reminders,
    Todos,
    Notes,
    Messages,
    Routines,
    /// Incomplete todos past their deadline
    Overdue,
    /// Reminders firing in the next 24 hours
    Upcoming,
}

#[derive(Parser)]
#[command(name = "quibly")]
#[command(version)]
#[command(about = "Turn chat messages into reminders, todos and notes")]
#[command(long_about = LONG_ABOUT)]
struct Cli {
    /// The message to interpret, e.g. "ingatkan aku minum obat jam 9 malam"
    ///
    /// If omitted, each line read from stdin is handled as one message.
    #[arg(value_name = "MESSAGE")]
    message: Option<String>,

    /// Interpret only; do not save anything
    #[arg(long, short = 'n')]
    dry_run: bool,

    /// Output results as JSON (for scripting/piping)
    #[arg(long, short = 'j')]
    json: bool,

    /// Use this local time as "now" (YYYY-MM-DDTHH:MM[:SS])
    #[arg(long, value_name = "DATETIME")]
    now: Option<String>,

    /// List saved items
    #[arg(long, short = 'l', value_enum, value_name = "WHAT")]
    list: Option<ListKind>,

    /// Mark a todo as done
    #[arg(long, value_name = "ID")]
    done: Option<String>,

    /// Change or clear a todo deadline (YYYY-MM-DD or "none")
    #[arg(long, num_args = 2, value_names = ["ID", "DATE"])]
    set_due: Option<Vec<String>>,

    /// Delete a reminder, todo, note, routine or message
    #[arg(long, value_name = "ID")]
    delete: Option<String>,

    /// Add a routine with this message (needs --days)
    #[arg(long, value_name = "MESSAGE", requires = "days")]
    routine: Option<String>,

    /// Comma-separated routine days, e.g. mon,wed or everyday
    #[arg(long, value_name = "DAYS", value_delimiter = ',')]
    days: Vec<String>,

    /// First run of the routine; its time of day is the routine time [default: now]
    #[arg(long, value_name = "DATETIME")]
    start: Option<String>,

    /// Last day the routine runs
    #[arg(long, value_name = "DATETIME")]
    until: Option<String>,

    /// Resume a paused routine
    #[arg(long, value_name = "ID")]
    enable: Option<String>,

    /// Pause a routine
    #[arg(long, value_name = "ID")]
    disable: Option<String>,

    /// Fire due reminders once and exit
    #[arg(long)]
    check: bool,

    /// Keep checking reminders in the foreground
    ///
    /// Lines typed on stdin are still handled as messages while watching.
    #[arg(long, short = 'w')]
    watch: bool,

    /// Seconds between reminder checks in --watch mode
    #[arg(long, value_name = "SECS")]
    interval: Option<u64>,

    /// Minutes after now for reminders that name no time
    #[arg(long, value_name = "MINUTES")]
    lead: Option<i64>,

    /// Directory holding the store file
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, short = 'C')]
    no_color: bool,

    /// Enable verbose logging (use multiple times for more detail)
    ///
    /// -v shows debug messages, -vv shows trace messages.
    /// Useful for understanding why a message was classified the way it was.
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Show config file path
    #[arg(long)]
    config_path: bool,

    /// Generate default config file (see --config-path for location)
    #[arg(long)]
    config_init: bool,
}

/// Settings resolved from CLI, environment and config file.
struct Settings {
    quibly: Quibly,
    json: bool,
    dry_run: bool,
    pinned_now: Option<NaiveDateTime>,
    store_path: Option<PathBuf>,
}

impl Settings {
    fn now(&self) -> NaiveDateTime {
        self.pinned_now
            .unwrap_or_else(|| Local::now().naive_local())
    }

    fn open_store(&self) -> JsonFileStore {
        let Some(path) = &self.store_path else {
            fail("Cannot determine data directory (use --data-dir)");
        };
        JsonFileStore::open(path, self.pinned_now)
            .unwrap_or_else(|e| fail(format!("Failed to open {}: {}", path.display(), e)))
    }
}

fn fail(message: impl Display) -> ! {
    eprintln!("{}: {}", "error".red().bold(), message);
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    // Handle --config-path
    if cli.config_path {
        match Config::path() {
            Some(path) => println!("{}", path.display()),
            None => fail("Cannot determine config directory"),
        }
        return;
    }

    // Handle --config-init
    if cli.config_init {
        match config::init_config() {
            Ok(path) => println!("Created config file: {}", path.display()),
            Err(e) => fail(e),
        }
        return;
    }

    // Initialize tracing based on verbosity level (before config loading for logging)
    let level = match cli.verbose {
        0 => LevelFilter::OFF,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    if level != LevelFilter::OFF {
        let filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy();
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    // Load config file and merge with CLI args
    // Precedence: CLI args > Environment vars > Config file > Defaults
    let file_config = Config::load();

    if let Some(path) = Config::path() {
        if path.exists() {
            tracing::debug!("Loaded config from: {}", path.display());
        } else {
            tracing::trace!("No config file at: {}", path.display());
        }
    }

    let lead = match cli.lead {
        Some(minutes) => {
            tracing::debug!("reminder_lead_minutes = {} (from CLI)", minutes);
            minutes
        }
        None => file_config.reminder_lead_minutes(),
    };
    let interval = cli
        .interval
        .filter(|secs| *secs > 0)
        .unwrap_or_else(|| file_config.check_interval());
    tracing::debug!("check_interval = {}s", interval);

    if cli.no_color || file_config.no_color() {
        tracing::debug!("no_color = true");
        set_override(false);
    }

    let data_dir = cli.data_dir.clone().or_else(|| file_config.data_dir());
    let store_path = data_dir.map(|dir| dir.join(STORE_FILE));
    if let Some(path) = &store_path {
        tracing::debug!("store = {}", path.display());
    }

    let pinned_now = cli
        .now
        .as_deref()
        .map(|s| output::parse_now(s).unwrap_or_else(|e| fail(e)));

    let settings = Settings {
        quibly: Quibly::with_config(QuiblyConfig {
            reminder_lead_minutes: lead,
        }),
        json: cli.json,
        dry_run: cli.dry_run,
        pinned_now,
        store_path,
    };

    if let Some(kind) = cli.list {
        handle_list(&settings, kind);
        return;
    }

    if let Some(ref id) = cli.done {
        let mut store = settings.open_store();
        match store.set_todo_completed(id, true) {
            Ok(()) => println!("Marked todo {} as done", id),
            Err(e) => fail(e),
        }
        return;
    }

    if let Some(ref args) = cli.set_due {
        let [id, date] = args.as_slice() else {
            fail("--set-due takes an ID and a DATE");
        };
        let due = output::parse_due(date).unwrap_or_else(|e| fail(e));
        let mut store = settings.open_store();
        match store.set_todo_due_date(id, due) {
            Ok(()) => match due {
                Some(d) => println!("Todo {} now due {}", id, quibly_core::respond::format_date(d)),
                None => println!("Cleared deadline of todo {}", id),
            },
            Err(e) => fail(e),
        }
        return;
    }

    if let Some(ref id) = cli.delete {
        handle_delete(&settings, id);
        return;
    }

    if let Some(ref message) = cli.routine {
        handle_routine(&settings, message, &cli);
        return;
    }

    if let Some((id, enabled)) = cli
        .enable
        .as_deref()
        .map(|id| (id, true))
        .or_else(|| cli.disable.as_deref().map(|id| (id, false)))
    {
        let mut store = settings.open_store();
        match store.set_routine_enabled(id, enabled) {
            Ok(()) => println!(
                "{} routine {}",
                if enabled { "Enabled" } else { "Disabled" },
                id
            ),
            Err(e) => fail(e),
        }
        return;
    }

    if cli.check {
        let mut store = settings.open_store();
        match check_and_process(&mut store, &TerminalNotifier, settings.now()) {
            Ok(report) => println!(
                "Checked {} reminders, fired {}{}",
                report.checked,
                report.processed,
                if report.failed > 0 {
                    format!(" ({} failed)", report.failed)
                } else {
                    String::new()
                }
            ),
            Err(e) => fail(e),
        }
        return;
    }

    if cli.watch {
        handle_watch(settings, Duration::from_secs(interval));
    }

    if let Some(ref message) = cli.message {
        let mut store = (!settings.dry_run).then(|| settings.open_store());
        if !handle_one(&settings, store.as_mut(), message) {
            fail("Message is empty");
        }
        return;
    }

    // No MESSAGE: read one message per line
    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprintln!(
            "{}",
            "Type one message per line, Ctrl-D to finish.".dimmed()
        );
    }
    let mut store = (!settings.dry_run).then(|| settings.open_store());
    for line in stdin.lock().lines() {
        match line {
            Ok(line) => {
                handle_one(&settings, store.as_mut(), &line);
            }
            Err(e) => fail(format!("Failed to read stdin: {}", e)),
        }
    }
}

/// Interpret one message, save it unless dry-running, and print the reply.
///
/// Returns `false` for a blank message.
fn handle_one(settings: &Settings, store: Option<&mut JsonFileStore>, message: &str) -> bool {
    let now = settings.now();
    let (result, text, record_id) = match store {
        Some(store) => {
            let Some(reply) = handle_message(store, message, now, settings.quibly.config()) else {
                return false;
            };
            (reply.result, reply.text, reply.record_id)
        }
        None => {
            let Ok(result) = settings.quibly.parse(message, now) else {
                return false;
            };
            let text = settings.quibly.describe(&result);
            (result, text, None)
        }
    };

    if settings.json {
        print_json(&result, &text, record_id.as_deref());
    } else {
        output::print_reply(&result, &text, record_id.as_deref());
    }
    true
}

fn print_json(result: &ParseResult, text: &str, record_id: Option<&str>) {
    let value = serde_json::json!({
        "result": result,
        "reply": text,
        "id": record_id,
    });
    match serde_json::to_string_pretty(&value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(e),
    }
}

fn print_json_list<T: serde::Serialize>(items: &[T]) {
    match serde_json::to_string_pretty(items) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(e),
    }
}

fn handle_list(settings: &Settings, kind: ListKind) {
    if let Err(e) = list_items(settings, kind) {
        fail(e);
    }
}

fn list_items(settings: &Settings, kind: ListKind) -> Result<(), StoreError> {
    let store = settings.open_store();
    let now = settings.now();
    match kind {
        ListKind::Reminders | ListKind::Upcoming => {
            let mut items = store.reminders()?;
            let title = if kind == ListKind::Upcoming {
                items = upcoming_reminders(&items, now);
                "upcoming"
            } else {
                "reminders"
            };
            if settings.json {
                print_json_list(&items);
            } else {
                output::print_reminders(title, &items);
            }
        }
        ListKind::Todos | ListKind::Overdue => {
            let mut items = store.todos()?;
            let title = if kind == ListKind::Overdue {
                items = overdue_todos(&items, now);
                "overdue"
            } else {
                "todos"
            };
            if settings.json {
                print_json_list(&items);
            } else {
                output::print_todos(title, &items);
            }
        }
        ListKind::Notes => {
            let items = store.notes()?;
            if settings.json {
                print_json_list(&items);
            } else {
                output::print_notes(&items);
            }
        }
        ListKind::Routines => {
            let items = store.routines()?;
            if settings.json {
                print_json_list(&items);
            } else {
                output::print_routines(&items, now.date());
            }
        }
        ListKind::Messages => {
            let items = store.messages()?;
            if settings.json {
                print_json_list(&items);
            } else {
                output::print_messages(&items);
            }
        }
    }
    Ok(())
}

fn handle_delete(settings: &Settings, id: &str) {
    let mut store = settings.open_store();
    for collection in Collection::ALL {
        match store.delete(collection, id) {
            Ok(()) => {
                println!("Deleted {} record {}", collection, id);
                return;
            }
            Err(StoreError::NotFound { .. }) => continue,
            Err(e) => fail(e),
        }
    }
    fail(format!("No record with id {}", id));
}

fn handle_routine(settings: &Settings, message: &str, cli: &Cli) {
    let selected_days = cli
        .days
        .iter()
        .map(|d| d.trim().parse::<RoutineDay>())
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| fail(e));
    let parse = |value: &str| output::parse_now(value).unwrap_or_else(|e| fail(e));
    let draft = RoutineDraft {
        message: message.to_string(),
        start_date: cli.start.as_deref().map_or_else(|| settings.now(), parse),
        end_date: cli.until.as_deref().map(parse),
        selected_days,
    };

    if settings.dry_run {
        match draft.validated() {
            Ok(draft) => println!("Would add routine: {}", draft.message),
            Err(e) => fail(e),
        }
        return;
    }

    let mut store = settings.open_store();
    let routine = store
        .add_routine(&draft)
        .and_then(|id| store.routine(&id))
        .unwrap_or_else(|e| fail(e));
    let Some(routine) = routine else {
        fail("Routine was not saved");
    };
    if settings.json {
        print_json_list(std::slice::from_ref(&routine));
    } else {
        println!(
            "{} {} {}",
            "▶".blue(),
            "routine".green().bold(),
            routine.message
        );
        println!("  {} {}", "→".cyan(), routine.schedule());
        println!("  {}", format!("saved as {}", routine.id).dimmed());
    }
}

/// Check reminders on a background loop while handling stdin messages.
fn handle_watch(settings: Settings, interval: Duration) -> ! {
    let store = Arc::new(Mutex::new(settings.open_store()));
    let pinned_now = settings.pinned_now;

    let mut scheduler = ReminderScheduler::new();
    let tick_store = Arc::clone(&store);
    scheduler.start(interval, move || {
        let mut store = tick_store.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = store.reload() {
            tracing::warn!("Failed to reload store: {}", e);
            return;
        }
        let now = pinned_now.unwrap_or_else(|| Local::now().naive_local());
        match check_and_process(&mut *store, &TerminalNotifier, now) {
            Ok(report) => tracing::debug!(
                checked = report.checked,
                processed = report.processed,
                "reminder check"
            ),
            Err(e) => tracing::warn!("Reminder check failed: {}", e),
        }
    });

    eprintln!(
        "{}",
        format!(
            "Watching reminders every {}s. Type messages below, Ctrl-C to stop.",
            interval.as_secs()
        )
        .dimmed()
    );

    for line in io::stdin().lock().lines() {
        let Ok(line) = line else {
            break;
        };
        let mut guard = store.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = guard.reload() {
            tracing::warn!("Failed to reload store: {}", e);
        }
        handle_one(&settings, (!settings.dry_run).then_some(&mut *guard), &line);
    }

    // stdin closed; keep checking until interrupted
    loop {
        std::thread::park();
    }
}
