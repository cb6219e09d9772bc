//! Persistence collaborator.
//!
//! The pipeline itself never stores anything. Callers that keep reminders,
//! todos, notes, routines and the chat log implement [`Store`];
//! [`MemoryStore`] is the in-process implementation used by tests and
//! wrapped by the CLI's file store.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::error::StoreError;

/// A stored reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderRecord {
    pub id: String,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub parsed_time: NaiveDateTime,
    #[serde(default)]
    pub is_completed: bool,
}

/// A stored todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoRecord {
    pub id: String,
    pub content: String,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDateTime>,
}

/// A stored note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub id: String,
    pub content: String,
    pub created_at: NaiveDateTime,
}

/// A day a routine repeats on, named the way the mobile app stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoutineDay {
    Sun,
    Mon,
    Tues,
    Wed,
    Thur,
    Fri,
    Sat,
    Everyday,
}

impl RoutineDay {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sun => "Sun",
            Self::Mon => "Mon",
            Self::Tues => "Tues",
            Self::Wed => "Wed",
            Self::Thur => "Thur",
            Self::Fri => "Fri",
            Self::Sat => "Sat",
            Self::Everyday => "Everyday",
        }
    }

    /// Whether this selection covers `weekday`.
    #[must_use]
    pub fn covers(&self, weekday: Weekday) -> bool {
        match self {
            Self::Everyday => true,
            Self::Sun => weekday == Weekday::Sun,
            Self::Mon => weekday == Weekday::Mon,
            Self::Tues => weekday == Weekday::Tue,
            Self::Wed => weekday == Weekday::Wed,
            Self::Thur => weekday == Weekday::Thu,
            Self::Fri => weekday == Weekday::Fri,
            Self::Sat => weekday == Weekday::Sat,
        }
    }
}

impl fmt::Display for RoutineDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoutineDay {
    type Err = StoreError;

    /// Accepts the stored names and common short forms, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sun" | "sunday" => Ok(Self::Sun),
            "mon" | "monday" => Ok(Self::Mon),
            "tue" | "tues" | "tuesday" => Ok(Self::Tues),
            "wed" | "wednesday" => Ok(Self::Wed),
            "thu" | "thur" | "thurs" | "thursday" => Ok(Self::Thur),
            "fri" | "friday" => Ok(Self::Fri),
            "sat" | "saturday" => Ok(Self::Sat),
            "everyday" | "daily" => Ok(Self::Everyday),
            other => Err(StoreError::InvalidRoutine(format!("unknown day '{other}'"))),
        }
    }
}

/// `Everyday` replaces any single days; the rest are deduplicated in week
/// order starting on Sunday.
#[must_use]
pub fn normalize_days(days: &[RoutineDay]) -> Vec<RoutineDay> {
    if days.contains(&RoutineDay::Everyday) {
        return vec![RoutineDay::Everyday];
    }
    let mut out = days.to_vec();
    out.sort();
    out.dedup();
    out
}

/// Fields a routine is created or edited with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineDraft {
    pub message: String,
    /// First occurrence; its time of day is the routine's time.
    pub start_date: NaiveDateTime,
    /// Last day the routine may run, `None` for never ending.
    pub end_date: Option<NaiveDateTime>,
    pub selected_days: Vec<RoutineDay>,
}

impl RoutineDraft {
    /// Trimmed, normalized copy of the draft.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidRoutine`] for a blank message, no selected days,
    /// or an end date not after the start.
    pub fn validated(&self) -> Result<Self, StoreError> {
        let message = self.message.trim();
        if message.is_empty() {
            return Err(StoreError::InvalidRoutine("message is empty".to_string()));
        }
        let selected_days = normalize_days(&self.selected_days);
        if selected_days.is_empty() {
            return Err(StoreError::InvalidRoutine("no days selected".to_string()));
        }
        if self.end_date.is_some_and(|end| end <= self.start_date) {
            return Err(StoreError::InvalidRoutine(
                "end date must be after the start date".to_string(),
            ));
        }
        Ok(Self {
            message: message.to_string(),
            start_date: self.start_date,
            end_date: self.end_date,
            selected_days,
        })
    }
}

fn enabled() -> bool {
    true
}

/// A stored routine. Field names match the mobile store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineRecord {
    pub id: String,
    pub message: String,
    #[serde(rename = "startDate")]
    pub start_date: NaiveDateTime,
    #[serde(rename = "endDate", default)]
    pub end_date: Option<NaiveDateTime>,
    #[serde(rename = "selectedDays")]
    pub selected_days: Vec<RoutineDay>,
    #[serde(rename = "isEnabled", default = "enabled")]
    pub is_enabled: bool,
    pub created_at: NaiveDateTime,
}

impl RoutineRecord {
    /// "Mon, Wed at 07:30 AM"
    #[must_use]
    pub fn schedule(&self) -> String {
        let days: Vec<&str> = self.selected_days.iter().map(RoutineDay::as_str).collect();
        format!("{} at {}", days.join(", "), self.start_date.format("%I:%M %p"))
    }

    /// Whether an enabled routine is due to run some time on `date`.
    #[must_use]
    pub fn runs_on(&self, date: NaiveDate) -> bool {
        self.is_enabled
            && date >= self.start_date.date()
            && self.end_date.map_or(true, |end| date <= end.date())
            && self.selected_days.iter().any(|d| d.covers(date.weekday()))
    }
}

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// The user.
    Sender,
    /// Quibly.
    Answer,
}

/// One line of the chat log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub message: String,
    #[serde(rename = "type")]
    pub role: MessageRole,
    pub timestamp: NaiveDateTime,
}

/// Named record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Reminders,
    #[serde(rename = "todolist")]
    Todos,
    Notes,
    Messages,
    Routines,
}

impl Collection {
    /// Every collection, in the order lookups try them.
    pub const ALL: [Collection; 5] = [
        Self::Reminders,
        Self::Todos,
        Self::Notes,
        Self::Routines,
        Self::Messages,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reminders => "reminders",
            Self::Todos => "todolist",
            Self::Notes => "notes",
            Self::Messages => "messages",
            Self::Routines => "routines",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document store for everything Quibly keeps.
///
/// Listing methods return reminders, todos and notes newest first and the
/// chat log oldest first.
pub trait Store {
    /// Add a reminder and return its id.
    fn add_reminder(&mut self, content: &str, time: NaiveDateTime) -> Result<String, StoreError>;

    /// Add a todo and return its id.
    fn add_todo(
        &mut self,
        content: &str,
        due_date: Option<NaiveDateTime>,
    ) -> Result<String, StoreError>;

    /// Add a note and return its id.
    fn add_note(&mut self, content: &str) -> Result<String, StoreError>;

    /// Append to the chat log and return the message id.
    fn add_message(&mut self, text: &str, role: MessageRole) -> Result<String, StoreError>;

    fn reminders(&self) -> Result<Vec<ReminderRecord>, StoreError>;

    /// Reminders that have not fired yet.
    fn active_reminders(&self) -> Result<Vec<ReminderRecord>, StoreError> {
        Ok(self
            .reminders()?
            .into_iter()
            .filter(|r| !r.is_completed)
            .collect())
    }

    fn set_reminder_completed(&mut self, id: &str, completed: bool) -> Result<(), StoreError>;

    fn todos(&self) -> Result<Vec<TodoRecord>, StoreError>;

    fn set_todo_completed(&mut self, id: &str, completed: bool) -> Result<(), StoreError>;

    /// Move or clear a todo deadline.
    fn set_todo_due_date(
        &mut self,
        id: &str,
        due_date: Option<NaiveDateTime>,
    ) -> Result<(), StoreError>;

    /// Add an enabled routine and return its id.
    fn add_routine(&mut self, draft: &RoutineDraft) -> Result<String, StoreError>;

    fn routines(&self) -> Result<Vec<RoutineRecord>, StoreError>;

    fn routine(&self, id: &str) -> Result<Option<RoutineRecord>, StoreError> {
        Ok(self.routines()?.into_iter().find(|r| r.id == id))
    }

    /// Replace a routine's message, dates and days. Status and creation time
    /// are kept.
    fn update_routine(&mut self, id: &str, draft: &RoutineDraft) -> Result<(), StoreError>;

    fn set_routine_enabled(&mut self, id: &str, enabled: bool) -> Result<(), StoreError>;

    fn notes(&self) -> Result<Vec<NoteRecord>, StoreError>;

    fn messages(&self) -> Result<Vec<ChatMessage>, StoreError>;

    /// Remove one record.
    fn delete(&mut self, collection: Collection, id: &str) -> Result<(), StoreError>;
}

/// Raw contents of a store, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreData {
    pub reminders: Vec<ReminderRecord>,
    #[serde(rename = "todolist")]
    pub todos: Vec<TodoRecord>,
    pub notes: Vec<NoteRecord>,
    pub messages: Vec<ChatMessage>,
    pub routines: Vec<RoutineRecord>,
}

/// [`Store`] kept entirely in memory.
pub struct MemoryStore {
    data: StoreData,
    clock: Box<dyn Clock>,
}

impl MemoryStore {
    /// Empty store stamping records with the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::from_data(StoreData::default())
    }

    /// Empty store stamping records with `clock`.
    #[must_use]
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            data: StoreData::default(),
            clock: Box::new(clock),
        }
    }

    /// Store pre-filled with `data`.
    #[must_use]
    pub fn from_data(data: StoreData) -> Self {
        Self {
            data,
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the clock used for new records.
    #[must_use]
    pub fn set_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    #[must_use]
    pub fn data(&self) -> &StoreData {
        &self.data
    }

    #[must_use]
    pub fn into_data(self) -> StoreData {
        self.data
    }

    /// Swap in new contents, keeping the clock.
    pub fn replace_data(&mut self, data: StoreData) {
        self.data = data;
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn newest_first<T: Clone>(items: &[T], created_at: impl Fn(&T) -> NaiveDateTime) -> Vec<T> {
    let mut out = items.to_vec();
    // stable sort keeps later insertions first among equal timestamps
    out.reverse();
    out.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    out
}

impl Store for MemoryStore {
    fn add_reminder(&mut self, content: &str, time: NaiveDateTime) -> Result<String, StoreError> {
        let id = new_id();
        self.data.reminders.push(ReminderRecord {
            id: id.clone(),
            content: content.to_string(),
            created_at: self.clock.now(),
            parsed_time: time,
            is_completed: false,
        });
        Ok(id)
    }

    fn add_todo(
        &mut self,
        content: &str,
        due_date: Option<NaiveDateTime>,
    ) -> Result<String, StoreError> {
        let id = new_id();
        self.data.todos.push(TodoRecord {
            id: id.clone(),
            content: content.to_string(),
            created_at: self.clock.now(),
            is_completed: false,
            due_date,
        });
        Ok(id)
    }

    fn add_note(&mut self, content: &str) -> Result<String, StoreError> {
        let id = new_id();
        self.data.notes.push(NoteRecord {
            id: id.clone(),
            content: content.to_string(),
            created_at: self.clock.now(),
        });
        Ok(id)
    }

    fn add_message(&mut self, text: &str, role: MessageRole) -> Result<String, StoreError> {
        let id = new_id();
        self.data.messages.push(ChatMessage {
            id: id.clone(),
            message: text.to_string(),
            role,
            timestamp: self.clock.now(),
        });
        Ok(id)
    }

    fn reminders(&self) -> Result<Vec<ReminderRecord>, StoreError> {
        Ok(newest_first(&self.data.reminders, |r| r.created_at))
    }

    fn set_reminder_completed(&mut self, id: &str, completed: bool) -> Result<(), StoreError> {
        let record = self
            .data
            .reminders
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found(Collection::Reminders, id))?;
        record.is_completed = completed;
        Ok(())
    }

    fn todos(&self) -> Result<Vec<TodoRecord>, StoreError> {
        Ok(newest_first(&self.data.todos, |t| t.created_at))
    }

    fn set_todo_completed(&mut self, id: &str, completed: bool) -> Result<(), StoreError> {
        let record = self
            .data
            .todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found(Collection::Todos, id))?;
        record.is_completed = completed;
        Ok(())
    }

    fn set_todo_due_date(
        &mut self,
        id: &str,
        due_date: Option<NaiveDateTime>,
    ) -> Result<(), StoreError> {
        let record = self
            .data
            .todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found(Collection::Todos, id))?;
        record.due_date = due_date;
        Ok(())
    }

    fn add_routine(&mut self, draft: &RoutineDraft) -> Result<String, StoreError> {
        let draft = draft.validated()?;
        let id = new_id();
        self.data.routines.push(RoutineRecord {
            id: id.clone(),
            message: draft.message,
            start_date: draft.start_date,
            end_date: draft.end_date,
            selected_days: draft.selected_days,
            is_enabled: true,
            created_at: self.clock.now(),
        });
        Ok(id)
    }

    fn routines(&self) -> Result<Vec<RoutineRecord>, StoreError> {
        Ok(newest_first(&self.data.routines, |r| r.created_at))
    }

    fn update_routine(&mut self, id: &str, draft: &RoutineDraft) -> Result<(), StoreError> {
        let draft = draft.validated()?;
        let record = self.routine_mut(id)?;
        record.message = draft.message;
        record.start_date = draft.start_date;
        record.end_date = draft.end_date;
        record.selected_days = draft.selected_days;
        Ok(())
    }

    fn set_routine_enabled(&mut self, id: &str, enabled: bool) -> Result<(), StoreError> {
        self.routine_mut(id)?.is_enabled = enabled;
        Ok(())
    }

    fn notes(&self) -> Result<Vec<NoteRecord>, StoreError> {
        Ok(newest_first(&self.data.notes, |n| n.created_at))
    }

    fn messages(&self) -> Result<Vec<ChatMessage>, StoreError> {
        let mut out = self.data.messages.clone();
        out.sort_by_key(|m| m.timestamp);
        Ok(out)
    }

    fn delete(&mut self, collection: Collection, id: &str) -> Result<(), StoreError> {
        let removed = match collection {
            Collection::Reminders => remove_by_id(&mut self.data.reminders, id, |r| &r.id),
            Collection::Todos => remove_by_id(&mut self.data.todos, id, |t| &t.id),
            Collection::Notes => remove_by_id(&mut self.data.notes, id, |n| &n.id),
            Collection::Messages => remove_by_id(&mut self.data.messages, id, |m| &m.id),
            Collection::Routines => remove_by_id(&mut self.data.routines, id, |r| &r.id),
        };
        if !removed {
            return Err(not_found(collection, id));
        }
        Ok(())
    }
}

impl MemoryStore {
    fn routine_mut(&mut self, id: &str) -> Result<&mut RoutineRecord, StoreError> {
        self.data
            .routines
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found(Collection::Routines, id))
    }
}

fn remove_by_id<T>(items: &mut Vec<T>, id: &str, item_id: impl Fn(&T) -> &String) -> bool {
    let before = items.len();
    items.retain(|item| item_id(item) != id);
    items.len() != before
}

fn not_found(collection: Collection, id: &str) -> StoreError {
    StoreError::NotFound {
        collection,
        id: id.to_string(),
    }
}

/// How far ahead [`upcoming_reminders`] looks.
pub const UPCOMING_WINDOW_HOURS: i64 = 24;

/// Incomplete todos whose deadline has passed, earliest deadline first.
#[must_use]
pub fn overdue_todos(todos: &[TodoRecord], now: NaiveDateTime) -> Vec<TodoRecord> {
    let mut out: Vec<TodoRecord> = todos
        .iter()
        .filter(|t| !t.is_completed && t.due_date.is_some_and(|due| due < now))
        .cloned()
        .collect();
    out.sort_by_key(|t| t.due_date);
    out
}

/// Incomplete reminders firing within the next 24 hours, soonest first.
#[must_use]
pub fn upcoming_reminders(reminders: &[ReminderRecord], now: NaiveDateTime) -> Vec<ReminderRecord> {
    let horizon = now + Duration::hours(UPCOMING_WINDOW_HOURS);
    let mut out: Vec<ReminderRecord> = reminders
        .iter()
        .filter(|r| !r.is_completed && r.parsed_time >= now && r.parsed_time <= horizon)
        .cloned()
        .collect();
    out.sort_by_key(|r| r.parsed_time);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_add_and_list_newest_first() {
        let mut store = MemoryStore::with_clock(FixedClock(at(18, 9)));
        let first = store.add_note("satu").unwrap();
        let second = store.add_note("dua").unwrap();

        let notes = store.notes().unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].id, second);
        assert_eq!(notes[1].id, first);
        assert_eq!(notes[0].created_at, at(18, 9));
    }

    #[test]
    fn test_ids_are_uuids() {
        let mut store = MemoryStore::new();
        let id = store.add_todo("beli susu", None).unwrap();
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_active_reminders_exclude_completed() {
        let mut store = MemoryStore::with_clock(FixedClock(at(18, 9)));
        let done = store.add_reminder("a", at(18, 10)).unwrap();
        store.add_reminder("b", at(18, 11)).unwrap();
        store.set_reminder_completed(&done, true).unwrap();

        let active = store.active_reminders().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].content, "b");
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let mut store = MemoryStore::new();
        let err = store.set_todo_completed("nope", true).unwrap_err();
        assert_eq!(err.to_string(), "no todolist record with id nope");
        assert!(store.delete(Collection::Notes, "nope").is_err());
    }

    #[test]
    fn test_delete_removes_record() {
        let mut store = MemoryStore::new();
        let id = store.add_todo("x", None).unwrap();
        store.delete(Collection::Todos, &id).unwrap();
        assert!(store.todos().unwrap().is_empty());
    }

    #[test]
    fn test_messages_oldest_first() {
        let mut store = MemoryStore::with_clock(FixedClock(at(18, 9)));
        store.add_message("halo", MessageRole::Sender).unwrap();
        let mut store = store.set_clock(FixedClock(at(18, 10)));
        store.add_message("hai", MessageRole::Answer).unwrap();

        let log = store.messages().unwrap();
        assert_eq!(log[0].message, "halo");
        assert_eq!(log[1].role, MessageRole::Answer);
    }

    #[test]
    fn test_store_data_json_shape() {
        let mut store = MemoryStore::with_clock(FixedClock(at(18, 9)));
        store.add_todo("beli susu", None).unwrap();
        store.add_message("halo", MessageRole::Sender).unwrap();

        let json = serde_json::to_value(store.data()).unwrap();
        assert!(json["todolist"][0].get("due_date").is_none());
        assert_eq!(json["todolist"][0]["is_completed"], false);
        assert_eq!(json["messages"][0]["type"], "sender");

        let back: StoreData = serde_json::from_value(json).unwrap();
        assert_eq!(&back, store.data());
    }

    #[test]
    fn test_todo_due_date_can_move_and_clear() {
        let mut store = MemoryStore::new();
        let id = store.add_todo("bayar pajak", Some(at(20, 23))).unwrap();

        store.set_todo_due_date(&id, Some(at(25, 23))).unwrap();
        assert_eq!(store.todos().unwrap()[0].due_date, Some(at(25, 23)));

        store.set_todo_due_date(&id, None).unwrap();
        assert_eq!(store.todos().unwrap()[0].due_date, None);

        assert!(matches!(
            store.set_todo_due_date("nope", None),
            Err(StoreError::NotFound { collection: Collection::Todos, .. })
        ));
    }

    fn draft(message: &str, days: &[RoutineDay]) -> RoutineDraft {
        RoutineDraft {
            message: message.to_string(),
            start_date: at(18, 7),
            end_date: None,
            selected_days: days.to_vec(),
        }
    }

    #[test]
    fn test_routine_lifecycle() {
        let mut store = MemoryStore::with_clock(FixedClock(at(18, 9)));
        let id = store
            .add_routine(&draft("  olahraga pagi ", &[RoutineDay::Wed, RoutineDay::Mon]))
            .unwrap();

        let routine = store.routine(&id).unwrap().unwrap();
        assert_eq!(routine.message, "olahraga pagi");
        assert_eq!(routine.selected_days, vec![RoutineDay::Mon, RoutineDay::Wed]);
        assert!(routine.is_enabled);
        assert_eq!(routine.created_at, at(18, 9));
        assert_eq!(routine.schedule(), "Mon, Wed at 07:00 AM");

        store.set_routine_enabled(&id, false).unwrap();
        let mut edit = draft("yoga", &[RoutineDay::Everyday]);
        edit.end_date = Some(at(31, 7));
        store.update_routine(&id, &edit).unwrap();

        let routine = store.routine(&id).unwrap().unwrap();
        assert_eq!(routine.message, "yoga");
        assert_eq!(routine.end_date, Some(at(31, 7)));
        // editing keeps the status
        assert!(!routine.is_enabled);

        store.delete(Collection::Routines, &id).unwrap();
        assert_eq!(store.routine(&id).unwrap(), None);
    }

    #[test]
    fn test_invalid_routines_are_rejected() {
        let mut store = MemoryStore::new();
        assert!(store.add_routine(&draft("   ", &[RoutineDay::Mon])).is_err());
        assert!(store.add_routine(&draft("lari", &[])).is_err());

        let mut backwards = draft("lari", &[RoutineDay::Mon]);
        backwards.end_date = Some(at(17, 7));
        assert!(matches!(
            store.add_routine(&backwards),
            Err(StoreError::InvalidRoutine(_))
        ));
        assert!(store.routines().unwrap().is_empty());
    }

    #[test]
    fn test_everyday_replaces_single_days() {
        assert_eq!(
            normalize_days(&[RoutineDay::Fri, RoutineDay::Everyday, RoutineDay::Mon]),
            vec![RoutineDay::Everyday]
        );
        assert_eq!(
            normalize_days(&[RoutineDay::Sat, RoutineDay::Sun, RoutineDay::Sat]),
            vec![RoutineDay::Sun, RoutineDay::Sat]
        );
        assert_eq!("thu".parse::<RoutineDay>().unwrap(), RoutineDay::Thur);
        assert_eq!("Everyday".parse::<RoutineDay>().unwrap(), RoutineDay::Everyday);
        assert!("someday".parse::<RoutineDay>().is_err());
    }

    #[test]
    fn test_routine_runs_on() {
        let mut store = MemoryStore::new();
        // 2026-10-18 is a Sunday
        let mut d = draft("kelas bahasa", &[RoutineDay::Mon, RoutineDay::Thur]);
        d.end_date = Some(at(26, 7));
        let id = store.add_routine(&d).unwrap();
        let routine = store.routine(&id).unwrap().unwrap();

        let day = |d: u32| NaiveDate::from_ymd_opt(2026, 10, d).unwrap();
        assert!(!routine.runs_on(day(18)));
        assert!(routine.runs_on(day(19)));
        assert!(routine.runs_on(day(22)));
        assert!(routine.runs_on(day(26)));
        // past the end date
        assert!(!routine.runs_on(day(29)));
        // before the start date
        assert!(!routine.runs_on(day(12)));

        store.set_routine_enabled(&id, false).unwrap();
        assert!(!store.routine(&id).unwrap().unwrap().runs_on(day(19)));
    }

    #[test]
    fn test_routine_json_shape() {
        let mut store = MemoryStore::with_clock(FixedClock(at(18, 9)));
        store
            .add_routine(&draft("minum vitamin", &[RoutineDay::Tues]))
            .unwrap();

        let json = serde_json::to_value(store.data()).unwrap();
        let routine = &json["routines"][0];
        assert_eq!(routine["message"], "minum vitamin");
        assert_eq!(routine["startDate"], "2026-10-18T07:00:00");
        assert_eq!(routine["endDate"], serde_json::Value::Null);
        assert_eq!(routine["selectedDays"], serde_json::json!(["Tues"]));
        assert_eq!(routine["isEnabled"], true);

        // files written before routines existed still load
        let old: StoreData = serde_json::from_str(r#"{"notes": []}"#).unwrap();
        assert!(old.routines.is_empty());
    }

    #[test]
    fn test_overdue_todos() {
        let now = at(18, 12);
        let todo = |id: &str, due: Option<NaiveDateTime>, done: bool| TodoRecord {
            id: id.to_string(),
            content: id.to_string(),
            created_at: at(1, 0),
            is_completed: done,
            due_date: due,
        };
        let todos = vec![
            todo("late", Some(at(17, 23)), false),
            todo("later", Some(at(15, 23)), false),
            todo("done", Some(at(10, 23)), true),
            todo("future", Some(at(19, 23)), false),
            todo("undated", None, false),
        ];
        let ids: Vec<String> = overdue_todos(&todos, now).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["later", "late"]);
    }

    #[test]
    fn test_upcoming_reminders_window() {
        let now = at(18, 12);
        let reminder = |id: &str, when: NaiveDateTime| ReminderRecord {
            id: id.to_string(),
            content: id.to_string(),
            created_at: at(1, 0),
            parsed_time: when,
            is_completed: false,
        };
        let reminders = vec![
            reminder("tomorrow-noon", at(19, 12)),
            reminder("tonight", at(18, 20)),
            reminder("past", at(18, 11)),
            reminder("too-far", at(19, 13)),
        ];
        let ids: Vec<String> = upcoming_reminders(&reminders, now)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["tonight", "tomorrow-noon"]);
    }
}
