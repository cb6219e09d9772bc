//! JSON file store.
//!
//! Keeps the whole store in one JSON document and rewrites it after every
//! change. Good enough for a single user's reminders and notes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use quibly_core::clock::FixedClock;
use quibly_core::store::{
    ChatMessage, Collection, MemoryStore, MessageRole, NoteRecord, ReminderRecord,
    RoutineDraft, RoutineRecord, Store, StoreData, TodoRecord,
};
use quibly_core::StoreError;

/// File name inside the data directory.
pub const STORE_FILE: &str = "store.json";

pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
    /// Pinned creation time for new records (`--now`).
    pinned_now: Option<NaiveDateTime>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>, pinned_now: Option<NaiveDateTime>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = read_data(&path)?;
        Ok(Self {
            inner: memory_store(data, pinned_now),
            path,
            pinned_now,
        })
    }

    /// Re-read the file, dropping anything only held in memory.
    pub fn reload(&mut self) -> Result<(), StoreError> {
        let data = read_data(&self.path)?;
        self.inner = memory_store(data, self.pinned_now);
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self.inner.data())?;
        // write then rename so a crash never leaves half a file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        tracing::trace!("saved store to {}", self.path.display());
        Ok(())
    }

    /// Apply `change` and save. If saving fails the change is rolled back,
    /// so memory never holds records the file does not.
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut MemoryStore) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let snapshot = self.inner.data().clone();
        let out = change(&mut self.inner)?;
        if let Err(e) = self.save() {
            tracing::debug!("save failed, rolling back: {}", e);
            self.inner.replace_data(snapshot);
            return Err(e);
        }
        Ok(out)
    }
}

fn read_data(path: &Path) -> Result<StoreData, StoreError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(serde_json::from_str(&contents)?),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("no store at {}, starting empty", path.display());
            Ok(StoreData::default())
        }
        Err(e) => Err(e.into()),
    }
}

fn memory_store(data: StoreData, pinned_now: Option<NaiveDateTime>) -> MemoryStore {
    let store = MemoryStore::from_data(data);
    match pinned_now {
        Some(now) => store.set_clock(FixedClock(now)),
        None => store,
    }
}

impl Store for JsonFileStore {
    fn add_reminder(&mut self, content: &str, time: NaiveDateTime) -> Result<String, StoreError> {
        self.commit(|store| store.add_reminder(content, time))
    }

    fn add_todo(
        &mut self,
        content: &str,
        due_date: Option<NaiveDateTime>,
    ) -> Result<String, StoreError> {
        self.commit(|store| store.add_todo(content, due_date))
    }

    fn add_note(&mut self, content: &str) -> Result<String, StoreError> {
        self.commit(|store| store.add_note(content))
    }

    fn add_message(&mut self, text: &str, role: MessageRole) -> Result<String, StoreError> {
        self.commit(|store| store.add_message(text, role))
    }

    fn reminders(&self) -> Result<Vec<ReminderRecord>, StoreError> {
        self.inner.reminders()
    }

    fn set_reminder_completed(&mut self, id: &str, completed: bool) -> Result<(), StoreError> {
        self.commit(|store| store.set_reminder_completed(id, completed))
    }

    fn todos(&self) -> Result<Vec<TodoRecord>, StoreError> {
        self.inner.todos()
    }

    fn set_todo_completed(&mut self, id: &str, completed: bool) -> Result<(), StoreError> {
        self.commit(|store| store.set_todo_completed(id, completed))
    }

    fn set_todo_due_date(
        &mut self,
        id: &str,
        due_date: Option<NaiveDateTime>,
    ) -> Result<(), StoreError> {
        self.commit(|store| store.set_todo_due_date(id, due_date))
    }

    fn add_routine(&mut self, draft: &RoutineDraft) -> Result<String, StoreError> {
        self.commit(|store| store.add_routine(draft))
    }

    fn routines(&self) -> Result<Vec<RoutineRecord>, StoreError> {
        self.inner.routines()
    }

    fn update_routine(&mut self, id: &str, draft: &RoutineDraft) -> Result<(), StoreError> {
        self.commit(|store| store.update_routine(id, draft))
    }

    fn set_routine_enabled(&mut self, id: &str, enabled: bool) -> Result<(), StoreError> {
        self.commit(|store| store.set_routine_enabled(id, enabled))
    }

    fn notes(&self) -> Result<Vec<NoteRecord>, StoreError> {
        self.inner.notes()
    }

    fn messages(&self) -> Result<Vec<ChatMessage>, StoreError> {
        self.inner.messages()
    }

    fn delete(&mut self, collection: Collection, id: &str) -> Result<(), StoreError> {
        self.commit(|store| store.delete(collection, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join(STORE_FILE), None).unwrap();
        assert!(store.reminders().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_changes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(STORE_FILE);

        let mut store = JsonFileStore::open(&path, Some(now())).unwrap();
        let id = store.add_todo("Beli susu", None).unwrap();
        store.set_todo_completed(&id, true).unwrap();
        store.add_note("Nomor loker 42").unwrap();

        let reopened = JsonFileStore::open(&path, None).unwrap();
        let todos = reopened.todos().unwrap();
        assert_eq!(todos.len(), 1);
        assert!(todos[0].is_completed);
        assert_eq!(todos[0].created_at, now());
        assert_eq!(reopened.notes().unwrap()[0].content, "Nomor loker 42");
    }

    #[test]
    fn test_reload_sees_other_writers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);

        let mut reader = JsonFileStore::open(&path, None).unwrap();
        let mut writer = JsonFileStore::open(&path, None).unwrap();
        writer.add_reminder("Minum obat", now()).unwrap();

        assert!(reader.reminders().unwrap().is_empty());
        reader.reload().unwrap();
        assert_eq!(reader.reminders().unwrap().len(), 1);
    }

    #[test]
    fn test_failed_save_leaves_no_record_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);
        let tmp = path.with_extension("json.tmp");

        let mut store = JsonFileStore::open(&path, Some(now())).unwrap();
        // a directory where the temp file goes makes every save fail
        fs::create_dir(&tmp).unwrap();
        assert!(store.add_note("gagal disimpan").is_err());
        assert!(store.notes().unwrap().is_empty());
        fs::remove_dir(&tmp).unwrap();

        store.add_note("berhasil").unwrap();
        let reopened = JsonFileStore::open(&path, None).unwrap();
        let notes: Vec<String> = reopened.notes().unwrap().into_iter().map(|n| n.content).collect();
        assert_eq!(notes, vec!["berhasil"]);
    }

    #[test]
    fn test_failed_update_restores_previous_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);

        let mut store = JsonFileStore::open(&path, Some(now())).unwrap();
        let id = store.add_todo("Bayar pajak", None).unwrap();
        fs::create_dir(path.with_extension("json.tmp")).unwrap();

        assert!(store.set_todo_completed(&id, true).is_err());
        assert!(!store.todos().unwrap()[0].is_completed);
        assert!(store.delete(Collection::Todos, &id).is_err());
        assert_eq!(store.todos().unwrap().len(), 1);
    }

    #[test]
    fn test_routines_persist() {
        use quibly_core::store::RoutineDay;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);
        let mut store = JsonFileStore::open(&path, Some(now())).unwrap();
        let id = store
            .add_routine(&RoutineDraft {
                message: "Olahraga".to_string(),
                start_date: now(),
                end_date: None,
                selected_days: vec![RoutineDay::Sat, RoutineDay::Sun],
            })
            .unwrap();
        store.set_routine_enabled(&id, false).unwrap();

        let reopened = JsonFileStore::open(&path, None).unwrap();
        let routine = reopened.routine(&id).unwrap().unwrap();
        assert_eq!(routine.selected_days, vec![RoutineDay::Sun, RoutineDay::Sat]);
        assert!(!routine.is_enabled);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            JsonFileStore::open(&path, None),
            Err(StoreError::Serialization(_))
        ));
    }
}
