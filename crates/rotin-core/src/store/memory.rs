//! In-process store, used for offline mode.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{NotesStore, RemoteCollection, Resource};
use crate::day::{DayKey, DayScoped};
use crate::error::StoreError;
use crate::notes::Subject;
use crate::schedule::ScheduleItem;
use crate::task::Task;

/// Collections kept in memory. Every operation succeeds unless an id is
/// unknown.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: Mutex<Vec<Task>>,
    schedule: Mutex<Vec<ScheduleItem>>,
    notes: Mutex<HashMap<String, Vec<Subject>>>,
}

/// Picks the slot of a [`MemoryStore`] holding `Self`.
pub trait MemorySlot: Resource {
    fn slot(store: &MemoryStore) -> &Mutex<Vec<Self>>;
}

impl MemorySlot for Task {
    fn slot(store: &MemoryStore) -> &Mutex<Vec<Self>> {
        &store.tasks
    }
}

impl MemorySlot for ScheduleItem {
    fn slot(store: &MemoryStore) -> &Mutex<Vec<Self>> {
        &store.schedule
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Transport {
        url: "memory://".to_string(),
        message: "store lock poisoned".to_string(),
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing collections.
    pub fn seeded(tasks: Vec<Task>, schedule: Vec<ScheduleItem>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
            schedule: Mutex::new(schedule),
            notes: Mutex::new(HashMap::new()),
        }
    }

    /// Preload one day's subjects.
    pub fn with_notes(self, day: &DayKey, subjects: Vec<Subject>) -> Self {
        if let Ok(mut notes) = self.notes.lock() {
            notes.insert(day.to_string(), subjects);
        }
        self
    }

    pub fn snapshot<T: MemorySlot>(&self) -> Vec<T> {
        T::slot(self).lock().map(|g| g.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl<T: MemorySlot> RemoteCollection<T> for MemoryStore {
    async fn list(&self) -> Result<Vec<T>, StoreError> {
        Ok(T::slot(self).lock().map_err(poisoned)?.clone())
    }

    async fn create(&self, item: &T) -> Result<T, StoreError> {
        let mut items = T::slot(self).lock().map_err(poisoned)?;
        match items.iter_mut().find(|i| i.id() == item.id()) {
            Some(existing) => *existing = item.clone(),
            None => items.push(item.clone()),
        }
        Ok(item.clone())
    }

    async fn update(&self, id: &str, item: &T) -> Result<T, StoreError> {
        let mut items = T::slot(self).lock().map_err(poisoned)?;
        let existing = items
            .iter_mut()
            .find(|i| i.id() == id)
            .ok_or_else(|| StoreError::NotFound {
                kind: T::KIND,
                id: id.to_string(),
            })?;
        *existing = item.clone();
        Ok(item.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut items = T::slot(self).lock().map_err(poisoned)?;
        let before = items.len();
        items.retain(|i| i.id() != id);
        if items.len() == before {
            return Err(StoreError::NotFound {
                kind: T::KIND,
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl NotesStore for MemoryStore {
    async fn list_notes(&self, day: &DayKey) -> Result<Vec<Subject>, StoreError> {
        let notes = self.notes.lock().map_err(poisoned)?;
        Ok(notes.get(&day.to_string()).cloned().unwrap_or_default())
    }

    async fn save_notes(&self, day: &DayKey, subjects: &[Subject]) -> Result<Vec<Subject>, StoreError> {
        let mut notes = self.notes.lock().map_err(poisoned)?;
        notes.insert(day.to_string(), subjects.to_vec());
        Ok(subjects.to_vec())
    }
}
