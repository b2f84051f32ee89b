//! Per-day subject notes.
//!
//! Every day has its own list of subjects, each holding free-form notes. An
//! empty day is seeded with the configured subjects. Structural changes
//! (create, rename, remove) are saved at once; note content is saved after
//! a quiet period, or immediately when the editor closes or the day changes.

pub mod debounce;

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use debounce::Debouncer;

use crate::clock::Clock;
use crate::day::DayKey;
use crate::error::{CoreError, Result, ValidationError};
use crate::manager::ERROR_TITLE;
use crate::notice::{Notice, Notifier};
use crate::storage::config::NotesConfig;
use crate::storage::{keys, LocalCache};
use crate::store::NotesStore;

const KIND: &str = "Subject";

/// One subject and its notes. The title may start with an emoji.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Epoch milliseconds of the last change
    #[serde(rename = "updatedAt", default)]
    pub updated_at: i64,
}

/// Save indicator shown next to the subject list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SaveStatus {
    /// Nothing saved since the day was opened
    Idle,
    /// Edits waiting for, or in, a save
    Saving,
    Saved { at: i64 },
}

#[derive(Debug, Default)]
struct State {
    day: Option<DayKey>,
    subjects: Vec<Subject>,
    active: Option<String>,
    editing: Option<String>,
    saving: bool,
    last_saved_at: Option<i64>,
}

/// Parts shared with the debounced save task.
struct Shared {
    store: Arc<dyn NotesStore>,
    cache: Option<Arc<LocalCache>>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    state: Mutex<State>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn cache_subjects(&self, day: &DayKey, subjects: &[Subject]) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.save_json(&keys::subjects(day), subjects) {
                tracing::warn!(%day, error = %e, "failed to cache subjects");
            }
        }
    }

    /// Write `subjects` to the cache and the remote store.
    async fn push(&self, day: DayKey, subjects: Vec<Subject>) -> Result<()> {
        self.cache_subjects(&day, &subjects);
        match self.store.save_notes(&day, &subjects).await {
            Ok(_) => Ok(()),
            Err(e) => {
                let err = CoreError::from(e);
                self.notifier
                    .notify(Notice::error(ERROR_TITLE, err.notice_detail()));
                Err(err)
            }
        }
    }

    /// Save whatever `day` currently holds. A no-op once another day is open.
    async fn flush(&self, day: DayKey) -> Result<()> {
        let subjects = {
            let mut state = self.lock();
            if state.day != Some(day) {
                return Ok(());
            }
            state.saving = true;
            state.subjects.clone()
        };

        let outcome = self.push(day, subjects).await;

        let mut state = self.lock();
        if state.day == Some(day) {
            state.saving = false;
            if outcome.is_ok() {
                state.last_saved_at = Some(self.clock.now_millis());
            }
        }
        tracing::debug!(%day, ok = outcome.is_ok(), "notes flushed");
        outcome
    }
}

/// Subject notes of the selected day.
pub struct SubjectNotes {
    shared: Arc<Shared>,
    debouncer: Debouncer,
    seeds: Vec<String>,
}

impl SubjectNotes {
    pub fn new(
        store: Arc<dyn NotesStore>,
        cache: Option<Arc<LocalCache>>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        config: &NotesConfig,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                store,
                cache,
                notifier,
                clock,
                state: Mutex::new(State::default()),
            }),
            debouncer: Debouncer::new(Duration::from_millis(config.debounce_ms)),
            seeds: config.seed_subjects.clone(),
        }
    }

    fn new_subject(&self, title: String) -> Subject {
        Subject {
            id: Uuid::new_v4().to_string(),
            title,
            content: String::new(),
            updated_at: self.shared.clock.now_millis(),
        }
    }

    fn unknown(id: &str) -> CoreError {
        ValidationError::UnknownId {
            kind: KIND,
            id: id.to_string(),
        }
        .into()
    }

    fn remember_active(&self, day: &DayKey, id: Option<&str>) {
        let Some(cache) = &self.shared.cache else {
            return;
        };
        let key = keys::active_subject(day);
        let outcome = match id {
            Some(id) => cache.set(&key, id),
            None => cache.remove(&key),
        };
        if let Err(e) = outcome {
            tracing::warn!(%day, error = %e, "failed to remember active subject");
        }
    }

    fn cached_subjects(&self, day: &DayKey) -> Vec<Subject> {
        self.shared
            .cache
            .as_ref()
            .and_then(|cache| cache.load_json(&keys::subjects(day)))
            .unwrap_or_default()
    }

    fn cached_active(&self, day: &DayKey, subjects: &[Subject]) -> Option<String> {
        let remembered = self
            .shared
            .cache
            .as_ref()
            .and_then(|cache| cache.get(&keys::active_subject(day)).ok().flatten())
            .filter(|id| subjects.iter().any(|s| &s.id == id));
        remembered.or_else(|| subjects.first().map(|s| s.id.clone()))
    }

    async fn load(&self, day: &DayKey) -> Vec<Subject> {
        match self.shared.store.list_notes(day).await {
            Ok(remote) if !remote.is_empty() => {
                self.shared.cache_subjects(day, &remote);
                remote
            }
            Ok(_) => self.cached_subjects(day),
            Err(e) => {
                tracing::warn!(%day, error = %e, "loading notes failed, using cache");
                let err = CoreError::from(e);
                self.shared
                    .notifier
                    .notify(Notice::error(ERROR_TITLE, err.notice_detail()));
                self.cached_subjects(day)
            }
        }
    }

    /// Make `day` the open day.
    ///
    /// Pending edits of the previous day are saved first. A day without
    /// subjects gets the configured seed subjects, which are saved right away.
    pub async fn open(&self, day: DayKey) -> Vec<Subject> {
        if let Err(e) = self.flush().await {
            tracing::warn!(error = %e, "saving previous day failed");
        }

        let loaded = self.load(&day).await;
        let seeded = loaded.is_empty();
        let subjects = if seeded {
            self.seeds
                .iter()
                .map(|title| self.new_subject(title.clone()))
                .collect()
        } else {
            loaded
        };
        let active = self.cached_active(&day, &subjects);

        *self.shared.lock() = State {
            day: Some(day),
            subjects: subjects.clone(),
            active: active.clone(),
            ..State::default()
        };
        self.remember_active(&day, active.as_deref());

        if seeded {
            tracing::info!(%day, count = subjects.len(), "seeding subjects");
            if let Err(e) = self.shared.push(day, subjects.clone()).await {
                tracing::debug!(%day, error = %e, "seed save failed, keeping seeds local");
            }
        }
        subjects
    }

    pub fn day(&self) -> Option<DayKey> {
        self.shared.lock().day
    }

    pub fn subjects(&self) -> Vec<Subject> {
        self.shared.lock().subjects.clone()
    }

    /// The remembered subject, or the first one.
    pub fn active(&self) -> Option<Subject> {
        let state = self.shared.lock();
        state
            .active
            .as_ref()
            .and_then(|id| state.subjects.iter().find(|s| &s.id == id))
            .or_else(|| state.subjects.first())
            .cloned()
    }

    /// Id of the subject open in the editor.
    pub fn editing(&self) -> Option<String> {
        self.shared.lock().editing.clone()
    }

    pub fn status(&self) -> SaveStatus {
        let state = self.shared.lock();
        if state.saving {
            SaveStatus::Saving
        } else if let Some(at) = state.last_saved_at {
            SaveStatus::Saved { at }
        } else {
            SaveStatus::Idle
        }
    }

    /// Add a subject at the top of the list and make it active.
    ///
    /// The stored title is `"<emoji> <title>"` when an emoji is given.
    pub async fn create(&self, emoji: Option<&str>, title: &str) -> Result<Subject> {
        let name = title.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyTitle("Informe o nome do assunto").into());
        }
        let title = match emoji.map(str::trim).filter(|e| !e.is_empty()) {
            Some(emoji) => format!("{emoji} {name}"),
            None => name.to_string(),
        };
        let subject = self.new_subject(title);

        let (day, snapshot) = {
            let mut state = self.shared.lock();
            let day = state.day.ok_or(ValidationError::NoOpenDay)?;
            state.subjects.insert(0, subject.clone());
            state.active = Some(subject.id.clone());
            (day, state.subjects.clone())
        };
        self.remember_active(&day, Some(&subject.id));
        self.shared.push(day, snapshot).await?;
        Ok(subject)
    }

    pub async fn rename(&self, id: &str, title: &str) -> Result<Subject> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle("Informe o nome do assunto").into());
        }
        let now = self.shared.clock.now_millis();

        let (day, renamed, snapshot) = {
            let mut state = self.shared.lock();
            let day = state.day.ok_or(ValidationError::NoOpenDay)?;
            let subject = state
                .subjects
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or_else(|| Self::unknown(id))?;
            subject.title = title.to_string();
            subject.updated_at = now;
            let renamed = subject.clone();
            (day, renamed, state.subjects.clone())
        };
        self.shared.push(day, snapshot).await?;
        Ok(renamed)
    }

    /// Delete a subject and its notes. If it was active, the first remaining
    /// subject becomes active.
    pub async fn remove(&self, id: &str) -> Result<()> {
        let (day, active, snapshot) = {
            let mut state = self.shared.lock();
            let day = state.day.ok_or(ValidationError::NoOpenDay)?;
            if !state.subjects.iter().any(|s| s.id == id) {
                return Err(Self::unknown(id));
            }
            state.subjects.retain(|s| s.id != id);
            if state.editing.as_deref() == Some(id) {
                state.editing = None;
                self.debouncer.cancel();
            }
            if state.active.as_deref() == Some(id) || state.active.is_none() {
                state.active = state.subjects.first().map(|s| s.id.clone());
            }
            (day, state.active.clone(), state.subjects.clone())
        };
        self.remember_active(&day, active.as_deref());
        self.shared.push(day, snapshot).await
    }

    pub fn select(&self, id: &str) -> Result<()> {
        let day = {
            let mut state = self.shared.lock();
            let day = state.day.ok_or(ValidationError::NoOpenDay)?;
            if !state.subjects.iter().any(|s| s.id == id) {
                return Err(Self::unknown(id));
            }
            state.active = Some(id.to_string());
            day
        };
        self.remember_active(&day, Some(id));
        Ok(())
    }

    /// Open a subject in the editor; it also becomes active.
    pub fn open_editor(&self, id: &str) -> Result<Subject> {
        self.select(id)?;
        let mut state = self.shared.lock();
        state.editing = Some(id.to_string());
        state
            .subjects
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| Self::unknown(id))
    }

    /// Replace the content of the subject in the editor.
    ///
    /// Takes effect locally at once; the save runs after the configured quiet
    /// period, restarted by every call.
    pub fn edit(&self, content: impl Into<String>) -> Result<()> {
        let now = self.shared.clock.now_millis();
        let day = {
            let mut state = self.shared.lock();
            let day = state.day.ok_or(ValidationError::NoOpenDay)?;
            let id = state.editing.clone().ok_or(ValidationError::NoOpenEditor)?;
            let subject = state
                .subjects
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or_else(|| Self::unknown(&id))?;
            subject.content = content.into();
            subject.updated_at = now;
            state.saving = true;
            day
        };

        let shared = Arc::clone(&self.shared);
        self.debouncer.schedule(async move {
            if let Err(e) = shared.flush(day).await {
                tracing::warn!(%day, error = %e, "debounced notes save failed");
            }
        });
        Ok(())
    }

    /// Close the editor, saving immediately.
    pub async fn close_editor(&self) -> Result<()> {
        let (day, was_editing) = {
            let mut state = self.shared.lock();
            (state.day, state.editing.take().is_some())
        };
        let Some(day) = day else {
            return Ok(());
        };
        if !was_editing {
            return Ok(());
        }
        self.debouncer.cancel();
        self.shared.flush(day).await
    }

    /// Save now if an edit is waiting for its quiet period.
    pub async fn flush(&self) -> Result<()> {
        if !self.debouncer.cancel() {
            return Ok(());
        }
        match self.day() {
            Some(day) => self.shared.flush(day).await,
            None => Ok(()),
        }
    }
}
