//! Day-scoped collection with remote mirroring.
//!
//! Each operation has a fixed reconciliation discipline:
//!
//! | Operation | Local change            | On remote failure              |
//! |-----------|-------------------------|--------------------------------|
//! | create    | before the remote call  | the inserted item is removed   |
//! | toggle    | before the remote call  | the item gets its old value    |
//! | edit      | after remote success    | nothing to undo                |
//! | delete    | before the remote call  | the whole prior list returns   |
//!
//! The item lock is never held across an await, so operations on different
//! items can be in flight together. Nothing deduplicates concurrent calls on
//! the same item: the last response to land wins.

use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use crate::day::{DayKey, DayScoped};
use crate::error::{CoreError, Result, ValidationError};
use crate::notice::{Notice, Notifier};
use crate::schedule::{ScheduleDraft, ScheduleItem, SchedulePatch};
use crate::storage::LocalCache;
use crate::store::{RemoteCollection, Resource};
use crate::task::{Task, TaskDraft, TaskPatch};

/// Title of every failure notice.
pub const ERROR_TITLE: &str = "Erro";

/// A collection kind the manager can create and edit.
pub trait Managed: Resource {
    type Draft: Send;
    type Patch: Send + Sync;

    /// Notice shown after a successful create.
    fn created_notice() -> Notice;
    /// Notice shown after a successful edit.
    fn updated_notice() -> Notice;
    /// Notice shown after a successful delete.
    fn removed_notice() -> Notice;

    fn build(draft: Self::Draft, id: String, day: DayKey) -> Result<Self, ValidationError>;

    fn patched(&self, patch: &Self::Patch) -> Result<Self, ValidationError>;
}

impl Managed for Task {
    type Draft = TaskDraft;
    type Patch = TaskPatch;

    fn created_notice() -> Notice {
        Notice::info("Tarefa criada").with_description("Tarefa adicionada com sucesso")
    }

    fn updated_notice() -> Notice {
        Notice::info("Tarefa atualizada")
    }

    fn removed_notice() -> Notice {
        Notice::info("Tarefa removida")
    }

    fn build(draft: TaskDraft, id: String, day: DayKey) -> Result<Self, ValidationError> {
        draft.into_task(id, day)
    }

    fn patched(&self, patch: &TaskPatch) -> Result<Self, ValidationError> {
        patch.apply(self)
    }
}

impl Managed for ScheduleItem {
    type Draft = ScheduleDraft;
    type Patch = SchedulePatch;

    fn created_notice() -> Notice {
        Notice::info("Bloco criado").with_description("Cronograma atualizado")
    }

    fn updated_notice() -> Notice {
        Notice::info("Bloco atualizado")
    }

    fn removed_notice() -> Notice {
        Notice::info("Bloco removido").with_description("O bloco foi excluído com sucesso")
    }

    fn build(draft: ScheduleDraft, id: String, day: DayKey) -> Result<Self, ValidationError> {
        draft.into_item(id, day)
    }

    fn patched(&self, patch: &SchedulePatch) -> Result<Self, ValidationError> {
        patch.apply(self)
    }
}

/// Client-held copy of one remote collection.
pub struct DayCollection<T: Managed> {
    items: Mutex<Vec<T>>,
    store: Arc<dyn RemoteCollection<T>>,
    cache: Option<Arc<LocalCache>>,
    notifier: Arc<dyn Notifier>,
}

impl<T: Managed> DayCollection<T> {
    pub fn new(store: Arc<dyn RemoteCollection<T>>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            store,
            cache: None,
            notifier,
        }
    }

    /// Write every local change through to `cache`.
    pub fn with_cache(mut self, cache: Arc<LocalCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        match self.items.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn persist(&self) {
        let Some(cache) = &self.cache else {
            return;
        };
        let snapshot = self.all();
        if let Err(e) = cache.save_collection(&snapshot) {
            tracing::warn!(kind = T::KIND, error = %e, "cache write-through failed");
        }
    }

    fn fail(&self, err: impl Into<CoreError>) -> CoreError {
        let err = err.into();
        self.notifier
            .notify(Notice::error(ERROR_TITLE, err.notice_detail()));
        err
    }

    fn unknown(&self, id: &str) -> CoreError {
        self.fail(ValidationError::UnknownId {
            kind: T::KIND,
            id: id.to_string(),
        })
    }

    /// Replace the item with `id`, if still present.
    fn put(&self, id: &str, item: T) {
        let mut items = self.lock();
        if let Some(slot) = items.iter_mut().find(|i| i.id() == id) {
            *slot = item;
        }
    }

    /// Load the cached collection (or the starter list) into memory.
    pub fn load_cached(&self, today: DayKey) {
        let loaded = match &self.cache {
            Some(cache) => cache.load_collection(today),
            None => Vec::new(),
        };
        *self.lock() = loaded;
    }

    /// Show the cached list, then replace it with the remote one.
    ///
    /// # Errors
    /// Returns the refresh failure; the cached list stays loaded.
    pub async fn mount(&self, today: DayKey) -> Result<()> {
        self.load_cached(today);
        self.refresh().await
    }

    /// Replace local state with the remote list. On failure the local list
    /// stays as it was.
    pub async fn refresh(&self) -> Result<()> {
        match self.store.list().await {
            Ok(remote) => {
                tracing::debug!(kind = T::KIND, count = remote.len(), "refreshed from remote");
                *self.lock() = remote;
                self.persist();
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Everything, dated or not.
    pub fn all(&self) -> Vec<T> {
        self.lock().clone()
    }

    /// Items shown for `day`: the ones dated that day plus every dayless one.
    pub fn visible(&self, day: &DayKey) -> Vec<T> {
        let selected = day.to_string();
        self.lock()
            .iter()
            .filter(|i| i.visible_on(&selected))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.lock().iter().find(|i| i.id() == id).cloned()
    }

    /// Create an item stamped with `day`.
    ///
    /// Appended locally at once; removed again if the remote create fails.
    pub async fn create(&self, draft: T::Draft, day: DayKey) -> Result<T> {
        let item = T::build(draft, Uuid::new_v4().to_string(), day).map_err(|e| self.fail(e))?;
        let id = item.id().to_string();

        self.lock().push(item.clone());
        self.persist();

        match self.store.create(&item).await {
            Ok(saved) => {
                self.put(&id, saved.clone());
                self.persist();
                self.notifier.notify(T::created_notice());
                Ok(saved)
            }
            Err(e) => {
                tracing::warn!(kind = T::KIND, %id, "create failed, removing local copy");
                self.lock().retain(|i| i.id() != id);
                self.persist();
                Err(self.fail(e))
            }
        }
    }

    /// Flip `completed`, locally first.
    pub async fn toggle(&self, id: &str) -> Result<T> {
        let (before, after) = {
            let mut items = self.lock();
            let Some(item) = items.iter_mut().find(|i| i.id() == id) else {
                drop(items);
                return Err(self.unknown(id));
            };
            let before = item.clone();
            item.set_completed(!before.is_completed());
            (before, item.clone())
        };
        self.persist();

        match self.store.update(id, &after).await {
            Ok(saved) => {
                self.put(id, saved.clone());
                self.persist();
                Ok(saved)
            }
            Err(e) => {
                tracing::warn!(kind = T::KIND, %id, "toggle failed, reverting");
                self.put(id, before);
                self.persist();
                Err(self.fail(e))
            }
        }
    }

    /// Apply `patch` once the remote side has accepted it.
    pub async fn edit(&self, id: &str, patch: &T::Patch) -> Result<T> {
        let Some(current) = self.get(id) else {
            return Err(self.unknown(id));
        };
        let next = current.patched(patch).map_err(|e| self.fail(e))?;

        match self.store.update(id, &next).await {
            Ok(saved) => {
                self.put(id, saved.clone());
                self.persist();
                self.notifier.notify(T::updated_notice());
                Ok(saved)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Remove locally first; restore the whole prior list on failure.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let prior = {
            let mut items = self.lock();
            if !items.iter().any(|i| i.id() == id) {
                drop(items);
                return Err(self.unknown(id));
            }
            let prior = items.clone();
            items.retain(|i| i.id() != id);
            prior
        };
        self.persist();

        match self.store.delete(id).await {
            Ok(()) => {
                self.notifier.notify(T::removed_notice());
                Ok(())
            }
            Err(e) => {
                tracing::warn!(kind = T::KIND, %id, "delete failed, restoring collection");
                *self.lock() = prior;
                self.persist();
                Err(self.fail(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::RecordingNotifier;
    use crate::store::MemoryStore;

    fn day() -> DayKey {
        DayKey::parse("2024-01-01").unwrap()
    }

    fn collection() -> (DayCollection<Task>, Arc<MemoryStore>, Arc<RecordingNotifier>) {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let tasks = DayCollection::new(store.clone(), notifier.clone());
        (tasks, store, notifier)
    }

    #[tokio::test]
    async fn create_stamps_selected_day() {
        let (tasks, store, notifier) = collection();
        let task = tasks.create(TaskDraft::new("Ler"), day()).await.unwrap();
        assert_eq!(task.day.as_deref(), Some("2024-01-01"));
        assert_eq!(store.snapshot::<Task>().len(), 1);
        assert_eq!(notifier.take()[0].title, "Tarefa criada");
    }

    #[tokio::test]
    async fn create_generates_unique_ids() {
        let (tasks, _, _) = collection();
        let a = tasks.create(TaskDraft::new("a"), day()).await.unwrap();
        let b = tasks.create(TaskDraft::new("b"), day()).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn blank_title_is_reported() {
        let (tasks, _, notifier) = collection();
        assert!(tasks.create(TaskDraft::new(" "), day()).await.is_err());
        assert!(tasks.all().is_empty());
        let errors = notifier.errors();
        assert_eq!(errors[0].description.as_deref(), Some("Informe o assunto da tarefa"));
    }

    #[tokio::test]
    async fn unknown_id_is_reported() {
        let (tasks, _, notifier) = collection();
        assert!(tasks.toggle("missing").await.is_err());
        assert!(tasks.delete("missing").await.is_err());
        assert_eq!(notifier.errors().len(), 2);
    }

    #[tokio::test]
    async fn visible_includes_dayless_items() {
        let (tasks, store, _) = collection();
        RemoteCollection::<Task>::create(
            store.as_ref(),
            &Task {
                id: "free".into(),
                title: "Sempre".into(),
                completed: false,
                time: None,
                day: None,
            },
        )
        .await
        .unwrap();
        tasks.refresh().await.unwrap();
        tasks.create(TaskDraft::new("Hoje"), day()).await.unwrap();

        assert_eq!(tasks.visible(&day()).len(), 2);
        assert_eq!(tasks.visible(&day().succ()).len(), 1);
    }

    #[tokio::test]
    async fn write_through_reaches_cache() {
        let (tasks, _, _) = collection();
        let cache = Arc::new(LocalCache::open_memory().unwrap());
        let tasks = tasks.with_cache(cache.clone());
        tasks.load_cached(day());
        assert_eq!(tasks.all().len(), 4);
        let created = tasks.create(TaskDraft::new("Nova"), day()).await.unwrap();
        let cached: Vec<Task> = cache.load_collection(day());
        assert!(cached.iter().any(|t| t.id == created.id));
    }
}
