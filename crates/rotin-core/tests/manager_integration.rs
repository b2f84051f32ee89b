//! Integration tests for the day-scoped collection manager.
//!
//! A gated store holds each remote call until the test releases it, so the
//! local state can be observed while a call is in flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rotin_core::error::StoreError;
use rotin_core::store::Resource;
use rotin_core::{
    DayCollection, DayKey, LocalCache, MemoryStore, RecordingNotifier, RemoteCollection,
    ScheduleDraft, ScheduleItem, Task, TaskDraft, TaskPatch,
};
use tokio::sync::Semaphore;

/// Wraps a [`MemoryStore`]; every call waits for a permit and then fails
/// while `failing` is set.
struct GatedStore {
    inner: MemoryStore,
    gate: Semaphore,
    failing: AtomicBool,
}

impl GatedStore {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            gate: Semaphore::new(0),
            failing: AtomicBool::new(false),
        }
    }

    fn release(&self, calls: usize) {
        self.gate.add_permits(calls);
    }

    fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    async fn pass(&self) -> Result<(), StoreError> {
        self.gate
            .acquire()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?
            .forget();
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Status {
                status: 503,
                detail: Some("backend offline".into()),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl<T> RemoteCollection<T> for GatedStore
where
    T: Resource,
    MemoryStore: RemoteCollection<T>,
{
    async fn list(&self) -> Result<Vec<T>, StoreError> {
        self.pass().await?;
        RemoteCollection::<T>::list(&self.inner).await
    }

    async fn create(&self, item: &T) -> Result<T, StoreError> {
        self.pass().await?;
        RemoteCollection::<T>::create(&self.inner, item).await
    }

    async fn update(&self, id: &str, item: &T) -> Result<T, StoreError> {
        self.pass().await?;
        RemoteCollection::<T>::update(&self.inner, id, item).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.pass().await?;
        RemoteCollection::<T>::delete(&self.inner, id).await
    }
}

fn day() -> DayKey {
    DayKey::parse("2024-01-01").unwrap()
}

fn tasks_over(store: &Arc<GatedStore>) -> (Arc<DayCollection<Task>>, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let tasks = DayCollection::new(store.clone(), notifier.clone());
    (Arc::new(tasks), notifier)
}

/// Yield until `check` holds, giving spawned operations a chance to run.
async fn settle(check: impl Fn() -> bool) {
    for _ in 0..100 {
        if check() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition never held");
}

#[tokio::test]
async fn toggle_is_visible_before_remote_answers_and_reverts_on_failure() {
    let store = Arc::new(GatedStore::new());
    let (tasks, notifier) = tasks_over(&store);
    store.release(1);
    let task = tasks.create(TaskDraft::new("Ler"), day()).await.unwrap();
    notifier.take();

    store.fail(true);

    let pending = tokio::spawn({
        let tasks = tasks.clone();
        let id = task.id.clone();
        async move { tasks.toggle(&id).await }
    });
    settle(|| tasks.get(&task.id).is_some_and(|t| t.completed)).await;

    store.release(1);
    assert!(pending.await.unwrap().is_err());
    assert!(!tasks.get(&task.id).unwrap().completed);

    let errors = notifier.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].title, "Erro");
    assert_eq!(errors[0].description.as_deref(), Some("backend offline"));
}

#[tokio::test]
async fn edit_waits_for_remote_and_leaves_state_on_failure() {
    let store = Arc::new(GatedStore::new());
    let (tasks, notifier) = tasks_over(&store);
    store.release(1);
    let task = tasks.create(TaskDraft::new("Ler"), day()).await.unwrap();

    let pending = tokio::spawn({
        let tasks = tasks.clone();
        let id = task.id.clone();
        async move {
            let patch = TaskPatch {
                title: Some("Ler mais".into()),
                time: None,
            };
            tasks.edit(&id, &patch).await
        }
    });
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert_eq!(tasks.get(&task.id).unwrap().title, "Ler");

    store.release(1);
    let edited = pending.await.unwrap().unwrap();
    assert_eq!(edited.title, "Ler mais");
    assert_eq!(tasks.get(&task.id).unwrap().title, "Ler mais");
    assert_eq!(notifier.take().last().unwrap().title, "Tarefa atualizada");

    store.fail(true);
    store.release(1);
    let patch = TaskPatch {
        title: Some("Outro".into()),
        time: None,
    };
    assert!(tasks.edit(&task.id, &patch).await.is_err());
    assert_eq!(tasks.get(&task.id).unwrap().title, "Ler mais");
}

#[tokio::test]
async fn failed_delete_restores_whole_collection() {
    let store = Arc::new(GatedStore::new());
    let (tasks, _) = tasks_over(&store);
    store.release(2);
    let a = tasks.create(TaskDraft::new("a"), day()).await.unwrap();
    tasks.create(TaskDraft::new("b"), day()).await.unwrap();
    let before = tasks.all();

    store.fail(true);
    let pending = tokio::spawn({
        let tasks = tasks.clone();
        let id = a.id.clone();
        async move { tasks.delete(&id).await }
    });
    settle(|| tasks.all().len() == 1).await;

    store.release(1);
    assert!(pending.await.unwrap().is_err());
    assert_eq!(tasks.all(), before);
}

#[tokio::test]
async fn failed_create_is_rolled_back() {
    let store = Arc::new(GatedStore::new());
    store.fail(true);
    store.release(1);
    let notifier = Arc::new(RecordingNotifier::new());
    let schedule: DayCollection<ScheduleItem> = DayCollection::new(store.clone(), notifier.clone());

    let draft = ScheduleDraft::new("Leitura", Default::default()).at("07:00");
    assert!(schedule.create(draft, day()).await.is_err());
    assert!(schedule.all().is_empty());
    assert_eq!(notifier.errors().len(), 1);
}

#[tokio::test]
async fn toggles_on_different_items_overlap() {
    let store = Arc::new(GatedStore::new());
    let (tasks, _) = tasks_over(&store);
    store.release(2);
    let a = tasks.create(TaskDraft::new("a"), day()).await.unwrap();
    let b = tasks.create(TaskDraft::new("b"), day()).await.unwrap();

    let first = tokio::spawn({
        let tasks = tasks.clone();
        let id = a.id.clone();
        async move { tasks.toggle(&id).await }
    });
    let second = tokio::spawn({
        let tasks = tasks.clone();
        let id = b.id.clone();
        async move { tasks.toggle(&id).await }
    });
    settle(|| tasks.all().iter().all(|t| t.completed)).await;

    store.release(2);
    assert!(first.await.unwrap().unwrap().completed);
    assert!(second.await.unwrap().unwrap().completed);
}

#[tokio::test]
async fn failed_refresh_keeps_cached_collection() {
    let store = Arc::new(GatedStore::new());
    store.fail(true);
    store.release(1);
    let cache = Arc::new(LocalCache::open_memory().unwrap());
    let notifier = Arc::new(RecordingNotifier::new());
    let tasks = DayCollection::<Task>::new(store, notifier.clone()).with_cache(cache);

    assert!(tasks.mount(day()).await.is_err());
    assert_eq!(tasks.all().len(), 4);
    assert_eq!(notifier.errors().len(), 1);
}

#[tokio::test]
async fn write_through_survives_restart() {
    let cache = Arc::new(LocalCache::open_memory().unwrap());
    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(RecordingNotifier::new());

    let tasks = DayCollection::<Task>::new(store.clone(), notifier.clone()).with_cache(cache.clone());
    tasks.load_cached(day());
    let created = tasks.create(TaskDraft::new("Persistida"), day()).await.unwrap();
    tasks.toggle(&created.id).await.unwrap();

    let reloaded = DayCollection::<Task>::new(store, notifier).with_cache(cache);
    reloaded.load_cached(day());
    assert!(reloaded.get(&created.id).unwrap().completed);
}
