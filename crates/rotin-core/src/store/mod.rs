//! Remote stores mirroring the client-held collections.
//!
//! Tasks and schedule blocks use per-item CRUD; subject notes are replaced
//! wholesale per day.

pub mod http;
pub mod memory;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::day::{DayKey, DayScoped};
use crate::error::StoreError;
use crate::notes::Subject;
use crate::schedule::ScheduleItem;
use crate::task::Task;

pub use http::HttpStore;
pub use memory::MemoryStore;

/// A collection kind the remote side knows about.
pub trait Resource: DayScoped + Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// URL path segment, e.g. `tasks`.
    const PATH: &'static str;
    /// Name used in messages.
    const KIND: &'static str;
    /// Key of the local cache entry holding this collection.
    const CACHE_KEY: &'static str;

    /// Built-in collection used when nothing usable is cached.
    fn starter(today: DayKey) -> Vec<Self>;
}

impl Resource for Task {
    const PATH: &'static str = "tasks";
    const KIND: &'static str = "Task";
    const CACHE_KEY: &'static str = crate::storage::keys::TASKS;

    fn starter(today: DayKey) -> Vec<Self> {
        crate::storage::defaults::default_tasks(today)
    }
}

impl Resource for ScheduleItem {
    const PATH: &'static str = "schedule";
    const KIND: &'static str = "Schedule item";
    const CACHE_KEY: &'static str = crate::storage::keys::SCHEDULE;

    fn starter(today: DayKey) -> Vec<Self> {
        crate::storage::defaults::default_schedule(today)
    }
}

/// Per-item CRUD over one remote collection.
#[async_trait]
pub trait RemoteCollection<T: Resource>: Send + Sync {
    async fn list(&self) -> Result<Vec<T>, StoreError>;

    async fn create(&self, item: &T) -> Result<T, StoreError>;

    async fn update(&self, id: &str, item: &T) -> Result<T, StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// Day-partitioned subject notes, saved as a whole list.
#[async_trait]
pub trait NotesStore: Send + Sync {
    async fn list_notes(&self, day: &DayKey) -> Result<Vec<Subject>, StoreError>;

    async fn save_notes(&self, day: &DayKey, subjects: &[Subject]) -> Result<Vec<Subject>, StoreError>;
}
