pub mod auth;
pub mod cache;
pub mod config;
pub mod day;
pub mod notes;
pub mod schedule;
pub mod stats;
pub mod task;

use std::sync::Arc;

use rotin_core::storage::config::NotesConfig;
use rotin_core::{
    Clock, Config, DayCollection, DayKey, HttpStore, LocalCache, MemoryStore, NotesStore,
    RecordingNotifier, RemoteCollection, Routine, ScheduleItem, SubjectNotes, SystemClock, Task,
};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Everything a data command needs: cache, stores, clock and the notices
/// produced along the way.
pub struct Context {
    pub cache: Arc<LocalCache>,
    pub notices: Arc<RecordingNotifier>,
    pub clock: Arc<dyn Clock>,
    stores: Stores,
    notes_config: NotesConfig,
}

/// One backing store seen through each contract.
struct Stores {
    tasks: Arc<dyn RemoteCollection<Task>>,
    schedule: Arc<dyn RemoteCollection<ScheduleItem>>,
    notes: Arc<dyn NotesStore>,
}

impl Stores {
    fn sharing<S>(store: Arc<S>) -> Self
    where
        S: RemoteCollection<Task> + RemoteCollection<ScheduleItem> + NotesStore + 'static,
    {
        Self {
            tasks: store.clone(),
            schedule: store.clone(),
            notes: store,
        }
    }
}

impl Context {
    /// Open the cache and pick the stores. Offline (or with the remote
    /// disabled) everything runs against an in-memory store seeded from the
    /// cache.
    pub fn open(config: &Config, offline: bool) -> Result<Self, Box<dyn std::error::Error>> {
        let cache = Arc::new(LocalCache::open()?);
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let stores = if offline || !config.remote.enabled {
            let today = clock.today_key();
            tracing::debug!("running offline");
            Stores::sharing(Arc::new(MemoryStore::seeded(
                cache.load_collection(today),
                cache.load_collection(today),
            )))
        } else {
            let store = HttpStore::new(&config.remote)?;
            tracing::debug!(base_url = %store.base_url(), "using remote store");
            Stores::sharing(Arc::new(store))
        };

        Ok(Self {
            cache,
            notices: Arc::new(RecordingNotifier::new()),
            clock,
            stores,
            notes_config: config.notes.clone(),
        })
    }

    pub fn today(&self) -> DayKey {
        self.clock.today_key()
    }

    /// `--day` if given, else today.
    pub fn day_or_today(&self, day: Option<&str>) -> Result<DayKey, Box<dyn std::error::Error>> {
        match day {
            Some(day) => Ok(DayKey::parse(day)?),
            None => Ok(self.today()),
        }
    }

    /// Both collections, loaded from the cache and refreshed from the store.
    /// A failed refresh leaves the cached lists in place.
    pub async fn routine(&self) -> Routine {
        let routine = Routine::new(
            DayCollection::new(self.stores.tasks.clone(), self.notices.clone())
                .with_cache(self.cache.clone()),
            DayCollection::new(self.stores.schedule.clone(), self.notices.clone())
                .with_cache(self.cache.clone()),
            self.clock.clone(),
        );
        if let Err(e) = routine.mount().await {
            tracing::warn!(error = %e, "refresh failed, using cached collections");
        }
        routine
    }

    pub fn subject_notes(&self) -> SubjectNotes {
        SubjectNotes::new(
            self.stores.notes.clone(),
            Some(self.cache.clone()),
            self.notices.clone(),
            self.clock.clone(),
            &self.notes_config,
        )
    }

    /// Print collected notices to stderr, one per line.
    pub fn print_notices(&self) {
        for notice in self.notices.take() {
            match notice.description {
                Some(description) => eprintln!("{}: {description}", notice.title),
                None => eprintln!("{}", notice.title),
            }
        }
    }
}

pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
