//! # Rotin Core Library
//!
//! This library provides the core logic for Rotin, a personal daily-routine
//! tracker. All operations are available via the standalone `rotin` CLI,
//! which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Collections**: tasks and schedule blocks held client-side, filtered by
//!   day and mirrored to a remote store with optimistic or pessimistic
//!   reconciliation per operation
//! - **Stats**: pure streak and monthly aggregation over the collections
//! - **Notes**: per-day subjects with debounced saving
//! - **Storage**: SQLite key/value cache and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`DayCollection`]: one day-scoped collection and its remote mirror
//! - [`Routine`]: both collections plus the selected day
//! - [`SubjectNotes`]: subject notes of the selected day
//! - [`compute_current_streak`] and [`MonthlyOverview`]: statistics
//! - [`Config`]: application configuration management

pub mod auth;
pub mod calendar;
pub mod clock;
pub mod day;
pub mod error;
pub mod manager;
pub mod notes;
pub mod notice;
pub mod schedule;
pub mod stats;
pub mod storage;
pub mod store;
pub mod task;

pub use auth::{AuthProvider, AuthSession, Identity, LocalOnlyProvider, SignIn};
pub use clock::{Clock, FixedClock, SystemClock};
pub use day::{DayKey, DayScoped};
pub use error::{AuthError, CacheError, ConfigError, CoreError, StoreError, ValidationError};
pub use manager::{DayCollection, DayView, Routine};
pub use notes::{SaveStatus, Subject, SubjectNotes};
pub use notice::{Notice, NoticeLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use schedule::{Category, ScheduleDraft, ScheduleItem, SchedulePatch};
pub use stats::{compute_current_streak, compute_monthly_stats, DaySummary, MonthlyOverview, MonthlySource, MonthlyStats};
pub use storage::{Config, LocalCache};
pub use store::{HttpStore, MemoryStore, NotesStore, RemoteCollection};
pub use task::{Task, TaskDraft, TaskPatch};
