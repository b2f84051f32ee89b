//! Client-side state for the tasks and schedule collections.

pub mod collection;

use std::sync::{Arc, Mutex};

use serde::Serialize;

pub use collection::{DayCollection, Managed, ERROR_TITLE};

use crate::calendar::{week_of, WeekDay};
use crate::clock::Clock;
use crate::day::DayKey;
use crate::error::Result;
use crate::schedule::ScheduleItem;
use crate::stats::{compute_current_streak, DaySummary, MonthlyOverview, MonthlySource};
use crate::task::Task;

/// What the day screen shows for the selected day.
#[derive(Debug, Clone, Serialize)]
pub struct DayView {
    pub day: DayKey,
    pub week: Vec<WeekDay>,
    pub tasks: Vec<Task>,
    pub schedule: Vec<ScheduleItem>,
    pub summary: DaySummary,
    pub streak: u32,
}

/// Both collections plus the selected day.
///
/// Derived numbers are recomputed from the collections on every call, so
/// they always reflect the latest local state.
pub struct Routine {
    pub tasks: DayCollection<Task>,
    pub schedule: DayCollection<ScheduleItem>,
    clock: Arc<dyn Clock>,
    selected: Mutex<DayKey>,
}

impl Routine {
    pub fn new(
        tasks: DayCollection<Task>,
        schedule: DayCollection<ScheduleItem>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let today = clock.today_key();
        Self {
            tasks,
            schedule,
            clock,
            selected: Mutex::new(today),
        }
    }

    /// Mount both collections. Both are attempted even if the first fails.
    ///
    /// # Errors
    /// Returns the first refresh failure.
    pub async fn mount(&self) -> Result<()> {
        let today = self.clock.today_key();
        let tasks = self.tasks.mount(today).await;
        let schedule = self.schedule.mount(today).await;
        tasks.and(schedule)
    }

    pub fn today(&self) -> DayKey {
        self.clock.today_key()
    }

    pub fn selected(&self) -> DayKey {
        match self.selected.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn select(&self, day: DayKey) {
        match self.selected.lock() {
            Ok(mut guard) => *guard = day,
            Err(poisoned) => *poisoned.into_inner() = day,
        }
    }

    pub fn current_streak(&self) -> u32 {
        compute_current_streak(&self.tasks.all(), &self.schedule.all(), self.today())
    }

    /// Stats and calendar grid for the month containing `reference`.
    pub fn monthly(&self, reference: DayKey) -> MonthlyOverview {
        let tasks = self.tasks.all();
        let schedule = self.schedule.all();
        MonthlyOverview::build(
            MonthlySource::Computed {
                tasks: &tasks,
                schedule: &schedule,
            },
            reference,
            self.today(),
        )
    }

    pub fn day_view(&self) -> DayView {
        let day = self.selected();
        let tasks = self.tasks.visible(&day);
        let schedule = self.schedule.visible(&day);
        let summary = DaySummary::for_day(&tasks, &schedule, &day.to_string());
        DayView {
            day,
            week: week_of(self.today()),
            tasks,
            schedule,
            summary,
            streak: self.current_streak(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::notice::RecordingNotifier;
    use crate::store::MemoryStore;
    use crate::task::TaskDraft;

    fn routine() -> Routine {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let clock = Arc::new(FixedClock::on(
            chrono::NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        ));
        Routine::new(
            DayCollection::new(store.clone(), notifier.clone()),
            DayCollection::new(store, notifier),
            clock,
        )
    }

    #[tokio::test]
    async fn streak_follows_toggles() {
        let routine = routine();
        let today = routine.today();
        let task = routine
            .tasks
            .create(TaskDraft::new("Ler"), today)
            .await
            .unwrap();
        assert_eq!(routine.current_streak(), 0);

        routine.tasks.toggle(&task.id).await.unwrap();
        assert_eq!(routine.current_streak(), 1);
        assert_eq!(routine.monthly(today).stats.best_streak, 1);
    }

    #[tokio::test]
    async fn day_view_uses_selected_day() {
        let routine = routine();
        let today = routine.today();
        routine
            .tasks
            .create(TaskDraft::new("Hoje"), today)
            .await
            .unwrap();

        let view = routine.day_view();
        assert_eq!(view.tasks.len(), 1);
        assert_eq!(view.summary.total, 1);
        assert_eq!(view.week.len(), 7);

        routine.select(today.succ());
        let view = routine.day_view();
        assert!(view.tasks.is_empty());
        assert_eq!(view.summary.completion_rate, 0);
    }
}
