use chrono::{Local, NaiveDate, Utc};

use crate::day::DayKey;

/// Source of "today" and "now" for streaks, stats and note timestamps.
/// Injected so tests can pin the calendar.
pub trait Clock: Send + Sync + 'static {
    /// Today in the user's local calendar.
    fn today(&self) -> NaiveDate;

    /// Current time as epoch milliseconds.
    fn now_millis(&self) -> i64;

    fn today_key(&self) -> DayKey {
        DayKey::new(self.today())
    }
}

/// Wall clock in the local timezone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock pinned to one day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub today: NaiveDate,
    pub millis: i64,
}

impl FixedClock {
    pub fn on(today: NaiveDate) -> Self {
        let millis = today
            .and_hms_opt(12, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis())
            .unwrap_or_default();
        Self { today, millis }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now_millis(&self) -> i64 {
        self.millis
    }
}
