//! Statistics module for Rotin
//!
//! Pure functions over the task and schedule collections: the current streak
//! of perfect days, the monthly overview and the selected-day summary.

mod daily;
mod monthly;
mod streak;

pub use daily::DaySummary;

pub use monthly::{
    compute_monthly_stats, completion_percentage, CalendarCell, DayStatus, MonthGrid,
    MonthlyOverview, MonthlySource, MonthlyStats,
};

pub use streak::{compute_current_streak, tally_by_day, DayTally};
