//! Monthly completion overview.
//!
//! Only items dated inside the month count here; dayless items are not
//! spread over the month the way the day filter shows them.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use super::streak::{compute_current_streak, tally_by_day, DayTally};
use crate::day::DayKey;
use crate::schedule::ScheduleItem;
use crate::task::Task;

/// Headline numbers for one month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStats {
    pub total_tasks: u32,
    pub completed_tasks: u32,
    /// Longest run of perfect days inside the month
    pub best_streak: u32,
    /// Whole-history streak ending today
    pub current_streak: u32,
    /// Rounded percentage, 0 when the month has no items
    pub average_completion: u32,
}

/// How a day cell is shaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// No activities
    Empty,
    /// Everything done
    Perfect,
    /// Some done
    Partial,
    /// Nothing done
    Missed,
}

impl DayStatus {
    pub fn of(tally: DayTally) -> Self {
        if tally.total == 0 {
            DayStatus::Empty
        } else if tally.is_perfect() {
            DayStatus::Perfect
        } else if tally.completed > 0 {
            DayStatus::Partial
        } else {
            DayStatus::Missed
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarCell {
    pub day: u32,
    pub iso: String,
    pub is_today: bool,
    pub total: u32,
    pub completed: u32,
    pub status: DayStatus,
}

/// Day cells of a month plus the blank cells needed before day 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthGrid {
    /// YYYY-MM
    pub month: String,
    pub days_in_month: u32,
    /// Weekday of the 1st, 0=Sunday..6=Saturday
    pub weekday_offset: u32,
    pub cells: Vec<CalendarCell>,
}

impl MonthGrid {
    /// Bucket dated items into the days of the month containing `reference`.
    pub fn build(tasks: &[Task], schedule: &[ScheduleItem], reference: DayKey, today: DayKey) -> Self {
        let tallies = tally_by_day(tasks, schedule);
        let days_in_month = reference.days_in_month();
        let cells = (1..=days_in_month)
            .filter_map(|n| reference.with_day(n))
            .map(|date| {
                let iso = date.to_string();
                let tally = tallies.get(&iso).copied().unwrap_or_default();
                CalendarCell {
                    day: date.date().day(),
                    is_today: date == today,
                    total: tally.total,
                    completed: tally.completed,
                    status: DayStatus::of(tally),
                    iso,
                }
            })
            .collect();

        Self {
            month: reference.date().format("%Y-%m").to_string(),
            days_in_month,
            weekday_offset: reference.weekday_offset(),
            cells,
        }
    }

    pub fn total(&self) -> u32 {
        self.cells.iter().map(|c| c.total).sum()
    }

    pub fn completed(&self) -> u32 {
        self.cells.iter().map(|c| c.completed).sum()
    }

    /// Longest run of perfect days in calendar order, not wrapping months.
    pub fn best_streak(&self) -> u32 {
        let mut best = 0;
        let mut run = 0;
        for cell in &self.cells {
            if cell.status == DayStatus::Perfect {
                run += 1;
                best = best.max(run);
            } else {
                run = 0;
            }
        }
        best
    }
}

/// Rounded percentage; zero when there is nothing to complete.
pub fn completion_percentage(completed: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(completed) / f64::from(total) * 100.0).round() as u32
}

/// Stats for the month containing `reference`.
pub fn compute_monthly_stats(
    tasks: &[Task],
    schedule: &[ScheduleItem],
    reference: DayKey,
    today: DayKey,
) -> MonthlyStats {
    stats_for_grid(&MonthGrid::build(tasks, schedule, reference, today), tasks, schedule, today)
}

fn stats_for_grid(
    grid: &MonthGrid,
    tasks: &[Task],
    schedule: &[ScheduleItem],
    today: DayKey,
) -> MonthlyStats {
    let total_tasks = grid.total();
    let completed_tasks = grid.completed();
    MonthlyStats {
        total_tasks,
        completed_tasks,
        best_streak: grid.best_streak(),
        current_streak: compute_current_streak(tasks, schedule, today),
        average_completion: completion_percentage(completed_tasks, total_tasks),
    }
}

/// Where the headline numbers come from. Provided stats replace the computed
/// ones wholesale; the two are never merged.
#[derive(Debug, Clone, Copy)]
pub enum MonthlySource<'a> {
    Provided(MonthlyStats),
    Computed {
        tasks: &'a [Task],
        schedule: &'a [ScheduleItem],
    },
}

/// Everything the month card shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyOverview {
    pub stats: MonthlyStats,
    pub grid: MonthGrid,
}

impl MonthlyOverview {
    pub fn build(source: MonthlySource<'_>, reference: DayKey, today: DayKey) -> Self {
        match source {
            MonthlySource::Provided(stats) => Self {
                stats,
                grid: MonthGrid::build(&[], &[], reference, today),
            },
            MonthlySource::Computed { tasks, schedule } => {
                let grid = MonthGrid::build(tasks, schedule, reference, today);
                let stats = stats_for_grid(&grid, tasks, schedule, today);
                Self { stats, grid }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, day: Option<&str>, completed: bool) -> Task {
        Task {
            id: id.into(),
            title: id.into(),
            completed,
            time: None,
            day: day.map(str::to_string),
        }
    }

    fn key(s: &str) -> DayKey {
        DayKey::parse(s).unwrap()
    }

    #[test]
    fn two_completed_tasks_make_a_perfect_first_day() {
        let tasks = vec![
            task("1", Some("2024-01-01"), true),
            task("2", Some("2024-01-01"), true),
        ];
        let stats = compute_monthly_stats(&tasks, &[], key("2024-01-01"), key("2024-01-01"));
        assert_eq!(stats.total_tasks, 2);
        assert_eq!(stats.completed_tasks, 2);
        assert!(stats.best_streak >= 1);
        assert_eq!(stats.average_completion, 100);
        assert_eq!(stats.current_streak, 1);
    }

    #[test]
    fn empty_month_has_zero_average() {
        let stats = compute_monthly_stats(&[], &[], key("2024-02-15"), key("2024-02-15"));
        assert_eq!(stats, MonthlyStats::default());
    }

    #[test]
    fn dayless_and_other_month_items_are_not_counted() {
        let tasks = vec![
            task("1", None, true),
            task("2", Some("2024-02-01"), true),
            task("3", Some("2024-01-31"), false),
        ];
        let stats = compute_monthly_stats(&tasks, &[], key("2024-01-10"), key("2024-01-10"));
        assert_eq!(stats.total_tasks, 1);
        assert_eq!(stats.completed_tasks, 0);
        assert_eq!(stats.best_streak, 0);
    }

    #[test]
    fn best_streak_resets_on_empty_and_imperfect_days() {
        let tasks = vec![
            task("1", Some("2024-01-01"), true),
            task("2", Some("2024-01-02"), true),
            // 01-03 empty
            task("3", Some("2024-01-04"), true),
            task("4", Some("2024-01-05"), true),
            task("5", Some("2024-01-06"), true),
            task("6", Some("2024-01-07"), false),
            task("7", Some("2024-01-08"), true),
        ];
        let grid = MonthGrid::build(&tasks, &[], key("2024-01-20"), key("2024-01-20"));
        assert_eq!(grid.best_streak(), 3);
        assert_eq!(grid.cells[2].status, DayStatus::Empty);
        assert_eq!(grid.cells[6].status, DayStatus::Missed);
    }

    #[test]
    fn average_completion_rounds() {
        assert_eq!(completion_percentage(1, 3), 33);
        assert_eq!(completion_percentage(2, 3), 67);
        assert_eq!(completion_percentage(0, 0), 0);
    }

    #[test]
    fn grid_shape_matches_month() {
        let grid = MonthGrid::build(&[], &[], key("2024-02-10"), key("2024-02-10"));
        assert_eq!(grid.month, "2024-02");
        assert_eq!(grid.days_in_month, 29);
        assert_eq!(grid.cells.len(), 29);
        // 2024-02-01 was a Thursday
        assert_eq!(grid.weekday_offset, 4);
        assert_eq!(grid.cells[0].iso, "2024-02-01");
        assert_eq!(grid.cells[28].day, 29);
        assert!(grid.cells[9].is_today);
    }

    #[test]
    fn provided_stats_override_computed_values() {
        let tasks = vec![task("1", Some("2024-01-01"), true)];
        let provided = MonthlyStats {
            total_tasks: 124,
            completed_tasks: 98,
            best_streak: 12,
            current_streak: 0,
            average_completion: 79,
        };
        let overview = MonthlyOverview::build(
            MonthlySource::Provided(provided),
            key("2024-01-01"),
            key("2024-01-01"),
        );
        assert_eq!(overview.stats, provided);

        let computed = MonthlyOverview::build(
            MonthlySource::Computed {
                tasks: &tasks,
                schedule: &[],
            },
            key("2024-01-01"),
            key("2024-01-01"),
        );
        assert_eq!(computed.stats.total_tasks, 1);
    }

    #[test]
    fn stats_serialize_in_camel_case() {
        let json = serde_json::to_value(MonthlyStats::default()).unwrap();
        assert!(json.get("averageCompletion").is_some());
        assert!(json.get("bestStreak").is_some());
    }
}
