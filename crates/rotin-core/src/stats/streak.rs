//! Current streak of perfect days.
//!
//! A perfect day has at least one dated item and every one of them is
//! completed. The streak walks backward from today; an unfinished today does
//! not break a streak that ended yesterday.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::day::{DayKey, DayScoped};

/// Per-day item counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTally {
    pub total: u32,
    pub completed: u32,
}

impl DayTally {
    pub fn record(&mut self, completed: bool) {
        self.total += 1;
        if completed {
            self.completed += 1;
        }
    }

    /// Zero items is never perfect.
    pub fn is_perfect(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// Group dated items from both collections by day. Dayless items are skipped.
pub fn tally_by_day<T, S>(tasks: &[T], schedule: &[S]) -> HashMap<String, DayTally>
where
    T: DayScoped,
    S: DayScoped,
{
    let mut tallies: HashMap<String, DayTally> = HashMap::new();
    let dated = tasks
        .iter()
        .map(|t| (t.day(), t.is_completed()))
        .chain(schedule.iter().map(|s| (s.day(), s.is_completed())));

    for (day, completed) in dated {
        let Some(day) = day.filter(|d| !d.is_empty()) else {
            continue;
        };
        tallies.entry(day.to_string()).or_default().record(completed);
    }
    tallies
}

fn is_perfect(tallies: &HashMap<String, DayTally>, day: &DayKey) -> bool {
    tallies
        .get(&day.to_string())
        .is_some_and(DayTally::is_perfect)
}

/// Count consecutive perfect days ending at `today` (or yesterday, when today
/// is not perfect yet).
pub fn compute_current_streak<T, S>(tasks: &[T], schedule: &[S], today: DayKey) -> u32
where
    T: DayScoped,
    S: DayScoped,
{
    let tallies = tally_by_day(tasks, schedule);
    if tallies.is_empty() {
        return 0;
    }

    let mut streak = 0;
    if is_perfect(&tallies, &today) {
        streak += 1;
    }

    let mut cursor = today.pred();
    while is_perfect(&tallies, &cursor) {
        streak += 1;
        cursor = cursor.pred();
    }
    streak
}
