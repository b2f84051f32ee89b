//! Completion summary for the selected day.

use serde::{Deserialize, Serialize};

use super::monthly::completion_percentage;
use crate::day::DayScoped;

/// Counts over the day-filtered lists, dayless items included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    pub completed: u32,
    pub total: u32,
    pub completion_rate: u32,
}

impl DaySummary {
    pub fn for_day<T, S>(tasks: &[T], schedule: &[S], selected: &str) -> Self
    where
        T: DayScoped,
        S: DayScoped,
    {
        let mut summary = Self::default();
        let visible = tasks
            .iter()
            .filter(|t| t.visible_on(selected))
            .map(DayScoped::is_completed)
            .chain(
                schedule
                    .iter()
                    .filter(|s| s.visible_on(selected))
                    .map(DayScoped::is_completed),
            );
        for completed in visible {
            summary.total += 1;
            if completed {
                summary.completed += 1;
            }
        }
        summary.completion_rate = completion_percentage(summary.completed, summary.total);
        summary
    }
}
