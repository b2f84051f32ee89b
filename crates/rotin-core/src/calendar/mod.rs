//! Week strip used by the day picker.

use serde::{Deserialize, Serialize};

use crate::day::DayKey;

pub const SHORT_WEEKDAYS: [&str; 7] = ["Dom", "Seg", "Ter", "Qua", "Qui", "Sex", "Sáb"];
pub const FULL_WEEKDAYS: [&str; 7] = [
    "Domingo", "Segunda", "Terça", "Quarta", "Quinta", "Sexta", "Sábado",
];

/// One selectable day of the current week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekDay {
    pub iso: String,
    pub date_number: u32,
    /// 0=Sunday..6=Saturday
    pub weekday: u32,
    pub short: String,
    pub full: String,
    pub is_today: bool,
}

/// The Sunday on or before `day`.
pub fn start_of_week(day: DayKey) -> DayKey {
    let mut cursor = day;
    for _ in 0..day.weekday_index() {
        cursor = cursor.pred();
    }
    cursor
}

/// Sunday..Saturday of the week containing `today`.
pub fn week_of(today: DayKey) -> Vec<WeekDay> {
    let mut cursor = start_of_week(today);
    let mut days = Vec::with_capacity(7);
    for _ in 0..7 {
        let weekday = cursor.weekday_index() as usize;
        days.push(WeekDay {
            iso: cursor.to_string(),
            date_number: chrono::Datelike::day(&cursor.date()),
            weekday: weekday as u32,
            short: SHORT_WEEKDAYS[weekday].to_string(),
            full: FULL_WEEKDAYS[weekday].to_string(),
            is_today: cursor == today,
        });
        cursor = cursor.succ();
    }
    days
}
