//! Starter collections shown when the cache holds nothing usable.

use crate::day::DayKey;
use crate::schedule::{Category, ScheduleItem};
use crate::task::Task;

pub fn default_tasks(today: DayKey) -> Vec<Task> {
    let day = Some(today.to_string());
    [
        ("1", "Revisar emails importantes", false, "09:00"),
        ("2", "Reunião de planejamento", true, "10:00"),
        ("3", "Exercícios de alongamento", false, "12:00"),
        ("4", "Estudar novo framework", false, "14:00"),
    ]
    .into_iter()
    .map(|(id, title, completed, time)| Task {
        id: id.to_string(),
        title: title.to_string(),
        completed,
        time: Some(time.to_string()),
        day: day.clone(),
    })
    .collect()
}

pub fn default_schedule(today: DayKey) -> Vec<ScheduleItem> {
    let day = Some(today.to_string());
    [
        ("1", "08:00", "Rotina matinal", "45min", Category::Personal),
        ("2", "09:00", "Bloco de foco - Trabalho", "2h", Category::Work),
        ("3", "12:00", "Almoço + Descanso", "1h", Category::Personal),
        ("4", "14:00", "Aprendizado", "1h", Category::Learning),
        ("5", "17:00", "Exercícios físicos", "1h", Category::Health),
    ]
    .into_iter()
    .map(|(id, time, title, duration, category)| ScheduleItem {
        id: id.to_string(),
        time: time.to_string(),
        title: title.to_string(),
        duration: duration.to_string(),
        category,
        completed: Some(false),
        day: day.clone(),
    })
    .collect()
}
