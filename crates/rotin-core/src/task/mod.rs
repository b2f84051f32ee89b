//! Task types.
//!
//! A task is a one-line to-do, optionally pinned to a time of day and to a
//! calendar day. Tasks without a day show up on every day.

use serde::{Deserialize, Serialize};

use crate::day::{validate_time, DayKey, DayScoped};
use crate::error::ValidationError;

/// A to-do item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    /// HH:MM
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// YYYY-MM-DD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
}

impl DayScoped for Task {
    fn id(&self) -> &str {
        &self.id
    }

    fn day(&self) -> Option<&str> {
        self.day.as_deref()
    }

    fn is_completed(&self) -> bool {
        self.completed
    }

    fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }
}

/// User input for a new task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub time: Option<String>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            time: None,
        }
    }

    pub fn at(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    /// Build the task stamped with `day`.
    ///
    /// # Errors
    /// Returns an error if the trimmed title is empty or the time is not HH:MM.
    pub fn into_task(self, id: String, day: DayKey) -> Result<Task, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle("Informe o assunto da tarefa"));
        }
        let time = self.time.filter(|t| !t.is_empty());
        if let Some(t) = &time {
            validate_time(t)?;
        }
        Ok(Task {
            id,
            title: title.to_string(),
            completed: false,
            time,
            day: Some(day.to_string()),
        })
    }
}

/// Fields a task edit may change. Blank values keep the current field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

impl TaskPatch {
    /// Apply to a copy of `task`.
    ///
    /// # Errors
    /// Returns an error if a new time is not HH:MM.
    pub fn apply(&self, task: &Task) -> Result<Task, ValidationError> {
        let mut next = task.clone();
        if let Some(title) = self.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            next.title = title.to_string();
        }
        if let Some(time) = self.time.as_deref().filter(|t| !t.is_empty()) {
            validate_time(time)?;
            next.time = Some(time.to_string());
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> DayKey {
        DayKey::parse("2024-01-01").unwrap()
    }

    #[test]
    fn draft_is_trimmed_and_stamped() {
        let task = TaskDraft::new("  Estudar  ")
            .at("14:00")
            .into_task("t1".into(), day())
            .unwrap();
        assert_eq!(task.title, "Estudar");
        assert_eq!(task.day.as_deref(), Some("2024-01-01"));
        assert_eq!(task.time.as_deref(), Some("14:00"));
        assert!(!task.completed);
    }

    #[test]
    fn blank_draft_is_rejected() {
        let err = TaskDraft::new("   ").into_task("t1".into(), day()).unwrap_err();
        assert_eq!(err, ValidationError::EmptyTitle("Informe o assunto da tarefa"));
    }

    #[test]
    fn patch_keeps_fields_when_blank() {
        let task = TaskDraft::new("Ler").at("09:00").into_task("t1".into(), day()).unwrap();
        let patch = TaskPatch {
            title: Some("  ".into()),
            time: Some("10:30".into()),
        };
        let next = patch.apply(&task).unwrap();
        assert_eq!(next.title, "Ler");
        assert_eq!(next.time.as_deref(), Some("10:30"));
    }

    #[test]
    fn wire_format_omits_missing_fields() {
        let task = Task {
            id: "1".into(),
            title: "Revisar emails".into(),
            completed: false,
            time: None,
            day: None,
        };
        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("time").is_none());
        assert!(json.get("day").is_none());

        let parsed: Task = serde_json::from_str(r#"{"id":"2","title":"x"}"#).unwrap();
        assert!(!parsed.completed);
    }
}
