//! Schedule blocks: time-boxed entries of the daily routine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::day::{validate_time, DayKey, DayScoped};
use crate::error::ValidationError;

/// Duration used when a new block is created without one.
pub const DEFAULT_DURATION: &str = "30min";

/// Category of a schedule block.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Work,
    Personal,
    Health,
    Learning,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Personal => "personal",
            Category::Health => "health",
            Category::Learning => "learning",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" => Ok(Category::Work),
            "personal" => Ok(Category::Personal),
            "health" => Ok(Category::Health),
            "learning" => Ok(Category::Learning),
            other => Err(ValidationError::UnknownCategory(other.to_string())),
        }
    }
}

/// A block on the daily schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleItem {
    pub id: String,
    /// HH:MM, may be empty
    #[serde(default)]
    pub time: String,
    pub title: String,
    /// Free text such as "45min" or "2h"
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
}

impl DayScoped for ScheduleItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn day(&self) -> Option<&str> {
        self.day.as_deref()
    }

    fn is_completed(&self) -> bool {
        self.completed.unwrap_or(false)
    }

    fn set_completed(&mut self, completed: bool) {
        self.completed = Some(completed);
    }
}

/// User input for a new schedule block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleDraft {
    pub title: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub category: Category,
}

impl ScheduleDraft {
    pub fn new(title: impl Into<String>, category: Category) -> Self {
        Self {
            title: title.into(),
            time: None,
            duration: None,
            category,
        }
    }

    pub fn at(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn lasting(mut self, duration: impl Into<String>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    /// Build the block stamped with `day`.
    ///
    /// # Errors
    /// Returns an error if the trimmed title is empty or the time is not HH:MM.
    pub fn into_item(self, id: String, day: DayKey) -> Result<ScheduleItem, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle("Informe o assunto do bloco"));
        }
        let time = self.time.unwrap_or_default();
        if !time.is_empty() {
            validate_time(&time)?;
        }
        let duration = self
            .duration
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DURATION.to_string());
        Ok(ScheduleItem {
            id,
            time,
            title: title.to_string(),
            duration,
            category: self.category,
            completed: Some(false),
            day: Some(day.to_string()),
        })
    }
}

/// Fields a block edit may change. Blank values keep the current field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
}

impl SchedulePatch {
    /// Apply to a copy of `item`.
    ///
    /// # Errors
    /// Returns an error if a new time is not HH:MM.
    pub fn apply(&self, item: &ScheduleItem) -> Result<ScheduleItem, ValidationError> {
        let mut next = item.clone();
        if let Some(title) = self.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            next.title = title.to_string();
        }
        if let Some(time) = self.time.as_deref().filter(|t| !t.is_empty()) {
            validate_time(time)?;
            next.time = time.to_string();
        }
        if let Some(duration) = self.duration.as_deref().filter(|d| !d.is_empty()) {
            next.duration = duration.to_string();
        }
        if let Some(category) = self.category {
            next.category = category;
        }
        Ok(next)
    }
}
