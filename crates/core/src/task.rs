// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Core task types.
//!
//! [`Task`] is the record held in memory, persisted on the device and
//! mirrored to the remote store. [`NewTask`] and [`TaskPatch`] are the
//! inputs for creating and editing one.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::hlc::Hlc;

/// Category given to tasks created without one.
pub const DEFAULT_CATEGORY: &str = "Personal";

/// How urgent a task is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(Error::InvalidPriority(s.to_string())),
        }
    }
}

/// A user-owned todo item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, chosen on the device that created the task and
    /// used unchanged as the remote document id.
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Owning account.
    pub user_id: String,
    /// True once the remote store holds this record's current state.
    pub synced: bool,
    /// Stamp of the last mutation, compared by the remote store to reject
    /// stale writes.
    #[serde(default)]
    pub version: Hlc,
}

impl Task {
    /// Builds a fresh, unsynced task from creation input.
    pub fn from_new(new: NewTask, id: String, now: DateTime<Utc>, version: Hlc) -> Self {
        Task {
            id,
            title: new.title,
            description: new.description,
            completed: new.completed,
            priority: new.priority,
            category: new.category,
            due_date: new.due_date,
            created_at: now,
            updated_at: now,
            user_id: new.user_id,
            synced: false,
            version,
        }
    }

    /// Merges the fields present in `patch` into this task.
    ///
    /// Bookkeeping fields (`updated_at`, `synced`, `version`) are left to
    /// the caller.
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
    }

    /// Returns true if the task is open and due before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due.date_naive() < today)
    }
}

/// Input for creating a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    pub user_id: String,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl NewTask {
    /// Creates input with the given title for the given owner, using the
    /// default priority and category.
    pub fn new(title: impl Into<String>, user_id: impl Into<String>) -> Self {
        NewTask {
            title: title.into(),
            description: None,
            completed: false,
            priority: Priority::default(),
            category: default_category(),
            due_date: None,
            user_id: user_id.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Rejects a blank title.
    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)
    }
}

/// A partial edit of a task. `None` leaves a field unchanged.
///
/// `description` and `due_date` are doubly optional so a patch can clear
/// them: `Some(None)` removes the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl TaskPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn due_date(mut self, due_date: Option<DateTime<Utc>>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }

    /// Rejects a patch that would blank the title.
    pub fn validate(&self) -> Result<()> {
        match &self.title {
            Some(title) => validate_title(title),
            None => Ok(()),
        }
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::EmptyTitle);
    }
    Ok(())
}

/// Parses a due date given as `YYYY-MM-DD` (midnight UTC) or RFC 3339.
pub fn parse_due_date(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| Error::InvalidDate(s.to_string()))
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
