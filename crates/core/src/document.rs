// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote document representation of a task.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::hlc::Hlc;
use crate::task::{Priority, Task};

/// A task as stored by the remote document store.
///
/// Carries every task field except `synced`, which only has meaning on
/// the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDocument {
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
    pub user_id: String,
    #[serde(default)]
    pub version: Hlc,
}

impl TaskDocument {
    /// Converts the document into a local record marked as synced.
    pub fn into_task(self) -> Task {
        Task {
            id: self.id,
            title: self.title,
            description: self.description,
            completed: self.completed,
            priority: self.priority,
            category: self.category,
            due_date: self.due_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
            user_id: self.user_id,
            synced: true,
            version: self.version,
        }
    }

    /// Replaces the mutable fields with `fields`.
    pub fn replace_fields(&mut self, fields: TaskFields) {
        self.title = fields.title;
        self.description = fields.description;
        self.completed = fields.completed;
        self.priority = fields.priority;
        self.category = fields.category;
        self.due_date = fields.due_date;
    }
}

impl From<&Task> for TaskDocument {
    fn from(task: &Task) -> Self {
        TaskDocument {
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            completed: task.completed,
            priority: task.priority,
            category: task.category.clone(),
            due_date: task.due_date,
            created_at: task.created_at,
            updated_at: task.updated_at,
            user_id: task.user_id.clone(),
            version: task.version,
        }
    }
}

/// The mutable subset of a task, sent by a "replace fields" update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFields {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    pub category: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

impl From<&Task> for TaskFields {
    fn from(task: &Task) -> Self {
        TaskFields {
            title: task.title.clone(),
            description: task.description.clone(),
            completed: task.completed,
            priority: task.priority,
            category: task.category.clone(),
            due_date: task.due_date,
        }
    }
}

/// What happened to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Modified => "modified",
            ChangeKind::Removed => "removed",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChangeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "added" => Ok(ChangeKind::Added),
            "modified" => Ok(ChangeKind::Modified),
            "removed" => Ok(ChangeKind::Removed),
            _ => Err(Error::InvalidChangeKind(s.to_string())),
        }
    }
}

/// One entry of a change notification batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocChange {
    pub kind: ChangeKind,
    pub doc: TaskDocument,
}

impl DocChange {
    pub fn added(doc: TaskDocument) -> Self {
        DocChange {
            kind: ChangeKind::Added,
            doc,
        }
    }

    pub fn modified(doc: TaskDocument) -> Self {
        DocChange {
            kind: ChangeKind::Modified,
            doc,
        }
    }

    pub fn removed(doc: TaskDocument) -> Self {
        DocChange {
            kind: ChangeKind::Removed,
            doc,
        }
    }

    /// Owner of the changed document.
    pub fn user_id(&self) -> &str {
        &self.doc.user_id
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
