// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only queries over a task collection.

use chrono::NaiveDate;
use serde::Serialize;

use crate::task::{Priority, Task};

/// Narrows a task list. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub completed: Option<bool>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open() -> Self {
        TaskFilter {
            completed: Some(false),
            ..Self::default()
        }
    }

    pub fn completed() -> Self {
        TaskFilter {
            completed: Some(true),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Category comparison ignores ASCII case.
    pub fn matches(&self, task: &Task) -> bool {
        if self.completed.is_some_and(|c| c != task.completed) {
            return false;
        }
        if self.priority.is_some_and(|p| p != task.priority) {
            return false;
        }
        match &self.category {
            Some(category) => task.category.eq_ignore_ascii_case(category),
            None => true,
        }
    }

    /// Returns the matching tasks, keeping their order.
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }
}

/// Open tasks with a due date, bucketed relative to a day.
#[derive(Debug, Default, PartialEq)]
pub struct Agenda<'a> {
    /// Due before the day.
    pub overdue: Vec<&'a Task>,
    /// Due on the day.
    pub today: Vec<&'a Task>,
    /// Due after the day.
    pub upcoming: Vec<&'a Task>,
}

impl<'a> Agenda<'a> {
    /// Buckets use the UTC calendar date of each due date; each bucket is
    /// ordered by due date.
    pub fn build(tasks: &'a [Task], today: NaiveDate) -> Self {
        let mut agenda = Agenda::default();
        let mut dated: Vec<&Task> = tasks
            .iter()
            .filter(|t| !t.completed && t.due_date.is_some())
            .collect();
        dated.sort_by_key(|t| t.due_date);

        for task in dated {
            let Some(due) = task.due_date else { continue };
            let day = due.date_naive();
            if day < today {
                agenda.overdue.push(task);
            } else if day == today {
                agenda.today.push(task);
            } else {
                agenda.upcoming.push(task);
            }
        }
        agenda
    }

    pub fn is_empty(&self) -> bool {
        self.overdue.is_empty() && self.today.is_empty() && self.upcoming.is_empty()
    }
}

/// Counts over a task collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub open: usize,
    pub completed: usize,
    pub overdue: usize,
    pub unsynced: usize,
}

impl Stats {
    pub fn compute(tasks: &[Task], today: NaiveDate) -> Self {
        let mut stats = Stats {
            total: tasks.len(),
            ..Stats::default()
        };
        for task in tasks {
            if task.completed {
                stats.completed += 1;
            } else {
                stats.open += 1;
            }
            if task.is_overdue(today) {
                stats.overdue += 1;
            }
            if !task.synced {
                stats.unsynced += 1;
            }
        }
        stats
    }
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
