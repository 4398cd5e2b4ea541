// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use todosync_core::{Agenda, Stats, Task};

/// Maximum line width for a wrapped description (excluding the indent).
const WRAP_WIDTH: usize = 76;

/// Wrap single-line text at word boundaries. Text containing newlines is
/// returned unchanged.
pub fn wrap_text(content: &str, width: usize) -> String {
    if content.contains('\n') || content.len() <= width {
        return content.to_string();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in content.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.len() + 1 + word.len() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.join("\n")
}

/// Format a single task line for list output.
///
/// ```text
/// - [x] (low) 1714557600000-0-7: Buy milk #Shopping due 2024-05-01 *
/// ```
///
/// The trailing `*` marks a task the remote has not seen yet.
pub fn format_task_line(task: &Task) -> String {
    let check = if task.completed { "x" } else { " " };
    let mut line = format!(
        "- [{}] ({}) {}: {} #{}",
        check, task.priority, task.id, task.title, task.category
    );
    if let Some(due) = task.due_date {
        line.push_str(&format!(" due {}", due.format("%Y-%m-%d")));
    }
    if !task.synced {
        line.push_str(" *");
    }
    line
}

/// Format a task with its description and timestamps, for add/edit output.
pub fn format_task_details(task: &Task) -> String {
    let mut output = vec![format_task_line(task)];
    if let Some(description) = &task.description {
        for line in wrap_text(description, WRAP_WIDTH).lines() {
            output.push(format!("    {}", line));
        }
    }
    output.push(format!(
        "  Created: {}",
        task.created_at.format("%Y-%m-%d %H:%M")
    ));
    output.push(format!(
        "  Updated: {}",
        task.updated_at.format("%Y-%m-%d %H:%M")
    ));
    output.join("\n")
}

/// One-line summary of collection counts.
pub fn format_stats(stats: &Stats) -> String {
    format!(
        "{} open, {} completed, {} overdue, {} unsynced",
        stats.open, stats.completed, stats.overdue, stats.unsynced
    )
}

/// Format the agenda buckets followed by the collection counts.
pub fn format_agenda(agenda: &Agenda<'_>, stats: &Stats) -> String {
    let mut output = Vec::new();
    for (heading, tasks) in [
        ("Overdue", &agenda.overdue),
        ("Today", &agenda.today),
        ("Upcoming", &agenda.upcoming),
    ] {
        output.push(format!("{} ({}):", heading, tasks.len()));
        for task in tasks.iter() {
            output.push(format!("  {}", format_task_line(task)));
        }
    }
    output.push(String::new());
    output.push(format_stats(stats));
    output.join("\n")
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
