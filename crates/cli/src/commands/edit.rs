// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use todosync_core::{Task, TaskPatch};

use crate::cli::DueArgs;
use crate::display::format_task_details;
use crate::error::{Error, Result};

use super::{parse_due, parse_priority, Context};

/// Field changes requested on the command line.
#[derive(Debug, Clone, Default)]
pub struct EditFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub clear_description: bool,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub due: DueArgs,
}

pub fn run(ctx: &Context, id: &str, fields: &EditFields) -> Result<()> {
    let task = run_impl(ctx, id, fields)?;
    println!("Updated {}", task.id);
    println!("{}", format_task_details(&task));
    Ok(())
}

pub(crate) fn run_impl(ctx: &Context, id: &str, fields: &EditFields) -> Result<Task> {
    let patch = build_patch(fields)?;
    let id = ctx.resolve_id(id)?;
    ctx.service
        .update(&id, patch)?
        .ok_or(Error::TaskNotFound(id))
}

pub(crate) fn build_patch(fields: &EditFields) -> Result<TaskPatch> {
    let mut patch = TaskPatch::new();
    if let Some(title) = &fields.title {
        patch = patch.title(title.trim());
    }
    match (&fields.description, fields.clear_description) {
        (Some(_), true) => {
            return Err(Error::ConflictingFlags {
                field: "--description",
                other: "--clear-description",
            })
        }
        (Some(description), false) => patch = patch.description(Some(description.clone())),
        (None, true) => patch = patch.description(None),
        (None, false) => {}
    }
    if let Some(category) = &fields.category {
        patch = patch.category(category.trim());
    }
    if let Some(priority) = &fields.priority {
        patch = patch.priority(parse_priority(priority)?);
    }
    match (&fields.due.due, fields.due.clear_due) {
        (Some(_), true) => {
            return Err(Error::ConflictingFlags {
                field: "--due",
                other: "--clear-due",
            })
        }
        (Some(due), false) => patch = patch.due_date(Some(parse_due(due)?)),
        (None, true) => patch = patch.due_date(None),
        (None, false) => {}
    }

    if patch.is_empty() {
        return Err(Error::EmptyEdit);
    }
    Ok(patch)
}

#[cfg(test)]
#[path = "edit_tests.rs"]
mod tests;
