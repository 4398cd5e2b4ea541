// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use todosync_core::{NewTask, Task};

use crate::display::format_task_details;
use crate::error::Result;

use super::{parse_due, parse_priority, Context};

pub fn run(
    ctx: &Context,
    title: &str,
    description: Option<String>,
    category: &str,
    priority: &str,
    due: Option<&str>,
) -> Result<()> {
    let task = run_impl(ctx, title, description, category, priority, due)?;
    println!("Created {}", task.id);
    println!("{}", format_task_details(&task));
    Ok(())
}

pub(crate) fn run_impl(
    ctx: &Context,
    title: &str,
    description: Option<String>,
    category: &str,
    priority: &str,
    due: Option<&str>,
) -> Result<Task> {
    let user_id = ctx.current_user()?;
    let mut new = NewTask::new(title.trim(), user_id)
        .with_category(category.trim())
        .with_priority(parse_priority(priority)?);
    if let Some(description) = description.filter(|d| !d.trim().is_empty()) {
        new = new.with_description(description);
    }
    if let Some(due) = due {
        new = new.with_due_date(parse_due(due)?);
    }
    ctx.service.create(new)
}

#[cfg(test)]
#[path = "add_tests.rs"]
mod tests;
