// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use serde::Serialize;
use todosync_core::{Task, TaskFilter};

use crate::cli::{FilterArgs, OutputFormat};
use crate::display::format_task_line;
use crate::error::Result;

use super::{parse_priority, Context};

/// JSON output structure for the list command.
#[derive(Serialize)]
struct ListOutputJson<'a> {
    tasks: Vec<&'a Task>,
}

pub fn run(ctx: &Context, filter: &FilterArgs, format: OutputFormat) -> Result<()> {
    let tasks = ctx.service.tasks();
    let filter = build_filter(filter)?;
    let matching = filter.apply(&tasks);

    match format {
        OutputFormat::Text => {
            if matching.is_empty() {
                println!("No tasks");
            }
            for task in matching {
                println!("{}", format_task_line(task));
            }
        }
        OutputFormat::Json => {
            let output = ListOutputJson { tasks: matching };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

pub(crate) fn build_filter(args: &FilterArgs) -> Result<TaskFilter> {
    let mut filter = if args.open {
        TaskFilter::open()
    } else if args.completed {
        TaskFilter::completed()
    } else {
        TaskFilter::new()
    };
    if let Some(category) = &args.category {
        filter = filter.with_category(category.trim());
    }
    if let Some(priority) = &args.priority {
        filter = filter.with_priority(parse_priority(priority)?);
    }
    Ok(filter)
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
