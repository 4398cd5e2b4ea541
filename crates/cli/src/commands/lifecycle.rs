// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use todosync_core::TaskPatch;

use crate::error::{Error, Result};

use super::Context;

pub fn done(ctx: &Context, ids: &[String]) -> Result<()> {
    for id in ids {
        set_completed(ctx, id, true)?;
    }
    Ok(())
}

pub fn reopen(ctx: &Context, ids: &[String]) -> Result<()> {
    for id in ids {
        set_completed(ctx, id, false)?;
    }
    Ok(())
}

pub fn remove(ctx: &Context, ids: &[String]) -> Result<()> {
    for id in ids {
        let id = ctx.resolve_id(id)?;
        let task = ctx
            .service
            .delete(&id)
            .ok_or_else(|| Error::TaskNotFound(id.clone()))?;
        println!("Deleted {}: {}", task.id, task.title);
    }
    Ok(())
}

/// Returns false when the task was already in the requested state.
pub(crate) fn set_completed(ctx: &Context, id: &str, completed: bool) -> Result<bool> {
    let id = ctx.resolve_id(id)?;
    let verb = if completed { "Completed" } else { "Reopened" };

    let current = ctx
        .service
        .get(&id)
        .ok_or_else(|| Error::TaskNotFound(id.clone()))?;
    if current.completed == completed {
        let state = if completed { "done" } else { "open" };
        println!("{} is already {}", id, state);
        return Ok(false);
    }

    let task = ctx
        .service
        .update(&id, TaskPatch::new().completed(completed))?
        .ok_or_else(|| Error::TaskNotFound(id.clone()))?;
    println!("{} {}: {}", verb, task.id, task.title);
    Ok(true)
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
