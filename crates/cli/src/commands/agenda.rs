// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use todosync_core::{Agenda, Stats, Task};

use crate::cli::OutputFormat;
use crate::display::format_agenda;
use crate::error::Result;

use super::Context;

/// JSON output structure for the agenda command.
#[derive(Serialize)]
struct AgendaJson<'a> {
    today: NaiveDate,
    overdue: &'a [&'a Task],
    due_today: &'a [&'a Task],
    upcoming: &'a [&'a Task],
    stats: Stats,
}

pub fn run(ctx: &Context, format: OutputFormat) -> Result<()> {
    let today = Utc::now().date_naive();
    println!("{}", render(&ctx.service.tasks(), today, format)?);
    Ok(())
}

pub(crate) fn render(tasks: &[Task], today: NaiveDate, format: OutputFormat) -> Result<String> {
    let agenda = Agenda::build(tasks, today);
    let stats = Stats::compute(tasks, today);
    match format {
        OutputFormat::Text => Ok(format_agenda(&agenda, &stats)),
        OutputFormat::Json => {
            let output = AgendaJson {
                today,
                overdue: &agenda.overdue,
                due_today: &agenda.today,
                upcoming: &agenda.upcoming,
                stats,
            };
            Ok(serde_json::to_string_pretty(&output)?)
        }
    }
}

#[cfg(test)]
#[path = "agenda_tests.rs"]
mod tests;
