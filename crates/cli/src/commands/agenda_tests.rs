// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::tests::TestContext;
use chrono::{TimeZone, Utc};
use todosync_core::TaskPatch;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn seeded() -> TestContext {
    let t = TestContext::new();
    for (title, d) in [("late", 9), ("now", 10), ("soon", 12)] {
        let task = t.create(title);
        t.ctx
            .service
            .update(
                &task.id,
                TaskPatch::new().due_date(Some(Utc.with_ymd_and_hms(2024, 1, d, 8, 0, 0).unwrap())),
            )
            .unwrap();
    }
    t.create("undated");
    t
}

#[test]
fn test_render_text() {
    let t = seeded();
    let output = render(&t.ctx.service.tasks(), day(10), OutputFormat::Text).unwrap();
    assert!(output.contains("Overdue (1):"));
    assert!(output.contains("Today (1):"));
    assert!(output.contains("Upcoming (1):"));
    assert!(output.ends_with("4 open, 0 completed, 1 overdue, 4 unsynced"));
}

#[test]
fn test_render_json() {
    let t = seeded();
    let output = render(&t.ctx.service.tasks(), day(10), OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["today"], "2024-01-10");
    assert_eq!(value["overdue"][0]["title"], "late");
    assert_eq!(value["due_today"][0]["title"], "now");
    assert_eq!(value["upcoming"][0]["title"], "soon");
    assert_eq!(value["stats"]["total"], 4);
    assert_eq!(value["stats"]["overdue"], 1);
}

#[test]
fn test_completed_tasks_leave_agenda() {
    let t = seeded();
    let late = t
        .ctx
        .service
        .tasks()
        .into_iter()
        .find(|task| task.title == "late")
        .unwrap();
    t.ctx
        .service
        .update(&late.id, TaskPatch::new().completed(true))
        .unwrap();
    let output = render(&t.ctx.service.tasks(), day(10), OutputFormat::Text).unwrap();
    assert!(output.contains("Overdue (0):"));
    assert!(output.ends_with("3 open, 1 completed, 0 overdue, 4 unsynced"));
}
