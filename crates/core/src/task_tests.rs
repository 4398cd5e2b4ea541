// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;
use yare::parameterized;

fn at(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).unwrap()
}

fn sample_task() -> Task {
    let new = NewTask::new("Buy milk", "u1")
        .with_category("Shopping")
        .with_priority(Priority::Low);
    Task::from_new(new, "t-1".to_string(), at(1_000), Hlc::new(1_000, 0, 1))
}

#[parameterized(
    low = { "low", Priority::Low },
    medium = { "medium", Priority::Medium },
    high = { "high", Priority::High },
    high_upper = { "HIGH", Priority::High },
    low_mixed = { "Low", Priority::Low },
)]
fn priority_from_str_valid(input: &str, expected: Priority) {
    assert_eq!(input.parse::<Priority>().unwrap(), expected);
}

#[parameterized(
    invalid = { "urgent" },
    empty = { "" },
)]
fn priority_from_str_invalid(input: &str) {
    assert!(matches!(
        input.parse::<Priority>(),
        Err(Error::InvalidPriority(_))
    ));
}

#[parameterized(
    low = { Priority::Low, "low" },
    medium = { Priority::Medium, "medium" },
    high = { Priority::High, "high" },
)]
fn priority_display(priority: Priority, expected: &str) {
    assert_eq!(priority.to_string(), expected);
    assert_eq!(
        serde_json::to_string(&priority).unwrap(),
        format!("\"{expected}\"")
    );
}

#[test]
fn priority_orders_by_urgency() {
    assert!(Priority::Low < Priority::Medium);
    assert!(Priority::Medium < Priority::High);
}

#[test]
fn new_task_defaults() {
    let new = NewTask::new("Walk", "u1");
    assert_eq!(new.priority, Priority::Medium);
    assert_eq!(new.category, DEFAULT_CATEGORY);
    assert!(!new.completed);
    assert!(new.description.is_none());
    assert!(new.due_date.is_none());
}

#[test]
fn new_task_deserializes_with_defaults() {
    let new: NewTask = serde_json::from_str(r#"{"title":"Walk","userId":"u1"}"#).unwrap();
    assert_eq!(new, NewTask::new("Walk", "u1"));
}

#[parameterized(
    empty = { "" },
    spaces = { "   " },
    whitespace = { "\t\n" },
)]
fn blank_title_is_rejected(title: &str) {
    assert!(matches!(
        NewTask::new(title, "u1").validate(),
        Err(Error::EmptyTitle)
    ));
    assert!(matches!(
        TaskPatch::new().title(title).validate(),
        Err(Error::EmptyTitle)
    ));
}

#[test]
fn patch_without_title_is_valid() {
    assert!(TaskPatch::new().completed(true).validate().is_ok());
}

#[test]
fn from_new_is_unsynced_with_equal_timestamps() {
    let task = sample_task();
    assert_eq!(task.id, "t-1");
    assert_eq!(task.title, "Buy milk");
    assert_eq!(task.category, "Shopping");
    assert_eq!(task.priority, Priority::Low);
    assert!(!task.completed);
    assert!(!task.synced);
    assert_eq!(task.created_at, task.updated_at);
    assert_eq!(task.version, Hlc::new(1_000, 0, 1));
}

#[test]
fn apply_merges_only_present_fields() {
    let mut task = sample_task();
    task.apply(&TaskPatch::new().completed(true));
    assert!(task.completed);
    assert_eq!(task.title, "Buy milk");
    assert_eq!(task.category, "Shopping");
}

#[test]
fn apply_can_clear_optional_fields() {
    let mut task = sample_task();
    task.apply(
        &TaskPatch::new()
            .description(Some("2 litres".to_string()))
            .due_date(Some(at(5_000))),
    );
    assert_eq!(task.description.as_deref(), Some("2 litres"));
    assert_eq!(task.due_date, Some(at(5_000)));

    task.apply(&TaskPatch::new().description(None).due_date(None));
    assert!(task.description.is_none());
    assert!(task.due_date.is_none());
}

#[test]
fn patch_is_empty() {
    assert!(TaskPatch::new().is_empty());
    assert!(!TaskPatch::new().priority(Priority::High).is_empty());
}

#[test]
fn serializes_with_camel_case_fields() {
    let mut task = sample_task();
    task.due_date = Some(at(86_400_000));
    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["userId"], "u1");
    assert_eq!(json["dueDate"], "1970-01-02T00:00:00Z");
    assert!(json.get("createdAt").is_some());
    assert!(json.get("updatedAt").is_some());
    assert!(json.get("description").is_none());
}

#[test]
fn json_round_trip_restores_dates() {
    let mut task = sample_task();
    task.due_date = Some(at(1_700_000_000_123));
    task.description = Some("note".to_string());
    let json = serde_json::to_string(&task).unwrap();
    let back: Task = serde_json::from_str(&json).unwrap();
    assert_eq!(back, task);
}

#[test]
fn missing_version_defaults_to_min() {
    let json = r#"{
        "id": "1",
        "title": "Old",
        "completed": false,
        "priority": "high",
        "category": "Work",
        "createdAt": "2024-01-01T00:00:00.000Z",
        "updatedAt": "2024-01-01T00:00:00.000Z",
        "userId": "u1",
        "synced": true
    }"#;
    let task: Task = serde_json::from_str(json).unwrap();
    assert_eq!(task.version, Hlc::min());
    assert_eq!(task.priority, Priority::High);
    assert!(task.due_date.is_none());
}

#[test]
fn overdue_requires_open_task_due_before_today() {
    let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
    let mut task = sample_task();
    assert!(!task.is_overdue(today));

    task.due_date = Some(parse_due_date("2024-03-09").unwrap());
    assert!(task.is_overdue(today));

    task.due_date = Some(parse_due_date("2024-03-10").unwrap());
    assert!(!task.is_overdue(today));

    task.due_date = Some(parse_due_date("2024-03-01").unwrap());
    task.completed = true;
    assert!(!task.is_overdue(today));
}

#[parameterized(
    plain_date = { "2024-03-10", "2024-03-10T00:00:00+00:00" },
    rfc3339_utc = { "2024-03-10T14:30:00Z", "2024-03-10T14:30:00+00:00" },
    rfc3339_offset = { "2024-03-10T14:30:00+02:00", "2024-03-10T12:30:00+00:00" },
)]
fn parse_due_date_valid(input: &str, expected: &str) {
    assert_eq!(parse_due_date(input).unwrap().to_rfc3339(), expected);
}

#[parameterized(
    garbage = { "tomorrow" },
    bad_month = { "2024-13-01" },
    empty = { "" },
)]
fn parse_due_date_invalid(input: &str) {
    assert!(matches!(parse_due_date(input), Err(Error::InvalidDate(_))));
}
