// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    empty_title = { Error::EmptyTitle, "title" },
    priority = { Error::InvalidPriority("urgent".into()), "urgent" },
    change_kind = { Error::InvalidChangeKind("moved".into()), "moved" },
    key = { Error::InvalidKey("../etc".into()), "../etc" },
    date = { Error::InvalidDate("tomorrow".into()), "tomorrow" },
)]
fn error_display_contains(err: Error, expected: &str) {
    assert!(err.to_string().contains(expected));
}

#[test]
fn error_from_io() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn error_from_json() {
    let json_err = serde_json::from_str::<()>("invalid").unwrap_err();
    let err: Error = json_err.into();
    assert!(matches!(err, Error::Json(_)));
}
