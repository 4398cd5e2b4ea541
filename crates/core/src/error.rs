// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for todosync-core operations.

use thiserror::Error;

/// All possible errors that can occur in todosync-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("title cannot be empty\n  hint: every task needs a short title")]
    EmptyTitle,

    #[error("invalid priority: '{0}'\n  hint: valid priorities are: low, medium, high")]
    InvalidPriority(String),

    #[error("invalid change kind: '{0}'\n  hint: valid kinds are: added, modified, removed")]
    InvalidChangeKind(String),

    #[error("invalid storage key: '{0}'\n  hint: keys may not be empty or contain path separators")]
    InvalidKey(String),

    #[error("invalid date: '{0}'\n  hint: use YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate(String),

    #[error("invalid HLC: {0}")]
    InvalidHlc(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

/// A specialized Result type for todosync-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
