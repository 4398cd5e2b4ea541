// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::remote::RemoteError;

/// All possible errors that can occur in the todosync library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not signed in\n  hint: pass --user or set TODOSYNC_USER")]
    NotAuthenticated,

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("ambiguous task ID '{prefix}' matches: {}", matches.join(", "))]
    AmbiguousId {
        prefix: String,
        matches: Vec<String>,
    },

    #[error("no remote configured\n  hint: add a [remote] section with a url to config.toml")]
    NoRemote,

    #[error("title cannot be empty\n  hint: every task needs a short title")]
    EmptyTitle,

    #[error("invalid priority: '{0}'\n  hint: valid priorities are: low, medium, high")]
    InvalidPriority(String),

    #[error("invalid date: '{0}'\n  hint: use YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate(String),

    #[error("{field} cannot be combined with {other}")]
    ConflictingFlags {
        field: &'static str,
        other: &'static str,
    },

    #[error("nothing to change\n  hint: pass at least one field to edit")]
    EmptyEdit,

    #[error("storage error: {0}")]
    Storage(String),

    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

/// A specialized Result type for todosync operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<todosync_core::Error> for Error {
    fn from(e: todosync_core::Error) -> Self {
        use todosync_core::Error as Core;
        match e {
            Core::EmptyTitle => Error::EmptyTitle,
            Core::InvalidPriority(s) => Error::InvalidPriority(s),
            Core::InvalidDate(s) => Error::InvalidDate(s),
            Core::InvalidKey(s) => Error::Storage(format!("invalid key '{s}'")),
            Core::InvalidChangeKind(s) => Error::CorruptedData(format!("change kind '{s}'")),
            Core::InvalidHlc(s) => Error::CorruptedData(format!("version stamp: {s}")),
            Core::Io(e) => Error::Io(e),
            Core::Json(e) => Error::Json(e),
            Core::CorruptedData(s) => Error::CorruptedData(s),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
