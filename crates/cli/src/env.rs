// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! The variable name constants are generated by `build.rs` and live in the
//! [`vars`] submodule.

use std::path::PathBuf;

/// Generated environment variable name constants.
pub mod vars {
    include!(concat!(env!("OUT_DIR"), "/env_vars.rs"));
}

/// Returns the value of `TODOSYNC_DIR` if set and non-empty.
pub fn data_dir() -> Option<PathBuf> {
    non_empty(vars::TODOSYNC_DIR).map(PathBuf::from)
}

/// Returns the value of `TODOSYNC_USER` if set and non-empty.
pub fn todosync_user() -> Option<String> {
    non_empty(vars::TODOSYNC_USER)
}

/// Returns the value of `TODOSYNC_REMOTE` if set and non-empty.
pub fn remote_url() -> Option<String> {
    non_empty(vars::TODOSYNC_REMOTE)
}

/// Returns the login name from `USER`, then `LOGNAME`.
pub fn login_name() -> Option<String> {
    non_empty(vars::USER).or_else(|| non_empty(vars::LOGNAME))
}

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
