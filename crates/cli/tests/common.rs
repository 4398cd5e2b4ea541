// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Test helpers are shared across test binaries; not every file uses each one.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// `todosync` isolated in `temp`, acting as `u1`, with no remote.
pub fn todosync(temp: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("todosync");
    cmd.arg("--data-dir")
        .arg(temp.path())
        .env("TODOSYNC_USER", "u1")
        .env_remove("TODOSYNC_DIR")
        .env_remove("TODOSYNC_REMOTE")
        .env_remove("RUST_LOG");
    cmd
}

/// Adds a task and returns its id.
pub fn add_task(temp: &TempDir, title: &str) -> String {
    let output = todosync(temp).arg("add").arg(title).output().unwrap();
    assert!(output.status.success());
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .find_map(|line| line.strip_prefix("Created "))
        .unwrap()
        .trim()
        .to_string()
}

/// The persisted collection as JSON.
pub fn persisted(temp: &TempDir) -> serde_json::Value {
    let content = std::fs::read_to_string(temp.path().join("todos.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

/// Writes `config.toml` into the data directory.
pub fn write_config(temp: &TempDir, content: &str) {
    std::fs::write(temp.path().join("config.toml"), content).unwrap();
}
