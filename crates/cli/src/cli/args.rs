// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared argument structs for CLI commands.

use clap::Args;

/// Task list filters.
#[derive(Args, Clone, Debug, Default, PartialEq)]
pub struct FilterArgs {
    /// Show only open tasks
    #[arg(long, conflicts_with = "completed")]
    pub open: bool,

    /// Show only completed tasks
    #[arg(long, conflicts_with = "open")]
    pub completed: bool,

    /// Filter by category (case-insensitive)
    #[arg(long, short)]
    pub category: Option<String>,

    /// Filter by priority (low, medium, high)
    #[arg(long, short)]
    pub priority: Option<String>,
}

/// Due date edits.
#[derive(Args, Clone, Debug, Default, PartialEq)]
pub struct DueArgs {
    /// New due date (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_name = "DATE", conflicts_with = "clear_due")]
    pub due: Option<String>,

    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,
}
