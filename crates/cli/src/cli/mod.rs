// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

pub use args::{DueArgs, FilterArgs};

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

const QUICKSTART_HELP: &str = "\
Get started:
  todosync add \"Buy milk\" -c Shopping   Add a task
  todosync list                         List open tasks
  todosync done <id>                    Complete a task
  todosync sync                         Sync with the configured remote";

#[derive(Parser, Debug)]
#[command(name = "todosync", version)]
#[command(about = "A local-first todo list that syncs when it can")]
#[command(
    long_about = "A local-first todo list.\n\n\
    Tasks are saved on this device first and mirrored to a remote store \
    whenever one is reachable."
)]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    /// Data directory (default: $TODOSYNC_DIR or the platform data dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Act as this user (default: $TODOSYNC_USER or the login name)
    #[arg(long, global = true, value_name = "ID")]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a task
    #[command(after_help = "Examples:\n  \
        todosync add \"Buy milk\"                       Add a task to Personal\n  \
        todosync add \"Buy milk\" -c Shopping -p low    Set category and priority\n  \
        todosync add \"File taxes\" --due 2024-04-15    Add a task with a due date")]
    Add {
        /// Task title
        #[arg(value_parser = non_empty_string)]
        title: String,

        /// Longer description
        #[arg(long, short)]
        description: Option<String>,

        /// Category label
        #[arg(long, short, default_value = todosync_core::DEFAULT_CATEGORY)]
        category: String,

        /// Priority (low, medium, high)
        #[arg(long, short, default_value = "medium")]
        priority: String,

        /// Due date (YYYY-MM-DD or RFC 3339)
        #[arg(long, value_name = "DATE")]
        due: Option<String>,
    },

    /// List tasks
    #[command(after_help = "Examples:\n  \
        todosync list                     List all tasks\n  \
        todosync list --open              List open tasks\n  \
        todosync list -c work -p high     List high-priority work tasks\n  \
        todosync list -o json             Output in JSON format")]
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Edit a task's fields
    #[command(
        arg_required_else_help = true,
        after_help = "Examples:\n  \
            todosync edit <id> --title \"Buy oat milk\"    Rename a task\n  \
            todosync edit <id> -p high -c Work           Change priority and category\n  \
            todosync edit <id> --clear-due               Remove the due date"
    )]
    Edit {
        /// Task ID (a unique prefix is enough)
        id: String,

        /// New title
        #[arg(long, value_parser = non_empty_string)]
        title: Option<String>,

        /// New description
        #[arg(long, short, conflicts_with = "clear_description")]
        description: Option<String>,

        /// Remove the description
        #[arg(long)]
        clear_description: bool,

        /// New category
        #[arg(long, short)]
        category: Option<String>,

        /// New priority (low, medium, high)
        #[arg(long, short)]
        priority: Option<String>,

        #[command(flatten)]
        due: DueArgs,
    },

    /// Mark task(s) as completed
    #[command(arg_required_else_help = true)]
    Done {
        /// Task ID(s)
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Mark task(s) as not completed
    #[command(arg_required_else_help = true)]
    Reopen {
        /// Task ID(s)
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Delete task(s)
    #[command(arg_required_else_help = true)]
    Rm {
        /// Task ID(s)
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Show open tasks by due date
    Agenda {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Push unsynced tasks and pull remote changes
    #[command(after_help = "Examples:\n  \
        todosync sync             Sync once and report\n  \
        todosync sync --watch     Keep streaming changes until interrupted")]
    Sync {
        /// Keep the session open and print the collection as it changes
        #[arg(long, short)]
        watch: bool,
    },
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
