// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! todosync - a local-first todo list synchronizer.
//!
//! This crate provides the synchronizer behind the `todosync` CLI. Tasks live
//! in memory, are written to a local key-value store on every change, and
//! are mirrored to a remote document store whenever one is reachable.
//!
//! # Main Components
//!
//! - [`TodoService`] - the synchronizer: create, update, delete, observe
//! - [`Session`] - resync and live change feed for a signed-in user
//! - [`RemoteStore`] - remote adapters ([`MemoryRemote`], [`WebSocketRemote`])
//! - [`IdentityProvider`] - who is signed in
//! - [`Config`] - device configuration from `config.toml`
//! - [`Error`] - error types for all operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use todosync::{NewTask, Session, TodoService};
//! use todosync_core::MemoryStore;
//!
//! let service = TodoService::builder(Arc::new(MemoryStore::new())).build();
//! service.initialize();
//! let _sub = service.subscribe(|tasks| println!("{} tasks", tasks.len()));
//! service.create(NewTask::new("Buy milk", "u1"))?;
//! let session = Session::start(&service, "u1").await;
//! ```

mod cli;
mod commands;
mod display;

pub mod config;
pub mod env;
pub mod error;
pub mod identity;
pub mod observer;
pub mod remote;
pub mod service;
pub mod session;

#[cfg(test)]
mod test_helpers;

pub use cli::{Cli, Command, DueArgs, FilterArgs, OutputFormat};
pub use config::{Config, RemoteConfig};
pub use error::{Error, Result};
pub use identity::{EnvIdentity, IdentityProvider, StaticIdentity};
pub use observer::{ObserverRegistry, Subscription};
pub use remote::{ChangeFeed, MemoryRemote, RemoteError, RemoteStore, WebSocketRemote};
pub use service::{TodoService, TodoServiceBuilder};
pub use session::Session;
pub use todosync_core::{NewTask, Priority, Task, TaskPatch};

use commands::edit::EditFields;
use commands::Context;

/// Execute a parsed command line. Background pushes started by the command
/// are awaited before returning.
pub async fn run(cli: Cli) -> Result<()> {
    let ctx = Context::open(cli.data_dir.as_deref(), cli.user)?;
    let result = run_command(&ctx, cli.command).await;
    ctx.finish().await;
    result
}

async fn run_command(ctx: &Context, command: Command) -> Result<()> {
    match command {
        Command::Add {
            title,
            description,
            category,
            priority,
            due,
        } => commands::add::run(
            ctx,
            &title,
            description,
            &category,
            &priority,
            due.as_deref(),
        ),
        Command::List { filter, output } => commands::list::run(ctx, &filter, output),
        Command::Edit {
            id,
            title,
            description,
            clear_description,
            category,
            priority,
            due,
        } => {
            let fields = EditFields {
                title,
                description,
                clear_description,
                category,
                priority,
                due,
            };
            commands::edit::run(ctx, &id, &fields)
        }
        Command::Done { ids } => commands::lifecycle::done(ctx, &ids),
        Command::Reopen { ids } => commands::lifecycle::reopen(ctx, &ids),
        Command::Rm { ids } => commands::lifecycle::remove(ctx, &ids),
        Command::Agenda { output } => commands::agenda::run(ctx, output),
        Command::Sync { watch } => commands::sync::run(ctx, watch).await,
    }
}
