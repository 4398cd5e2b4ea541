// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! todosync-remote: WebSocket document store for todosync devices.
//!
//! Hosts the task documents of every user, applies version-checked writes,
//! and streams each subscribed device the changes to its user's tasks.

mod server;
#[cfg(test)]
mod server_tests;
mod state;

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// todosync-remote: WebSocket document store for todosync
#[derive(Parser, Debug)]
#[command(name = "todosync-remote")]
#[command(about = "WebSocket document store for todosync devices")]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = "0.0.0.0:7890")]
    bind: SocketAddr,

    /// Directory for document storage
    #[arg(short, long, default_value = ".")]
    data: PathBuf,

    /// Enable verbose logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting todosync-remote server");
    info!("  Bind address: {}", args.bind);
    info!("  Data directory: {}", args.data.display());

    let state = state::ServerState::new(&args.data)?;
    server::run(args.bind, state).await?;

    Ok(())
}
