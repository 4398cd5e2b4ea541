// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot and streaming sync against the configured remote.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use todosync_core::Stats;

use crate::display::format_stats;
use crate::error::{Error, Result};
use crate::session::Session;

use super::Context;

/// How long a one-shot sync waits for the remote's first batch.
const SNAPSHOT_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn run(ctx: &Context, watch: bool) -> Result<()> {
    if ctx.service.remote().is_none() {
        return Err(Error::NoRemote);
    }

    let (tx, mut changes) = mpsc::unbounded_channel();
    let subscription = ctx.service.subscribe(move |tasks| {
        let _ = tx.send(Stats::compute(tasks, Utc::now().date_naive()));
    });
    // Subscribing reports the current collection once.
    let _ = changes.recv().await;

    let mut session = Session::for_identity(&ctx.service, ctx.identity()).await?;
    if !session.is_live() {
        warn!("Remote unreachable, showing local tasks only");
        println!("Remote unreachable");
    } else if tokio::time::timeout(SNAPSHOT_TIMEOUT, changes.recv())
        .await
        .is_err()
    {
        warn!("No snapshot from the remote after {:?}", SNAPSHOT_TIMEOUT);
    }
    let stats = Stats::compute(&ctx.service.tasks(), Utc::now().date_naive());
    println!("Synced as {}: {}", session.user_id(), format_stats(&stats));

    if watch && session.is_live() {
        println!("Watching for changes, press Ctrl-C to stop");
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    debug!("Interrupted");
                    break;
                }
                _ = session.closed() => {
                    println!("Remote closed the change feed");
                    break;
                }
                Some(stats) = changes.recv() => println!("{}", format_stats(&stats)),
            }
        }
    }

    subscription.unsubscribe();
    session.end().await;
    Ok(())
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
