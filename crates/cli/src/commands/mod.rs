// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod add;
pub mod agenda;
pub mod edit;
pub mod lifecycle;
pub mod list;
pub mod sync;
#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

use std::path::Path;
use std::sync::Arc;

use tracing::debug;
use todosync_core::{FileStore, Priority, Task};

use crate::config::{resolve_data_dir, Config, RemoteConfig};
use crate::env;
use crate::error::{Error, Result};
use crate::identity::{EnvIdentity, IdentityProvider, StaticIdentity};
use crate::remote::WebSocketRemote;
use crate::service::TodoService;

/// Everything a command needs: the service and who is acting.
pub struct Context {
    pub service: TodoService,
    identity: Box<dyn IdentityProvider>,
}

impl Context {
    pub fn new(service: TodoService, identity: Box<dyn IdentityProvider>) -> Self {
        Context { service, identity }
    }

    /// Opens the data directory, builds the service and loads persisted
    /// tasks.
    ///
    /// `user` overrides the identity read from the environment.
    pub fn open(data_dir: Option<&Path>, user: Option<String>) -> Result<Context> {
        let data_dir = resolve_data_dir(data_dir)?;
        let mut config = Config::load(&data_dir)?;
        let node_id = config.ensure_node_id(&data_dir)?;
        let store = Arc::new(FileStore::open(&data_dir)?);

        let mut builder = TodoService::builder(store).node_id(node_id);
        if let Some(remote) = remote_config(&config, env::remote_url())? {
            debug!("Using remote {}", remote.url);
            builder = builder.remote(Arc::new(WebSocketRemote::from_config(&remote)));
        }
        let service = builder.build();
        service.initialize();

        let identity: Box<dyn IdentityProvider> = match user {
            Some(user) => Box::new(StaticIdentity::signed_in(user)),
            None => Box::new(EnvIdentity),
        };
        Ok(Context::new(service, identity))
    }

    pub fn identity(&self) -> &dyn IdentityProvider {
        self.identity.as_ref()
    }

    /// The acting user, required for commands that create tasks or sync.
    pub fn current_user(&self) -> Result<String> {
        self.identity.current_user().ok_or(Error::NotAuthenticated)
    }

    /// Resolves a full id or a unique id prefix.
    pub fn resolve_id(&self, partial: &str) -> Result<String> {
        resolve_id(&self.service.tasks(), partial)
    }

    /// Waits for background pushes so they are not cut off at exit.
    pub async fn finish(&self) {
        self.service.wait_idle().await;
    }
}

/// The remote to use: `TODOSYNC_REMOTE` overrides the configured URL and
/// keeps the configured timeouts.
pub fn remote_config(config: &Config, env_url: Option<String>) -> Result<Option<RemoteConfig>> {
    let remote = match (config.remote.clone(), env_url) {
        (Some(remote), Some(url)) => Some(RemoteConfig { url, ..remote }),
        (None, Some(url)) => Some(RemoteConfig::new(url)),
        (remote, None) => remote,
    };
    if let Some(msg) = remote.as_ref().and_then(RemoteConfig::validate_url) {
        return Err(Error::Config(msg));
    }
    Ok(remote)
}

/// Exact ids win; otherwise the prefix must match exactly one task.
pub fn resolve_id(tasks: &[Task], partial: &str) -> Result<String> {
    if tasks.iter().any(|t| t.id == partial) {
        return Ok(partial.to_string());
    }
    let mut matches: Vec<String> = tasks
        .iter()
        .filter(|t| !partial.is_empty() && t.id.starts_with(partial))
        .map(|t| t.id.clone())
        .collect();
    if matches.len() > 1 {
        return Err(Error::AmbiguousId {
            prefix: partial.to_string(),
            matches,
        });
    }
    matches
        .pop()
        .ok_or_else(|| Error::TaskNotFound(partial.to_string()))
}

pub fn parse_priority(s: &str) -> Result<Priority> {
    Ok(s.parse::<Priority>()?)
}

pub fn parse_due(s: &str) -> Result<chrono::DateTime<chrono::Utc>> {
    Ok(todosync_core::parse_due_date(s)?)
}
