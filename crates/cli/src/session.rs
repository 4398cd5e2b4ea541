// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Authenticated sync session.
//!
//! Starting a session performs the one-time resync: every unsynced task is
//! pushed, then a live change feed for the user is opened and merged into
//! the service until the session ends.

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::identity::IdentityProvider;
use crate::remote::ChangeFeed;
use crate::service::TodoService;

/// A running sync session for one user.
///
/// Ending or dropping the session releases the live change feed.
pub struct Session {
    user_id: String,
    service: TodoService,
    listener: Option<JoinHandle<()>>,
}

impl Session {
    /// Resyncs `service` for `user_id` and starts merging remote changes.
    ///
    /// Without a remote store the session does nothing. If the change feed
    /// cannot be opened the session continues without one.
    pub async fn start(service: &TodoService, user_id: impl Into<String>) -> Session {
        let user_id = user_id.into();
        let mut session = Session {
            user_id,
            service: service.clone(),
            listener: None,
        };

        let Some(remote) = service.remote() else {
            debug!("No remote configured, session for {} is local-only", session.user_id);
            return session;
        };

        service.push_unsynced().await;

        match remote.listen(&session.user_id).await {
            Ok(feed) => {
                info!("Listening for changes to {}'s tasks", session.user_id);
                session.listener = Some(tokio::spawn(merge_feed(service.clone(), feed)));
            }
            Err(e) => warn!("Failed to open change feed for {}: {}", session.user_id, e),
        }
        session
    }

    /// Starts a session for whoever `identity` reports as signed in.
    pub async fn for_identity(
        service: &TodoService,
        identity: &dyn IdentityProvider,
    ) -> Result<Session> {
        let user_id = identity.current_user().ok_or(Error::NotAuthenticated)?;
        Ok(Session::start(service, user_id).await)
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// True while the change feed is being merged.
    pub fn is_live(&self) -> bool {
        self.listener.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Waits until the remote ends the change feed.
    pub async fn closed(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            let _ = listener.await;
            self.listener = None;
        }
    }

    /// Stops merging remote changes and waits for in-flight pushes.
    pub async fn end(mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
            let _ = listener.await;
        }
        self.service.wait_idle().await;
        info!("Session for {} ended", self.user_id);
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("live", &self.is_live())
            .finish()
    }
}

async fn merge_feed(service: TodoService, mut feed: ChangeFeed) {
    while let Some(changes) = feed.next().await {
        service.apply_remote_changes(changes);
    }
    debug!("Change feed ended");
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
