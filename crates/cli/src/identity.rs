// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Authenticated user identity.
//!
//! A session is scoped to the user reported by an [`IdentityProvider`].

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;

use crate::env;

/// Reports who is signed in on this device.
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user's id, or `None` when signed out.
    fn current_user(&self) -> Option<String>;
}

/// A fixed identity, used for `--user` and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(Option<String>);

impl StaticIdentity {
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        StaticIdentity(Some(user_id.into()))
    }

    pub fn signed_out() -> Self {
        StaticIdentity(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Identity read from the environment.
///
/// Resolution order:
/// 1. `TODOSYNC_USER`
/// 2. Unix username from `USER` or `LOGNAME` (if not a system account)
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvIdentity;

impl IdentityProvider for EnvIdentity {
    fn current_user(&self) -> Option<String> {
        resolve(env::todosync_user(), env::login_name())
    }
}

fn resolve(explicit: Option<String>, login: Option<String>) -> Option<String> {
    if let Some(user) = explicit {
        return Some(user);
    }
    login.filter(|name| !is_system_account(name))
}

fn is_system_account(name: &str) -> bool {
    matches!(
        name.to_lowercase().as_str(),
        "root" | "system" | "administrator" | "admin" | "daemon" | "nobody"
    )
}
