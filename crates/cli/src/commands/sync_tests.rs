// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::tests::TestContext;
use crate::identity::StaticIdentity;
use crate::remote::{MemoryRemote, RemoteStore};
use crate::test_helpers::{buy_milk, make_doc, synced_service};

fn remote_context(remote: &MemoryRemote, identity: StaticIdentity) -> Context {
    let (service, _store, _clock) = synced_service(remote);
    Context::new(service, Box::new(identity))
}

#[tokio::test]
async fn test_sync_pushes_and_pulls() {
    let remote = MemoryRemote::new();
    remote.create(make_doc("r1", "u1", 10)).await.unwrap();
    let ctx = remote_context(&remote, StaticIdentity::signed_in("u1"));

    remote.set_offline(true);
    let local = ctx.service.create(buy_milk()).unwrap();
    ctx.finish().await;
    remote.set_offline(false);

    run(&ctx, false).await.unwrap();

    assert!(ctx.service.get("r1").is_some());
    assert!(ctx.service.get(&local.id).unwrap().synced);
    assert!(remote.get(&local.id).is_some());
    assert_eq!(ctx.service.observer_count(), 0);
    assert_eq!(remote.feed_count(), 0);
}

#[tokio::test]
async fn test_sync_offline_keeps_local_state() {
    let remote = MemoryRemote::new();
    let ctx = remote_context(&remote, StaticIdentity::signed_in("u1"));
    remote.set_offline(true);
    let local = ctx.service.create(buy_milk()).unwrap();

    run(&ctx, false).await.unwrap();
    assert!(!ctx.service.get(&local.id).unwrap().synced);
}

#[tokio::test]
async fn test_sync_requires_remote() {
    let t = TestContext::new();
    assert!(matches!(run(&t.ctx, false).await, Err(Error::NoRemote)));
}

#[tokio::test]
async fn test_sync_requires_user() {
    let remote = MemoryRemote::new();
    let ctx = remote_context(&remote, StaticIdentity::signed_out());
    assert!(matches!(
        run(&ctx, false).await,
        Err(Error::NotAuthenticated)
    ));
    assert_eq!(ctx.service.observer_count(), 0);
}
