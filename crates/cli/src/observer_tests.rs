// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use super::*;
use std::sync::atomic::AtomicUsize;

fn counter(registry: &ObserverRegistry<str>) -> (Arc<AtomicUsize>, Subscription<str>) {
    let count = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&count);
    let sub = registry.subscribe(Arc::new(move |_: &str| {
        c.fetch_add(1, Ordering::SeqCst);
    }));
    (count, sub)
}

#[test]
fn test_notify_reaches_every_observer() {
    let registry = ObserverRegistry::<str>::new();
    let (a, _sa) = counter(&registry);
    let (b, _sb) = counter(&registry);

    registry.notify("x");
    assert_eq!(a.load(Ordering::SeqCst), 1);
    assert_eq!(b.load(Ordering::SeqCst), 1);
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_observer_receives_value() {
    let registry = ObserverRegistry::<[u32]>::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = Arc::clone(&seen);
    let _sub = registry.subscribe(Arc::new(move |v: &[u32]| {
        s.lock().unwrap().push(v.to_vec());
    }));

    registry.notify(&[1, 2]);
    registry.notify(&[]);
    assert_eq!(*seen.lock().unwrap(), vec![vec![1, 2], vec![]]);
}

#[test]
fn test_unsubscribe_stops_only_that_observer() {
    let registry = ObserverRegistry::<str>::new();
    let (a, sa) = counter(&registry);
    let (b, _sb) = counter(&registry);

    sa.unsubscribe();
    registry.notify("x");
    assert_eq!(a.load(Ordering::SeqCst), 0);
    assert_eq!(b.load(Ordering::SeqCst), 1);
}

#[test]
fn test_drop_unsubscribes() {
    let registry = ObserverRegistry::<str>::new();
    {
        let (_count, _sub) = counter(&registry);
        assert_eq!(registry.len(), 1);
    }
    assert!(registry.is_empty());
}

#[test]
fn test_detach_keeps_observer() {
    let registry = ObserverRegistry::<str>::new();
    let (count, sub) = counter(&registry);
    sub.detach();
    registry.notify("x");
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_unsubscribe_by_id() {
    let registry = ObserverRegistry::<str>::new();
    let (_count, sub) = counter(&registry);
    assert!(registry.unsubscribe(sub.id()));
    assert!(!registry.unsubscribe(sub.id()));
}

#[test]
fn test_observer_can_unsubscribe_itself_during_notify() {
    let registry = Arc::new(ObserverRegistry::<str>::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let slot: Arc<Mutex<Option<SubscriptionId>>> = Arc::new(Mutex::new(None));

    let r = Arc::clone(&registry);
    let c = Arc::clone(&calls);
    let s = Arc::clone(&slot);
    let sub = registry.subscribe(Arc::new(move |_: &str| {
        c.fetch_add(1, Ordering::SeqCst);
        if let Some(id) = *s.lock().unwrap() {
            r.unsubscribe(id);
        }
    }));
    *slot.lock().unwrap() = Some(sub.id());
    sub.detach();
    let (other, _so) = counter(&registry);

    registry.notify("x");
    registry.notify("y");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(other.load(Ordering::SeqCst), 2);
}

#[test]
fn test_observer_can_remove_a_later_observer_mid_notify() {
    let registry = Arc::new(ObserverRegistry::<str>::new());
    let victim_slot: Arc<Mutex<Option<SubscriptionId>>> = Arc::new(Mutex::new(None));

    let r = Arc::clone(&registry);
    let v = Arc::clone(&victim_slot);
    let _killer = registry.subscribe(Arc::new(move |_: &str| {
        if let Some(id) = v.lock().unwrap().take() {
            r.unsubscribe(id);
        }
    }));
    let (victim, victim_sub) = counter(&registry);
    *victim_slot.lock().unwrap() = Some(victim_sub.id());

    // The snapshot taken before the first call still includes the victim.
    registry.notify("x");
    assert_eq!(victim.load(Ordering::SeqCst), 1);
    registry.notify("y");
    assert_eq!(victim.load(Ordering::SeqCst), 1);
}

#[test]
fn test_panicking_observer_does_not_block_others() {
    let registry = ObserverRegistry::<str>::new();
    let _bad = registry.subscribe(Arc::new(|_: &str| panic!("boom")));
    let (count, _sub) = counter(&registry);

    registry.notify("x");
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_subscription_outliving_registry_is_harmless() {
    let registry = ObserverRegistry::<str>::new();
    let (_count, sub) = counter(&registry);
    drop(registry);
    drop(sub);
}
