// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Hybrid Logical Clock (HLC) version stamps.
//!
//! Every local mutation of a task is stamped with a fresh HLC. The remote
//! store only accepts an update whose stamp is strictly newer than the one
//! it holds, which keeps a slow push from overwriting a later edit.
//!
//! Format: `{wall_ms}-{counter}-{node_id}`
//!
//! Ordering: wall_ms, then counter, then node_id.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};

/// A Hybrid Logical Clock timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hlc {
    /// Wall clock time in milliseconds since Unix epoch.
    pub wall_ms: u64,
    /// Logical counter for stamps issued within the same millisecond.
    pub counter: u32,
    /// Device identifier, the final tiebreaker.
    pub node_id: u32,
}

impl Hlc {
    pub fn new(wall_ms: u64, counter: u32, node_id: u32) -> Self {
        Hlc { wall_ms, counter, node_id }
    }

    /// The smallest possible stamp. Records persisted before versioning
    /// existed load with this value.
    pub fn min() -> Self {
        Hlc::new(0, 0, 0)
    }

    /// Parses an HLC from its string representation.
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    pub fn is_after(&self, other: &Hlc) -> bool {
        self > other
    }
}

impl Default for Hlc {
    fn default() -> Self {
        Hlc::min()
    }
}

impl Ord for Hlc {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.wall_ms, self.counter, self.node_id).cmp(&(other.wall_ms, other.counter, other.node_id))
    }
}

impl PartialOrd for Hlc {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Hlc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.wall_ms, self.counter, self.node_id)
    }
}

impl FromStr for Hlc {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split('-');
        let (Some(wall), Some(counter), Some(node), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(Error::InvalidHlc(format!(
                "expected format 'wall_ms-counter-node_id', got '{s}'"
            )));
        };

        let field = |name: &str, value: &str| {
            Error::InvalidHlc(format!("invalid {name} '{value}' in '{s}'"))
        };

        Ok(Hlc::new(
            wall.parse().map_err(|_| field("wall_ms", wall))?,
            counter.parse().map_err(|_| field("counter", counter))?,
            node.parse().map_err(|_| field("node_id", node))?,
        ))
    }
}

/// Source of wall clock time.
///
/// Injected so tests can drive time by hand.
pub trait ClockSource: Send + Sync {
    /// Current time in milliseconds since Unix epoch.
    fn now_ms(&self) -> u64;

    /// Current time as a UTC timestamp with millisecond precision.
    fn now(&self) -> DateTime<Utc> {
        datetime_from_ms(self.now_ms())
    }
}

/// Wall clock backed by `std::time::SystemTime`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
    }
}

impl<C: ClockSource + ?Sized> ClockSource for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

impl<C: ClockSource + ?Sized> ClockSource for Arc<C> {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Converts milliseconds since the epoch into a UTC timestamp.
pub fn datetime_from_ms(ms: u64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms as i64).single().unwrap_or_default()
}

/// Issues strictly increasing [`Hlc`] stamps for one device.
pub struct HlcClock<C: ClockSource = SystemClock> {
    clock: C,
    node_id: u32,
    /// Last issued (wall_ms, counter).
    last: Mutex<(u64, u32)>,
}

impl HlcClock<SystemClock> {
    pub fn new(node_id: u32) -> Self {
        Self::with_clock(SystemClock, node_id)
    }
}

impl<C: ClockSource> HlcClock<C> {
    pub fn with_clock(clock: C, node_id: u32) -> Self {
        HlcClock { clock, node_id, last: Mutex::new((0, 0)) }
    }

    pub fn node_id(&self) -> u32 {
        self.node_id
    }

    /// The underlying wall clock.
    pub fn source(&self) -> &C {
        &self.clock
    }

    /// Issues a stamp greater than every stamp issued or observed so far,
    /// even if the wall clock stalls or runs backwards.
    pub fn now(&self) -> Hlc {
        let physical = self.clock.now_ms();
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());

        *last = if physical > last.0 { (physical, 0) } else { successor(last.0, last.1) };
        Hlc::new(last.0, last.1, self.node_id)
    }

    /// Folds a stamp seen from another device into the clock so the next
    /// local stamp outranks it.
    pub fn observe(&self, seen: &Hlc) -> Hlc {
        let physical = self.clock.now_ms();
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());

        let wall = physical.max(last.0).max(seen.wall_ms);
        *last = if wall == physical && wall > last.0 && wall > seen.wall_ms {
            (wall, 0)
        } else if wall == last.0 && wall == seen.wall_ms {
            successor(wall, last.1.max(seen.counter))
        } else if wall == seen.wall_ms {
            successor(wall, seen.counter)
        } else {
            successor(wall, last.1)
        };

        Hlc::new(last.0, last.1, self.node_id)
    }
}

/// The next (wall_ms, counter) after the given pair. A full counter
/// carries into the next millisecond.
fn successor(wall_ms: u64, counter: u32) -> (u64, u32) {
    match counter.checked_add(1) {
        Some(counter) => (wall_ms, counter),
        None => (wall_ms.saturating_add(1), 0),
    }
}

#[cfg(test)]
#[path = "hlc_tests.rs"]
mod tests;
