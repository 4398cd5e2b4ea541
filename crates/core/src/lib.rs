// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! todosync-core: Shared library for the todosync synchronizer
//!
//! This crate provides the task model, version stamps, durable key-value
//! storage, remote document semantics and the wire protocol used by both
//! the todosync client and the todosync-remote server.

pub mod collection;
pub mod document;
pub mod error;
pub mod hlc;
pub mod protocol;
pub mod store;
pub mod task;
pub mod view;

pub use collection::{DocumentCollection, Reject};
pub use document::{ChangeKind, DocChange, TaskDocument, TaskFields};
pub use error::{Error, Result};
pub use hlc::{datetime_from_ms, ClockSource, Hlc, HlcClock, SystemClock};
pub use store::{FileStore, KeyValueStore, MemoryStore, TASKS_KEY};
pub use task::{parse_due_date, NewTask, Priority, Task, TaskPatch, DEFAULT_CATEGORY};
pub use view::{Agenda, Stats, TaskFilter};
