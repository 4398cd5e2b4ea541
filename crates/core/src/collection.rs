// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote document collection semantics.
//!
//! Both the in-process remote and the WebSocket server keep their `todos`
//! documents in a [`DocumentCollection`]. Documents are addressed by the
//! id chosen on the client; the collection never assigns ids of its own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::document::{DocChange, TaskDocument, TaskFields};
use crate::hlc::Hlc;

/// Why the collection refused a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum Reject {
    #[error("document not found")]
    NotFound,
    #[error("document holds a newer version")]
    Stale,
    #[error("document already exists")]
    AlreadyExists,
}

impl Reject {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reject::NotFound => "not_found",
            Reject::Stale => "stale",
            Reject::AlreadyExists => "already_exists",
        }
    }
}

/// Documents keyed by id, iterated in id order.
#[derive(Debug, Clone, Default)]
pub struct DocumentCollection {
    docs: BTreeMap<String, TaskDocument>,
}

impl DocumentCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from previously stored documents. Later
    /// duplicates of an id replace earlier ones.
    pub fn from_documents(docs: impl IntoIterator<Item = TaskDocument>) -> Self {
        let docs = docs.into_iter().map(|d| (d.id.clone(), d)).collect();
        DocumentCollection { docs }
    }

    /// Stores a new document under its own id, stamping server time.
    pub fn create(
        &mut self,
        mut doc: TaskDocument,
        now: DateTime<Utc>,
    ) -> Result<DocChange, Reject> {
        if self.docs.contains_key(&doc.id) {
            return Err(Reject::AlreadyExists);
        }
        doc.created_at = now;
        doc.updated_at = now;
        self.docs.insert(doc.id.clone(), doc.clone());
        Ok(DocChange::added(doc))
    }

    /// Replaces the mutable fields of an existing document.
    ///
    /// `version` must be strictly newer than the stored version. A version
    /// equal to the stored one names a write that was already applied: it
    /// is acknowledged with `None` and nothing changes.
    pub fn update(
        &mut self,
        id: &str,
        fields: TaskFields,
        version: Hlc,
        now: DateTime<Utc>,
    ) -> Result<Option<DocChange>, Reject> {
        let doc = self.docs.get_mut(id).ok_or(Reject::NotFound)?;
        if version == doc.version {
            return Ok(None);
        }
        if !version.is_after(&doc.version) {
            return Err(Reject::Stale);
        }
        doc.replace_fields(fields);
        doc.version = version;
        doc.updated_at = now;
        Ok(Some(DocChange::modified(doc.clone())))
    }

    /// Removes a document, returning its last snapshot.
    pub fn delete(&mut self, id: &str) -> Result<DocChange, Reject> {
        self.docs
            .remove(id)
            .map(DocChange::removed)
            .ok_or(Reject::NotFound)
    }

    pub fn get(&self, id: &str) -> Option<&TaskDocument> {
        self.docs.get(id)
    }

    /// All documents owned by `user_id`, in id order.
    pub fn for_user(&self, user_id: &str) -> Vec<TaskDocument> {
        self.docs
            .values()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect()
    }

    /// The initial batch for a new subscription: every document of the
    /// user tagged as added.
    pub fn snapshot(&self, user_id: &str) -> Vec<DocChange> {
        self.for_user(user_id)
            .into_iter()
            .map(DocChange::added)
            .collect()
    }

    /// All documents in id order.
    pub fn documents(&self) -> Vec<TaskDocument> {
        self.docs.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

#[cfg(test)]
#[path = "collection_tests.rs"]
mod tests;
