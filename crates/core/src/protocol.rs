// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket protocol between a device and the remote document store.
//!
//! - Client sends document writes, subscription requests and pings
//! - Server answers each write with `ack` or `rejected`, and pushes
//!   `changes` batches to subscribed clients

use serde::{Deserialize, Serialize};

use crate::collection::Reject;
use crate::document::{DocChange, TaskDocument, TaskFields};
use crate::hlc::Hlc;

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Store a new document under its own id.
    Create {
        /// Client-chosen ID echoed in the reply.
        request_id: u64,
        doc: TaskDocument,
    },

    /// Replace the mutable fields of a document.
    Update {
        request_id: u64,
        id: String,
        fields: TaskFields,
        /// Must be newer than the stored version.
        version: Hlc,
    },

    /// Remove a document.
    Delete { request_id: u64, id: String },

    /// Start receiving changes for one user.
    ///
    /// The server replies with a batch of the user's current documents,
    /// then forwards live changes. A second subscribe replaces the first.
    Subscribe { user_id: String },

    /// Stop receiving changes.
    Unsubscribe,

    /// Ping message for keepalive.
    Ping {
        /// Client-chosen ID echoed in Pong.
        id: u64,
    },
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The write with this request ID was applied.
    Ack { request_id: u64 },

    /// The write with this request ID was refused.
    Rejected { request_id: u64, reason: Reject },

    /// A batch of document changes for the subscribed user.
    Changes { changes: Vec<DocChange> },

    /// Pong response to client Ping.
    Pong {
        /// Echoed from the Ping message.
        id: u64,
    },

    /// Error message.
    Error {
        /// Human-readable error description.
        message: String,
    },
}

impl ClientMessage {
    pub fn create(request_id: u64, doc: TaskDocument) -> Self {
        ClientMessage::Create { request_id, doc }
    }

    pub fn update(request_id: u64, id: impl Into<String>, fields: TaskFields, version: Hlc) -> Self {
        ClientMessage::Update {
            request_id,
            id: id.into(),
            fields,
            version,
        }
    }

    pub fn delete(request_id: u64, id: impl Into<String>) -> Self {
        ClientMessage::Delete {
            request_id,
            id: id.into(),
        }
    }

    pub fn subscribe(user_id: impl Into<String>) -> Self {
        ClientMessage::Subscribe {
            user_id: user_id.into(),
        }
    }

    pub fn unsubscribe() -> Self {
        ClientMessage::Unsubscribe
    }

    pub fn ping(id: u64) -> Self {
        ClientMessage::Ping { id }
    }

    /// Request ID of a write, `None` for other messages.
    pub fn request_id(&self) -> Option<u64> {
        match self {
            ClientMessage::Create { request_id, .. }
            | ClientMessage::Update { request_id, .. }
            | ClientMessage::Delete { request_id, .. } => Some(*request_id),
            _ => None,
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    pub fn ack(request_id: u64) -> Self {
        ServerMessage::Ack { request_id }
    }

    pub fn rejected(request_id: u64, reason: Reject) -> Self {
        ServerMessage::Rejected { request_id, reason }
    }

    pub fn changes(changes: Vec<DocChange>) -> Self {
        ServerMessage::Changes { changes }
    }

    pub fn pong(id: u64) -> Self {
        ServerMessage::Pong { id }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }

    /// Builds the reply to a write from its outcome.
    pub fn reply<T>(request_id: u64, outcome: &Result<T, Reject>) -> Self {
        match outcome {
            Ok(_) => ServerMessage::ack(request_id),
            Err(reason) => ServerMessage::rejected(request_id, *reason),
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
