//! The event a producer posts to a channel.
//!
//! Events are transient: one is built per ingest call, encoded once for the
//! broadcast, and dropped afterwards.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId};

/// A message posted by a user to a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub user: EventUser,
    pub message: EventMessage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
}

/// The producing user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventUser {
    pub id: UserId,
}

/// Message payload. The body is arbitrary user text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMessage {
    pub body: String,
}

impl Event {
    /// Creates an unstamped event.
    pub fn new(user_id: UserId, body: impl Into<String>) -> Self {
        Self {
            user: EventUser { id: user_id },
            message: EventMessage { body: body.into() },
            timestamp: None,
        }
    }

    /// Fills in the timestamp with the current time if the producer left it out.
    pub fn stamped(mut self) -> Self {
        if self.timestamp.is_none() {
            self.timestamp = Some(Timestamp::now());
        }
        self
    }
}
