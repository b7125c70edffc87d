//! Hub error taxonomy.
//!
//! `HubError` is what a subscribe or broadcast caller can see. `DeliveryError`
//! describes a single failed send and never escapes a broadcast; it is only
//! reported through the delivery report.

use std::time::Duration;

use thiserror::Error;

use crate::domain::foundation::{ChannelId, SessionId, UserId, ValidationError};

/// Errors surfaced to callers of the hub.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HubError {
    /// A channel, user or session identifier was missing or blank.
    #[error("Missing required identifier: {field}")]
    MissingIdentifier { field: String },

    /// The (channel, user, session) triple already has a live connection.
    #[error("Session {session_id} of user {user_id} is already subscribed to channel {channel_id}")]
    DuplicateSession {
        channel_id: ChannelId,
        user_id: UserId,
        session_id: SessionId,
    },

    /// The event could not be serialized; nobody received it.
    #[error("Failed to encode event: {0}")]
    Encoding(String),

    /// The hub is shutting down and no longer accepts subscribers.
    #[error("Hub is shutting down")]
    ShuttingDown,
}

impl HubError {
    /// Creates a missing identifier error.
    pub fn missing_identifier(field: impl Into<String>) -> Self {
        HubError::MissingIdentifier {
            field: field.into(),
        }
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            HubError::MissingIdentifier { .. } => "MISSING_IDENTIFIER",
            HubError::DuplicateSession { .. } => "DUPLICATE_SESSION",
            HubError::Encoding(_) => "ENCODING_FAILED",
            HubError::ShuttingDown => "SHUTTING_DOWN",
        }
    }
}

impl From<ValidationError> for HubError {
    fn from(err: ValidationError) -> Self {
        HubError::missing_identifier(err.field())
    }
}

/// Why a single send to a subscriber failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The connection already left the active state; nothing was sent.
    #[error("Connection already closed")]
    AlreadyClosed,

    /// The transport closed the sink.
    #[error("Sink closed by transport")]
    SinkClosed,

    /// The sink did not accept the frame within the send timeout.
    #[error("Send timed out after {after:?}")]
    Timeout { after: Duration },

    /// The sink reported an error.
    #[error("Send failed: {0}")]
    Failed(String),
}
