//! HTTP DTOs for channel endpoints.
//!
//! These types define the JSON request/response structure for ingest and the
//! event stream query string.

use serde::{Deserialize, Serialize};

use crate::application::hub::DeliveryReport;
use crate::domain::foundation::Timestamp;
use crate::domain::messaging::{Event, EventMessage, EventUser};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/v1/channel/:channel_id/messages`.
#[derive(Debug, Clone, Deserialize)]
pub struct PostMessageRequest {
    pub user: EventUser,
    pub message: EventMessage,
    /// Producer-supplied time; the server stamps the event when absent.
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
}

impl From<PostMessageRequest> for Event {
    fn from(request: PostMessageRequest) -> Self {
        Event {
            user: request.user,
            message: request.message,
            timestamp: request.timestamp,
        }
    }
}

/// Query string of `GET /api/v1/events`.
///
/// Missing parameters deserialize as empty strings so the hub reports which
/// identifier is missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventsQuery {
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub session_id: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Acceptance receipt for a posted message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostMessageResponse {
    pub channel_id: String,
    pub recipients: usize,
    pub delivered: usize,
    pub failed: usize,
}

impl From<DeliveryReport> for PostMessageResponse {
    fn from(report: DeliveryReport) -> Self {
        Self {
            failed: report.failed(),
            channel_id: report.channel_id.to_string(),
            recipients: report.recipients,
            delivered: report.delivered,
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Create an error response with details.
    pub fn with_details(
        error_code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}
