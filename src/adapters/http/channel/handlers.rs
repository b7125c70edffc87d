//! HTTP handlers for channel endpoints.
//!
//! These handlers connect Axum routes to the hub: producer ingest and the
//! subscriber event stream.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, Query, State};
use axum::http::{header, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::adapters::http::AppState;
use crate::adapters::sse::open_event_stream;
use crate::application::handlers::PostMessageCommand;
use crate::domain::messaging::HubError;

use super::dto::{ErrorResponse, EventsQuery, PostMessageRequest, PostMessageResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/v1/channel/:channel_id/messages - Broadcast an event to a channel
///
/// Returns 202 once every current subscriber has been attempted. The receipt
/// reports counts, not delivery guarantees.
pub async fn post_message(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    body: Result<Json<PostMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ChannelApiError> {
    if channel_id.trim().is_empty() {
        return Err(HubError::missing_identifier("channel_id").into());
    }
    let Json(request) = body?;

    let handler = state.post_message_handler();
    let cmd = PostMessageCommand {
        channel_id,
        event: request.into(),
    };

    let report = handler.handle(cmd).await?;

    Ok((StatusCode::ACCEPTED, Json(PostMessageResponse::from(report))))
}

// ════════════════════════════════════════════════════════════════════════════════
// Stream Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/v1/events?channel_id&user_id&session_id - Open a subscriber stream
///
/// Admission errors are answered with a JSON error before streaming starts.
pub async fn stream_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Result<Response, ChannelApiError> {
    let body = open_event_stream(
        &state.hub,
        &query.channel_id,
        &query.user_id,
        &query.session_id,
        state.sink_buffer,
    )?;

    let headers = [
        (header::CONTENT_TYPE, "text/event-stream"),
        (header::CACHE_CONTROL, "no-cache"),
        (HeaderName::from_static("x-accel-buffering"), "no"),
    ];
    Ok((headers, body).into_response())
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error wrapper for channel endpoints.
#[derive(Debug)]
pub enum ChannelApiError {
    Hub(HubError),
    InvalidBody(String),
}

impl From<HubError> for ChannelApiError {
    fn from(err: HubError) -> Self {
        Self::Hub(err)
    }
}

impl From<JsonRejection> for ChannelApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for ChannelApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ChannelApiError::InvalidBody(reason) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_details(
                    "INVALID_BODY",
                    "Invalid request body",
                    json!({ "reason": reason }),
                ),
            ),
            ChannelApiError::Hub(err) => {
                let status = match err {
                    HubError::MissingIdentifier { .. } => StatusCode::BAD_REQUEST,
                    HubError::DuplicateSession { .. } => StatusCode::CONFLICT,
                    HubError::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
                    HubError::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE,
                };
                let body = match err {
                    HubError::MissingIdentifier { field } => ErrorResponse::with_details(
                        err.code(),
                        err.to_string(),
                        json!({ "field": field }),
                    ),
                    _ => ErrorResponse::new(err.code(), err.to_string()),
                };
                (status, body)
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ChannelId, SessionId, UserId};

    #[test]
    fn missing_identifier_maps_to_400() {
        let err = ChannelApiError::from(HubError::missing_identifier("channel_id"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn duplicate_session_maps_to_409() {
        let err = ChannelApiError::from(HubError::DuplicateSession {
            channel_id: ChannelId::new("c1").unwrap(),
            user_id: UserId::new("u1").unwrap(),
            session_id: SessionId::new("s1").unwrap(),
        });
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn encoding_failure_maps_to_500() {
        let err = ChannelApiError::from(HubError::Encoding("bad float".into()));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn shutting_down_maps_to_503() {
        let err = ChannelApiError::from(HubError::ShuttingDown);
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn invalid_body_maps_to_400() {
        let err = ChannelApiError::InvalidBody("expected value".into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
