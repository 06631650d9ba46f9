//! Webhook HTTP endpoint.
//!
//! Two routes are served:
//!
//! - `POST <hook_path>` (default `/gitee-hook`): validates a delivery and hands
//!   it to the [`Dispatcher`].
//! - `GET /`: health check, always `200`. `HEAD` is not answered.
//!
//! Every other path, and every other method on those two paths, is answered
//! with `400 Bad Request: unknown path`.
//!
//! # Validation order
//!
//! The first failing check wins and no handler runs:
//!
//! 1. path (enforced by routing)
//! 2. `User-Agent` must be exactly `Robot-Gitee-Access`
//! 3. `X-Gitee-Event` present and non-empty
//! 4. `X-Gitee-Timestamp` present and non-empty
//! 5. `Content-Length` present, parseable, and within the configured limit;
//!    the body must then be exactly that long
//!
//! # Fire-and-forget
//!
//! A valid delivery is answered with `201 accepted` as soon as it has been
//! handed off. The status reflects acceptance only: the dispatcher may drop
//! the event (no handler registered) or the handler may fail later, and the
//! sender learns of neither.

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{AsHeaderName, CONTENT_LENGTH, USER_AGENT};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{on, post, MethodFilter};
use axum::Router;
use bytes::Bytes;
use robot::{DeliveryId, EventType};
use thiserror::Error;
use tracing::{debug, warn};

use crate::dispatcher::Dispatcher;
use crate::ListenerConfig;

/// The only `User-Agent` Gitee's webhook sender presents.
pub const GITEE_USER_AGENT: &str = "Robot-Gitee-Access";

/// Header carrying the event type (routing key).
pub const EVENT_TYPE_HEADER: &str = "x-gitee-event";

/// Header carrying the delivery timestamp, used as correlation id.
pub const DELIVERY_ID_HEADER: &str = "x-gitee-timestamp";

/// Health check path.
pub const HEALTH_PATH: &str = "/";

/// Body of the `201` answer to an accepted delivery.
pub const ACCEPTED_BODY: &str = "accepted";

/// Body of the `200` health answer.
pub const HEALTHY_BODY: &str = "ok";

// ============================================================================
// Rejections
// ============================================================================

/// Why a request was refused. Rendered as the response body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WebhookRejection {
    #[error("Bad Request: unknown path")]
    UnknownPath,

    #[error("Bad Request: unknown User-Agent Header")]
    UnknownUserAgent,

    #[error("Bad Request: Missing X-Gitee-Event Header")]
    MissingEventType,

    #[error("Bad Request: Missing X-Gitee-Timestamp Header")]
    MissingDeliveryId,

    #[error("Bad Request: Missing or invalid Content-Length Header")]
    InvalidContentLength,

    #[error("Payload Too Large: declared {declared} bytes, limit is {limit}")]
    PayloadTooLarge { declared: usize, limit: usize },

    #[error("Bad Request: failed to read request body")]
    UnreadableBody,
}

impl WebhookRejection {
    /// HTTP status for this rejection.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for WebhookRejection {
    fn into_response(self) -> Response {
        warn!(reason = %self, "Rejecting webhook request");
        (self.status(), self.to_string()).into_response()
    }
}

// ============================================================================
// Router
// ============================================================================

#[derive(Debug, Clone)]
struct EndpointState {
    dispatcher: Dispatcher,
    max_body_bytes: usize,
}

/// Builds the endpoint router.
///
/// `config` must have passed [`ListenerConfig::validate`]; axum panics on a
/// hook path that does not start with `/`.
pub fn router(config: &ListenerConfig, dispatcher: Dispatcher) -> Router {
    let state = EndpointState {
        dispatcher,
        max_body_bytes: config.max_body_bytes,
    };

    Router::new()
        .route(HEALTH_PATH, on(MethodFilter::GET, health).fallback(unknown_path))
        .route(&config.hook_path, post(receive_hook).fallback(unknown_path))
        .fallback(unknown_path)
        .with_state(state)
}

async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, HEALTHY_BODY)
}

async fn unknown_path() -> WebhookRejection {
    WebhookRejection::UnknownPath
}

async fn receive_hook(
    State(state): State<EndpointState>,
    headers: HeaderMap,
    body: Body,
) -> Result<(StatusCode, &'static str), WebhookRejection> {
    let (event_type, delivery_id, declared) = parse_headers(&headers, state.max_body_bytes)?;
    let payload = read_body(body, declared).await?;

    debug!(
        event_type = %event_type,
        delivery_id = %delivery_id,
        bytes = payload.len(),
        "Webhook accepted"
    );

    state.dispatcher.dispatch(event_type, delivery_id, payload);

    Ok((StatusCode::CREATED, ACCEPTED_BODY))
}

// ============================================================================
// Validation
// ============================================================================

fn header_str<'a>(headers: &'a HeaderMap, name: impl AsHeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Checks steps 2–5 and returns the routing key, correlation id, and body length.
fn parse_headers(
    headers: &HeaderMap,
    max_body_bytes: usize,
) -> Result<(EventType, DeliveryId, usize), WebhookRejection> {
    if header_str(headers, USER_AGENT) != Some(GITEE_USER_AGENT) {
        return Err(WebhookRejection::UnknownUserAgent);
    }

    let event_type = header_str(headers, EVENT_TYPE_HEADER)
        .and_then(EventType::new)
        .ok_or(WebhookRejection::MissingEventType)?;

    let delivery_id = header_str(headers, DELIVERY_ID_HEADER)
        .and_then(DeliveryId::new)
        .ok_or(WebhookRejection::MissingDeliveryId)?;

    let declared = header_str(headers, CONTENT_LENGTH)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .ok_or(WebhookRejection::InvalidContentLength)?;

    if declared > max_body_bytes {
        return Err(WebhookRejection::PayloadTooLarge {
            declared,
            limit: max_body_bytes,
        });
    }

    Ok((event_type, delivery_id, declared))
}

/// Reads exactly `declared` bytes.
async fn read_body(body: Body, declared: usize) -> Result<Bytes, WebhookRejection> {
    let payload = axum::body::to_bytes(body, declared)
        .await
        .map_err(|_| WebhookRejection::UnreadableBody)?;

    if payload.len() != declared {
        return Err(WebhookRejection::UnreadableBody);
    }

    Ok(payload)
}

#[cfg(test)]
#[path = "endpoint_tests.rs"]
mod tests;
