//! Errors produced while turning a raw webhook body into a typed event.

use thiserror::Error;

/// A webhook body could not be converted into the requested event type.
///
/// Both variants are terminal for the delivery they belong to: the dispatcher
/// logs them against the event's context and drops the event.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The body is not JSON, or its shape does not match the event type.
    #[error("payload is not a valid {event_type} event: {source}")]
    Malformed {
        /// Event-type identifier the body was decoded as.
        event_type: &'static str,
        /// Underlying decoder error.
        #[source]
        source: serde_json::Error,
    },

    /// The body decoded, but an object the event type requires is absent or empty.
    #[error("{event_type} is illegal: the field of '{field}' is empty")]
    MissingField {
        /// Event-type identifier the body was decoded as.
        event_type: &'static str,
        /// Dotted name of the missing field (e.g. `"PullRequest.Head or PullRequest.Base"`).
        field: &'static str,
    },
}

impl PayloadError {
    pub(crate) fn missing(event_type: &'static str, field: &'static str) -> Self {
        Self::MissingField { event_type, field }
    }
}
