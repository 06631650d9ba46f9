//! Per-event diagnostic context.
//!
//! Every dispatched event gets one [`EventContext`]. It is created by the
//! dispatcher, enriched by the registry entry with fields taken from the
//! decoded payload, and handed to the robot by reference. Anything logged with
//! `tracing` while the handler runs is emitted inside the context's span, so
//! robots never need a global logger to produce correlated output.

use tracing::field::Empty;
use tracing::Span;

use crate::{DeliveryId, EventType};

/// Names of the diagnostic fields declared on every event span.
///
/// Recording a field that is not listed here is silently ignored by `tracing`.
pub mod fields {
    /// Web URL of the comment, issue, or pull request.
    pub const URL: &str = "url";
    /// Action reported by Gitee (or the pull request action description).
    pub const ACTION: &str = "action";
    /// Login of the comment's author.
    pub const COMMENTER: &str = "commenter";
    /// Repository owner.
    pub const ORG: &str = "org";
    /// Repository name.
    pub const REPO: &str = "repo";
    /// Pushed ref.
    pub const GIT_REF: &str = "git_ref";
    /// SHA at the head of a push.
    pub const HEAD: &str = "head";
}

/// Diagnostic handle for one webhook delivery.
#[derive(Debug, Clone)]
pub struct EventContext {
    event_type: EventType,
    delivery_id: DeliveryId,
    span: Span,
}

impl EventContext {
    /// Creates the context and its `gitee_event` span.
    pub fn new(event_type: EventType, delivery_id: DeliveryId) -> Self {
        let span = tracing::info_span!(
            "gitee_event",
            event_type = %event_type,
            delivery_id = %delivery_id,
            url = Empty,
            action = Empty,
            commenter = Empty,
            org = Empty,
            repo = Empty,
            git_ref = Empty,
            head = Empty,
        );

        Self {
            event_type,
            delivery_id,
            span,
        }
    }

    /// The `X-Gitee-Event` value this delivery was routed by.
    pub fn event_type(&self) -> &EventType {
        &self.event_type
    }

    /// The `X-Gitee-Timestamp` value of this delivery.
    pub fn delivery_id(&self) -> &DeliveryId {
        &self.delivery_id
    }

    /// The span all output for this delivery is attached to.
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Records a diagnostic field (see [`fields`]) on the event span.
    pub fn record(&self, field: &'static str, value: &str) -> &Self {
        self.span.record(field, value);
        self
    }
}
