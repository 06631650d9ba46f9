//! Payload deserialization and validation.
//!
//! [`GiteeEvent`] ties each typed event to the `X-Gitee-Event` identifier it is
//! routed under and to the structural checks a decoded body must pass before
//! a robot ever sees it.

use serde::de::DeserializeOwned;

use crate::events::{IssueEvent, NoteEvent, PullRequestEvent, PullRequestHook, PushEvent, Repository};
use crate::PayloadError;

/// A webhook event type that can be decoded from a raw request body.
pub trait GiteeEvent: DeserializeOwned + Send + 'static {
    /// Routing key: the `X-Gitee-Event` value this event is delivered under.
    const EVENT_TYPE: &'static str;

    /// Checks that the objects this event type cannot do without are present.
    fn validate(&self) -> Result<(), PayloadError>;

    /// Decodes and validates a raw webhook body.
    ///
    /// # Errors
    ///
    /// - [`PayloadError::Malformed`] if the body is not JSON of the right shape.
    /// - [`PayloadError::MissingField`] if validation fails.
    fn from_payload(payload: &[u8]) -> Result<Self, PayloadError> {
        let event: Self =
            serde_json::from_slice(payload).map_err(|source| PayloadError::Malformed {
                event_type: Self::EVENT_TYPE,
                source,
            })?;

        event.validate()?;
        Ok(event)
    }
}

impl GiteeEvent for NoteEvent {
    const EVENT_TYPE: &'static str = "note";

    fn validate(&self) -> Result<(), PayloadError> {
        let event_type = Self::EVENT_TYPE;

        if self.comment.is_none() {
            return Err(PayloadError::missing(event_type, "Comment"));
        }

        if self.is_pull_request() {
            check_pull_request(self.pull_request.as_ref(), event_type)?;
        }

        if self.is_issue() && self.issue.is_none() {
            return Err(PayloadError::missing(event_type, "Issue"));
        }

        check_repository(self.repository.as_ref(), event_type)
    }
}

impl GiteeEvent for IssueEvent {
    const EVENT_TYPE: &'static str = "issue";

    fn validate(&self) -> Result<(), PayloadError> {
        if self.issue.is_none() {
            return Err(PayloadError::missing(Self::EVENT_TYPE, "Issue"));
        }

        check_repository(self.repository.as_ref(), Self::EVENT_TYPE)
    }
}

impl GiteeEvent for PullRequestEvent {
    const EVENT_TYPE: &'static str = "pull_request";

    fn validate(&self) -> Result<(), PayloadError> {
        check_pull_request(self.pull_request.as_ref(), Self::EVENT_TYPE)?;
        check_repository(self.repository.as_ref(), Self::EVENT_TYPE)
    }
}

impl GiteeEvent for PushEvent {
    const EVENT_TYPE: &'static str = "push";

    fn validate(&self) -> Result<(), PayloadError> {
        check_repository(self.repository.as_ref(), Self::EVENT_TYPE)
    }
}

// ---------------------------------------------------------------------------
// Shared checks
// ---------------------------------------------------------------------------

fn check_pull_request(
    pr: Option<&PullRequestHook>,
    event_type: &'static str,
) -> Result<(), PayloadError> {
    let pr = pr.ok_or_else(|| PayloadError::missing(event_type, "PullRequest"))?;

    if pr.head.is_none() || pr.base.is_none() {
        return Err(PayloadError::missing(
            event_type,
            "PullRequest.Head or PullRequest.Base",
        ));
    }

    Ok(())
}

fn check_repository(
    repository: Option<&Repository>,
    event_type: &'static str,
) -> Result<(), PayloadError> {
    let repository = repository.ok_or_else(|| PayloadError::missing(event_type, "Repository"))?;

    let (org, repo) = repository.org_repo();
    if org.is_empty() || repo.is_empty() {
        return Err(PayloadError::missing(event_type, "Repository .org or .repo"));
    }

    Ok(())
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
