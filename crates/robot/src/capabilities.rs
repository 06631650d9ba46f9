//! Capability traits a robot implements to receive events.
//!
//! A robot implements any subset of [`NoteEventHandler`],
//! [`IssueEventHandler`], [`PullRequestEventHandler`], and
//! [`PushEventHandler`], then lists the ones it wants routed in
//! [`Robot::capabilities`]. Each listing method on
//! [`Capabilities`](crate::Capabilities) is only available when the robot
//! implements the matching trait, so a robot can never be registered for an
//! event it cannot handle.
//!
//! # Examples
//!
//! ```rust
//! use async_trait::async_trait;
//! use gitee::NoteEvent;
//! use robot::{Capabilities, EventContext, HandlerError, NoteEventHandler, Robot};
//!
//! struct Greeter;
//!
//! #[async_trait]
//! impl NoteEventHandler for Greeter {
//!     async fn handle_note_event(
//!         &self,
//!         event: NoteEvent,
//!         _ctx: &EventContext,
//!     ) -> Result<(), HandlerError> {
//!         tracing::info!(commenter = %event.commenter(), "receive note event");
//!         Ok(())
//!     }
//! }
//!
//! impl Robot for Greeter {
//!     fn capabilities(caps: Capabilities<Self>) -> Capabilities<Self> {
//!         caps.note_events()
//!     }
//! }
//! ```

use async_trait::async_trait;
use gitee::{IssueEvent, NoteEvent, PullRequestEvent, PushEvent};

use crate::{Capabilities, EventContext, HandlerError};

/// An automation unit that reacts to Gitee webhook events.
pub trait Robot: Send + Sync + Sized + 'static {
    /// Declares which events this robot receives.
    ///
    /// Returning `caps` unchanged declares nothing, which makes registry
    /// construction fail.
    fn capabilities(caps: Capabilities<Self>) -> Capabilities<Self>;
}

/// Receives comment (note) events.
#[async_trait]
pub trait NoteEventHandler: Send + Sync + 'static {
    /// Handle one decoded note event.
    ///
    /// Errors are logged against `ctx` and otherwise dropped.
    async fn handle_note_event(&self, event: NoteEvent, ctx: &EventContext)
        -> Result<(), HandlerError>;
}

/// Receives issue events.
#[async_trait]
pub trait IssueEventHandler: Send + Sync + 'static {
    /// Handle one decoded issue event.
    async fn handle_issue_event(
        &self,
        event: IssueEvent,
        ctx: &EventContext,
    ) -> Result<(), HandlerError>;
}

/// Receives pull request events.
#[async_trait]
pub trait PullRequestEventHandler: Send + Sync + 'static {
    /// Handle one decoded pull request event.
    async fn handle_pull_request_event(
        &self,
        event: PullRequestEvent,
        ctx: &EventContext,
    ) -> Result<(), HandlerError>;
}

/// Receives push events.
#[async_trait]
pub trait PushEventHandler: Send + Sync + 'static {
    /// Handle one decoded push event.
    async fn handle_push_event(&self, event: PushEvent, ctx: &EventContext)
        -> Result<(), HandlerError>;
}
