//! Handler registry: the immutable event-type → route table.
//!
//! The registry is built once at startup from the capabilities a [`Robot`]
//! declares and is read-only afterwards, so it can be shared between request
//! handlers and spawned event tasks behind a plain `Arc` without locking.
//!
//! Each entry is an [`EventRoute`]: it decodes the raw payload into the typed
//! event, records the event's diagnostic fields on the [`EventContext`], and
//! calls the robot method for that capability.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use gitee::{GiteeEvent, IssueEvent, NoteEvent, PullRequestEvent, PushEvent};

use crate::context::fields;
use crate::{
    EventContext, EventType, IssueEventHandler, NoteEventHandler, PullRequestEventHandler,
    PushEventHandler, RegistryError, Robot, RouteError,
};

/// A bound handler entry-point for one event type.
#[async_trait]
pub trait EventRoute: Send + Sync {
    /// Decode `payload`, enrich `ctx`, and run the robot's handler.
    ///
    /// # Errors
    ///
    /// - [`RouteError::Payload`] if the payload does not decode or validate;
    ///   the robot is not called.
    /// - [`RouteError::Handler`] if the robot's handler fails.
    async fn run(&self, payload: &[u8], ctx: &EventContext) -> Result<(), RouteError>;
}

// ---------------------------------------------------------------------------
// Capability declaration
// ---------------------------------------------------------------------------

/// Registration table a robot fills in from [`Robot::capabilities`].
///
/// Declaring the same capability twice leaves a single entry.
pub struct Capabilities<R> {
    robot: Arc<R>,
    routes: HashMap<EventType, Arc<dyn EventRoute>>,
}

impl<R: Robot> Capabilities<R> {
    fn new(robot: Arc<R>) -> Self {
        Self {
            robot,
            routes: HashMap::new(),
        }
    }

    /// Route `note` events to [`NoteEventHandler::handle_note_event`].
    pub fn note_events(self) -> Self
    where
        R: NoteEventHandler,
    {
        let route = NoteRoute(Arc::clone(&self.robot));
        self.with_route::<NoteEvent>(route)
    }

    /// Route `issue` events to [`IssueEventHandler::handle_issue_event`].
    pub fn issue_events(self) -> Self
    where
        R: IssueEventHandler,
    {
        let route = IssueRoute(Arc::clone(&self.robot));
        self.with_route::<IssueEvent>(route)
    }

    /// Route `pull_request` events to
    /// [`PullRequestEventHandler::handle_pull_request_event`].
    pub fn pull_request_events(self) -> Self
    where
        R: PullRequestEventHandler,
    {
        let route = PullRequestRoute(Arc::clone(&self.robot));
        self.with_route::<PullRequestEvent>(route)
    }

    /// Route `push` events to [`PushEventHandler::handle_push_event`].
    pub fn push_events(self) -> Self
    where
        R: PushEventHandler,
    {
        let route = PushRoute(Arc::clone(&self.robot));
        self.with_route::<PushEvent>(route)
    }

    fn with_route<E: GiteeEvent>(mut self, route: impl EventRoute + 'static) -> Self {
        self.routes.insert(EventType::of::<E>(), Arc::new(route));
        self
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Immutable mapping from event type to route.
pub struct HandlerRegistry {
    routes: HashMap<EventType, Arc<dyn EventRoute>>,
}

impl HandlerRegistry {
    /// Builds the registry from the capabilities `robot` declares.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotARobot`] if the robot declares no
    /// capability. This is fatal: the service must not start.
    pub fn build<R: Robot>(robot: Arc<R>) -> Result<Self, RegistryError> {
        let caps = R::capabilities(Capabilities::new(robot));

        if caps.routes.is_empty() {
            return Err(RegistryError::NotARobot);
        }

        Ok(Self { routes: caps.routes })
    }

    /// Returns the route for `event_type`, if one is registered.
    pub fn get(&self, event_type: &EventType) -> Option<Arc<dyn EventRoute>> {
        self.routes.get(event_type).cloned()
    }

    /// Returns `true` if a route is registered for `event_type`.
    pub fn contains(&self, event_type: &EventType) -> bool {
        self.routes.contains_key(event_type)
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Always `false` for a registry returned by [`HandlerRegistry::build`].
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Registered event types, in no particular order.
    pub fn event_types(&self) -> impl Iterator<Item = &EventType> {
        self.routes.keys()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut event_types: Vec<&str> = self.routes.keys().map(EventType::as_str).collect();
        event_types.sort_unstable();

        f.debug_struct("HandlerRegistry")
            .field("event_types", &event_types)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Routes, one per capability
// ---------------------------------------------------------------------------

struct NoteRoute<R>(Arc<R>);

#[async_trait]
impl<R: NoteEventHandler> EventRoute for NoteRoute<R> {
    async fn run(&self, payload: &[u8], ctx: &EventContext) -> Result<(), RouteError> {
        let event = NoteEvent::from_payload(payload)?;

        ctx.record(fields::COMMENTER, event.commenter())
            .record(fields::URL, event.comment_url())
            .record(fields::ACTION, event.action());

        self.0
            .handle_note_event(event, ctx)
            .await
            .map_err(RouteError::Handler)
    }
}

struct IssueRoute<R>(Arc<R>);

#[async_trait]
impl<R: IssueEventHandler> EventRoute for IssueRoute<R> {
    async fn run(&self, payload: &[u8], ctx: &EventContext) -> Result<(), RouteError> {
        let event = IssueEvent::from_payload(payload)?;

        ctx.record(fields::URL, event.issue_url())
            .record(fields::ACTION, event.action());

        self.0
            .handle_issue_event(event, ctx)
            .await
            .map_err(RouteError::Handler)
    }
}

struct PullRequestRoute<R>(Arc<R>);

#[async_trait]
impl<R: PullRequestEventHandler> EventRoute for PullRequestRoute<R> {
    async fn run(&self, payload: &[u8], ctx: &EventContext) -> Result<(), RouteError> {
        let event = PullRequestEvent::from_payload(payload)?;

        ctx.record(fields::URL, event.pr_url())
            .record(fields::ACTION, event.action_desc());

        self.0
            .handle_pull_request_event(event, ctx)
            .await
            .map_err(RouteError::Handler)
    }
}

struct PushRoute<R>(Arc<R>);

#[async_trait]
impl<R: PushEventHandler> EventRoute for PushRoute<R> {
    async fn run(&self, payload: &[u8], ctx: &EventContext) -> Result<(), RouteError> {
        let event = PushEvent::from_payload(payload)?;

        {
            let (org, repo) = event.org_repo();
            ctx.record(fields::ORG, org)
                .record(fields::REPO, repo)
                .record(fields::GIT_REF, event.git_ref())
                .record(fields::HEAD, event.head());
        }

        self.0
            .handle_push_event(event, ctx)
            .await
            .map_err(RouteError::Handler)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
