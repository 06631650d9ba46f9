//! Shared robots and payloads for the listener's unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use gitee::{NoteEvent, PullRequestEvent, PushEvent};
use robot::{
    Capabilities, EventContext, HandlerError, HandlerRegistry, NoteEventHandler,
    PullRequestEventHandler, PushEventHandler, Robot,
};
use serde_json::json;
use tokio::sync::Semaphore;

/// Robot with one behaviour per capability:
///
/// - `note`: records the event, after passing through `gate`.
/// - `pull_request`: always fails.
/// - `push`: always panics.
///
/// `issue` is deliberately not registered.
pub(crate) struct TestRobot {
    pub notes: Mutex<Vec<NoteEvent>>,
    pub started: AtomicUsize,
    pub failures: AtomicUsize,
    pub panics: AtomicUsize,
    gate: Semaphore,
}

impl TestRobot {
    /// Note handlers complete immediately.
    pub fn open() -> Arc<Self> {
        Self::with_permits(Semaphore::MAX_PERMITS)
    }

    /// Note handlers block until [`TestRobot::release`] hands out permits.
    pub fn gated() -> Arc<Self> {
        Self::with_permits(0)
    }

    fn with_permits(permits: usize) -> Arc<Self> {
        Arc::new(Self {
            notes: Mutex::new(Vec::new()),
            started: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
            panics: AtomicUsize::new(0),
            gate: Semaphore::new(permits),
        })
    }

    /// Lets `n` blocked note handlers finish.
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    pub fn note_count(&self) -> usize {
        self.notes.lock().unwrap().len()
    }
}

#[async_trait]
impl NoteEventHandler for TestRobot {
    async fn handle_note_event(
        &self,
        event: NoteEvent,
        _ctx: &EventContext,
    ) -> Result<(), HandlerError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let _permit = self.gate.acquire().await?;
        self.notes.lock().unwrap().push(event);
        Ok(())
    }
}

#[async_trait]
impl PullRequestEventHandler for TestRobot {
    async fn handle_pull_request_event(
        &self,
        _event: PullRequestEvent,
        _ctx: &EventContext,
    ) -> Result<(), HandlerError> {
        self.failures.fetch_add(1, Ordering::SeqCst);
        Err("pull request handler always fails".into())
    }
}

#[async_trait]
impl PushEventHandler for TestRobot {
    async fn handle_push_event(
        &self,
        _event: PushEvent,
        _ctx: &EventContext,
    ) -> Result<(), HandlerError> {
        self.panics.fetch_add(1, Ordering::SeqCst);
        panic!("push handler always panics");
    }
}

impl Robot for TestRobot {
    fn capabilities(caps: Capabilities<Self>) -> Capabilities<Self> {
        caps.note_events().pull_request_events().push_events()
    }
}

/// Robot that declares the note capability and nothing else.
#[derive(Default)]
pub(crate) struct NoteOnlyRobot {
    pub notes: Mutex<Vec<NoteEvent>>,
}

#[async_trait]
impl NoteEventHandler for NoteOnlyRobot {
    async fn handle_note_event(
        &self,
        event: NoteEvent,
        _ctx: &EventContext,
    ) -> Result<(), HandlerError> {
        self.notes.lock().unwrap().push(event);
        Ok(())
    }
}

impl Robot for NoteOnlyRobot {
    fn capabilities(caps: Capabilities<Self>) -> Capabilities<Self> {
        caps.note_events()
    }
}

pub(crate) fn registry(robot: &Arc<TestRobot>) -> Arc<HandlerRegistry> {
    Arc::new(HandlerRegistry::build(Arc::clone(robot)).unwrap())
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

pub(crate) fn note_payload(commenter: &str) -> Bytes {
    let body = json!({
        "action": "comment",
        "noteable_type": "PullRequest",
        "comment": {
            "id": 1,
            "body": "/retest",
            "html_url": "https://gitee.com/owner/repo/pulls/1#note_1",
            "user": { "login": commenter }
        },
        "pull_request": {
            "number": 1,
            "state": "open",
            "html_url": "https://gitee.com/owner/repo/pulls/1",
            "head": { "ref": "feature", "sha": "abc" },
            "base": { "ref": "master", "sha": "def" }
        },
        "repository": { "namespace": "owner", "path": "repo", "full_name": "owner/repo" }
    });

    Bytes::from(serde_json::to_vec(&body).unwrap())
}

pub(crate) fn pull_request_payload() -> Bytes {
    let body = json!({
        "action": "open",
        "pull_request": {
            "number": 2,
            "html_url": "https://gitee.com/owner/repo/pulls/2",
            "head": { "ref": "feature", "sha": "abc" },
            "base": { "ref": "master", "sha": "def" }
        },
        "repository": { "namespace": "owner", "path": "repo" }
    });

    Bytes::from(serde_json::to_vec(&body).unwrap())
}

pub(crate) fn push_payload() -> Bytes {
    let body = json!({
        "ref": "refs/heads/master",
        "after": "abc",
        "repository": { "namespace": "owner", "path": "repo" }
    });

    Bytes::from(serde_json::to_vec(&body).unwrap())
}
