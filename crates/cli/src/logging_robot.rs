//! The bundled robot: logs the comment and pull request events it receives.
//!
//! Real robots live in their own crates and replace this one in `main`.

use async_trait::async_trait;
use gitee::{NoteEvent, PullRequestEvent};
use robot::{
    Capabilities, EventContext, HandlerError, NoteEventHandler, PullRequestEventHandler, Robot,
};
use tracing::info;

#[derive(Debug, Default)]
pub struct LoggingRobot;

#[async_trait]
impl NoteEventHandler for LoggingRobot {
    async fn handle_note_event(
        &self,
        event: NoteEvent,
        _ctx: &EventContext,
    ) -> Result<(), HandlerError> {
        if !event.is_creating_comment() {
            return Ok(());
        }

        let (org, repo) = event.org_repo();
        info!(
            org = %org,
            repo = %repo,
            commenter = %event.commenter(),
            on_pull_request = event.is_pull_request(),
            body = %event.comment_body(),
            "receive note event"
        );

        Ok(())
    }
}

#[async_trait]
impl PullRequestEventHandler for LoggingRobot {
    async fn handle_pull_request_event(
        &self,
        event: PullRequestEvent,
        _ctx: &EventContext,
    ) -> Result<(), HandlerError> {
        let (org, repo) = event.org_repo();
        info!(
            org = %org,
            repo = %repo,
            number = event.pr_number(),
            author = %event.pr_author(),
            action = %event.action_desc(),
            "receive pull request event"
        );

        Ok(())
    }
}

impl Robot for LoggingRobot {
    fn capabilities(caps: Capabilities<Self>) -> Capabilities<Self> {
        caps.note_events().pull_request_events()
    }
}

#[cfg(test)]
#[path = "logging_robot_tests.rs"]
mod tests;
