use super::*;
use crate::test_support::{note_payload, pull_request_payload, push_payload, registry, TestRobot};
use std::sync::atomic::Ordering;
use std::time::Duration;

use tokio::time::timeout;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// Captures the message of every event, with its level.
#[derive(Clone, Default)]
struct Messages(Arc<std::sync::Mutex<Vec<(tracing::Level, String)>>>);

impl Messages {
    fn count(&self, level: tracing::Level, message: &str) -> usize {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, m)| *l == level && m == message)
            .count()
    }
}

struct MessageVisitor(Option<String>);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = Some(format!("{value:?}"));
        }
    }
}

impl<S: tracing::Subscriber> Layer<S> for Messages {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(None);
        event.record(&mut visitor);
        if let Some(message) = visitor.0 {
            self.0
                .lock()
                .unwrap()
                .push((*event.metadata().level(), message));
        }
    }
}

fn dispatcher(robot: &Arc<TestRobot>) -> Dispatcher {
    Dispatcher::new(registry(robot), Arc::new(DrainCounter::new()))
}

fn event_type(value: &str) -> EventType {
    EventType::new(value).unwrap()
}

fn delivery_id() -> DeliveryId {
    DeliveryId::new("169900").unwrap()
}

async fn drained(dispatcher: &Dispatcher) {
    timeout(Duration::from_secs(5), dispatcher.drain().wait())
        .await
        .expect("handler tasks must drain");
}

#[tokio::test]
async fn test_registered_event_runs_handler_exactly_once() {
    let robot = TestRobot::open();
    let dispatcher = dispatcher(&robot);

    let outcome = dispatcher.dispatch(event_type("note"), delivery_id(), note_payload("alice"));
    assert_eq!(outcome, DispatchOutcome::Spawned);

    drained(&dispatcher).await;

    let notes = robot.notes.lock().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].commenter(), "alice");
}

#[tokio::test]
async fn test_unregistered_event_is_ignored() {
    let robot = TestRobot::open();
    let dispatcher = dispatcher(&robot);

    let outcome = dispatcher.dispatch(event_type("issue"), delivery_id(), note_payload("alice"));

    assert_eq!(outcome, DispatchOutcome::Ignored);
    assert_eq!(dispatcher.drain().in_flight(), 0);
    assert_eq!(robot.note_count(), 0);
}

#[tokio::test]
async fn test_undecodable_payload_is_contained() {
    let robot = TestRobot::open();
    let dispatcher = dispatcher(&robot);

    let outcome = dispatcher.dispatch(event_type("note"), delivery_id(), Bytes::from_static(b"{"));
    assert_eq!(outcome, DispatchOutcome::Spawned);

    drained(&dispatcher).await;
    assert_eq!(robot.started.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_failing_handler_does_not_block_later_dispatches() {
    let robot = TestRobot::open();
    let dispatcher = dispatcher(&robot);

    for _ in 0..3 {
        dispatcher.dispatch(event_type("pull_request"), delivery_id(), pull_request_payload());
    }
    dispatcher.dispatch(event_type("note"), delivery_id(), note_payload("bob"));

    drained(&dispatcher).await;

    assert_eq!(robot.failures.load(Ordering::SeqCst), 3);
    assert_eq!(robot.note_count(), 1);
}

#[tokio::test]
async fn test_panicking_handler_releases_drain_count() {
    let robot = TestRobot::open();
    let dispatcher = dispatcher(&robot);

    dispatcher.dispatch(event_type("push"), delivery_id(), push_payload());
    dispatcher.dispatch(event_type("push"), delivery_id(), push_payload());
    drained(&dispatcher).await;

    assert_eq!(robot.panics.load(Ordering::SeqCst), 2);

    dispatcher.dispatch(event_type("note"), delivery_id(), note_payload("carol"));
    drained(&dispatcher).await;

    assert_eq!(robot.note_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_in_flight_handlers_are_counted_until_they_finish() {
    let robot = TestRobot::gated();
    let dispatcher = dispatcher(&robot);

    for i in 0..5 {
        dispatcher.dispatch(
            event_type("note"),
            DeliveryId::new(format!("delivery-{i}")).unwrap(),
            note_payload("dave"),
        );
    }

    assert_eq!(dispatcher.drain().in_flight(), 5);
    assert!(
        timeout(Duration::from_millis(100), dispatcher.drain().wait())
            .await
            .is_err(),
        "gated handlers must keep the counter above zero"
    );

    robot.release(5);
    drained(&dispatcher).await;

    assert_eq!(robot.note_count(), 5);
}

#[tokio::test]
async fn test_each_failure_is_logged_once_per_invocation() {
    let messages = Messages::default();
    let _default =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(messages.clone()));

    let robot = TestRobot::open();
    let dispatcher = dispatcher(&robot);

    for _ in 0..3 {
        dispatcher.dispatch(event_type("pull_request"), delivery_id(), pull_request_payload());
    }
    dispatcher.dispatch(event_type("note"), delivery_id(), Bytes::from_static(b"{"));
    for _ in 0..2 {
        dispatcher.dispatch(event_type("push"), delivery_id(), push_payload());
    }
    dispatcher.dispatch(event_type("note"), delivery_id(), note_payload("erin"));
    drained(&dispatcher).await;

    assert_eq!(messages.count(tracing::Level::ERROR, "Event handler failed"), 4);
    assert_eq!(messages.count(tracing::Level::ERROR, "Event handler panicked"), 2);
    assert_eq!(messages.count(tracing::Level::INFO, "Event handled"), 1);
}
