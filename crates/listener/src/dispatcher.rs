//! Fire-and-forget dispatcher.
//!
//! [`Dispatcher::dispatch`] looks the event type up in the registry and, when
//! a route exists, spawns one Tokio task per event to run it. The caller is
//! never told how the handler fared: by the time a handler can fail, the
//! webhook sender has already been answered.
//!
//! # Failure isolation
//!
//! Each task catches everything its route can produce (decode errors, handler
//! errors, and panics) and logs it inside the event's span. Nothing escapes
//! the task, so one misbehaving handler cannot affect other deliveries or the
//! HTTP endpoint.
//!
//! # Concurrency
//!
//! There is no pool and no queue: every routed event gets its own task, and
//! events of the same or different types may run in parallel and finish in
//! any order. The [`DrainCounter`] observes these tasks but never limits them.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use bytes::Bytes;
use futures::FutureExt;
use robot::{DeliveryId, EventContext, EventRoute, EventType, HandlerRegistry};
use tracing::{debug, error, info, Instrument};

use crate::drain::DrainCounter;

/// What [`Dispatcher::dispatch`] did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A handler task was spawned.
    Spawned,
    /// No handler is registered for the event type; the event was dropped.
    Ignored,
}

/// Routes events to registry entries on independent tasks.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<HandlerRegistry>,
    drain: Arc<DrainCounter>,
}

impl Dispatcher {
    /// Creates a dispatcher over an immutable registry.
    pub fn new(registry: Arc<HandlerRegistry>, drain: Arc<DrainCounter>) -> Self {
        Self { registry, drain }
    }

    /// The counter tracking this dispatcher's in-flight handler tasks.
    pub fn drain(&self) -> &Arc<DrainCounter> {
        &self.drain
    }

    /// Hands an event to its handler without waiting for it.
    ///
    /// An unregistered event type is a silent no-op, logged at `debug` only.
    /// The endpoint has committed to an "accepted" response before this
    /// lookup happens, so routed and unrouted events look the same to the
    /// sender.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn dispatch(
        &self,
        event_type: EventType,
        delivery_id: DeliveryId,
        payload: Bytes,
    ) -> DispatchOutcome {
        let Some(route) = self.registry.get(&event_type) else {
            debug!(
                event_type = %event_type,
                delivery_id = %delivery_id,
                "Ignoring unknown event type"
            );
            return DispatchOutcome::Ignored;
        };

        let guard = self.drain.enter();
        let ctx = EventContext::new(event_type, delivery_id);
        let span = ctx.span().clone();

        tokio::spawn(
            async move {
                let _guard = guard;
                run_route(route, payload, ctx).await;
            }
            .instrument(span),
        );

        DispatchOutcome::Spawned
    }
}

async fn run_route(route: Arc<dyn EventRoute>, payload: Bytes, ctx: EventContext) {
    let outcome = AssertUnwindSafe(route.run(&payload, &ctx))
        .catch_unwind()
        .await;

    match outcome {
        Ok(Ok(())) => info!("Event handled"),
        Ok(Err(e)) => error!(error = %e, "Event handler failed"),
        Err(panic) => error!(
            panic = %panic_message(panic.as_ref()),
            "Event handler panicked"
        ),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
