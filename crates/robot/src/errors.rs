//! Error types for robot handlers and handler registration.
//!
//! [`HandlerError`] is what a robot returns; [`RouteError`] is what running a
//! registry entry can produce (decoding or handling). Neither ever reaches the
//! webhook sender: the dispatcher logs them and moves on.
//!
//! [`RegistryError`] is the only startup-fatal error in this crate.

use gitee::PayloadError;
use thiserror::Error;

/// Error returned by a robot's event handler method.
///
/// Boxed so robots can surface whatever their own client or business logic
/// fails with.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

// ---------------------------------------------------------------------------
// Per-event errors
// ---------------------------------------------------------------------------

/// Failure of one registry entry run against one delivery.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The raw payload could not be decoded into the registered event type.
    #[error(transparent)]
    Payload(#[from] PayloadError),

    /// The robot's handler returned an error.
    #[error("handler failed: {0}")]
    Handler(#[source] HandlerError),
}

// ---------------------------------------------------------------------------
// Startup errors
// ---------------------------------------------------------------------------

/// Errors raised while building the handler registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The robot declared no capabilities, so no event could ever reach it.
    ///
    /// The service must not start serving in this state.
    #[error("it is not a robot: no event handler is registered")]
    NotARobot,
}
