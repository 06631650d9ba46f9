//! Robot framework domain for Gitee webhook automation.
//!
//! This crate defines what a robot is and how events reach it: the header
//! identifiers, the capability traits a robot implements, the per-event
//! diagnostic context, and the immutable handler registry built from a robot's
//! declared capabilities. The `listener` crate drives it; robots depend on it.
//!
//! ## Architectural Layer
//!
//! **Domain + port definitions.** No sockets, no task spawning, no signals.
//! Payload decoding is delegated to the `gitee` crate.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | `EventType`, `DeliveryId` |
//! | [`capabilities`] | `Robot` and the four `*EventHandler` traits |
//! | [`context`] | `EventContext` and its diagnostic field names |
//! | [`registry`] | `HandlerRegistry`, `Capabilities`, `EventRoute` |
//! | [`errors`] | `HandlerError`, `RouteError`, `RegistryError` |

pub mod capabilities;
pub mod context;
pub mod errors;
pub mod identifiers;
pub mod registry;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use capabilities::{
    IssueEventHandler, NoteEventHandler, PullRequestEventHandler, PushEventHandler, Robot,
};
pub use context::EventContext;
pub use errors::{HandlerError, RegistryError, RouteError};
pub use identifiers::{DeliveryId, EventType};
pub use registry::{Capabilities, EventRoute, HandlerRegistry};
