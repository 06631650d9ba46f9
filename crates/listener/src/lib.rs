//! Gitee webhook listener.
//!
//! Receives webhook deliveries over HTTP, hands each one to the robot's
//! registered handler on its own task, and shuts down without abandoning
//! handlers that are still running.
//!
//! ```text
//! POST /gitee-hook ──► endpoint ──► Dispatcher ──► tokio::spawn(route)
//!                         │              │
//!                     201 accepted   DrainCounter ◄── WebhookServer::run waits here
//! ```
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Sockets, HTTP, task spawning, and the shutdown sequence
//! live here. The [`robot`] crate supplies the registry; this crate never
//! looks inside payloads.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`config`] | `ListenerConfig` |
//! | [`endpoint`] | axum router, header validation, `WebhookRejection` |
//! | [`dispatcher`] | `Dispatcher`, `DispatchOutcome` |
//! | [`drain`] | `DrainCounter`, `DrainGuard` |
//! | [`server`] | `WebhookServer`, `ShutdownPhase` |
//! | [`errors`] | `ListenerError` |

pub mod config;
pub mod dispatcher;
pub mod drain;
pub mod endpoint;
pub mod errors;
pub mod server;

#[cfg(test)]
mod test_support;

pub use config::ListenerConfig;
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use drain::{DrainCounter, DrainGuard};
pub use endpoint::{router, WebhookRejection};
pub use errors::ListenerError;
pub use server::{ShutdownPhase, WebhookServer};
