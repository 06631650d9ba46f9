//! Listener startup and serving errors.
//!
//! Per-request problems are not errors here: they become
//! [`WebhookRejection`](crate::WebhookRejection) responses. Per-event problems
//! never leave the handler task. What remains is the short list of conditions
//! that stop the listener itself.

use thiserror::Error;

/// Conditions that prevent the listener from starting or keep it from serving.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The listener configuration is unusable. Produced before binding.
    #[error("Configuration error: {message}")]
    InvalidConfig {
        /// Description of the configuration problem.
        message: String,
    },

    /// The listening socket could not be bound.
    #[error("Failed to bind {address}: {source}")]
    Bind {
        /// Address the bind was attempted on.
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP server stopped with an I/O error.
    #[error("Server failed: {0}")]
    Serve(#[source] std::io::Error),

    /// The task driving the HTTP server panicked or was cancelled.
    #[error("Server task failed: {0}")]
    ServerTask(#[source] tokio::task::JoinError),
}
