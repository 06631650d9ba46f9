//! Server lifecycle: bind, serve, stop accepting, drain, exit.
//!
//! [`WebhookServer::run`] owns the whole shutdown sequence. When the shutdown
//! future completes the HTTP server stops accepting connections and finishes
//! the requests it is already answering. Only then does `run` wait on the
//! [`DrainCounter`] for every spawned handler task. It returns once the count
//! reaches zero, however long that takes.
//!
//! Progress through the sequence is published as a [`ShutdownPhase`] on a
//! `tokio::sync::watch` channel.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::Router;
use robot::HandlerRegistry;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};

use crate::dispatcher::Dispatcher;
use crate::drain::DrainCounter;
use crate::{endpoint, ListenerConfig, ListenerError};

/// Where the server is in its lifecycle. Phases only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownPhase {
    /// Accepting and dispatching deliveries.
    Running,
    /// No longer accepting; waiting for in-flight handlers.
    Stopping,
    /// Every handler task has finished.
    Drained,
    /// `run` is about to return.
    Exited,
}

impl fmt::Display for ShutdownPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Drained => "drained",
            Self::Exited => "exited",
        };
        f.write_str(name)
    }
}

// ============================================================================
// WebhookServer
// ============================================================================

/// The webhook listener, ready to bind and run.
#[derive(Debug)]
pub struct WebhookServer {
    config: ListenerConfig,
    dispatcher: Dispatcher,
    phase: Arc<watch::Sender<ShutdownPhase>>,
}

impl WebhookServer {
    /// Creates a server dispatching to `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::InvalidConfig`] if `config` fails validation.
    pub fn new(
        config: ListenerConfig,
        registry: Arc<HandlerRegistry>,
    ) -> Result<Self, ListenerError> {
        config.validate()?;

        let dispatcher = Dispatcher::new(registry, Arc::new(DrainCounter::new()));
        let (phase, _) = watch::channel(ShutdownPhase::Running);

        Ok(Self {
            config,
            dispatcher,
            phase: Arc::new(phase),
        })
    }

    pub fn config(&self) -> &ListenerConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Counter of handler tasks still running.
    pub fn drain(&self) -> &Arc<DrainCounter> {
        self.dispatcher.drain()
    }

    /// Subscribes to lifecycle updates.
    pub fn phase(&self) -> watch::Receiver<ShutdownPhase> {
        self.phase.subscribe()
    }

    /// The endpoint router, sharing this server's dispatcher.
    pub fn router(&self) -> Router {
        endpoint::router(&self.config, self.dispatcher.clone())
    }

    /// Binds the configured address.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::Bind`] if the socket cannot be bound.
    pub async fn bind(&self) -> Result<TcpListener, ListenerError> {
        let address = self.config.bind_address();

        TcpListener::bind(&address)
            .await
            .map_err(|source| ListenerError::Bind { address, source })
    }

    /// Serves `listener` until `shutdown` completes, then drains.
    ///
    /// Handler tasks are always waited for, including when the HTTP server
    /// stopped with an error; that error is returned afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::Serve`] or [`ListenerError::ServerTask`] if the
    /// HTTP server failed.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ListenerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let address = listener
            .local_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| self.config.bind_address());
        info!(
            address = %address,
            hook_path = %self.config.hook_path,
            "start server, listen on"
        );

        let stopping = {
            let phase = Arc::clone(&self.phase);
            async move {
                shutdown.await;
                info!("Shutdown requested, no longer accepting deliveries");
                phase.send_replace(ShutdownPhase::Stopping);
            }
        };

        let router = self.router();
        let server = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(stopping)
                .await
        });

        let served = match server.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(ListenerError::Serve(e)),
            Err(e) => Err(ListenerError::ServerTask(e)),
        };
        match &served {
            Ok(()) => info!("web server exits"),
            Err(e) => error!(error = %e, "web server exits with error"),
        }

        self.phase.send_if_modified(|phase| {
            if *phase == ShutdownPhase::Running {
                *phase = ShutdownPhase::Stopping;
                true
            } else {
                false
            }
        });

        let drain = self.drain();
        info!(in_flight = drain.in_flight(), "Waiting for event handlers to finish");
        drain.wait().await;
        self.phase.send_replace(ShutdownPhase::Drained);
        info!("All event handlers finished");

        self.phase.send_replace(ShutdownPhase::Exited);
        info!("server exits");

        served
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
