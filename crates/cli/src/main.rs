//! `robot-gitee` entry point.
//!
//! This binary is the composition root:
//!
//! 1. **Load configuration** from files and `ROBOT__*` environment variables
//!    (see [`settings`]).
//! 2. **Wire observability**: `tracing-subscriber` with a JSON or plain layer
//!    and, when configured, an OpenTelemetry OTLP exporter (see [`telemetry`]).
//! 3. **Register the robot**: build the immutable handler registry from the
//!    robot's declared capabilities. A robot that declares nothing is fatal.
//! 4. **Serve** until SIGINT or SIGTERM, then wait for every in-flight handler
//!    before exiting.
//!
//! Any startup failure exits non-zero before the socket is bound.

mod logging_robot;
mod settings;
mod telemetry;

use std::sync::Arc;

use anyhow::Context;
use listener::WebhookServer;
use robot::HandlerRegistry;
use tracing::{error, info};

use crate::logging_robot::LoggingRobot;
use crate::settings::ServiceConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::load()?;
    let telemetry = telemetry::init(&config.telemetry)?;
    if let Some(path) = settings::explicit_path() {
        info!(path = %path, "Loaded configuration from explicit path");
    }

    let result = run(config).await;
    if let Err(e) = &result {
        error!(error = %format!("{e:#}"), "robot exits with error");
    }

    telemetry.shutdown();
    result
}

async fn run(config: ServiceConfig) -> anyhow::Result<()> {
    let registry = HandlerRegistry::build(Arc::new(LoggingRobot))
        .context("failed to register robot")?;
    info!(registry = ?registry, "Robot registered");

    let server = WebhookServer::new(config.server, Arc::new(registry))?;
    let listener = server.bind().await?;

    server.run(listener, shutdown_signal()).await?;

    Ok(())
}

/// Resolves on SIGINT, or SIGTERM on Unix.
///
/// A handler that cannot be installed is logged and never fires; the other
/// one still does.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => info!("Received SIGINT"),
        () = terminate => info!("Received SIGTERM"),
    }
}
