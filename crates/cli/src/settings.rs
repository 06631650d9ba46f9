//! Service configuration.
//!
//! Sources, later overriding earlier:
//!
//! 1. `/etc/robot-gitee/service.toml` (optional)
//! 2. `config/service.toml` (optional)
//! 3. the file named by `ROBOT_CONFIG_FILE` (required when set)
//! 4. environment variables prefixed `ROBOT__`, `__` separating levels,
//!    e.g. `ROBOT__SERVER__PORT=9000`
//!
//! Every field has a default, so no file at all yields a working service. A
//! file that cannot be parsed, or a value of the wrong type, is fatal.

use anyhow::Context;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File, FileFormat};
use listener::ListenerConfig;
use serde::Deserialize;

/// Names an extra configuration file that must exist.
pub const CONFIG_FILE_ENV: &str = "ROBOT_CONFIG_FILE";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "ROBOT";

/// Top-level service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ListenerConfig,
    pub telemetry: TelemetryConfig,
}

/// Logging and trace export.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Emit JSON log lines instead of human-readable ones.
    pub json: bool,

    /// OTLP gRPC collector. Spans are only exported when set.
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            json: true,
            otlp_endpoint: None,
        }
    }
}

impl ServiceConfig {
    /// Loads configuration from the standard file locations and environment.
    pub fn load() -> anyhow::Result<Self> {
        let builder = file_sources(explicit_path().as_deref())
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

        Self::from_builder(builder)
    }

    /// Builds, deserializes, and validates.
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<Self> {
        let service: Self = builder
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("failed to deserialize configuration")?;

        service.server.validate()?;

        Ok(service)
    }
}

/// The file named by `ROBOT_CONFIG_FILE`, if set and non-empty.
pub fn explicit_path() -> Option<String> {
    std::env::var(CONFIG_FILE_ENV)
        .ok()
        .filter(|path| !path.is_empty())
}

fn file_sources(explicit: Option<&str>) -> ConfigBuilder<DefaultState> {
    let mut builder = config::Config::builder()
        .add_source(
            File::with_name("/etc/robot-gitee/service")
                .required(false)
                .format(FileFormat::Toml),
        )
        .add_source(
            File::with_name("config/service")
                .required(false)
                .format(FileFormat::Toml),
        );

    if let Some(path) = explicit {
        builder = builder.add_source(File::with_name(path).required(true).format(FileFormat::Toml));
    }

    builder
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
