//! Listener configuration.
//!
//! Deserialized from the `[server]` section of the service configuration.
//! Every field has a default, so an empty section yields a working listener.

use serde::{Deserialize, Serialize};

use crate::ListenerError;

/// Default port, matching the robot deployment manifests.
pub const DEFAULT_PORT: u16 = 8888;

/// Default webhook path Gitee is configured to deliver to.
pub const DEFAULT_HOOK_PATH: &str = "/gitee-hook";

/// Default upper bound on a declared request body (10 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Where and how the webhook listener accepts deliveries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind, e.g. `"0.0.0.0"`.
    pub host: String,

    /// TCP port to bind. `0` picks a free port.
    pub port: u16,

    /// Path webhook deliveries are POSTed to.
    pub hook_path: String,

    /// Largest `Content-Length` accepted on the hook path.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            hook_path: DEFAULT_HOOK_PATH.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ListenerConfig {
    /// Returns `"host:port"`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Checks the values the router and endpoint rely on.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::InvalidConfig`] if the hook path is not an
    /// absolute path distinct from the health path `/`, if it contains route
    /// syntax (`{`, `}` or `*`), or if `max_body_bytes` is zero.
    pub fn validate(&self) -> Result<(), ListenerError> {
        if !self.hook_path.starts_with('/') || self.hook_path == "/" {
            return Err(ListenerError::InvalidConfig {
                message: format!(
                    "hook_path must start with '/' and differ from '/', got '{}'",
                    self.hook_path
                ),
            });
        }

        if self.hook_path.contains(['{', '}', '*']) {
            return Err(ListenerError::InvalidConfig {
                message: format!(
                    "hook_path must be a literal path without '{{', '}}' or '*', got '{}'",
                    self.hook_path
                ),
            });
        }

        if self.max_body_bytes == 0 {
            return Err(ListenerError::InvalidConfig {
                message: "max_body_bytes must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
