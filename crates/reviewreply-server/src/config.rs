//! Service configuration
//!
//! Layered with the `config` crate: built-in defaults, an optional YAML file,
//! then `REVIEWREPLY__`-prefixed environment variables (`__` separates
//! nested keys, e.g. `REVIEWREPLY__SERVER__PORT=9000`). Command line flags
//! are applied last through [`ServiceConfig::apply_overrides`].

use reviewreply_classifiers::TextProcessingConfig;
use reviewreply_core::{Error, Result};
use reviewreply_responder::{GenerationSettings, TemplateConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "REVIEWREPLY";

/// Configuration file read when no path is given, if it exists
pub const DEFAULT_CONFIG_FILE: &str = "reviewreply.yaml";

/// Full service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Text cleaning and rating thresholds
    #[serde(default)]
    pub text: TextProcessingConfig,

    /// Generative reply settings
    #[serde(default)]
    pub generation: GenerationSettings,

    /// Reply template overrides
    #[serde(default)]
    pub templates: TemplateConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Exposes `/debug/text`
    #[serde(default)]
    pub debug: bool,

    /// Allow cross-origin requests from any origin
    #[serde(default = "default_true")]
    pub cors_any_origin: bool,

    /// Maximum accepted request body size
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            debug: false,
            cors_any_origin: true,
            body_limit_bytes: default_body_limit(),
        }
    }
}

/// Command line overrides for `serve`
#[derive(Debug, Clone, Default)]
pub struct ServeOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub enable_ai_model: Option<bool>,
    pub debug: bool,
}

impl ServiceConfig {
    /// Load configuration from `path` (required) or [`DEFAULT_CONFIG_FILE`] (optional)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path),
            None => config::File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
        };

        config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize::<Self>())
            .map_err(|e| Error::config(format!("Failed to load configuration: {e}")))
    }

    pub fn apply_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = &overrides.host {
            self.server.host = host.clone();
        }

        if let Some(port) = overrides.port {
            self.server.port = port;
        }

        if let Some(enabled) = overrides.enable_ai_model {
            self.generation.enabled = enabled;
        }

        if overrides.debug {
            self.server.debug = true;
        }
    }

    /// Listen address as `host:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_body_limit() -> usize {
    64 * 1024
}

fn default_true() -> bool {
    true
}
