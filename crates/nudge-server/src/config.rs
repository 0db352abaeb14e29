//! Server configuration
//!
//! Layered in order: built-in defaults, an optional YAML file, `NUDGE__*`
//! environment variables (`NUDGE__PORT`, `NUDGE__MODEL__CORPUS_PATH`, ...),
//! then command-line overrides.

use crate::cli::ServeArgs;
use nudge_model::ModelConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Prefix for the JSON API routes
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Origins allowed by CORS; `*` allows any
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Per-request time limit
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Corpus and predictor settings
    #[serde(default)]
    pub model: ModelConfig,
}

impl ServerConfig {
    /// Load configuration from an optional file plus the environment
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_with_env(path, environment())
    }

    fn load_with_env(path: Option<&Path>, env: config::Environment) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                tracing::warn!("Config file {} not found, using defaults", path.display());
            }
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let settings = builder.add_source(env).build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Load, then apply command-line overrides
    pub fn from_args(args: &ServeArgs) -> anyhow::Result<Self> {
        let mut config = Self::load(args.config.as_deref())?;
        config.apply_overrides(args);
        Ok(config)
    }

    pub fn apply_overrides(&mut self, args: &ServeArgs) {
        if let Some(listen) = &args.listen {
            self.listen = listen.clone();
        }

        if let Some(port) = args.port {
            self.port = port;
        }

        if let Some(corpus) = &args.corpus {
            self.model.corpus_path = corpus.clone();
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.listen, self.port).parse()?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// API prefix with a leading slash and no trailing slash; empty for root
    pub fn normalized_api_prefix(&self) -> String {
        let trimmed = self.api_prefix.trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        }
    }
}

/// `NUDGE__*` variables, with `__` separating nested keys
fn environment() -> config::Environment {
    config::Environment::with_prefix("NUDGE")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("cors_origins")
        .try_parsing(true)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            api_prefix: default_api_prefix(),
            cors_origins: default_cors_origins(),
            request_timeout_ms: default_request_timeout_ms(),
            model: ModelConfig::default(),
        }
    }
}

fn default_listen() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ]
}

fn default_request_timeout_ms() -> u64 {
    2_000
}
