//! Configuration loading and management

use crate::core::order::Order;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

/// Server configuration
///
/// Every field has a default, so an empty YAML document is a valid config.
///
/// ```yaml
/// host: 0.0.0.0
/// port: 5000
/// log_filter: grubdash=debug,tower_http=info
/// seed_file: data/orders.json
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    #[validate(length(min = 1, message = "host must not be empty"))]
    pub host: String,

    /// TCP port to bind
    #[validate(range(min = 1, message = "port must be greater than 0"))]
    pub port: u16,

    /// `tracing-subscriber` filter used when `RUST_LOG` is not set
    #[validate(length(min = 1, message = "log_filter must not be empty"))]
    pub log_filter: String,

    /// JSON file holding an array of orders to start with
    pub seed_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            log_filter: "info".to_string(),
            seed_file: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        // an empty document deserializes to null rather than an empty mapping
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// `host:port`, ready for a listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Read the seed orders, or none when no seed file is configured
    pub fn load_seed_orders(&self) -> Result<Vec<Order>> {
        let Some(path) = &self.seed_file else {
            return Ok(Vec::new());
        };

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file '{}'", path.display()))?;
        let orders: Vec<Order> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse seed file '{}'", path.display()))?;

        tracing::info!(count = orders.len(), "loaded seed orders");
        Ok(orders)
    }
}
