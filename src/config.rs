//! Bridge configuration.
//!
//! Loaded from TOML, then overlaid with environment variables:
//!
//! ```toml
//! [queues]
//! product = "https://sqs.us-east-1.amazonaws.com/000000000000/products"
//! user = "https://sqs.us-east-1.amazonaws.com/000000000000/users"
//!
//! [consumer]
//! max_messages = 10
//! wait_seconds = 20
//! visibility_timeout_secs = 30
//! ```
//!
//! A context without a queue publishes to the log only.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bus::MAX_BATCH;

pub const ENV_PRODUCT_QUEUE_URL: &str = "EVENT_BRIDGE_PRODUCT_QUEUE_URL";
pub const ENV_USER_QUEUE_URL: &str = "EVENT_BRIDGE_USER_QUEUE_URL";
pub const ENV_WAIT_SECONDS: &str = "EVENT_BRIDGE_WAIT_SECONDS";
pub const ENV_MAX_MESSAGES: &str = "EVENT_BRIDGE_MAX_MESSAGES";

/// Longest long-poll the transport accepts.
pub const MAX_WAIT_SECONDS: u64 = 20;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("invalid value for {var}: `{value}`")]
    InvalidEnv { var: &'static str, value: String },

    #[error("validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub queues: QueueConfig,
    #[serde(default)]
    pub consumer: ConsumerConfig,
}

/// Destination per bounded context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    pub product: Option<String>,
    pub user: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerConfig {
    #[serde(default = "default_max_messages")]
    pub max_messages: u32,
    #[serde(default = "default_wait_seconds")]
    pub wait_seconds: u64,
    /// Applied by [`InMemoryQueue::from_config`](crate::InMemoryQueue::from_config);
    /// hosted queues configure this on the queue itself.
    #[serde(default = "default_visibility_timeout_secs")]
    pub visibility_timeout_secs: u64,
}

fn default_max_messages() -> u32 {
    10
}

fn default_wait_seconds() -> u64 {
    20
}

fn default_visibility_timeout_secs() -> u64 {
    30
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            max_messages: default_max_messages(),
            wait_seconds: default_wait_seconds(),
            visibility_timeout_secs: default_visibility_timeout_secs(),
        }
    }
}

impl ConsumerConfig {
    pub fn wait(&self) -> Duration {
        Duration::from_secs(self.wait_seconds)
    }

    pub fn visibility_timeout(&self) -> Duration {
        Duration::from_secs(self.visibility_timeout_secs)
    }
}

impl BridgeConfig {
    /// Parse and validate TOML text. Environment variables are not applied.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: BridgeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path`, overlay the process environment, then validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: BridgeConfig = toml::from_str(&content)?;
        config.apply_env()?;
        config.validate()?;

        tracing::info!(
            path = %path.as_ref().display(),
            product_queue = config.queues.product.is_some(),
            user_queue = config.queues.user.is_some(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = BridgeConfig::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|var| std::env::var(var).ok())
    }

    /// Overlay values from `lookup`. Empty values are ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_PRODUCT_QUEUE_URL) {
            self.queues.product = Some(url);
        }
        if let Some(url) = get(ENV_USER_QUEUE_URL) {
            self.queues.user = Some(url);
        }
        if let Some(value) = get(ENV_WAIT_SECONDS) {
            self.consumer.wait_seconds = parse_env(ENV_WAIT_SECONDS, value)?;
        }
        if let Some(value) = get(ENV_MAX_MESSAGES) {
            self.consumer.max_messages = parse_env(ENV_MAX_MESSAGES, value)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let consumer = &self.consumer;
        if !(1..=MAX_BATCH).contains(&consumer.max_messages) {
            return Err(ConfigError::ValidationError(format!(
                "consumer.max_messages must be between 1 and {}, got {}",
                MAX_BATCH, consumer.max_messages
            )));
        }
        if consumer.wait_seconds > MAX_WAIT_SECONDS {
            return Err(ConfigError::ValidationError(format!(
                "consumer.wait_seconds must be at most {}, got {}",
                MAX_WAIT_SECONDS, consumer.wait_seconds
            )));
        }
        for (name, url) in [("product", &self.queues.product), ("user", &self.queues.user)] {
            if url.as_deref().is_some_and(|u| u.trim().is_empty()) {
                return Err(ConfigError::ValidationError(format!(
                    "queues.{} is empty",
                    name
                )));
            }
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    let parsed = value.trim().parse();
    parsed.map_err(|_| ConfigError::InvalidEnv { var, value })
}
