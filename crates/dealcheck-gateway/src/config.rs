//! Gateway configuration

use dealcheck_core::RuleConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::{GatewayError, DEFAULT_HOST, DEFAULT_PORT};

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: usize,

    /// MIME types accepted by the upload endpoint
    pub allowed_content_types: Vec<String>,

    /// Seed for reproducible scores; thread-local randomness when unset
    pub seed: Option<u64>,

    /// Rule tables for the validation engine
    pub rules: RuleConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_upload_bytes: 20 * 1024 * 1024,
            allowed_content_types: vec![
                "application/pdf".to_string(),
                "application/msword".to_string(),
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
                    .to_string(),
            ],
            seed: None,
            rules: RuleConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Pin the random source to a seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replace the rule tables
    pub fn with_rules(mut self, rules: RuleConfig) -> Self {
        self.rules = rules;
        self
    }

    /// Whether the upload endpoint accepts this MIME type
    pub fn accepts_content_type(&self, content_type: &str) -> bool {
        self.allowed_content_types.iter().any(|t| t == content_type)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> crate::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| GatewayError::InvalidConfig(format!("{}:{}: {e}", self.host, self.port)))
    }

    /// Load configuration from a file
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file(&self, path: &str) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
