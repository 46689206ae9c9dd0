//! Configuration management with validation and defaults.
//!
//! Defaults cover a local development setup; production deployments load a
//! TOML file and override secrets through the environment. The bot token is
//! only ever read from `BOT_TOKEN` so it stays out of config files.

use crate::game::DEFAULT_BINS;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Top-level service configuration.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PlinkoConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub economy: EconomyConfig,
    pub board: BoardConfig,
}

/// HTTP server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            allowed_origins: vec!["*".to_string()],
            request_timeout_secs: 30,
        }
    }
}

/// Init-data verification configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared secret issued by the chat platform. Supplied via `BOT_TOKEN`.
    pub bot_token: String,
    /// Skips the signature check. Development only; identity extraction
    /// still applies.
    pub skip_verification: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            skip_verification: false,
        }
    }
}

/// Ball replenishment policy.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Ball cap, also the balance of a freshly created account.
    pub start_balls: u32,
    /// Length of one replenishment interval in seconds.
    pub refill_every_secs: u64,
    /// Balls granted per elapsed interval.
    pub refill_amount: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            start_balls: 60,
            refill_every_secs: 600,
            refill_amount: 10,
        }
    }
}

/// Prize board layout.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Point value per landing bin, left to right.
    pub bins: Vec<u32>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            bins: DEFAULT_BINS.to_vec(),
        }
    }
}

/// Configuration and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),
    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),
    #[error("Missing required field: {0}")]
    MissingRequired(String),
    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl PlinkoConfig {
    /// Loads configuration from an optional TOML file, applies environment
    /// overrides, and validates the result.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path).map_err(|e| {
                    ConfigError::LoadFailed(format!("Failed to read {}: {}", path, e))
                })?;
                toml::from_str(&contents).map_err(|e| {
                    ConfigError::LoadFailed(format!("Failed to parse {}: {}", path, e))
                })?
            }
            None => Self::default(),
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Environment overrides. `BOT_TOKEN` and `DEV_SKIP_VERIFY` match the
    /// names the deployment scripts already use.
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(token) = env::var("BOT_TOKEN") {
            self.auth.bot_token = token;
        }
        if let Ok(flag) = env::var("DEV_SKIP_VERIFY") {
            self.auth.skip_verification = flag == "1";
        }
        if let Ok(host) = env::var("PLINKO_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("PLINKO_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                field: "PLINKO_PORT".to_string(),
                value: port,
                reason: "Invalid port number".to_string(),
            })?;
        }
        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                value: "0".to_string(),
                reason: "Port cannot be zero".to_string(),
            });
        }

        if self.auth.bot_token.is_empty() && !self.auth.skip_verification {
            return Err(ConfigError::MissingRequired(
                "auth.bot_token (set BOT_TOKEN)".to_string(),
            ));
        }

        if self.economy.start_balls == 0 {
            return Err(ConfigError::InvalidValue {
                field: "economy.start_balls".to_string(),
                value: "0".to_string(),
                reason: "Ball cap cannot be zero".to_string(),
            });
        }

        if self.economy.refill_every_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "economy.refill_every_secs".to_string(),
                value: "0".to_string(),
                reason: "Refill interval cannot be zero".to_string(),
            });
        }

        if self.economy.refill_amount == 0 {
            return Err(ConfigError::InvalidValue {
                field: "economy.refill_amount".to_string(),
                value: "0".to_string(),
                reason: "Refill amount cannot be zero".to_string(),
            });
        }

        if self.board.bins.is_empty() {
            return Err(ConfigError::MissingRequired("board.bins".to_string()));
        }

        if let Some(zero) = self.board.bins.iter().position(|v| *v == 0) {
            return Err(ConfigError::InvalidValue {
                field: format!("board.bins[{}]", zero),
                value: "0".to_string(),
                reason: "Bin values must be positive".to_string(),
            });
        }

        Ok(())
    }

    /// Saves the configuration as pretty TOML.
    pub fn save(&self, path: &str) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, toml_string)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to write to {}: {}", path, e)))
    }
}
