//! Engine configuration with validation, defaults, and environment overrides.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("invalid value for {field}: '{value}' ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Tunables for the session engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Upper bound on bets per spin request.
    pub max_bets_per_spin: usize,
    /// Whether testing-mode winning number overrides are honored. Production
    /// deployments can turn this off and force a real wheel draw everywhere.
    pub allow_testing_overrides: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_bets_per_spin: 16,
            allow_testing_overrides: true,
        }
    }
}

/// Loads configuration from an optional TOML file plus environment overrides.
pub struct ConfigLoader {
    config_path: Option<String>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Set the configuration file path.
    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_string_lossy().to_string());
        self
    }

    /// Load configuration from file and environment variables.
    pub fn load(&self) -> Result<EngineConfig, ConfigError> {
        let mut config = if let Some(ref path) = self.config_path {
            self.load_from_file(path)?
        } else {
            EngineConfig::default()
        };

        self.apply_env_overrides(&mut config)?;
        self.validate(&config)?;

        Ok(config)
    }

    fn load_from_file(&self, path: &str) -> Result<EngineConfig, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadFailed(format!("failed to read {}: {}", path, e)))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::LoadFailed(format!("failed to parse TOML: {}", e)))
    }

    fn apply_env_overrides(&self, config: &mut EngineConfig) -> Result<(), ConfigError> {
        if let Ok(max) = env::var("CROUPIER_MAX_BETS_PER_SPIN") {
            config.max_bets_per_spin = max.parse().map_err(|_| ConfigError::InvalidValue {
                field: "CROUPIER_MAX_BETS_PER_SPIN".to_string(),
                value: max,
                reason: "expected a positive integer".to_string(),
            })?;
        }

        if let Ok(allow) = env::var("CROUPIER_ALLOW_TESTING_OVERRIDES") {
            config.allow_testing_overrides =
                allow.parse().map_err(|_| ConfigError::InvalidValue {
                    field: "CROUPIER_ALLOW_TESTING_OVERRIDES".to_string(),
                    value: allow,
                    reason: "expected true or false".to_string(),
                })?;
        }

        Ok(())
    }

    fn validate(&self, config: &EngineConfig) -> Result<(), ConfigError> {
        if config.max_bets_per_spin == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_bets_per_spin".to_string(),
                value: "0".to_string(),
                reason: "a spin must be allowed at least one bet".to_string(),
            });
        }

        Ok(())
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, config: &EngineConfig, path: &str) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(config)
            .map_err(|e| ConfigError::SaveFailed(format!("failed to serialize config: {}", e)))?;

        std::fs::write(path, toml_string)
            .map_err(|e| ConfigError::SaveFailed(format!("failed to write to {}: {}", path, e)))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
