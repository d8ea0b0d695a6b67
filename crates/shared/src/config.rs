//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Persistent store configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Settlement behavior configuration.
    #[serde(default)]
    pub settlement: SettlementConfig,
}

/// Persistent store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Store endpoint URL (empty for the in-memory store).
    #[serde(default)]
    pub url: String,
    /// Per-operation timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    5_000
}

/// Settlement behavior configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SettlementConfig {
    /// Maximum number of splits accepted by a single batch operation.
    ///
    /// Every extra item in a batch widens the window in which a store
    /// failure leaves partial state, so batches are capped.
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            max_batch_size: default_max_batch_size(),
        }
    }
}

fn default_max_batch_size() -> usize {
    50
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Reads `config/default.toml`, then `config/{RUN_MODE}.toml`, then
    /// `RACHA__`-prefixed environment variables, later sources winning.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("RACHA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
