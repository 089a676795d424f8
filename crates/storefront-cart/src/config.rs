//! # Cart Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOREFRONT_API_URL=http://localhost:3333                           │
//! │     STOREFRONT_STORAGE_KEY=@RocketShoes:cart                           │
//! │     STOREFRONT_DATA_DIR=/var/lib/storefront                            │
//! │     STOREFRONT_REQUEST_TIMEOUT_SECS=10                                 │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/storefront/cart.toml (Linux)                             │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! storage_key = "@RocketShoes:cart"
//! api_base_url = "http://localhost:3333"
//! request_timeout_secs = 10
//!
//! [currency]
//! symbol = "R$"
//! decimals = 2
//!
//! [messages]
//! stock_exceeded = "Quantidade solicitada fora de estoque"
//! add_failed = "Erro na adição do produto"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use storefront_core::{Money, CART_STORAGE_KEY};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::Operation;

// =============================================================================
// Config Error
// =============================================================================

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Messages
// =============================================================================

/// Texts shown to the user when an operation is refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub stock_exceeded: String,
    pub add_failed: String,
    pub remove_failed: String,
    pub update_failed: String,
}

impl Messages {
    /// Generic failure text for an operation.
    pub fn failure(&self, operation: Operation) -> &str {
        match operation {
            Operation::Add => &self.add_failed,
            Operation::Remove => &self.remove_failed,
            Operation::Update => &self.update_failed,
        }
    }
}

impl Default for Messages {
    fn default() -> Self {
        Messages {
            stock_exceeded: "Requested quantity is out of stock".to_string(),
            add_failed: "Error adding product".to_string(),
            remove_failed: "Error removing product".to_string(),
            update_failed: "Error updating product amount".to_string(),
        }
    }
}

// =============================================================================
// Currency
// =============================================================================

/// How prices are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyConfig {
    /// Symbol placed before the amount.
    pub symbol: String,

    /// Number of decimal places.
    pub decimals: u8,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        CurrencyConfig {
            symbol: "R$".to_string(),
            decimals: 2,
        }
    }
}

// =============================================================================
// Cart Config
// =============================================================================

/// Cart service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartConfig {
    /// Key the cart is stored under.
    pub storage_key: String,

    /// Base URL of the storefront API (stock and catalog).
    pub api_base_url: String,

    /// Directory for the file-backed store. `None` means the platform data
    /// directory.
    pub data_dir: Option<PathBuf>,

    /// Per-request timeout for stock and catalog lookups.
    pub request_timeout_secs: u64,

    pub currency: CurrencyConfig,

    pub messages: Messages,
}

impl Default for CartConfig {
    fn default() -> Self {
        CartConfig {
            storage_key: CART_STORAGE_KEY.to_string(),
            api_base_url: "http://localhost:3333".to_string(),
            data_dir: None,
            request_timeout_secs: 10,
            currency: CurrencyConfig::default(),
            messages: Messages::default(),
        }
    }
}

impl CartConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, or `cart.toml` in the platform config dir)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading cart config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load cart config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Reads a TOML config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses TOML. Missing keys take their defaults.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key must not be empty".into()));
        }

        if url::Url::parse(&self.api_base_url).is_err() {
            return Err(ConfigError::Invalid(format!(
                "api_base_url is not a valid URL: {}",
                self.api_base_url
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.currency.decimals > 4 {
            return Err(ConfigError::Invalid("currency.decimals must be at most 4".into()));
        }

        Ok(())
    }

    /// Applies `STOREFRONT_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies overrides from any variable source.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(key) = var("STOREFRONT_STORAGE_KEY") {
            debug!(storage_key = %key, "Overriding storage key from environment");
            self.storage_key = key;
        }

        if let Some(url) = var("STOREFRONT_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api_base_url = url;
        }

        if let Some(dir) = var("STOREFRONT_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(dir));
        }

        if let Some(secs) = var("STOREFRONT_REQUEST_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.request_timeout_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring non-numeric request timeout"),
            }
        }
    }

    /// Directory for the file-backed store.
    pub fn resolved_data_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone().or_else(|| {
            directories::ProjectDirs::from("com", "storefront", "storefront")
                .map(|dirs| dirs.data_dir().to_path_buf())
        })
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "storefront", "storefront")
            .map(|dirs| dirs.config_dir().join("cart.toml"))
    }

    /// Formats a price with the configured currency.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_cart::CartConfig;
    /// use storefront_core::Money;
    ///
    /// let config = CartConfig::default();
    /// assert_eq!(config.format_currency(Money::from_cents(17990)), "R$179.90");
    /// ```
    pub fn format_currency(&self, money: Money) -> String {
        // Money is held in cents; rescale to the configured precision.
        let cents = money.cents();
        let decimals = u32::from(self.currency.decimals);
        let scaled = if decimals >= 2 {
            cents.saturating_mul(10_i64.pow(decimals - 2))
        } else {
            cents / 10_i64.pow(2 - decimals)
        };

        let divisor = 10_i64.pow(decimals);
        let whole = scaled / divisor;
        let frac = (scaled % divisor).abs();

        format!(
            "{}{}{}",
            if scaled < 0 { "-" } else { "" },
            self.currency.symbol,
            if decimals > 0 {
                format!("{}.{:0width$}", whole.abs(), frac, width = decimals as usize)
            } else {
                whole.abs().to_string()
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        let config = CartConfig::default();
        assert_eq!(config.storage_key, "@RocketShoes:cart");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CartConfig::from_toml_str(
            r#"
            api_base_url = "https://shop.example.com/api"

            [messages]
            stock_exceeded = "Quantidade solicitada fora de estoque"
            "#,
        )
        .unwrap();

        assert_eq!(config.api_base_url, "https://shop.example.com/api");
        assert_eq!(config.messages.stock_exceeded, "Quantidade solicitada fora de estoque");
        assert_eq!(config.messages.add_failed, Messages::default().add_failed);
        assert_eq!(config.storage_key, CART_STORAGE_KEY);
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let err = CartConfig::from_toml_str("request_timeout_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation() {
        let mut config = CartConfig::default();
        config.api_base_url = "not a url".into();
        assert!(config.validate().is_err());

        let mut config = CartConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = CartConfig::default();
        config.storage_key = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("STOREFRONT_API_URL", "http://inventory:8080"),
            ("STOREFRONT_DATA_DIR", "/tmp/cart"),
            ("STOREFRONT_REQUEST_TIMEOUT_SECS", "3"),
        ]
        .into_iter()
        .collect();

        let mut config = CartConfig::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.api_base_url, "http://inventory:8080");
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/cart")));
        assert_eq!(config.request_timeout_secs, 3);
        assert_eq!(config.storage_key, CART_STORAGE_KEY);
    }

    #[test]
    fn test_bad_timeout_override_is_ignored() {
        let mut config = CartConfig::default();
        config.apply_overrides(|name| {
            (name == "STOREFRONT_REQUEST_TIMEOUT_SECS").then(|| "later".to_string())
        });
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_failure_messages_per_operation() {
        let messages = Messages::default();
        assert_eq!(messages.failure(Operation::Add), "Error adding product");
        assert_eq!(messages.failure(Operation::Remove), "Error removing product");
        assert_eq!(messages.failure(Operation::Update), "Error updating product amount");
    }

    #[test]
    fn test_format_currency() {
        let config = CartConfig::default();
        assert_eq!(config.format_currency(Money::from_cents(17990)), "R$179.90");
        assert_eq!(config.format_currency(Money::from_cents(5)), "R$0.05");
        assert_eq!(config.format_currency(Money::from_cents(-1234)), "-R$12.34");

        let mut whole_units = CartConfig::default();
        whole_units.currency = CurrencyConfig {
            symbol: "¥".into(),
            decimals: 0,
        };
        assert_eq!(whole_units.format_currency(Money::from_cents(12300)), "¥123");
    }
}
