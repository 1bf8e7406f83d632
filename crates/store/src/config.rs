//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SHELFCART_DATA_DIR` - Directory for persisted state (default: `.shelfcart`)
//! - `SHELFCART_NAMESPACE` - Key prefix scoping persisted state (default: `shelfcart`)
//! - `SHELFCART_CATALOG` - Path to the product catalog JSON file
//! - `SHELFCART_CURRENCY` - Display currency code (default: `USD`)

use std::path::PathBuf;

use shelfcart_core::CurrencyCode;
use thiserror::Error;

use crate::storage::{DEFAULT_NAMESPACE, Namespace};

const DEFAULT_DATA_DIR: &str = ".shelfcart";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding persisted cart and favorites files
    pub data_dir: PathBuf,
    /// Key prefix for persisted state
    pub namespace: Namespace,
    /// Product catalog file, if any
    pub catalog_path: Option<PathBuf>,
    /// Currency used to format prices
    pub currency: CurrencyCode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            namespace: Namespace::default(),
            catalog_path: None,
            currency: CurrencyCode::default(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = get("SHELFCART_DATA_DIR").map_or_else(
            || PathBuf::from(DEFAULT_DATA_DIR),
            PathBuf::from,
        );

        let namespace_raw =
            get("SHELFCART_NAMESPACE").unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
        let namespace = Namespace::parse(namespace_raw.trim()).map_err(|e| {
            ConfigError::InvalidEnvVar("SHELFCART_NAMESPACE".to_string(), e.to_string())
        })?;

        let catalog_path = get("SHELFCART_CATALOG").map(PathBuf::from);

        let currency = match get("SHELFCART_CURRENCY") {
            Some(code) => code.parse::<CurrencyCode>().map_err(|e| {
                ConfigError::InvalidEnvVar("SHELFCART_CURRENCY".to_string(), e.to_string())
            })?,
            None => CurrencyCode::default(),
        };

        Ok(Self {
            data_dir,
            namespace,
            catalog_path,
            currency,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<StoreConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StoreConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".shelfcart"));
        assert_eq!(config.namespace.as_str(), "shelfcart");
        assert!(config.catalog_path.is_none());
        assert_eq!(config.currency, CurrencyCode::USD);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("SHELFCART_DATA_DIR", "/var/lib/shelfcart"),
            ("SHELFCART_NAMESPACE", "shop-eu"),
            ("SHELFCART_CATALOG", "catalog.json"),
            ("SHELFCART_CURRENCY", "eur"),
        ])
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/var/lib/shelfcart"));
        assert_eq!(config.namespace.key("cart"), "shop-eu:cart");
        assert_eq!(config.catalog_path, Some(PathBuf::from("catalog.json")));
        assert_eq!(config.currency, CurrencyCode::EUR);
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = config_from(&[("SHELFCART_CATALOG", "  "), ("SHELFCART_NAMESPACE", "")])
            .unwrap();
        assert!(config.catalog_path.is_none());
        assert_eq!(config.namespace.as_str(), "shelfcart");
    }

    #[test]
    fn test_invalid_namespace() {
        let err = config_from(&[("SHELFCART_NAMESPACE", "a/b")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "SHELFCART_NAMESPACE"));
    }

    #[test]
    fn test_invalid_currency() {
        let err = config_from(&[("SHELFCART_CURRENCY", "DOGE")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "SHELFCART_CURRENCY"));
    }
}
