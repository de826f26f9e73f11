//! Cart store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_STORAGE_DIR` - Directory for file-backed storage (default: .cart)
//! - `CART_STORAGE_KEY` - Key the cart is stored under (default: @cart)
//! - `CART_RESET_ON_CORRUPT` - Start with an empty cart instead of failing
//!   when the stored cart cannot be decoded (default: false)

use std::path::PathBuf;

use thiserror::Error;

use crate::repository::DEFAULT_CART_KEY;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// What to do when the stored cart cannot be decoded at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorruptCartPolicy {
    /// Fail startup with `CartError::Corrupt`.
    #[default]
    Fail,
    /// Log a warning and start with an empty cart.
    Reset,
}

/// Cart store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Directory used by `FileStore`
    pub storage_dir: PathBuf,
    /// Key the serialized cart is stored under
    pub storage_key: String,
    /// Handling of an undecodable stored cart
    pub on_corrupt: CorruptCartPolicy,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(".cart"),
            storage_key: DEFAULT_CART_KEY.to_string(),
            on_corrupt: CorruptCartPolicy::Fail,
        }
    }
}

impl CartConfig {
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

    /// Build configuration from an arbitrary variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let storage_dir = lookup("CART_STORAGE_DIR").map_or(defaults.storage_dir, PathBuf::from);
        let storage_key = lookup("CART_STORAGE_KEY").unwrap_or(defaults.storage_key);
        if storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let on_corrupt = match lookup("CART_RESET_ON_CORRUPT") {
            Some(value) => {
                if parse_bool("CART_RESET_ON_CORRUPT", &value)? {
                    CorruptCartPolicy::Reset
                } else {
                    CorruptCartPolicy::Fail
                }
            }
            None => defaults.on_corrupt,
        };

        Ok(Self {
            storage_dir,
            storage_key,
            on_corrupt,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a boolean environment value.
fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CartConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, CartConfig::default());
        assert_eq!(config.storage_key, "@cart");
        assert_eq!(config.on_corrupt, CorruptCartPolicy::Fail);
    }

    #[test]
    fn test_overrides() {
        let config = CartConfig::from_lookup(lookup_from(&[
            ("CART_STORAGE_DIR", "/var/lib/cart"),
            ("CART_STORAGE_KEY", "@cart:v2"),
            ("CART_RESET_ON_CORRUPT", "TRUE"),
        ]))
        .unwrap();

        assert_eq!(config.storage_dir, PathBuf::from("/var/lib/cart"));
        assert_eq!(config.storage_key, "@cart:v2");
        assert_eq!(config.on_corrupt, CorruptCartPolicy::Reset);
    }

    #[test]
    fn test_invalid_bool() {
        let result = CartConfig::from_lookup(lookup_from(&[("CART_RESET_ON_CORRUPT", "maybe")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(ref key, _)) if key == "CART_RESET_ON_CORRUPT"));
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = CartConfig::from_lookup(lookup_from(&[("CART_STORAGE_KEY", "  ")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("X", "yes").unwrap());
        assert!(parse_bool("X", " On ").unwrap());
        assert!(!parse_bool("X", "0").unwrap());
    }
}
