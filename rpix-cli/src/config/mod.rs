//! Configuration module for rpix-cli.
//!
//! Handles loading configuration from a TOML file plus CLI overrides, and
//! validating the result before anything touches the network.

pub mod file;

use crate::config::file::{AttributionConfig, FileConfig, GatewayConfig};
use rpix_core::config::{CheckoutTuning, MerchantIdentity};
use rpix_core::entities::{CatalogError, CheckoutCatalog};
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("invalid catalog: {0}")]
    CatalogError(#[from] CatalogError),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Loaded configuration result containing all parts.
pub struct LoadedConfig {
    pub gateway: GatewayConfig,
    pub attribution: Option<AttributionConfig>,
    pub merchant: MerchantIdentity,
    pub checkout: CheckoutTuning,
    pub catalog: CheckoutCatalog,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    gateway_override: Option<Url>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, gateway_override: Option<Url>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            gateway_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file
    /// 2. Apply CLI overrides
    /// 3. Validate the configuration
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        let mut file_config: FileConfig = toml::from_str(&config_content)?;

        if let Some(url) = self.gateway_override.clone() {
            file_config.gateway.url = url;
        }

        self.validate(&file_config)?;

        Ok(LoadedConfig {
            gateway: file_config.gateway,
            attribution: file_config.attribution,
            merchant: file_config.merchant,
            checkout: file_config.checkout,
            catalog: file_config.catalog,
        })
    }

    fn validate(&self, config: &FileConfig) -> Result<(), ConfigError> {
        config.catalog.validate()?;
        if config.gateway.api_key.trim().is_empty() || config.gateway.api_secret.trim().is_empty()
        {
            return Err(ConfigError::ValidationError(
                "gateway api_key and api_secret must not be empty".to_string(),
            ));
        }
        if config.checkout.code_ttl_secs == 0 {
            return Err(ConfigError::ValidationError(
                "checkout code_ttl_secs must be at least 1".to_string(),
            ));
        }
        if config.checkout.poll_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "checkout poll_interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader() -> ConfigLoader {
        ConfigLoader::new("rpix-config.toml", None)
    }

    fn base_config() -> FileConfig {
        FileConfig {
            gateway: GatewayConfig {
                url: Url::parse("https://gateway.example.com").unwrap(),
                api_key: "key".into(),
                api_secret: "secret".into(),
            },
            attribution: None,
            merchant: MerchantIdentity::default(),
            checkout: CheckoutTuning::default(),
            catalog: CheckoutCatalog::default(),
        }
    }

    #[test]
    fn test_default_config_passes_validation() {
        assert!(loader().validate(&base_config()).is_ok());
    }

    #[test]
    fn test_blank_credentials_are_rejected() {
        let mut config = base_config();
        config.gateway.api_key = "  ".into();
        assert!(matches!(
            loader().validate(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_zero_poll_interval_is_rejected() {
        let mut config = base_config();
        config.checkout.poll_interval_secs = 0;
        assert!(loader().validate(&config).is_err());
    }

    #[test]
    fn test_empty_catalog_is_rejected() {
        let mut config = base_config();
        config.catalog.tiers.clear();
        assert!(matches!(
            loader().validate(&config),
            Err(ConfigError::CatalogError(_))
        ));
    }
}
