//! TOML file configuration structures.
//!
//! These structs map directly to the `rpix-config.toml` file format. The
//! merchant, checkout and catalog sections reuse the core serde types, so a
//! config file can reshape the tier ladder without a rebuild.

use rpix_core::config::{CheckoutTuning, MerchantIdentity};
use rpix_core::entities::CheckoutCatalog;
use serde::Deserialize;
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct FileConfig {
    pub gateway: GatewayConfig,
    /// Optional ad-attribution endpoint. Order reporting is disabled when
    /// this section is absent.
    #[serde(default)]
    pub attribution: Option<AttributionConfig>,
    #[serde(default)]
    pub merchant: MerchantIdentity,
    #[serde(default)]
    pub checkout: CheckoutTuning,
    #[serde(default)]
    pub catalog: CheckoutCatalog,
}

/// Payment gateway section.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Root URL of the gateway (e.g. "https://api.sunize.com.br").
    pub url: Url,
    pub api_key: String,
    pub api_secret: String,
}

/// Ad-attribution section.
#[derive(Debug, Clone, Deserialize)]
pub struct AttributionConfig {
    /// Root URL of the attribution service.
    pub url: Url,
    pub api_token: String,
}
