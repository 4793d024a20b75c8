//! Attribution service client (checkout → UTM tracking backend).

use compact_str::CompactString;
use reqwest::Client;
use url::Url;

use super::AttributionError;
use crate::objects::attribution::AttributionOrder;

/// Header carrying the attribution API token.
pub const API_TOKEN_HEADER: &str = "x-api-token";

/// Typed HTTP client for the ad-attribution service.
///
/// Order reports are best-effort. Callers log failures and move on; a lost
/// report never blocks a sale.
#[derive(Debug, Clone)]
pub struct AttributionClient {
    http: Client,
    base_url: Url,
    api_token: CompactString,
}

impl AttributionClient {
    /// Create a new `AttributionClient`.
    ///
    /// * `base_url` – root URL of the attribution service
    ///   (e.g. `https://api.utmify.com.br`).
    /// * `api_token` – static bearer token for the merchant account.
    pub fn new(base_url: Url, api_token: impl Into<CompactString>) -> Self {
        Self {
            http: Client::new(),
            base_url,
            api_token: api_token.into(),
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `POST /api-credentials/orders` – report a freshly created order.
    pub async fn report_order(&self, order: &AttributionOrder) -> Result<(), AttributionError> {
        let url = self.base_url.join("/api-credentials/orders")?;

        let resp = self
            .http
            .post(url)
            .header(API_TOKEN_HEADER, self.api_token.as_str())
            .json(order)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AttributionError::ServiceError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
