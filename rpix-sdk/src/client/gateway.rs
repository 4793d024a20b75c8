//! Payment gateway client (checkout → PIX acquirer).

use compact_str::CompactString;
use reqwest::Client;
use url::Url;

use super::GatewayError;
use crate::objects::transaction::{
    CreateTransactionRequest, CreateTransactionResponse, TransactionStatusResponse,
};

/// Header carrying the merchant API key.
pub const API_KEY_HEADER: &str = "x-api-key";
/// Header carrying the merchant API secret.
pub const API_SECRET_HEADER: &str = "x-api-secret";

/// Typed HTTP client for the PIX payment gateway.
///
/// The gateway is called once to open a transaction (which yields the
/// copy-and-paste PIX code) and then repeatedly to poll it for settlement.
/// Authentication is a static key/secret header pair on every request.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: Client,
    base_url: Url,
    api_key: CompactString,
    api_secret: CompactString,
}

impl GatewayClient {
    /// Create a new `GatewayClient`.
    ///
    /// * `base_url` – root URL of the gateway (e.g. `https://api.sunize.com.br`).
    /// * `api_key` / `api_secret` – merchant credential pair.
    pub fn new(
        base_url: Url,
        api_key: impl Into<CompactString>,
        api_secret: impl Into<CompactString>,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url,
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `POST /v1/transactions` – open a transaction and obtain its PIX code.
    pub async fn create_transaction(
        &self,
        request: &CreateTransactionRequest,
    ) -> Result<CreateTransactionResponse, GatewayError> {
        let url = self.base_url.join("/v1/transactions")?;

        let resp = self
            .http
            .post(url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .header(API_SECRET_HEADER, self.api_secret.as_str())
            .json(request)
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `GET /v1/transactions/{id}` – fetch the current status of a transaction.
    pub async fn transaction_status(
        &self,
        transaction_id: &str,
    ) -> Result<TransactionStatusResponse, GatewayError> {
        let url = self
            .base_url
            .join(&format!("/v1/transactions/{transaction_id}"))?;

        let resp = self
            .http
            .get(url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .header(API_SECRET_HEADER, self.api_secret.as_str())
            .send()
            .await?;

        parse_response(resp).await
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, GatewayError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(GatewayError::ServiceError {
            status: status.as_u16(),
            body,
        });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| GatewayError::MalformedResponse(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    // Real clock: the injected timeout has to actually elapse.
    #[tokio::test]
    async fn test_injected_timeout_reports_hung_gateway_as_unreachable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = Url::parse(&format!("http://{}", listener.local_addr().unwrap())).unwrap();

        // Accept connections and hold them open without ever answering.
        let acceptor = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();
        let client = GatewayClient::new(base_url, "key", "secret").with_http_client(http);

        let error = client.transaction_status("txn_8841").await.unwrap_err();
        assert!(matches!(error, GatewayError::Unreachable(_)));

        acceptor.abort();
    }
}
