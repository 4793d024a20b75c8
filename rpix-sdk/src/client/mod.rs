//! HTTP clients for the payment gateway and the attribution service.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the shared types do not pull in `reqwest`.

mod attribution;
mod gateway;

pub use attribution::{AttributionClient, API_TOKEN_HEADER};
pub use gateway::{GatewayClient, API_KEY_HEADER, API_SECRET_HEADER};

/// Errors produced by the gateway HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Transport-level failure (DNS, TLS, connection reset, timeout).
    #[error("gateway unreachable: {0}")]
    Unreachable(String),

    /// The gateway returned a non-2xx status code.
    #[error("gateway error: status {status}, body: {body}")]
    ServiceError { status: u16, body: String },

    /// The gateway answered 2xx but the body was not usable.
    #[error("malformed gateway response: {0}")]
    MalformedResponse(String),

    /// The base URL could not be joined with the endpoint path.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        Self::Unreachable(err.to_string())
    }
}

/// Errors produced by the attribution HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum AttributionError {
    /// Transport-level failure (DNS, TLS, connection reset, timeout).
    #[error("attribution service unreachable: {0}")]
    Unreachable(String),

    /// The attribution service returned a non-2xx status code.
    #[error("attribution error: status {status}, body: {body}")]
    ServiceError { status: u16, body: String },

    /// The base URL could not be joined with the endpoint path.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<reqwest::Error> for AttributionError {
    fn from(err: reqwest::Error) -> Self {
        Self::Unreachable(err.to_string())
    }
}
