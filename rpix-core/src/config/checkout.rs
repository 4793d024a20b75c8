//! Timing and network knobs for a checkout session.

use serde::{Deserialize, Serialize};

/// Tunable timing constants. Defaults match the production storefront:
/// a 10 minute PIX code window polled every 5 seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutTuning {
    /// Seconds the PIX code stays live before the session expires it.
    pub code_ttl_secs: u64,
    /// Seconds between settlement polls.
    pub poll_interval_secs: u64,
    /// Buyer IP reported to the gateway when the real one is unknown.
    pub buyer_ip: String,
}

impl Default for CheckoutTuning {
    fn default() -> Self {
        Self {
            code_ttl_secs: 600,
            poll_interval_secs: 5,
            buyer_ip: "127.0.0.1".to_string(),
        }
    }
}
