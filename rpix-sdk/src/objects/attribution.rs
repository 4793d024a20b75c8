//! Order bodies for the ad-attribution service.
//!
//! The attribution endpoint speaks camelCase JSON and wants amounts in
//! subunits. Tracking parameters it has no value for are reported as
//! `"direct"` rather than omitted.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Order lifecycle stages the attribution service understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderReportStatus {
    WaitingPayment,
}

/// UTM campaign parameters attached to an order.
///
/// Every field falls back to `"direct"` so the report is well-formed even
/// when the buyer arrived with no campaign tags at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingParameters {
    pub utm_source: CompactString,
    pub utm_medium: CompactString,
    pub utm_campaign: CompactString,
    pub utm_content: CompactString,
    pub utm_term: CompactString,
}

impl Default for TrackingParameters {
    fn default() -> Self {
        Self {
            utm_source: CompactString::const_new("direct"),
            utm_medium: CompactString::const_new("direct"),
            utm_campaign: CompactString::const_new("direct"),
            utm_content: CompactString::const_new("direct"),
            utm_term: CompactString::const_new("direct"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommissionKind {
    Percentage,
}

/// Commission owed on the order. Reported as zero percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commission {
    pub value: i64,
    #[serde(rename = "type")]
    pub kind: CommissionKind,
}

impl Default for Commission {
    fn default() -> Self {
        Self {
            value: 0,
            kind: CommissionKind::Percentage,
        }
    }
}

/// One purchased product line, priced in subunits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductItem {
    pub id: CompactString,
    pub name: String,
    pub price: i64,
    pub quantity: u32,
}

/// Buyer contact details forwarded with the order report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributionCustomer {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub document: CompactString,
}

/// Body for `POST /api-credentials/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributionOrder {
    /// Gateway-assigned transaction id.
    pub order_id: CompactString,
    /// Merchant-side id, same value sent to the gateway.
    pub external_id: CompactString,
    pub price_in_cents: i64,
    pub status: OrderReportStatus,
    pub tracking_parameters: TrackingParameters,
    pub commission: Commission,
    pub products: Vec<ProductItem>,
    pub customer: AttributionCustomer,
}
