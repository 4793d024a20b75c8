//! Request and response bodies for the payment gateway.
//!
//! Monetary fields on the wire are integer subunits (centavos). Conversion
//! from decimal amounts happens at request-build time via [`crate::money`].

use compact_str::CompactString;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Payment methods accepted by the gateway. Only PIX is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "PIX")]
    Pix,
}

/// Brazilian taxpayer document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentType {
    Cpf,
    Cnpj,
}

/// One sellable line inside a transaction.
///
/// `price` is the per-unit amount in subunits, not the line total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionItem {
    pub id: CompactString,
    pub title: String,
    pub description: String,
    pub price: i64,
    pub quantity: u32,
    pub is_physical: bool,
}

/// Buyer identification sent with a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub document_type: DocumentType,
    pub document: CompactString,
}

/// Body for `POST /v1/transactions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    /// Merchant-side idempotency key, unique per payment attempt.
    pub external_id: CompactString,
    /// Sum of all line totals in subunits.
    pub total_amount: i64,
    pub payment_method: PaymentMethod,
    pub items: Vec<TransactionItem>,
    pub ip: String,
    pub customer: CustomerInfo,
}

/// PIX payment details returned on a successful create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixPayment {
    /// Copy-and-paste PIX code the buyer pays with.
    pub payload: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expires_at: Option<OffsetDateTime>,
}

/// Body returned by `POST /v1/transactions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTransactionResponse {
    pub id: CompactString,
    pub status: CompactString,
    pub total_value: Decimal,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub pix: Option<PixPayment>,
}

/// Body returned by `GET /v1/transactions/{id}`.
///
/// The gateway reports status as a free-form string; settlement logic matches
/// on the two terminal values and treats everything else as still pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionStatusResponse {
    pub id: CompactString,
    pub status: CompactString,
}
