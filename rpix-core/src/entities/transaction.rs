//! Payment attempts: external ids, gateway request assembly, settlement
//! status interpretation.

use compact_str::{CompactString, format_compact};
use rust_decimal::Decimal;
use time::OffsetDateTime;
use uuid::Uuid;

use rpix_sdk::money::to_subunits;
use rpix_sdk::objects::{CreateTransactionRequest, CustomerInfo, PaymentMethod, TransactionItem};

use crate::config::MerchantIdentity;
use crate::entities::selection::ContactInfo;
use crate::pricing::OrderLine;

/// Generate the merchant-side id for one payment attempt.
///
/// UUIDv7 keeps the ids time-ordered, which is how operators read them in
/// gateway logs.
pub fn new_external_id() -> CompactString {
    format_compact!("transaction-{}", Uuid::now_v7())
}

/// A transaction the gateway accepted. Everything except settlement status
/// is fixed at creation; the attempt is discarded on close or retry.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedTransaction {
    pub external_id: CompactString,
    /// Gateway-assigned id used for status polling.
    pub transaction_id: CompactString,
    /// Copy-and-paste PIX code the buyer pays with.
    pub pix_code: String,
    /// Validity horizon reported by the gateway, when present.
    pub expires_at: Option<OffsetDateTime>,
}

/// Build the gateway request for one attempt.
///
/// The single decimal-to-subunit conversion for the gateway happens here,
/// never in display code.
pub fn build_create_request(
    external_id: CompactString,
    lines: &[OrderLine],
    final_total: Decimal,
    contact: &ContactInfo,
    merchant: &MerchantIdentity,
    buyer_ip: &str,
) -> CreateTransactionRequest {
    CreateTransactionRequest {
        external_id,
        total_amount: to_subunits(final_total),
        payment_method: PaymentMethod::Pix,
        items: lines
            .iter()
            .map(|line| TransactionItem {
                id: line.id.clone(),
                title: line.title.clone(),
                description: line.description.clone(),
                price: to_subunits(line.price),
                quantity: line.quantity,
                is_physical: false,
            })
            .collect(),
        ip: buyer_ip.to_string(),
        customer: build_customer(contact, merchant),
    }
}

/// The gateway wants a document on every transaction but the storefront
/// never collects one from the buyer, so the merchant's registered document
/// is sent instead.
fn build_customer(contact: &ContactInfo, merchant: &MerchantIdentity) -> CustomerInfo {
    let normalized = contact.normalized(&merchant.phone_country_code);
    CustomerInfo {
        name: normalized.name,
        email: normalized.email,
        phone: normalized.phone,
        document_type: merchant.document_type,
        document: merchant.document.clone(),
    }
}

/// Interpretation of a gateway status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementStatus {
    Authorized,
    Failed,
    Pending,
}

impl SettlementStatus {
    /// Classify the gateway's free-form status.
    ///
    /// Only the two exact terminal markers are recognized; anything else
    /// (waiting, pending variants, unknown strings) keeps the attempt
    /// in flight.
    pub fn from_gateway(raw: &str) -> Self {
        match raw {
            "AUTHORIZED" => Self::Authorized,
            "FAILED" => Self::Failed,
            _ => Self::Pending,
        }
    }

    /// Terminal verdict, if this status ends the attempt.
    pub fn verdict(self) -> Option<SettlementVerdict> {
        match self {
            Self::Authorized => Some(SettlementVerdict::Approved),
            Self::Failed => Some(SettlementVerdict::Failed),
            Self::Pending => None,
        }
    }
}

/// Outcome of a settled attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementVerdict {
    Approved,
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use crate::entities::catalog::CheckoutCatalog;
    use crate::entities::selection::Selection;
    use crate::pricing::{compute_totals, order_lines};

    #[test]
    fn test_external_ids_are_prefixed_and_unique() {
        let first = new_external_id();
        let second = new_external_id();
        assert!(first.starts_with("transaction-"));
        assert!(second.starts_with("transaction-"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_build_request_converts_prices_once_at_the_boundary() {
        let catalog = CheckoutCatalog::default();
        let mut selection = Selection::new(20);
        selection.toggle_add_on("orderbump-1");
        let contact = ContactInfo::new(" Maria Silva ", " MARIA@Example.com", "(11) 99999-0000");

        let pricing = compute_totals(selection.quantity, &selection.add_ons, &catalog);
        let lines = order_lines(&catalog, &selection);
        let request = build_create_request(
            new_external_id(),
            &lines,
            pricing.final_total,
            &contact,
            &MerchantIdentity::default(),
            "127.0.0.1",
        );

        assert_eq!(request.total_amount, 3030);
        assert_eq!(request.payment_method, PaymentMethod::Pix);
        assert_eq!(request.items.len(), 2);
        assert_eq!(request.items[0].price, 1990);
        assert_eq!(request.items[1].price, 1040);
        assert!(request.items.iter().all(|item| !item.is_physical));

        assert_eq!(request.customer.name, "Maria Silva");
        assert_eq!(request.customer.email, "maria@example.com");
        assert_eq!(request.customer.phone, "+5511999990000");
        assert_eq!(request.customer.document, "20264830106");
    }

    #[test]
    fn test_tie_amounts_round_away_from_zero() {
        // 13.795 is the midpoint between 1379 and 1380 subunits.
        assert_eq!(to_subunits(dec!(13.795)), 1380);
    }

    #[test]
    fn test_status_classification_is_exact_match() {
        assert_eq!(
            SettlementStatus::from_gateway("AUTHORIZED"),
            SettlementStatus::Authorized
        );
        assert_eq!(
            SettlementStatus::from_gateway("FAILED"),
            SettlementStatus::Failed
        );
        assert_eq!(
            SettlementStatus::from_gateway("waiting"),
            SettlementStatus::Pending
        );
        assert_eq!(
            SettlementStatus::from_gateway("authorized"),
            SettlementStatus::Pending
        );
        assert_eq!(SettlementStatus::from_gateway(""), SettlementStatus::Pending);
    }

    #[test]
    fn test_only_terminal_statuses_have_a_verdict() {
        assert_eq!(
            SettlementStatus::Authorized.verdict(),
            Some(SettlementVerdict::Approved)
        );
        assert_eq!(
            SettlementStatus::Failed.verdict(),
            Some(SettlementVerdict::Failed)
        );
        assert_eq!(SettlementStatus::Pending.verdict(), None);
    }
}
