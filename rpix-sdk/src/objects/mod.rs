//! Shared wire objects for the external services.

pub mod attribution;
pub mod transaction;

pub use attribution::{
    AttributionCustomer, AttributionOrder, Commission, CommissionKind, OrderReportStatus,
    ProductItem, TrackingParameters,
};
pub use transaction::{
    CreateTransactionRequest, CreateTransactionResponse, CustomerInfo, DocumentType,
    PaymentMethod, PixPayment, TransactionItem, TransactionStatusResponse,
};
