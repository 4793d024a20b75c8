pub mod catalog;
pub mod selection;
pub mod transaction;

pub use catalog::{AddOn, CatalogError, CheckoutCatalog, TicketTier};
pub use selection::{AddOnSelection, ContactInfo, MissingContactField, Selection};
pub use transaction::{IssuedTransaction, SettlementStatus, SettlementVerdict};
