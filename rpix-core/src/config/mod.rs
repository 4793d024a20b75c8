//! Static configuration injected into the checkout session.

pub mod checkout;
pub mod merchant;

pub use checkout::CheckoutTuning;
pub use merchant::MerchantIdentity;
