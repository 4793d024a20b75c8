//! Async processors that drive the checkout.
//!
//! - `CheckoutSession`: the single-buyer actor owning the state machine
//! - `SettlementPoller`: per-attempt gateway status polling
//! - `ExpiryTimer`: per-attempt PIX code countdown
//! - `AttributionSink`: fire-and-forget order reporting
//!
//! The session is the only processor that mutates state. It spawns one
//! poller and one timer per accepted payment attempt and silences them
//! through a shared stop flag when the attempt ends.

pub mod attribution_sink;
pub mod checkout_session;
pub mod expiry_timer;
pub mod settlement_poller;

pub use attribution_sink::AttributionSink;
pub use checkout_session::{
    CheckoutHandle, CheckoutSession, SessionClosed, CODE_EXPIRED_MESSAGE, CREATE_FAILED_MESSAGE,
    PAYMENT_FAILED_MESSAGE,
};
pub use expiry_timer::ExpiryTimer;
pub use settlement_poller::SettlementPoller;
