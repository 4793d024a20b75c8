//! Messages and channels wiring the checkout actor to its collaborators.
//!
//! # Message flow
//!
//! 1. `CheckoutCommand` (UI) -> `CheckoutSession`
//! 2. `CheckoutSession` spawns `SettlementPoller` + `ExpiryTimer` per attempt
//! 3. Both tasks emit `AttemptNotice` -> `CheckoutSession`
//! 4. `CheckoutSession` publishes `CheckoutSnapshot` over a watch channel
//!
//! Notices are ephemeral and attempt-stamped; stale ones are discarded by
//! the session rather than suppressed at the source.

pub mod channels;
pub mod types;

pub use channels::{
    AttemptNoticeReceiver, AttemptNoticeSender, CheckoutCommandReceiver, CheckoutCommandSender,
    DEFAULT_CHANNEL_BUFFER, SnapshotReceiver, attempt_notice_channel, checkout_command_channel,
};

pub use types::{AttemptNotice, CheckoutCommand, CheckoutSnapshot, CheckoutState};
