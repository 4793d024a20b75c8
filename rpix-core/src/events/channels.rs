//! Channel factories and handles for the checkout actor.

use tokio::sync::{mpsc, watch};

use super::types::{AttemptNotice, CheckoutCommand, CheckoutSnapshot};

/// Default buffer size for actor channels.
///
/// Commands and notices are both low-rate; this absorbs bursts while
/// keeping memory bounded.
pub const DEFAULT_CHANNEL_BUFFER: usize = 256;

/// Sender handle for CheckoutCommand messages.
pub type CheckoutCommandSender = mpsc::Sender<CheckoutCommand>;
/// Receiver handle for CheckoutCommand messages.
pub type CheckoutCommandReceiver = mpsc::Receiver<CheckoutCommand>;

/// Sender handle for AttemptNotice messages.
pub type AttemptNoticeSender = mpsc::Sender<AttemptNotice>;
/// Receiver handle for AttemptNotice messages.
pub type AttemptNoticeReceiver = mpsc::Receiver<AttemptNotice>;

/// Live view of the session for renderers and tests.
pub type SnapshotReceiver = watch::Receiver<CheckoutSnapshot>;

/// Create a new CheckoutCommand channel.
pub fn checkout_command_channel() -> (CheckoutCommandSender, CheckoutCommandReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}

/// Create a new AttemptNotice channel.
///
/// The session keeps one sender for itself and clones it into each
/// per-attempt task it spawns.
pub fn attempt_notice_channel() -> (AttemptNoticeSender, AttemptNoticeReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}
