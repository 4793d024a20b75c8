//! ExpiryTimer processor.
//!
//! Spawned once per payment attempt with the configured code TTL. Emits a
//! countdown notice every second, then a single expiry notice at zero and
//! stops itself. The stop flag silences it early with no further notices.
//!
//! The countdown is presentational bookkeeping only; the gateway stays
//! authoritative for the real code validity.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, interval_at};
use tracing::{debug, info};

use crate::events::{AttemptNotice, AttemptNoticeSender};

/// Per-attempt countdown for the PIX code window.
pub struct ExpiryTimer {
    remaining_secs: u64,
    attempt: u32,
    notice_tx: AttemptNoticeSender,
    stop_rx: watch::Receiver<bool>,
}

impl ExpiryTimer {
    pub fn new(
        ttl_secs: u64,
        attempt: u32,
        notice_tx: AttemptNoticeSender,
        stop_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            remaining_secs: ttl_secs,
            attempt,
            notice_tx,
            stop_rx,
        }
    }

    /// Run until expiry, a stop signal, or channel loss.
    pub async fn run(mut self) {
        info!(
            attempt = self.attempt,
            remaining_secs = self.remaining_secs,
            "ExpiryTimer started"
        );

        if self.remaining_secs == 0 {
            let expired = AttemptNotice::CodeExpired {
                attempt: self.attempt,
            };
            let _ = self.notice_tx.send(expired).await;
            info!(attempt = self.attempt, "ExpiryTimer shutdown complete");
            return;
        }

        let mut ticks = interval_at(
            Instant::now() + Duration::from_secs(1),
            Duration::from_secs(1),
        );

        loop {
            tokio::select! {
                biased;

                changed = self.stop_rx.changed() => {
                    if changed.is_err() || *self.stop_rx.borrow() {
                        debug!(attempt = self.attempt, "ExpiryTimer received stop signal");
                        break;
                    }
                }

                _ = ticks.tick() => {
                    self.remaining_secs -= 1;
                    let notice = if self.remaining_secs == 0 {
                        AttemptNotice::CodeExpired { attempt: self.attempt }
                    } else {
                        AttemptNotice::Countdown {
                            attempt: self.attempt,
                            remaining_secs: self.remaining_secs,
                        }
                    };
                    if self.notice_tx.send(notice).await.is_err() {
                        debug!("Notice channel closed, stopping countdown");
                        break;
                    }
                    if self.remaining_secs == 0 {
                        break;
                    }
                }
            }
        }

        info!(attempt = self.attempt, "ExpiryTimer shutdown complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::attempt_notice_channel;

    #[tokio::test(start_paused = true)]
    async fn test_counts_down_then_expires_once() {
        let (notice_tx, mut notice_rx) = attempt_notice_channel();
        let (_stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(ExpiryTimer::new(3, 1, notice_tx, stop_rx).run());

        assert_eq!(
            notice_rx.recv().await,
            Some(AttemptNotice::Countdown {
                attempt: 1,
                remaining_secs: 2
            })
        );
        assert_eq!(
            notice_rx.recv().await,
            Some(AttemptNotice::Countdown {
                attempt: 1,
                remaining_secs: 1
            })
        );
        assert_eq!(
            notice_rx.recv().await,
            Some(AttemptNotice::CodeExpired { attempt: 1 })
        );

        handle.await.unwrap();
        assert!(notice_rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_silences_the_countdown() {
        let (notice_tx, mut notice_rx) = attempt_notice_channel();
        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(ExpiryTimer::new(600, 1, notice_tx, stop_rx).run());

        stop_tx.send(true).unwrap();
        handle.await.unwrap();
        assert!(notice_rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_ttl_expires_immediately() {
        let (notice_tx, mut notice_rx) = attempt_notice_channel();
        let (_stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(ExpiryTimer::new(0, 7, notice_tx, stop_rx).run());

        assert_eq!(
            notice_rx.recv().await,
            Some(AttemptNotice::CodeExpired { attempt: 7 })
        );
        handle.await.unwrap();
    }
}
