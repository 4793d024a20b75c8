//! SettlementPoller processor.
//!
//! Spawned once per payment attempt. Polls the gateway for the transaction
//! status on a fixed interval until settlement resolves one way or the
//! other, then reports the verdict and stops itself. The stop flag ends the
//! loop early without a verdict.

use std::sync::Arc;
use std::time::Duration;

use compact_str::CompactString;
use tokio::sync::watch;
use tokio::time::{Instant, interval_at};
use tracing::{debug, info, warn};

use crate::entities::transaction::SettlementStatus;
use crate::events::{AttemptNotice, AttemptNoticeSender};
use crate::gateway::PixGateway;

/// Per-attempt settlement watcher for one gateway transaction.
pub struct SettlementPoller<G> {
    gateway: Arc<G>,
    transaction_id: CompactString,
    attempt: u32,
    poll_interval: Duration,
    notice_tx: AttemptNoticeSender,
    stop_rx: watch::Receiver<bool>,
}

impl<G: PixGateway> SettlementPoller<G> {
    pub fn new(
        gateway: Arc<G>,
        transaction_id: CompactString,
        attempt: u32,
        poll_interval: Duration,
        notice_tx: AttemptNoticeSender,
        stop_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            gateway,
            transaction_id,
            attempt,
            poll_interval,
            notice_tx,
            stop_rx,
        }
    }

    /// Run until a settlement verdict, a stop signal, or channel loss.
    pub async fn run(mut self) {
        info!(
            transaction_id = %self.transaction_id,
            attempt = self.attempt,
            "SettlementPoller started"
        );

        // First poll lands one full interval after the attempt opens; the
        // code is never settled the instant it is issued.
        let mut ticks = interval_at(Instant::now() + self.poll_interval, self.poll_interval);

        loop {
            tokio::select! {
                biased;

                changed = self.stop_rx.changed() => {
                    if changed.is_err() || *self.stop_rx.borrow() {
                        debug!(
                            transaction_id = %self.transaction_id,
                            "SettlementPoller received stop signal"
                        );
                        break;
                    }
                }

                _ = ticks.tick() => {
                    match self.gateway.fetch_status(&self.transaction_id).await {
                        Ok(snapshot) => {
                            let status = SettlementStatus::from_gateway(&snapshot.status);
                            debug!(
                                transaction_id = %self.transaction_id,
                                status = %snapshot.status,
                                "Polled transaction status"
                            );
                            if let Some(verdict) = status.verdict() {
                                let settled = AttemptNotice::Settled {
                                    attempt: self.attempt,
                                    verdict,
                                };
                                if self.notice_tx.send(settled).await.is_err() {
                                    debug!("Notice channel closed, dropping settlement verdict");
                                }
                                break;
                            }
                        }
                        Err(error) => {
                            // Transient failures retry on the next tick.
                            warn!(
                                transaction_id = %self.transaction_id,
                                error = %error,
                                "Settlement poll failed"
                            );
                        }
                    }
                }
            }
        }

        info!(
            transaction_id = %self.transaction_id,
            attempt = self.attempt,
            "SettlementPoller shutdown complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::transaction::SettlementVerdict;
    use crate::events::attempt_notice_channel;
    use crate::gateway::testing::ScriptedGateway;
    use rpix_sdk::client::GatewayError;

    #[tokio::test(start_paused = true)]
    async fn test_reports_approval_after_exactly_six_polls() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.push_statuses(&[
            "waiting",
            "waiting",
            "waiting",
            "waiting",
            "waiting",
            "AUTHORIZED",
        ]);
        let (notice_tx, mut notice_rx) = attempt_notice_channel();
        let (_stop_tx, stop_rx) = watch::channel(false);
        let poller = SettlementPoller::new(
            gateway.clone(),
            CompactString::const_new("txn-1"),
            1,
            Duration::from_secs(5),
            notice_tx,
            stop_rx,
        );
        let handle = tokio::spawn(poller.run());

        assert_eq!(
            notice_rx.recv().await,
            Some(AttemptNotice::Settled {
                attempt: 1,
                verdict: SettlementVerdict::Approved
            })
        );
        handle.await.unwrap();
        assert_eq!(gateway.status_call_count(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reports_failure_on_first_failed_status() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.push_statuses(&["FAILED"]);
        let (notice_tx, mut notice_rx) = attempt_notice_channel();
        let (_stop_tx, stop_rx) = watch::channel(false);
        let poller = SettlementPoller::new(
            gateway.clone(),
            CompactString::const_new("txn-2"),
            3,
            Duration::from_secs(5),
            notice_tx,
            stop_rx,
        );
        let handle = tokio::spawn(poller.run());

        assert_eq!(
            notice_rx.recv().await,
            Some(AttemptNotice::Settled {
                attempt: 3,
                verdict: SettlementVerdict::Failed
            })
        );
        handle.await.unwrap();
        assert_eq!(gateway.status_call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keeps_polling_through_transport_errors() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.push_status(Err(GatewayError::Unreachable("connection reset".into())));
        gateway.push_statuses(&["waiting", "AUTHORIZED"]);
        let (notice_tx, mut notice_rx) = attempt_notice_channel();
        let (_stop_tx, stop_rx) = watch::channel(false);
        let poller = SettlementPoller::new(
            gateway.clone(),
            CompactString::const_new("txn-3"),
            1,
            Duration::from_secs(5),
            notice_tx,
            stop_rx,
        );
        let handle = tokio::spawn(poller.run());

        assert_eq!(
            notice_rx.recv().await,
            Some(AttemptNotice::Settled {
                attempt: 1,
                verdict: SettlementVerdict::Approved
            })
        );
        handle.await.unwrap();
        assert_eq!(gateway.status_call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_before_first_tick_polls_nothing() {
        let gateway = Arc::new(ScriptedGateway::new());
        let (notice_tx, mut notice_rx) = attempt_notice_channel();
        let (stop_tx, stop_rx) = watch::channel(false);
        let poller = SettlementPoller::new(
            gateway.clone(),
            CompactString::const_new("txn-4"),
            1,
            Duration::from_secs(5),
            notice_tx,
            stop_rx,
        );
        let handle = tokio::spawn(poller.run());

        stop_tx.send(true).unwrap();
        handle.await.unwrap();
        assert_eq!(gateway.status_call_count(), 0);
        assert!(notice_rx.try_recv().is_err());
    }
}
