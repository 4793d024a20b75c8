//! CheckoutSession processor.
//!
//! The single-buyer checkout actor. Owns the selection and the state
//! machine, drives the gateway, and spawns the per-attempt countdown and
//! settlement tasks. All state transitions happen on this task; background
//! tasks only report back through attempt notices.
//!
//! Renderers observe the session through a watch channel of snapshots and
//! drive it through a cloneable [`CheckoutHandle`].

use std::sync::Arc;
use std::time::Duration;

use compact_str::CompactString;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use rpix_sdk::objects::TrackingParameters;

use crate::config::{CheckoutTuning, MerchantIdentity};
use crate::entities::catalog::CheckoutCatalog;
use crate::entities::selection::{ContactInfo, MissingContactField, Selection};
use crate::entities::transaction::{
    IssuedTransaction, SettlementVerdict, build_create_request, new_external_id,
};
use crate::events::{
    AttemptNotice, AttemptNoticeReceiver, AttemptNoticeSender, CheckoutCommand,
    CheckoutCommandReceiver, CheckoutCommandSender, CheckoutSnapshot, CheckoutState,
    SnapshotReceiver, attempt_notice_channel, checkout_command_channel,
};
use crate::gateway::PixGateway;
use crate::pricing::{compute_totals, order_lines};
use crate::processors::attribution_sink::{AttributionSink, build_order};
use crate::processors::expiry_timer::ExpiryTimer;
use crate::processors::settlement_poller::SettlementPoller;

/// Shown when the gateway rejects the create call.
pub const CREATE_FAILED_MESSAGE: &str = "Erro ao processar pagamento. Tente novamente.";
/// Shown when settlement resolves against the buyer.
pub const PAYMENT_FAILED_MESSAGE: &str = "Pagamento falhou. Tente novamente.";
/// Shown when the code countdown runs out before settlement.
pub const CODE_EXPIRED_MESSAGE: &str = "Código PIX expirado. Tente novamente.";

/// The session task is gone and takes no more commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("checkout session closed")]
pub struct SessionClosed;

/// Cloneable front door to a running session.
#[derive(Clone)]
pub struct CheckoutHandle {
    command_tx: CheckoutCommandSender,
    snapshot_rx: SnapshotReceiver,
}

impl CheckoutHandle {
    async fn send(&self, command: CheckoutCommand) -> Result<(), SessionClosed> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| SessionClosed)
    }

    pub async fn set_quantity(&self, quantity: u32) -> Result<(), SessionClosed> {
        self.send(CheckoutCommand::SetQuantity(quantity)).await
    }

    pub async fn toggle_add_on(&self, id: impl Into<CompactString>) -> Result<(), SessionClosed> {
        self.send(CheckoutCommand::ToggleAddOn(id.into())).await
    }

    pub async fn set_contact(&self, contact: ContactInfo) -> Result<(), SessionClosed> {
        self.send(CheckoutCommand::SetContact(contact)).await
    }

    pub async fn submit(&self) -> Result<(), SessionClosed> {
        self.send(CheckoutCommand::Submit).await
    }

    pub async fn retry(&self) -> Result<(), SessionClosed> {
        self.send(CheckoutCommand::Retry).await
    }

    pub async fn close(&self) -> Result<(), SessionClosed> {
        self.send(CheckoutCommand::Close).await
    }

    /// Current projection without waiting.
    pub fn snapshot(&self) -> CheckoutSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Fresh receiver for waiting on state changes.
    pub fn snapshots(&self) -> SnapshotReceiver {
        self.snapshot_rx.clone()
    }
}

/// Stop flag shared by the countdown and the poller of one attempt.
///
/// Dropping the flag also raises it, so attempt tasks can never outlive the
/// session that spawned them.
struct AttemptTasks {
    stop_tx: watch::Sender<bool>,
}

impl AttemptTasks {
    fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }
}

impl Drop for AttemptTasks {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(true);
    }
}

/// Single-buyer checkout actor.
pub struct CheckoutSession<G> {
    catalog: CheckoutCatalog,
    merchant: MerchantIdentity,
    tuning: CheckoutTuning,
    gateway: Arc<G>,
    attribution: AttributionSink,
    tracking: TrackingParameters,

    state: CheckoutState,
    selection: Selection,
    transaction: Option<IssuedTransaction>,
    /// Bumped once per accepted create. Notices are matched against it.
    attempt: u32,
    remaining_secs: Option<u64>,
    message: Option<String>,
    tasks: Option<AttemptTasks>,

    command_rx: CheckoutCommandReceiver,
    notice_tx: AttemptNoticeSender,
    notice_rx: AttemptNoticeReceiver,
    snapshot_tx: watch::Sender<CheckoutSnapshot>,
}

impl<G: PixGateway> CheckoutSession<G> {
    pub fn new(
        catalog: CheckoutCatalog,
        merchant: MerchantIdentity,
        tuning: CheckoutTuning,
        gateway: Arc<G>,
        attribution: AttributionSink,
        tracking: TrackingParameters,
    ) -> (Self, CheckoutHandle) {
        let (command_tx, command_rx) = checkout_command_channel();
        let (notice_tx, notice_rx) = attempt_notice_channel();
        let selection = Selection::new(catalog.starting_quantity());
        let initial = CheckoutSnapshot {
            state: CheckoutState::Form,
            pricing: compute_totals(selection.quantity, &selection.add_ons, &catalog),
            pix_code: None,
            remaining_secs: None,
            message: None,
        };
        let (snapshot_tx, snapshot_rx) = watch::channel(initial);

        let session = Self {
            catalog,
            merchant,
            tuning,
            gateway,
            attribution,
            tracking,
            state: CheckoutState::Form,
            selection,
            transaction: None,
            attempt: 0,
            remaining_secs: None,
            message: None,
            tasks: None,
            command_rx,
            notice_tx,
            notice_rx,
            snapshot_tx,
        };
        let handle = CheckoutHandle {
            command_tx,
            snapshot_rx,
        };
        (session, handle)
    }

    /// Run until every command sender is dropped.
    pub async fn run(mut self) {
        info!("CheckoutSession started");

        loop {
            tokio::select! {
                biased;

                // The session holds its own notice sender, so this arm
                // never sees a closed channel while the loop runs.
                Some(notice) = self.notice_rx.recv() => {
                    self.handle_notice(notice);
                }

                command = self.command_rx.recv() => {
                    match command {
                        Some(command) => self.handle_command(command).await,
                        None => {
                            info!("Command channel closed, shutting down session");
                            break;
                        }
                    }
                }
            }
        }

        self.stop_attempt_tasks();
        info!("CheckoutSession shutdown complete");
    }

    async fn handle_command(&mut self, command: CheckoutCommand) {
        match command {
            CheckoutCommand::SetQuantity(quantity) => {
                if self.state != CheckoutState::Form {
                    debug!(state = ?self.state, "Ignoring quantity change outside the form");
                    return;
                }
                self.selection.quantity = self.catalog.clamp_quantity(quantity);
                self.publish();
            }
            CheckoutCommand::ToggleAddOn(id) => {
                if self.state != CheckoutState::Form {
                    debug!(state = ?self.state, "Ignoring add-on toggle outside the form");
                    return;
                }
                if self.catalog.add_on(&id).is_none() {
                    debug!(add_on = %id, "Ignoring unknown add-on id");
                    return;
                }
                let selected = self.selection.toggle_add_on(&id);
                debug!(add_on = %id, selected, "Toggled add-on");
                self.publish();
            }
            CheckoutCommand::SetContact(contact) => {
                if self.state != CheckoutState::Form {
                    debug!(state = ?self.state, "Ignoring contact change outside the form");
                    return;
                }
                self.selection.contact = Some(contact);
                self.publish();
            }
            CheckoutCommand::Submit => self.handle_submit().await,
            CheckoutCommand::Retry => {
                if !matches!(self.state, CheckoutState::Failed | CheckoutState::Expired) {
                    debug!(state = ?self.state, "Ignoring retry outside a terminal failure");
                    return;
                }
                self.transaction = None;
                self.remaining_secs = None;
                self.message = None;
                self.state = CheckoutState::Form;
                self.publish();
            }
            CheckoutCommand::Close => {
                self.stop_attempt_tasks();
                self.transaction = None;
                self.remaining_secs = None;
                self.message = None;
                self.selection = Selection::new(self.catalog.starting_quantity());
                self.state = CheckoutState::Form;
                self.publish();
            }
        }
    }

    /// Validate the form and open a gateway transaction.
    async fn handle_submit(&mut self) {
        if self.state != CheckoutState::Form {
            debug!(state = ?self.state, "Ignoring submit outside the form");
            return;
        }
        let contact = match self.selection.contact.clone() {
            Some(contact) if contact.validate().is_ok() => contact,
            _ => {
                debug!("Submit rejected, contact fields incomplete");
                self.message = Some(MissingContactField::user_message().to_string());
                self.publish();
                return;
            }
        };

        self.state = CheckoutState::Submitting;
        self.message = None;
        self.publish();

        let pricing = compute_totals(self.selection.quantity, &self.selection.add_ons, &self.catalog);
        let lines = order_lines(&self.catalog, &self.selection);
        let request = build_create_request(
            new_external_id(),
            &lines,
            pricing.final_total,
            &contact,
            &self.merchant,
            &self.tuning.buyer_ip,
        );
        info!(
            external_id = %request.external_id,
            total_amount = request.total_amount,
            "Opening PIX transaction"
        );

        match self.gateway.open_transaction(&request).await {
            Ok(transaction) => {
                self.attempt += 1;
                self.start_attempt_tasks(&transaction);
                self.attribution.dispatch(build_order(
                    &transaction,
                    &lines,
                    pricing.final_total,
                    &request.customer,
                    self.tracking.clone(),
                ));
                info!(
                    transaction_id = %transaction.transaction_id,
                    attempt = self.attempt,
                    "Transaction created, awaiting settlement"
                );
                self.transaction = Some(transaction);
                self.remaining_secs = Some(self.tuning.code_ttl_secs);
                self.state = CheckoutState::AwaitingPayment;
                self.publish();
            }
            Err(error) => {
                error!(error = %error, "Failed to create PIX transaction");
                self.state = CheckoutState::Failed;
                self.message = Some(CREATE_FAILED_MESSAGE.to_string());
                self.publish();
            }
        }
    }

    /// Spawn the countdown and the settlement poller for a fresh attempt.
    ///
    /// Both share one stop flag so a close or a terminal notice silences
    /// the whole attempt at once.
    fn start_attempt_tasks(&mut self, transaction: &IssuedTransaction) {
        let (stop_tx, stop_rx) = watch::channel(false);
        tokio::spawn(
            ExpiryTimer::new(
                self.tuning.code_ttl_secs,
                self.attempt,
                self.notice_tx.clone(),
                stop_rx.clone(),
            )
            .run(),
        );
        tokio::spawn(
            SettlementPoller::new(
                self.gateway.clone(),
                transaction.transaction_id.clone(),
                self.attempt,
                Duration::from_secs(self.tuning.poll_interval_secs),
                self.notice_tx.clone(),
                stop_rx,
            )
            .run(),
        );
        self.tasks = Some(AttemptTasks { stop_tx });
    }

    /// Apply an asynchronous outcome from a per-attempt task.
    ///
    /// Notices are honored only while a payment is awaited and only for the
    /// live attempt. That covers the terminal notices a countdown and a
    /// poller can race to deliver, and anything a stopped task still had in
    /// flight when the buyer closed the popup.
    fn handle_notice(&mut self, notice: AttemptNotice) {
        if notice.attempt() != self.attempt || self.state != CheckoutState::AwaitingPayment {
            debug!(
                notice_attempt = notice.attempt(),
                live_attempt = self.attempt,
                state = ?self.state,
                "Discarding stale attempt notice"
            );
            return;
        }
        match notice {
            AttemptNotice::Countdown { remaining_secs, .. } => {
                self.remaining_secs = Some(remaining_secs);
                self.publish();
            }
            AttemptNotice::CodeExpired { .. } => {
                self.stop_attempt_tasks();
                self.state = CheckoutState::Expired;
                self.remaining_secs = Some(0);
                self.message = Some(CODE_EXPIRED_MESSAGE.to_string());
                self.publish();
            }
            AttemptNotice::Settled { verdict, .. } => {
                self.stop_attempt_tasks();
                self.remaining_secs = None;
                match verdict {
                    SettlementVerdict::Approved => {
                        info!(attempt = self.attempt, "Payment approved");
                        self.state = CheckoutState::Approved;
                        self.message = None;
                    }
                    SettlementVerdict::Failed => {
                        warn!(attempt = self.attempt, "Payment failed at settlement");
                        self.state = CheckoutState::Failed;
                        self.message = Some(PAYMENT_FAILED_MESSAGE.to_string());
                    }
                }
                self.publish();
            }
        }
    }

    /// Publish the current projection.
    ///
    /// Pricing is recomputed from the live selection every time, so totals
    /// can never lag a selection edit.
    fn publish(&self) {
        let snapshot = CheckoutSnapshot {
            state: self.state,
            pricing: compute_totals(self.selection.quantity, &self.selection.add_ons, &self.catalog),
            pix_code: self
                .transaction
                .as_ref()
                .map(|transaction| transaction.pix_code.clone()),
            remaining_secs: self.remaining_secs,
            message: self.message.clone(),
        };
        let _ = self.snapshot_tx.send(snapshot);
    }

    fn stop_attempt_tasks(&mut self) {
        if let Some(tasks) = self.tasks.take() {
            tasks.stop();
        }
    }
}
