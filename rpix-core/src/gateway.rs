//! Trait seams for the payment gateway and the attribution backend.
//!
//! The session and poller talk to these traits rather than to HTTP clients
//! directly, which keeps the whole state machine testable without a network.

use async_trait::async_trait;
use compact_str::CompactString;

use rpix_sdk::client::{AttributionClient, AttributionError, GatewayClient, GatewayError};
use rpix_sdk::objects::{
    AttributionOrder, CreateTransactionRequest, CreateTransactionResponse,
    TransactionStatusResponse,
};

use crate::entities::transaction::IssuedTransaction;

/// PIX acquirer operations used by the checkout.
///
/// Both operations perform one outbound call each; retries and caching are
/// deliberately absent. The session guarantees `open_transaction` runs at
/// most once per attempt.
#[async_trait]
pub trait PixGateway: Send + Sync + 'static {
    /// Open a transaction and return its PIX code.
    async fn open_transaction(
        &self,
        request: &CreateTransactionRequest,
    ) -> Result<IssuedTransaction, GatewayError>;

    /// Fetch the current status of a transaction, uninterpreted.
    async fn fetch_status(
        &self,
        transaction_id: &str,
    ) -> Result<TransactionStatusResponse, GatewayError>;
}

#[async_trait]
impl PixGateway for GatewayClient {
    async fn open_transaction(
        &self,
        request: &CreateTransactionRequest,
    ) -> Result<IssuedTransaction, GatewayError> {
        let response = GatewayClient::create_transaction(self, request).await?;
        issued_from_response(request.external_id.clone(), response)
    }

    async fn fetch_status(
        &self,
        transaction_id: &str,
    ) -> Result<TransactionStatusResponse, GatewayError> {
        GatewayClient::transaction_status(self, transaction_id).await
    }
}

/// Normalize a create response into an issued transaction.
///
/// A 2xx answer without a PIX block is useless to the buyer, so it is
/// reported as a malformed response rather than a success.
fn issued_from_response(
    external_id: CompactString,
    response: CreateTransactionResponse,
) -> Result<IssuedTransaction, GatewayError> {
    let Some(pix) = response.pix else {
        return Err(GatewayError::MalformedResponse(
            "create response carries no pix block".to_string(),
        ));
    };
    Ok(IssuedTransaction {
        external_id,
        transaction_id: response.id,
        pix_code: pix.payload,
        expires_at: pix.expires_at,
    })
}

/// Destination for best-effort attribution order reports.
#[async_trait]
pub trait AttributionReporter: Send + Sync + 'static {
    async fn report_order(&self, order: &AttributionOrder) -> Result<(), AttributionError>;
}

#[async_trait]
impl AttributionReporter for AttributionClient {
    async fn report_order(&self, order: &AttributionOrder) -> Result<(), AttributionError> {
        AttributionClient::report_order(self, order).await
    }
}


#[cfg(test)]
pub(crate) mod testing {
    //! Scripted doubles used by the processor tests.

    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use compact_str::format_compact;

    use super::*;

    /// Gateway double driven by scripted outcomes.
    ///
    /// Create outcomes are consumed one per call; `Ok(())` synthesizes an
    /// issued transaction from the recorded request, and an exhausted script
    /// also succeeds. Status outcomes fall back to `"waiting"` once the
    /// script runs out, so pollers can spin as long as a test needs.
    #[derive(Default)]
    pub(crate) struct ScriptedGateway {
        create_script: Mutex<VecDeque<Result<(), GatewayError>>>,
        status_script: Mutex<VecDeque<Result<CompactString, GatewayError>>>,
        pub(crate) requests: Mutex<Vec<CreateTransactionRequest>>,
        status_calls: AtomicU32,
    }

    impl ScriptedGateway {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn push_create(&self, outcome: Result<(), GatewayError>) {
            self.create_script.lock().unwrap().push_back(outcome);
        }

        pub(crate) fn push_status(&self, outcome: Result<CompactString, GatewayError>) {
            self.status_script.lock().unwrap().push_back(outcome);
        }

        pub(crate) fn push_statuses(&self, statuses: &[&str]) {
            for status in statuses {
                self.push_status(Ok(CompactString::from(*status)));
            }
        }

        pub(crate) fn status_call_count(&self) -> u32 {
            self.status_calls.load(Ordering::SeqCst)
        }

        pub(crate) fn recorded_external_ids(&self) -> Vec<CompactString> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|request| request.external_id.clone())
                .collect()
        }
    }

    #[async_trait]
    impl PixGateway for ScriptedGateway {
        async fn open_transaction(
            &self,
            request: &CreateTransactionRequest,
        ) -> Result<IssuedTransaction, GatewayError> {
            let outcome = self
                .create_script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(()));
            self.requests.lock().unwrap().push(request.clone());
            outcome.map(|()| IssuedTransaction {
                external_id: request.external_id.clone(),
                transaction_id: format_compact!(
                    "txn-{}",
                    self.requests.lock().unwrap().len()
                ),
                pix_code: format!("00020126-pix-{}", request.external_id),
                expires_at: None,
            })
        }

        async fn fetch_status(
            &self,
            transaction_id: &str,
        ) -> Result<TransactionStatusResponse, GatewayError> {
            self.status_calls.fetch_add(1, Ordering::SeqCst);
            let outcome = self
                .status_script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(CompactString::const_new("waiting")));
            outcome.map(|status| TransactionStatusResponse {
                id: CompactString::from(transaction_id),
                status,
            })
        }
    }

    /// Reporter double that records orders and can script failures.
    #[derive(Default)]
    pub(crate) struct RecordingReporter {
        failures: Mutex<VecDeque<AttributionError>>,
        pub(crate) orders: Mutex<Vec<AttributionOrder>>,
    }

    impl RecordingReporter {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn fail_next(&self, error: AttributionError) {
            self.failures.lock().unwrap().push_back(error);
        }

        pub(crate) fn order_count(&self) -> usize {
            self.orders.lock().unwrap().len()
        }

        pub(crate) fn recorded_orders(&self) -> Vec<AttributionOrder> {
            self.orders.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AttributionReporter for RecordingReporter {
        async fn report_order(&self, order: &AttributionOrder) -> Result<(), AttributionError> {
            if let Some(error) = self.failures.lock().unwrap().pop_front() {
                return Err(error);
            }
            self.orders.lock().unwrap().push(order.clone());
            Ok(())
        }
    }
}
