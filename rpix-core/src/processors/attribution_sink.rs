//! AttributionSink processor.
//!
//! Forwards freshly created transactions to the ad-attribution service as
//! fire-and-forget reports. Failures are logged and discarded; nothing in
//! this module may influence checkout state.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use rpix_sdk::money::to_subunits;
use rpix_sdk::objects::{
    AttributionCustomer, AttributionOrder, Commission, CustomerInfo, OrderReportStatus,
    ProductItem, TrackingParameters,
};

use crate::entities::transaction::IssuedTransaction;
use crate::gateway::AttributionReporter;
use crate::pricing::OrderLine;

/// Fire-and-forget order reporting.
///
/// Holds the reporter behind an `Arc` so each dispatch can move a clone into
/// its detached task. Without a configured reporter every dispatch is a
/// no-op.
#[derive(Clone)]
pub struct AttributionSink {
    reporter: Option<Arc<dyn AttributionReporter>>,
}

impl AttributionSink {
    pub fn new(reporter: Arc<dyn AttributionReporter>) -> Self {
        Self {
            reporter: Some(reporter),
        }
    }

    /// Sink that drops every order. Used when no endpoint is configured.
    pub fn disabled() -> Self {
        Self { reporter: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.reporter.is_some()
    }

    /// Spawn the report as a detached task and return immediately.
    ///
    /// The caller never observes the outcome; failures end up in the
    /// operator log only.
    pub fn dispatch(&self, order: AttributionOrder) {
        let Some(reporter) = self.reporter.clone() else {
            debug!(order_id = %order.order_id, "Attribution disabled, dropping order report");
            return;
        };
        tokio::spawn(async move {
            match reporter.report_order(&order).await {
                Ok(()) => {
                    debug!(order_id = %order.order_id, "Attribution order reported");
                }
                Err(error) => {
                    warn!(
                        order_id = %order.order_id,
                        error = %error,
                        "Failed to report attribution order"
                    );
                }
            }
        });
    }
}

/// Assemble the attribution payload for a freshly created transaction.
///
/// Product prices are converted to subunits here, line by line, independent
/// of the rounding applied to the order total.
pub fn build_order(
    transaction: &IssuedTransaction,
    lines: &[OrderLine],
    final_total: Decimal,
    customer: &CustomerInfo,
    tracking: TrackingParameters,
) -> AttributionOrder {
    AttributionOrder {
        order_id: transaction.transaction_id.clone(),
        external_id: transaction.external_id.clone(),
        price_in_cents: to_subunits(final_total),
        status: OrderReportStatus::WaitingPayment,
        tracking_parameters: tracking,
        commission: Commission::default(),
        products: lines
            .iter()
            .map(|line| ProductItem {
                id: line.id.clone(),
                name: line.title.clone(),
                price: to_subunits(line.price),
                quantity: line.quantity,
            })
            .collect(),
        customer: AttributionCustomer {
            name: customer.name.clone(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
            document: customer.document.clone(),
        },
    }
}
