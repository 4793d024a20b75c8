//! Message and snapshot types for the checkout actor.

use compact_str::CompactString;

use crate::entities::selection::ContactInfo;
use crate::entities::transaction::SettlementVerdict;
use crate::pricing::PricingResult;

/// Buyer-driven commands accepted by the checkout session.
#[derive(Debug, Clone)]
pub enum CheckoutCommand {
    /// Set the ticket quantity, clamped into the catalog ladder.
    SetQuantity(u32),
    /// Add or remove an order bump by id.
    ToggleAddOn(CompactString),
    /// Record the buyer's contact details.
    SetContact(ContactInfo),
    /// Validate the selection and send the order to the gateway.
    Submit,
    /// Return to the form after a failure or expiry, keeping the selection.
    Retry,
    /// Abandon the attempt and reset the whole session.
    Close,
}

/// Asynchronous outcomes reported back to the session by its per-attempt
/// background tasks.
///
/// Every notice is stamped with the attempt it belongs to; the session
/// discards notices from any other attempt, which covers the one response a
/// stopped task may still have in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptNotice {
    /// One-second countdown tick with the remaining code lifetime.
    Countdown { attempt: u32, remaining_secs: u64 },
    /// The countdown reached zero before settlement.
    CodeExpired { attempt: u32 },
    /// The poller saw a terminal gateway status.
    Settled {
        attempt: u32,
        verdict: SettlementVerdict,
    },
}

impl AttemptNotice {
    /// The attempt this notice belongs to.
    pub fn attempt(&self) -> u32 {
        match self {
            AttemptNotice::Countdown { attempt, .. }
            | AttemptNotice::CodeExpired { attempt }
            | AttemptNotice::Settled { attempt, .. } => *attempt,
        }
    }
}

/// Phases of the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutState {
    /// Editing quantity, add-ons and contact. No network activity.
    #[default]
    Form,
    /// The single in-flight create call is running.
    Submitting,
    /// PIX code issued; countdown and poller are live.
    AwaitingPayment,
    /// Payment confirmed by the gateway.
    Approved,
    /// Create was rejected or settlement failed. Retry is allowed.
    Failed,
    /// The code countdown ran out before settlement. Retry is allowed.
    Expired,
}

/// Presentation projection of the session, published over a watch channel.
///
/// Pricing is recomputed from the live selection on every publish, so a
/// snapshot can never show totals that predate a selection change.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSnapshot {
    pub state: CheckoutState,
    pub pricing: PricingResult,
    /// PIX code of the live attempt, if one is issued.
    pub pix_code: Option<String>,
    /// Remaining code lifetime in seconds while a countdown runs.
    pub remaining_secs: Option<u64>,
    /// Buyer-facing message (validation hint or failure copy).
    pub message: Option<String>,
}
