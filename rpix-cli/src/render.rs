//! Terminal rendering of checkout snapshots.
//!
//! Logs go to stderr; everything here writes buyer-facing output to stdout.

use std::io::Write as _;

use rpix_core::entities::CheckoutCatalog;
use rpix_core::events::{CheckoutState, SnapshotReceiver};
use rpix_core::pricing::PricingResult;
use rust_decimal::Decimal;

/// Format a decimal amount as Brazilian currency, e.g. "R$ 30,30".
pub fn format_money(amount: Decimal) -> String {
    format!("R$ {amount:.2}").replace('.', ",")
}

/// Format remaining seconds as "M:SS".
pub fn format_remaining(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Ticket count line with the add-on breakdown, marking the catalog's
/// highlighted tier with the selector's star.
pub fn format_ticket_line(pricing: &PricingResult, catalog: &CheckoutCatalog) -> String {
    let base_quantity = pricing.final_quantity - pricing.extra_tickets;
    let mut line = format!("{} títulos", pricing.final_quantity);
    if pricing.extra_tickets > 0 {
        line.push_str(&format!(
            " ({} + {} extras)",
            base_quantity, pricing.extra_tickets
        ));
    }
    if catalog.tier_for(base_quantity).is_some_and(|tier| tier.popular) {
        line.push_str(" ★");
    }
    line
}

/// Print snapshot transitions until the session reaches a state the
/// scripted buyer cannot leave, and return that state.
///
/// A `Form` snapshot carrying a message is a validation refusal; with no
/// interactive buyer to fix the field it ends the run as well.
pub async fn watch_until_terminal(
    mut snapshots: SnapshotReceiver,
    catalog: &CheckoutCatalog,
) -> CheckoutState {
    let mut shown_code: Option<String> = None;

    loop {
        let snapshot = snapshots.borrow_and_update().clone();
        match snapshot.state {
            CheckoutState::Form => {
                if let Some(message) = &snapshot.message {
                    println!("{message}");
                    return CheckoutState::Form;
                }
            }
            CheckoutState::Submitting => {
                println!("Processando pagamento...");
            }
            CheckoutState::AwaitingPayment => {
                if let Some(code) = &snapshot.pix_code {
                    if shown_code.as_deref() != Some(code.as_str()) {
                        println!();
                        println!("Total: {}", format_money(snapshot.pricing.final_total));
                        println!("{}", format_ticket_line(&snapshot.pricing, catalog));
                        println!("Copie o código PIX abaixo e pague no seu banco:");
                        println!("{code}");
                        shown_code = Some(code.clone());
                    }
                }
                if let Some(remaining) = snapshot.remaining_secs {
                    print!("\rExpira em {}  ", format_remaining(remaining));
                    let _ = std::io::stdout().flush();
                }
            }
            CheckoutState::Approved => {
                println!();
                println!("Pagamento aprovado! Seus títulos foram reservados.");
                return CheckoutState::Approved;
            }
            CheckoutState::Failed | CheckoutState::Expired => {
                println!();
                if let Some(message) = &snapshot.message {
                    println!("{message}");
                }
                return snapshot.state;
            }
        }

        if snapshots.changed().await.is_err() {
            return snapshot.state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_uses_comma_decimals() {
        assert_eq!(format_money(dec!(19.90)), "R$ 19,90");
        assert_eq!(format_money(dec!(30.30)), "R$ 30,30");
        assert_eq!(format_money(dec!(199)), "R$ 199,00");
        assert_eq!(format_money(dec!(0.99)), "R$ 0,99");
    }

    #[test]
    fn test_remaining_renders_minutes_and_seconds() {
        assert_eq!(format_remaining(600), "10:00");
        assert_eq!(format_remaining(599), "9:59");
        assert_eq!(format_remaining(61), "1:01");
        assert_eq!(format_remaining(59), "0:59");
        assert_eq!(format_remaining(0), "0:00");
    }

    fn pricing(final_quantity: u32, extra_tickets: u32) -> PricingResult {
        PricingResult {
            base_price: dec!(19.90),
            add_on_surcharge: Decimal::ZERO,
            final_total: dec!(19.90),
            extra_tickets,
            final_quantity,
        }
    }

    #[test]
    fn test_ticket_line_breaks_down_extras_and_stars_the_popular_tier() {
        let catalog = CheckoutCatalog::default();
        assert_eq!(format_ticket_line(&pricing(20, 0), &catalog), "20 títulos");
        assert_eq!(format_ticket_line(&pricing(25, 0), &catalog), "25 títulos");
        assert_eq!(
            format_ticket_line(&pricing(35, 15), &catalog),
            "35 títulos (20 + 15 extras)"
        );
        assert_eq!(format_ticket_line(&pricing(70, 0), &catalog), "70 títulos ★");
        assert_eq!(
            format_ticket_line(&pricing(85, 15), &catalog),
            "85 títulos (70 + 15 extras) ★"
        );
    }
}
