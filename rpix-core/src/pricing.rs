//! Price and quantity math for a checkout selection.
//!
//! Everything here is pure and works in decimal currency. The single
//! decimal-to-subunit conversion happens later, at the wire boundaries.

use compact_str::CompactString;
use rust_decimal::Decimal;

use crate::entities::catalog::CheckoutCatalog;
use crate::entities::selection::Selection;

/// Line id of the base ticket bundle.
pub const MAIN_LINE_ID: &str = "titulo-principal";
const MAIN_LINE_TITLE: &str = "Compra de Títulos - Plano Principal";

/// Derived totals for a selection.
///
/// Recomputed from the live selection on every read; never cached across a
/// selection change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingResult {
    pub base_price: Decimal,
    /// Sum of the discounted prices of the chosen add-ons.
    pub add_on_surcharge: Decimal,
    pub final_total: Decimal,
    /// Tickets granted by add-ons on top of the selected quantity.
    pub extra_tickets: u32,
    pub final_quantity: u32,
}

/// Compute totals for a quantity and set of chosen add-on ids.
///
/// Deterministic, no I/O, no failure modes. Unknown add-on ids are ignored
/// so a stale selection cannot poison the checkout.
pub fn compute_totals(
    quantity: u32,
    add_on_ids: &[CompactString],
    catalog: &CheckoutCatalog,
) -> PricingResult {
    let base_price = catalog.base_price(quantity);
    let mut add_on_surcharge = Decimal::ZERO;
    let mut extra_tickets = 0u32;

    for id in add_on_ids {
        if let Some(add_on) = catalog.add_on(id) {
            add_on_surcharge += add_on.discount_price;
            extra_tickets += add_on.extra_tickets;
        }
    }

    PricingResult {
        base_price,
        add_on_surcharge,
        final_total: base_price + add_on_surcharge,
        extra_tickets,
        final_quantity: quantity + extra_tickets,
    }
}

/// One checkout line in decimal prices, ready for wire conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub id: CompactString,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub quantity: u32,
}

/// Assemble the line list for a selection: the base bundle first, then one
/// line per chosen add-on. Unknown add-on ids are skipped.
pub fn order_lines(catalog: &CheckoutCatalog, selection: &Selection) -> Vec<OrderLine> {
    let mut lines = Vec::with_capacity(1 + selection.add_ons.len());
    lines.push(OrderLine {
        id: CompactString::const_new(MAIN_LINE_ID),
        title: MAIN_LINE_TITLE.to_string(),
        description: format!("Compra de {} títulos", selection.quantity),
        price: catalog.base_price(selection.quantity),
        quantity: 1,
    });
    for id in &selection.add_ons {
        if let Some(add_on) = catalog.add_on(id) {
            lines.push(OrderLine {
                id: add_on.id.clone(),
                title: add_on.title.clone(),
                description: add_on.description.clone(),
                price: add_on.discount_price,
                quantity: 1,
            });
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn catalog() -> CheckoutCatalog {
        CheckoutCatalog::default()
    }

    fn ids(raw: &[&str]) -> Vec<CompactString> {
        raw.iter().map(|id| CompactString::from(*id)).collect()
    }

    #[test]
    fn test_base_quantity_without_add_ons() {
        let result = compute_totals(20, &[], &catalog());
        assert_eq!(result.base_price, dec!(19.90));
        assert_eq!(result.add_on_surcharge, Decimal::ZERO);
        assert_eq!(result.final_total, dec!(19.90));
        assert_eq!(result.extra_tickets, 0);
        assert_eq!(result.final_quantity, 20);
    }

    #[test]
    fn test_single_add_on_raises_total_and_quantity() {
        let result = compute_totals(20, &ids(&["orderbump-1"]), &catalog());
        assert_eq!(result.final_total, dec!(30.30));
        assert_eq!(result.final_quantity, 35);
    }

    #[test]
    fn test_totals_are_additive_over_add_ons() {
        let result = compute_totals(20, &ids(&["orderbump-1", "orderbump-2", "orderbump-3"]), &catalog());
        assert_eq!(result.add_on_surcharge, dec!(10.40) + dec!(13.79) + dec!(29.70));
        assert_eq!(result.final_total, result.base_price + result.add_on_surcharge);
        assert_eq!(result.extra_tickets, 105);
        assert_eq!(result.final_quantity, 125);
    }

    #[test]
    fn test_unknown_add_on_ids_are_ignored() {
        let result = compute_totals(20, &ids(&["orderbump-1", "orderbump-99"]), &catalog());
        assert_eq!(result.final_total, dec!(30.30));
        assert_eq!(result.final_quantity, 35);
    }

    #[test]
    fn test_off_ladder_quantity_uses_unit_price() {
        let result = compute_totals(25, &[], &catalog());
        assert_eq!(result.base_price, dec!(24.75));
        assert_eq!(result.final_total, dec!(24.75));
    }

    #[test]
    fn test_order_lines_mirror_selection() {
        let mut selection = Selection::new(20);
        selection.toggle_add_on("orderbump-1");
        selection.toggle_add_on("missing-bump");

        let lines = order_lines(&catalog(), &selection);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].id, MAIN_LINE_ID);
        assert_eq!(lines[0].description, "Compra de 20 títulos");
        assert_eq!(lines[0].price, dec!(19.90));
        assert_eq!(lines[1].id, "orderbump-1");
        assert_eq!(lines[1].price, dec!(10.40));
        assert!(lines.iter().all(|line| line.quantity == 1));
    }
}
