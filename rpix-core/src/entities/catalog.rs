//! The sellable catalog: the quantity tier ladder and the order-bump shelf.
//!
//! Loaded once at startup and injected read-only into the session; nothing
//! mutates it at runtime. `Default` carries the production storefront data.

use compact_str::CompactString;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A promoted quantity step on the selector ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketTier {
    pub quantity: u32,
    pub price: Decimal,
    /// Highlighted in the selector.
    #[serde(default)]
    pub popular: bool,
}

/// An optional extra-ticket bundle offered at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOn {
    pub id: CompactString,
    pub title: String,
    pub description: String,
    /// Struck-through price shown next to the discounted one.
    pub original_price: Decimal,
    pub discount_price: Decimal,
    /// Badge text, e.g. "30% OFF".
    pub discount_label: CompactString,
    /// Tickets granted on top of the selected quantity.
    pub extra_tickets: u32,
}

/// Problems found while validating a catalog loaded from configuration.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog has no quantity tiers")]
    NoTiers,
    #[error("quantity tiers must be strictly ascending (tier index {index})")]
    UnorderedTiers { index: usize },
    #[error("non-positive price on {entry}")]
    NonPositivePrice { entry: String },
    #[error("duplicate add-on id {id}")]
    DuplicateAddOn { id: CompactString },
}

/// The full catalog: tier ladder, add-on shelf, and the linear per-ticket
/// fallback used for quantities between tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutCatalog {
    /// Ascending by quantity.
    pub tiers: Vec<TicketTier>,
    #[serde(default)]
    pub add_ons: Vec<AddOn>,
    /// Per-ticket price for quantities that sit between tiers.
    pub unit_price: Decimal,
}

impl CheckoutCatalog {
    /// Check the structural invariants the rest of the crate relies on.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.tiers.is_empty() {
            return Err(CatalogError::NoTiers);
        }
        for (index, pair) in self.tiers.windows(2).enumerate() {
            if pair[1].quantity <= pair[0].quantity {
                return Err(CatalogError::UnorderedTiers { index: index + 1 });
            }
        }
        if self.unit_price <= Decimal::ZERO {
            return Err(CatalogError::NonPositivePrice {
                entry: "unit_price".to_string(),
            });
        }
        for tier in &self.tiers {
            if tier.price <= Decimal::ZERO {
                return Err(CatalogError::NonPositivePrice {
                    entry: format!("tier {}", tier.quantity),
                });
            }
        }
        for (index, add_on) in self.add_ons.iter().enumerate() {
            if add_on.discount_price <= Decimal::ZERO {
                return Err(CatalogError::NonPositivePrice {
                    entry: format!("add-on {}", add_on.id),
                });
            }
            if self.add_ons[..index].iter().any(|other| other.id == add_on.id) {
                return Err(CatalogError::DuplicateAddOn {
                    id: add_on.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Quantity a fresh selection starts at.
    pub fn starting_quantity(&self) -> u32 {
        self.min_quantity()
    }

    pub fn min_quantity(&self) -> u32 {
        self.tiers.first().map(|tier| tier.quantity).unwrap_or(0)
    }

    pub fn max_quantity(&self) -> u32 {
        self.tiers.last().map(|tier| tier.quantity).unwrap_or(0)
    }

    /// Clamp a requested quantity into the ladder bounds.
    pub fn clamp_quantity(&self, quantity: u32) -> u32 {
        quantity.clamp(self.min_quantity(), self.max_quantity())
    }

    /// Next tier strictly above `quantity`, or the ladder maximum.
    pub fn next_step(&self, quantity: u32) -> u32 {
        self.tiers
            .iter()
            .map(|tier| tier.quantity)
            .find(|&step| step > quantity)
            .unwrap_or_else(|| self.max_quantity())
    }

    /// Nearest tier strictly below `quantity`, or the ladder minimum.
    pub fn previous_step(&self, quantity: u32) -> u32 {
        self.tiers
            .iter()
            .map(|tier| tier.quantity)
            .rev()
            .find(|&step| step < quantity)
            .unwrap_or_else(|| self.min_quantity())
    }

    pub fn tier_for(&self, quantity: u32) -> Option<&TicketTier> {
        self.tiers.iter().find(|tier| tier.quantity == quantity)
    }

    /// Tier price for ladder quantities, linear fallback for the rest.
    pub fn base_price(&self, quantity: u32) -> Decimal {
        match self.tier_for(quantity) {
            Some(tier) => tier.price,
            None => Decimal::from(quantity) * self.unit_price,
        }
    }

    pub fn add_on(&self, id: &str) -> Option<&AddOn> {
        self.add_ons.iter().find(|add_on| add_on.id == id)
    }
}

impl Default for CheckoutCatalog {
    fn default() -> Self {
        Self {
            tiers: vec![
                TicketTier {
                    quantity: 20,
                    price: Decimal::new(1990, 2),
                    popular: false,
                },
                TicketTier {
                    quantity: 30,
                    price: Decimal::new(2970, 2),
                    popular: false,
                },
                TicketTier {
                    quantity: 40,
                    price: Decimal::new(3960, 2),
                    popular: false,
                },
                TicketTier {
                    quantity: 70,
                    price: Decimal::new(6930, 2),
                    popular: true,
                },
                TicketTier {
                    quantity: 100,
                    price: Decimal::new(9900, 2),
                    popular: false,
                },
                TicketTier {
                    quantity: 200,
                    price: Decimal::new(19900, 2),
                    popular: false,
                },
            ],
            add_ons: vec![
                AddOn {
                    id: CompactString::const_new("orderbump-1"),
                    title: "COMPRE + 15 TÍTULOS COM 30% DE DESCONTO".to_string(),
                    description: "15 títulos extras".to_string(),
                    original_price: Decimal::new(1485, 2),
                    discount_price: Decimal::new(1040, 2),
                    discount_label: CompactString::const_new("30% OFF"),
                    extra_tickets: 15,
                },
                AddOn {
                    id: CompactString::const_new("orderbump-2"),
                    title: "COMPRE + 30 TÍTULOS COM 30% DE DESCONTO".to_string(),
                    description: "30 títulos extras".to_string(),
                    original_price: Decimal::new(1970, 2),
                    discount_price: Decimal::new(1379, 2),
                    discount_label: CompactString::const_new("30% OFF"),
                    extra_tickets: 30,
                },
                AddOn {
                    id: CompactString::const_new("orderbump-3"),
                    title: "COMPRE + 60 TÍTULOS COM 50% DE DESCONTO".to_string(),
                    description: "60 títulos extras".to_string(),
                    original_price: Decimal::new(5940, 2),
                    discount_price: Decimal::new(2970, 2),
                    discount_label: CompactString::const_new("50% OFF"),
                    extra_tickets: 60,
                },
            ],
            unit_price: Decimal::new(99, 2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_catalog_is_valid() {
        let catalog = CheckoutCatalog::default();
        catalog.validate().unwrap();
        assert_eq!(catalog.tiers.len(), 6);
        assert_eq!(catalog.add_ons.len(), 3);
    }

    #[test]
    fn test_base_price_uses_tier_then_linear_fallback() {
        let catalog = CheckoutCatalog::default();
        assert_eq!(catalog.base_price(20), dec!(19.90));
        assert_eq!(catalog.base_price(70), dec!(69.30));
        // 25 is not a tier: 25 x 0.99
        assert_eq!(catalog.base_price(25), dec!(24.75));
    }

    #[test]
    fn test_ladder_step_navigation() {
        let catalog = CheckoutCatalog::default();
        assert_eq!(catalog.next_step(20), 30);
        assert_eq!(catalog.next_step(25), 30);
        assert_eq!(catalog.next_step(200), 200);
        assert_eq!(catalog.previous_step(30), 20);
        assert_eq!(catalog.previous_step(25), 20);
        assert_eq!(catalog.previous_step(20), 20);
    }

    #[test]
    fn test_clamp_quantity_respects_ladder_bounds() {
        let catalog = CheckoutCatalog::default();
        assert_eq!(catalog.clamp_quantity(5), 20);
        assert_eq!(catalog.clamp_quantity(55), 55);
        assert_eq!(catalog.clamp_quantity(999), 200);
    }

    #[test]
    fn test_validate_rejects_unordered_tiers() {
        let mut catalog = CheckoutCatalog::default();
        catalog.tiers.swap(0, 1);
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::UnorderedTiers { index: 1 })
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_add_on_ids() {
        let mut catalog = CheckoutCatalog::default();
        let duplicate = catalog.add_ons[0].clone();
        catalog.add_ons.push(duplicate);
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::DuplicateAddOn { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_ladder_and_bad_prices() {
        let empty = CheckoutCatalog {
            tiers: Vec::new(),
            add_ons: Vec::new(),
            unit_price: dec!(0.99),
        };
        assert!(matches!(empty.validate(), Err(CatalogError::NoTiers)));

        let mut catalog = CheckoutCatalog::default();
        catalog.unit_price = Decimal::ZERO;
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::NonPositivePrice { .. })
        ));
    }
}
