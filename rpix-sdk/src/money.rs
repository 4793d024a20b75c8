//! Integer-subunit money conversion.
//!
//! Both external services take monetary amounts as integer subunits
//! (centavos). Display and pricing stay in decimal currency; the conversion
//! below is applied exactly once per wire boundary, never in display logic.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Subunits per currency unit (centavos per real).
const SUBUNITS_PER_UNIT: Decimal = Decimal::ONE_HUNDRED;

/// Convert a decimal currency amount to integer subunits.
///
/// Multiplies by 100 and rounds half away from zero, so `10.40` becomes
/// `1040` and `13.795` becomes `1380`. Amounts beyond the `i64` subunit
/// range saturate; catalog-scale prices never get near it.
pub fn to_subunits(amount: Decimal) -> i64 {
    let subunits = (amount * SUBUNITS_PER_UNIT)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    match subunits.to_i64() {
        Some(value) => value,
        None if subunits.is_sign_negative() => i64::MIN,
        None => i64::MAX,
    }
}
