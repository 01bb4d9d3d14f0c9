//! # Card Financing
//!
//! Cost of paying a discounted quote by credit card.
//!
//! ```text
//! final price (whole units)
//!      │
//!      ├──► × cost rate ──► financing cost   (rounded to whole units)
//!      │
//!      ├──► + cost ───────► total            (whole units)
//!      │
//!      └──► exact total / installments ──► installment (rounded to cents)
//! ```
//!
//! The installment is derived from the EXACT financed total, not from the
//! rounded one, so `installment × n` may differ from `total` by a few
//! centavos.

use crate::catalog::CreditCardTerm;
use crate::money::{round_half_away, Money};
use crate::types::{PaymentBreakdown, Rate};

/// Computes the card financing figures for a final price.
///
/// ## Example
/// ```rust
/// use solar_core::catalog::CreditCardTerm;
/// use solar_core::financing::financing_breakdown;
/// use solar_core::money::Money;
/// use solar_core::types::Rate;
///
/// let term = CreditCardTerm {
///     id: "cc-01".into(),
///     code: "CC01".into(),
///     description: "30 days".into(),
///     cost_rate: Rate::from_bps(291),
/// };
/// let b = financing_breakdown(Money::from_units(10_000), &term);
/// assert_eq!(b.financing_cost, Money::from_units(291));
/// assert_eq!(b.total_with_financing, Money::from_units(10_291));
/// assert_eq!(b.installment_value, Money::from_units(10_291));
/// ```
pub fn financing_breakdown(final_price: Money, term: &CreditCardTerm) -> PaymentBreakdown {
    let rate = term.cost_rate;
    let installments = term.installment_count().max(1);

    let financing_cost = final_price.apply_rate_whole(rate);
    let total_with_financing = final_price + financing_cost;

    // exact_total_cents = final × (SCALE + bps) / SCALE
    let exact_numerator =
        final_price.cents() as i128 * (Rate::SCALE as i128 + rate.bps() as i128);
    let installment_cents = round_half_away(
        exact_numerator,
        Rate::SCALE as i128 * installments as i128,
    );

    PaymentBreakdown {
        term_description: term.description.clone(),
        financing_rate: rate,
        financing_cost,
        total_with_financing,
        installment_count: installments,
        installment_value: Money::from_cents(installment_cents as i64),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn term(description: &str, bps: u32) -> CreditCardTerm {
        CreditCardTerm {
            id: "cc".to_string(),
            code: "CC".to_string(),
            description: description.to_string(),
            cost_rate: Rate::from_bps(bps),
        }
    }

    #[test]
    fn test_single_installment() {
        let b = financing_breakdown(Money::from_units(10_000), &term("30 days", 291));
        assert_eq!(b.financing_cost.cents(), 29_100);
        assert_eq!(b.total_with_financing.cents(), 1_029_100);
        assert_eq!(b.installment_count, 1);
        assert_eq!(b.installment_value.cents(), 1_029_100);
        assert_eq!(b.financing_rate.bps(), 291);
    }

    #[test]
    fn test_installment_uses_exact_total() {
        // 10733 × 3.99% = 428.2467 → cost 428, total 11161
        // exact total 11161.2467 / 2 = 5580.62335 → 5580.62
        let b = financing_breakdown(Money::from_units(10_733), &term("30/60 days", 399));
        assert_eq!(b.financing_cost.cents(), 42_800);
        assert_eq!(b.total_with_financing.cents(), 1_116_100);
        assert_eq!(b.installment_count, 2);
        assert_eq!(b.installment_value.cents(), 558_062);
    }

    #[test]
    fn test_twelve_installments() {
        // 10000 × 12.95% = 1295 → total 11295; 11295 / 12 = 941.25
        let description = "30/60/90/120/150/180/210/240/270/300/330/360 days";
        let b = financing_breakdown(Money::from_units(10_000), &term(description, 1295));
        assert_eq!(b.total_with_financing.cents(), 1_129_500);
        assert_eq!(b.installment_count, 12);
        assert_eq!(b.installment_value.cents(), 94_125);
    }

    #[test]
    fn test_zero_rate() {
        let b = financing_breakdown(Money::from_units(500), &term("30/60/90 days", 0));
        assert!(b.financing_cost.is_zero());
        assert_eq!(b.total_with_financing.cents(), 50_000);
        // 500 / 3 = 166.666.. → 166.67
        assert_eq!(b.installment_value.cents(), 16_667);
    }
}
