//! Volume discount tiers.
//!
//! Single source of truth for discount math: order totals, the order form
//! preview and the invoice renderer all derive from this table.

use serde::{Deserialize, Serialize};

use sesamo_core::round_cents;

/// Subtotal at which the first discount tier starts.
pub const TIER_ONE_THRESHOLD: f64 = 600.0;
/// Subtotal at which the top discount tier starts.
pub const TIER_TWO_THRESHOLD: f64 = 1200.0;

const TIER_ONE_PCT: f64 = 10.0;
const TIER_TWO_PCT: f64 = 20.0;

/// Result of applying the discount table to an order subtotal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountBreakdown {
    pub subtotal: f64,
    /// Whole-number percentage of the matched tier (0, 10 or 20).
    pub discount_percentage: f64,
    /// Absolute discount amount, `subtotal × pct / 100`.
    pub discount: f64,
    /// `subtotal − discount`; this is what gets cached on the order.
    pub final_total: f64,
    /// Nudge toward the next tier, `None` once the top tier is reached.
    pub message: Option<String>,
}

/// Percentage of the tier matched by `subtotal`.
///
/// Tier bounds are inclusive below, exclusive above: a subtotal of exactly
/// 600 earns 10%, exactly 1200 earns 20%.
pub fn discount_percentage(subtotal: f64) -> f64 {
    if subtotal >= TIER_TWO_THRESHOLD {
        TIER_TWO_PCT
    } else if subtotal >= TIER_ONE_THRESHOLD {
        TIER_ONE_PCT
    } else {
        0.0
    }
}

/// Multiplier form of the tier, `1 − pct/100`. The invoice renderer uses
/// this to express per-line amounts multiplicatively.
pub fn discount_factor(subtotal: f64) -> f64 {
    1.0 - discount_percentage(subtotal) / 100.0
}

/// Apply the discount table to a subtotal. A zero subtotal yields an all
/// zero breakdown; this is not an error.
pub fn compute_discount(subtotal: f64) -> DiscountBreakdown {
    let pct = discount_percentage(subtotal);
    let discount = round_cents(subtotal * pct / 100.0);
    let final_total = round_cents(subtotal - discount);
    let message = if subtotal < TIER_ONE_THRESHOLD {
        Some(format!(
            "Add {:.2} more to get {TIER_ONE_PCT:.0}% off",
            TIER_ONE_THRESHOLD - subtotal
        ))
    } else if subtotal < TIER_TWO_THRESHOLD {
        Some(format!(
            "Add {:.2} more to get {TIER_TWO_PCT:.0}% off",
            TIER_TWO_THRESHOLD - subtotal
        ))
    } else {
        None
    };
    DiscountBreakdown {
        subtotal,
        discount_percentage: pct,
        discount,
        final_total,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn tier_boundaries_are_inclusive_below_exclusive_above() {
        assert_eq!(compute_discount(599.99).discount_percentage, 0.0);
        assert_eq!(compute_discount(600.0).discount_percentage, 10.0);
        assert_eq!(compute_discount(1199.99).discount_percentage, 10.0);
        assert_eq!(compute_discount(1200.0).discount_percentage, 20.0);
    }

    #[test]
    fn zero_subtotal_is_a_zero_breakdown() {
        let b = compute_discount(0.0);
        assert_eq!(b.discount_percentage, 0.0);
        assert_eq!(b.discount, 0.0);
        assert_eq!(b.final_total, 0.0);
    }

    #[test]
    fn breakdown_arithmetic() {
        let b = compute_discount(1000.0);
        assert_eq!(b.discount, 100.0);
        assert_eq!(b.final_total, 900.0);
    }

    #[test]
    fn message_names_the_next_tier() {
        let b = compute_discount(550.0);
        assert_eq!(b.message.as_deref(), Some("Add 50.00 more to get 10% off"));
        let b = compute_discount(600.0);
        assert_eq!(
            b.message.as_deref(),
            Some("Add 600.00 more to get 20% off")
        );
        assert!(compute_discount(1200.0).message.is_none());
    }

    #[test]
    fn factor_matches_percentage() {
        assert_eq!(discount_factor(100.0), 1.0);
        assert_eq!(discount_factor(800.0), 0.9);
        assert_eq!(discount_factor(5000.0), 0.8);
    }

    proptest! {
        #[test]
        fn final_total_never_exceeds_subtotal(subtotal in 0.0f64..100_000.0) {
            let b = compute_discount(subtotal);
            prop_assert!(b.final_total <= subtotal + 1e-9);
            prop_assert!(b.discount >= 0.0);
        }

        #[test]
        fn percentage_is_monotone_in_subtotal(a in 0.0f64..100_000.0, b in 0.0f64..100_000.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(discount_percentage(lo) <= discount_percentage(hi));
        }

        #[test]
        fn discount_matches_percentage(subtotal in 0.0f64..100_000.0) {
            let b = compute_discount(subtotal);
            let expected = subtotal * b.discount_percentage / 100.0;
            prop_assert!((b.discount - expected).abs() < 0.01);
        }
    }
}
