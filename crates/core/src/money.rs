//! Monetary rounding and display helpers.
//!
//! Amounts are plain `f64` values; every figure that gets persisted or
//! printed passes through [`round_cents`] so stored totals and rendered
//! totals agree to the cent.

/// Round a monetary value to two decimal places (half-up at the cent).
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_cents_rounds_to_nearest_cent() {
        assert_eq!(round_cents(2.344), 2.34);
        assert_eq!(round_cents(2.346), 2.35);
        assert_eq!(round_cents(10.0 / 3.0), 3.33);
    }

    #[test]
    fn round_cents_is_idempotent() {
        let v = round_cents(123.456_789);
        assert_eq!(round_cents(v), v);
    }
}
