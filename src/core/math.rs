//! Numeric helpers for plan-space values.
//!
//! Stored coordinates are fixed to one decimal place; reported route
//! distances are fixed to two.

/// Round to 1 decimal place (stored coordinate precision).
#[inline]
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Round to 2 decimal places (reported distances).
#[inline]
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_halves_up() {
        assert_eq!(round1(1.25), 1.3);
        assert_eq!(round1(-0.04), -0.0);
        assert_eq!(round2(141.421356), 141.42);
        assert_eq!(round2(99.999), 100.0);
    }
}
