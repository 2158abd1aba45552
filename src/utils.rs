//! Integer helpers for keeping rationals in lowest terms.

/// Euclid's algorithm on magnitudes. `gcd(0, 0)` is zero.
fn gcd_unsigned(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// The greatest common divisor of `|a|` and `|b|`.
pub fn gcd_signed(a: i64, b: i64) -> u64 {
    gcd_unsigned(a.unsigned_abs() as u128, b.unsigned_abs() as u128) as u64
}

/// The greatest common divisor of `|a|` and `|b|`, for the 128-bit intermediates of
/// rational arithmetic.
pub fn gcd_signed_i128(a: i128, b: i128) -> u128 {
    gcd_unsigned(a.unsigned_abs(), b.unsigned_abs())
}

/// The least common multiple of two positive denominators.
///
/// Both inputs are at most `i64::MAX`, so the result always fits in an `i128`.
pub fn lcm_positive(a: i64, b: i64) -> i128 {
    let g = gcd_signed(a, b) as i128;
    (a as i128 / g) * b as i128
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gcd() {
        assert_eq!(gcd_signed(12, -18), 6);
        assert_eq!(gcd_signed(0, -7), 7);
        assert_eq!(gcd_signed(0, 0), 0);
        assert_eq!(gcd_signed(i64::MIN, 0), 1 << 63);
        assert_eq!(gcd_signed(i64::MIN, 6), 2);
        assert_eq!(gcd_signed_i128(-(1 << 100), 1 << 90), 1 << 90);
    }

    #[test]
    fn lcm() {
        assert_eq!(lcm_positive(4, 6), 12);
        assert_eq!(lcm_positive(1, 9), 9);
        assert_eq!(
            lcm_positive(i64::MAX, i64::MAX - 1),
            i64::MAX as i128 * (i64::MAX - 1) as i128
        );
    }
}
