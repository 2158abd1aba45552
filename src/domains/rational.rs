use std::{
    cmp::Ordering,
    fmt::{Display, Formatter},
    num::IntErrorKind,
    ops::Neg,
    str::FromStr,
};

use crate::utils;

/// Errors that can occur when constructing or combining rationals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RationalError {
    /// A zero denominator, or a division by zero.
    DivisionByZero,
    /// The reduced result does not fit in an `i64` numerator and denominator.
    Overflow,
    /// Text that is not of the form `p` or `p/q`.
    Malformed { input: String, reason: &'static str },
}

impl Display for RationalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RationalError::DivisionByZero => write!(f, "Division by zero"),
            RationalError::Overflow => write!(
                f,
                "Rational overflow: the result does not fit in a 64-bit numerator and denominator"
            ),
            RationalError::Malformed { input, reason } => {
                write!(f, "Malformed rational '{}': {}", input, reason)
            }
        }
    }
}

impl std::error::Error for RationalError {}

/// An exact fraction `p/q`, always stored in lowest terms with `q > 0`.
///
/// Both parts are bounded by `i64::MAX` in absolute value, so that negation never overflows.
/// All intermediate products are computed with 128-bit integers; a result that cannot be
/// represented after reduction yields [`RationalError::Overflow`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Rational {
    numerator: i64,
    denominator: i64,
}

impl Default for Rational {
    fn default() -> Self {
        Rational::zero()
    }
}

macro_rules! from_with_cast {
    ($base: ty) => {
        impl From<$base> for Rational {
            #[inline]
            fn from(value: $base) -> Self {
                Rational {
                    numerator: value as i64,
                    denominator: 1,
                }
            }
        }
    };
}

from_with_cast!(i8);
from_with_cast!(i16);
from_with_cast!(i32);
from_with_cast!(u8);
from_with_cast!(u16);
from_with_cast!(u32);

impl TryFrom<i64> for Rational {
    type Error = RationalError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Rational::new(value, 1)
    }
}

impl TryFrom<(i64, i64)> for Rational {
    type Error = RationalError;

    fn try_from((num, den): (i64, i64)) -> Result<Self, Self::Error> {
        Rational::new(num, den)
    }
}

impl Rational {
    /// Create the fraction `numerator/denominator` in lowest terms.
    pub fn new(numerator: i64, denominator: i64) -> Result<Rational, RationalError> {
        Rational::from_i128(numerator as i128, denominator as i128)
    }

    /// Reduce `numerator/denominator`, normalize the sign and narrow to 64 bits.
    fn from_i128(mut numerator: i128, mut denominator: i128) -> Result<Rational, RationalError> {
        if denominator == 0 {
            return Err(RationalError::DivisionByZero);
        }

        // the inputs never reach i128::MIN, so the gcd fits in an i128
        let g = utils::gcd_signed_i128(numerator, denominator) as i128;
        if g != 1 {
            numerator /= g;
            denominator /= g;
        }

        if denominator < 0 {
            numerator = -numerator;
            denominator = -denominator;
        }

        match (i64::try_from(numerator), i64::try_from(denominator)) {
            (Ok(numerator), Ok(denominator)) if numerator != i64::MIN => Ok(Rational {
                numerator,
                denominator,
            }),
            _ => Err(RationalError::Overflow),
        }
    }

    pub fn zero() -> Rational {
        Rational {
            numerator: 0,
            denominator: 1,
        }
    }

    pub fn one() -> Rational {
        Rational {
            numerator: 1,
            denominator: 1,
        }
    }

    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    pub fn is_zero(&self) -> bool {
        self.numerator == 0
    }

    pub fn is_one(&self) -> bool {
        self.numerator == 1 && self.denominator == 1
    }

    pub fn is_integer(&self) -> bool {
        self.denominator == 1
    }

    pub fn is_negative(&self) -> bool {
        self.numerator < 0
    }

    pub fn abs(&self) -> Rational {
        Rational {
            numerator: self.numerator.abs(),
            denominator: self.denominator,
        }
    }

    /// The multiplicative inverse.
    pub fn inv(&self) -> Result<Rational, RationalError> {
        if self.is_zero() {
            return Err(RationalError::DivisionByZero);
        }

        if self.numerator < 0 {
            Ok(Rational {
                numerator: -self.denominator,
                denominator: -self.numerator,
            })
        } else {
            Ok(Rational {
                numerator: self.denominator,
                denominator: self.numerator,
            })
        }
    }

    /// Convert to a floating point number. The result is only meant for display.
    pub fn to_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Add two rationals over the least common multiple of their denominators.
    pub fn add(&self, other: &Rational) -> Result<Rational, RationalError> {
        if self.denominator == other.denominator {
            return Rational::from_i128(
                self.numerator as i128 + other.numerator as i128,
                self.denominator as i128,
            );
        }

        let lcm = utils::lcm_positive(self.denominator, other.denominator);
        let num1 = self.numerator as i128 * (lcm / self.denominator as i128);
        let num2 = other.numerator as i128 * (lcm / other.denominator as i128);
        Rational::from_i128(num1 + num2, lcm)
    }

    pub fn sub(&self, other: &Rational) -> Result<Rational, RationalError> {
        self.add(&-*other)
    }

    pub fn mul(&self, other: &Rational) -> Result<Rational, RationalError> {
        // denominators are positive, so both gcds are at least 1
        let gcd1 = utils::gcd_signed(self.numerator, other.denominator) as i64;
        let gcd2 = utils::gcd_signed(self.denominator, other.numerator) as i64;

        Rational::from_i128(
            (self.numerator / gcd1) as i128 * (other.numerator / gcd2) as i128,
            (self.denominator / gcd2) as i128 * (other.denominator / gcd1) as i128,
        )
    }

    pub fn div(&self, other: &Rational) -> Result<Rational, RationalError> {
        self.mul(&other.inv()?)
    }

    pub fn add_int(&self, other: i64) -> Result<Rational, RationalError> {
        Rational::from_i128(
            self.numerator as i128 + other as i128 * self.denominator as i128,
            self.denominator as i128,
        )
    }

    pub fn sub_int(&self, other: i64) -> Result<Rational, RationalError> {
        Rational::from_i128(
            self.numerator as i128 - other as i128 * self.denominator as i128,
            self.denominator as i128,
        )
    }

    pub fn mul_int(&self, other: i64) -> Result<Rational, RationalError> {
        Rational::from_i128(
            self.numerator as i128 * other as i128,
            self.denominator as i128,
        )
    }

    pub fn div_int(&self, other: i64) -> Result<Rational, RationalError> {
        if other == 0 {
            return Err(RationalError::DivisionByZero);
        }

        Rational::from_i128(
            self.numerator as i128,
            self.denominator as i128 * other as i128,
        )
    }
}

macro_rules! assign_op {
    ($assign: ident, $op: ident, $rhs: ty) => {
        impl Rational {
            /// In-place variant. On error `self` is left unchanged.
            pub fn $assign(&mut self, other: $rhs) -> Result<(), RationalError> {
                *self = self.$op(other)?;
                Ok(())
            }
        }
    };
}

assign_op!(add_assign, add, &Rational);
assign_op!(sub_assign, sub, &Rational);
assign_op!(mul_assign, mul, &Rational);
assign_op!(div_assign, div, &Rational);
assign_op!(add_int_assign, add_int, i64);
assign_op!(sub_int_assign, sub_int, i64);
assign_op!(mul_int_assign, mul_int, i64);
assign_op!(div_int_assign, div_int, i64);

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Self::Output {
        Rational {
            numerator: -self.numerator,
            denominator: self.denominator,
        }
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.denominator == other.denominator {
            return self.numerator.cmp(&other.numerator);
        }

        let a = self.numerator as i128 * other.denominator as i128;
        let b = other.numerator as i128 * self.denominator as i128;

        a.cmp(&b)
    }
}

impl Display for Rational {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.denominator == 1 {
            f.write_fmt(format_args!("{}", self.numerator))
        } else {
            f.write_fmt(format_args!("{}/{}", self.numerator, self.denominator))
        }
    }
}

impl FromStr for Rational {
    type Err = RationalError;

    /// Parse a rational of the form `p` or `p/q`.
    ///
    /// Text that is not a fraction, or whose parts do not fit in an `i64`, is
    /// [`RationalError::Malformed`]. [`RationalError::Overflow`] is only returned when both
    /// parts fit but `i64::MIN` remains as the numerator after reduction.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let parse_part = |part: &str, reason: &'static str| {
            part.parse::<i64>().map_err(|e| RationalError::Malformed {
                input: s.to_owned(),
                reason: match e.kind() {
                    IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => "out of range",
                    _ => reason,
                },
            })
        };

        let (numerator, denominator) = match s.split_once('/') {
            Some((n, d)) => (
                parse_part(n, "numerator is not an integer")?,
                parse_part(d, "denominator is not an integer")?,
            ),
            None => (parse_part(s, "not an integer or fraction")?, 1),
        };

        if denominator == 0 {
            return Err(RationalError::Malformed {
                input: s.to_owned(),
                reason: "denominator is zero",
            });
        }

        Rational::new(numerator, denominator)
    }
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use crate::utils;

    use super::{Rational, RationalError};

    fn r(num: i64, den: i64) -> Rational {
        Rational::new(num, den).unwrap()
    }

    fn assert_simplified(a: &Rational) {
        assert!(a.denominator() > 0);
        assert_eq!(utils::gcd_signed(a.numerator(), a.denominator()), 1);
    }

    #[test]
    fn construction() {
        let a = r(6, -8);
        assert_eq!((a.numerator(), a.denominator()), (-3, 4));
        assert_eq!(r(0, -5), Rational::zero());
        assert_eq!(Rational::from(7).denominator(), 1);
        assert_eq!(Rational::new(1, 0), Err(RationalError::DivisionByZero));
        assert_eq!(Rational::new(i64::MIN, 1), Err(RationalError::Overflow));
        assert_eq!(r(i64::MIN, 2), r(-(1 << 62), 1));
    }

    #[test]
    fn addition_matches_cross_multiplication() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let (a, c) = (rng.gen_range(-1000..1000), rng.gen_range(-1000..1000));
            let b = rng.gen_range(1..500) * if rng.gen_bool(0.5) { 1 } else { -1 };
            let d = rng.gen_range(1..500) * if rng.gen_bool(0.5) { 1 } else { -1 };

            let sum = r(a, b).add(&r(c, d)).unwrap();
            assert_eq!(sum, r(a * d + c * b, b * d));
            assert_simplified(&sum);
        }
    }

    #[test]
    fn field_laws() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut sample = || r(rng.gen_range(-200..200), rng.gen_range(1..200));

        for _ in 0..500 {
            let (a, b, c) = (sample(), sample(), sample());

            assert_eq!(a.add(&b).unwrap(), b.add(&a).unwrap());
            assert_eq!(a.mul(&b).unwrap(), b.mul(&a).unwrap());
            assert_eq!(
                a.add(&b).unwrap().add(&c).unwrap(),
                a.add(&b.add(&c).unwrap()).unwrap()
            );
            assert_eq!(
                a.mul(&b).unwrap().mul(&c).unwrap(),
                a.mul(&b.mul(&c).unwrap()).unwrap()
            );
            assert_eq!(a.sub(&a).unwrap(), Rational::zero());

            for x in [
                a.sub(&b).unwrap(),
                a.mul(&c).unwrap(),
                a.add_int(3).unwrap(),
                a.mul_int(-4).unwrap(),
            ] {
                assert_simplified(&x);
            }

            if !b.is_zero() {
                let q = a.div(&b).unwrap();
                assert_simplified(&q);
                assert_eq!(q.mul(&b).unwrap(), a);
            }
        }
    }

    #[test]
    fn simplification_is_idempotent() {
        let a = r(-14, 21);
        assert_eq!(r(a.numerator(), a.denominator()), a);
    }

    #[test]
    fn integer_operations() {
        let a = r(1, 3);
        assert_eq!(a.add_int(1).unwrap(), r(4, 3));
        assert_eq!(a.sub_int(1).unwrap(), r(-2, 3));
        assert_eq!(a.mul_int(6).unwrap(), Rational::from(2));
        assert_eq!(a.div_int(-2).unwrap(), r(-1, 6));

        let mut b = r(5, 2);
        b.mul_int_assign(2).unwrap();
        assert!(b.is_integer());
        b.sub_int_assign(5).unwrap();
        assert!(b.is_zero());
    }

    #[test]
    fn division_by_zero() {
        let mut a = r(3, 4);
        let zero = Rational::zero();

        assert_eq!(a.div(&zero), Err(RationalError::DivisionByZero));
        assert_eq!(a.div_int(0), Err(RationalError::DivisionByZero));
        assert_eq!(a.div_assign(&zero), Err(RationalError::DivisionByZero));
        assert_eq!(a.div_int_assign(0), Err(RationalError::DivisionByZero));
        assert_eq!(zero.inv(), Err(RationalError::DivisionByZero));

        assert_eq!(a, r(3, 4));
        assert_eq!(zero, Rational::zero());
    }

    #[test]
    fn overflow() {
        let big = r(i64::MAX, 1);
        let mut a = big;
        assert_eq!(a.add_int_assign(1), Err(RationalError::Overflow));
        assert_eq!(a, big);
        assert_eq!(big.mul(&big), Err(RationalError::Overflow));
        assert_eq!(r(1, i64::MAX).add(&r(1, i64::MAX - 1)), Err(RationalError::Overflow));
        assert_eq!(big.sub(&big).unwrap(), Rational::zero());
        assert_eq!((-big).add_int(-1), Err(RationalError::Overflow));
    }

    #[test]
    fn negation_and_inverse() {
        assert_eq!(-r(2, 3), r(-2, 3));
        assert_eq!(r(-2, 3).inv().unwrap(), r(-3, 2));
        assert_eq!(r(-2, 3).abs(), r(2, 3));
        assert!(r(-2, 3).is_negative());
    }

    #[test]
    fn ordering() {
        assert!(r(1, 3) < r(1, 2));
        assert!(r(-1, 2) < r(-1, 3));
        assert!(r(7, 5) > Rational::one());
        assert_eq!(r(2, 4).cmp(&r(1, 2)), std::cmp::Ordering::Equal);
        assert!(r(i64::MAX - 2, i64::MAX - 1) < r(i64::MAX - 1, i64::MAX));

        let mut v = vec![r(1, 2), r(-3, 1), r(5, 7), Rational::zero()];
        v.sort();
        assert_eq!(v, vec![r(-3, 1), Rational::zero(), r(1, 2), r(5, 7)]);
    }

    #[test]
    fn format_and_parse() {
        assert_eq!(r(4, 2).to_string(), "2");
        assert_eq!(r(-3, 9).to_string(), "-1/3");

        for s in ["0", "-17", "5/3", "-22/7"] {
            let a: Rational = s.parse().unwrap();
            assert_eq!(a.to_string(), s);
            assert_eq!(a.to_string().parse::<Rational>().unwrap(), a);
        }

        assert_eq!("6/-4".parse::<Rational>().unwrap(), r(-3, 2));
        assert_eq!(" +3 ".parse::<Rational>().unwrap(), Rational::from(3));
        assert!(matches!(
            "1/0".parse::<Rational>(),
            Err(RationalError::Malformed { .. })
        ));
        assert!(matches!(
            "x".parse::<Rational>(),
            Err(RationalError::Malformed { .. })
        ));
        assert!(matches!(
            "1/2/3".parse::<Rational>(),
            Err(RationalError::Malformed { .. })
        ));
        assert!(matches!(
            "".parse::<Rational>(),
            Err(RationalError::Malformed { .. })
        ));
        assert_eq!(
            "123456789012345678901234".parse::<Rational>(),
            Err(RationalError::Malformed {
                input: "123456789012345678901234".to_owned(),
                reason: "out of range"
            })
        );
        assert!(matches!(
            "1/-99999999999999999999".parse::<Rational>(),
            Err(RationalError::Malformed {
                reason: "out of range",
                ..
            })
        ));
        assert_eq!(
            "-9223372036854775808".parse::<Rational>(),
            Err(RationalError::Overflow)
        );
        assert_eq!(
            "-9223372036854775808/2".parse::<Rational>().unwrap(),
            r(-(1 << 62), 1)
        );
    }

    #[test]
    fn float_conversion() {
        assert_eq!(r(1, 4).to_f64(), 0.25);
        assert_eq!(r(-3, 2).to_f64(), -1.5);
    }
}
