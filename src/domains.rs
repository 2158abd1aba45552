//! Number domains with exact arithmetic.
//!
//! The only domain is the field of [rational numbers](rational::Rational) with 64-bit
//! numerators and denominators.
pub mod rational;
