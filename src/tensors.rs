//! Linear algebra over the rationals.

pub mod matrix;
