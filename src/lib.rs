//! Ratsolve solves square and overdetermined linear systems exactly.
//!
//! All arithmetic is performed on [Rational](domains::rational::Rational) numbers, so the
//! solution contains no rounding errors. The equations are sorted, brought into row echelon
//! form by Gaussian elimination and then solved by back substitution.
//!
//! For example:
//!
//! ```
//! use ratsolve::{domains::rational::Rational, tensors::matrix::Matrix};
//!
//! // 2*X0 = 1, 3*X0 + X1 = 2
//! let mut m = Matrix::from_nested_vec(vec![
//!     vec![2.into(), 0.into(), 1.into()],
//!     vec![3.into(), 1.into(), 2.into()],
//! ])
//! .unwrap();
//!
//! let solution = m.solve().unwrap();
//! assert_eq!(solution.values(), &[Rational::new(1, 2).unwrap(); 2]);
//! ```

pub mod domains;
pub mod parser;
pub mod printer;
pub mod tensors;
pub mod utils;
