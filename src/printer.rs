use std::fmt::{self, Display, Write};

use crate::{domains::rational::Rational, tensors::matrix::Matrix};

/// Options that control how rationals are printed.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct PrintOptions {
    /// Append a floating point approximation with this many decimals, e.g. `1/3 [0.333]`.
    pub decimals: Option<usize>,
}

impl PrintOptions {
    pub fn with_decimals(decimals: usize) -> PrintOptions {
        PrintOptions {
            decimals: Some(decimals),
        }
    }
}

pub struct RationalPrinter<'a> {
    pub value: &'a Rational,
    pub opts: PrintOptions,
}

impl<'a> RationalPrinter<'a> {
    pub fn new(value: &'a Rational, opts: PrintOptions) -> RationalPrinter<'a> {
        RationalPrinter { value, opts }
    }
}

impl<'a> Display for RationalPrinter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(self.value, f)?;

        if let Some(d) = self.opts.decimals {
            if !self.value.is_integer() {
                f.write_fmt(format_args!(" [{:.*}]", d, self.value.to_f64()))?;
            }
        }

        Ok(())
    }
}

/// Print a sequence of rationals on a single line, separated by spaces.
pub struct VectorPrinter<'a> {
    pub values: &'a [Rational],
    pub opts: PrintOptions,
}

impl<'a> VectorPrinter<'a> {
    pub fn new(values: &'a [Rational], opts: PrintOptions) -> VectorPrinter<'a> {
        VectorPrinter { values, opts }
    }
}

impl<'a> Display for VectorPrinter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_char(' ')?;
            }
            RationalPrinter::new(v, self.opts).fmt(f)?;
        }
        Ok(())
    }
}

/// Print a matrix with one row per line.
pub struct MatrixPrinter<'a> {
    pub matrix: &'a Matrix,
    pub opts: PrintOptions,
}

impl<'a> MatrixPrinter<'a> {
    pub fn new(matrix: &'a Matrix, opts: PrintOptions) -> MatrixPrinter<'a> {
        MatrixPrinter { matrix, opts }
    }
}

impl<'a> Display for MatrixPrinter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, r) in self.matrix.rows().iter().enumerate() {
            if i > 0 {
                f.write_char('\n')?;
            }
            VectorPrinter::new(r.as_slice(), self.opts).fmt(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::{domains::rational::Rational, tensors::matrix::Matrix};

    use super::{MatrixPrinter, PrintOptions, VectorPrinter};

    fn q(num: i64, den: i64) -> Rational {
        Rational::new(num, den).unwrap()
    }

    #[test]
    fn vector() {
        let v = [q(1, 2), q(-3, 1), Rational::zero()];
        assert_eq!(
            VectorPrinter::new(&v, PrintOptions::default()).to_string(),
            "1/2 -3 0"
        );
        assert_eq!(VectorPrinter::new(&[], PrintOptions::default()).to_string(), "");
    }

    #[test]
    fn decimals() {
        let v = [q(1, 3), q(2, 1), q(-7, 4)];
        assert_eq!(
            VectorPrinter::new(&v, PrintOptions::with_decimals(3)).to_string(),
            "1/3 [0.333] 2 -7/4 [-1.750]"
        );
    }

    #[test]
    fn matrix() {
        let m = Matrix::from_nested_vec(vec![
            vec![Rational::one(), q(1, 2), q(3, 1)],
            vec![Rational::zero(), Rational::one(), q(-5, 3)],
        ])
        .unwrap();

        assert_eq!(
            MatrixPrinter::new(&m, PrintOptions::default()).to_string(),
            "1 1/2 3\n0 1 -5/3"
        );
        assert_eq!(m.to_string(), "1 1/2 3\n0 1 -5/3");
    }
}
