use std::{
    cmp::Ordering,
    fmt::Display,
    ops::{Index, IndexMut},
    slice::Iter,
};

use ahash::{HashMap, HashMapExt};
use smallvec::SmallVec;
use tracing::{debug, instrument, warn};

use crate::{
    domains::rational::{Rational, RationalError},
    printer::{MatrixPrinter, PrintOptions, VectorPrinter},
};

/// Errors that can occur when building or solving a linear system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatrixError {
    /// Fewer equations than variables, or no variables at all.
    InvalidDimensions { vars: usize, eqs: usize },
    /// Two rows that should have the same length do not.
    ShapeMismatch { left: usize, right: usize },
    Arithmetic(RationalError),
}

impl Display for MatrixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatrixError::InvalidDimensions { vars, eqs } => write!(
                f,
                "Invalid dimensions: {} equation(s) for {} variable(s); need at least one variable and no fewer equations than variables",
                eqs, vars
            ),
            MatrixError::ShapeMismatch { left, right } => {
                write!(f, "Rows have different lengths: {} vs {}", left, right)
            }
            MatrixError::Arithmetic(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for MatrixError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MatrixError::Arithmetic(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RationalError> for MatrixError {
    fn from(e: RationalError) -> Self {
        MatrixError::Arithmetic(e)
    }
}

/// A single equation: the coefficients of `X0..X(n-1)` followed by the right-hand side.
///
/// All element-wise operations require rows of equal length and fail with
/// [`MatrixError::ShapeMismatch`] otherwise. A failed operation leaves the row untouched.
#[derive(Clone, Hash, PartialEq, Eq, Debug)]
pub struct Row {
    data: SmallVec<[Rational; 8]>,
}

impl From<Vec<Rational>> for Row {
    fn from(data: Vec<Rational>) -> Self {
        Row { data: data.into() }
    }
}

impl FromIterator<Rational> for Row {
    fn from_iter<T: IntoIterator<Item = Rational>>(iter: T) -> Self {
        Row {
            data: iter.into_iter().collect(),
        }
    }
}

impl Row {
    /// Create a row of `len` zeroes.
    pub fn new_zero(len: usize) -> Row {
        Row {
            data: SmallVec::from_elem(Rational::zero(), len),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[Rational] {
        &self.data
    }

    pub fn iter(&self) -> Iter<'_, Rational> {
        self.data.iter()
    }

    /// The coefficients, i.e. every entry except the right-hand side.
    pub fn coefficients(&self) -> &[Rational] {
        &self.data[..self.data.len().saturating_sub(1)]
    }

    /// Return the column of the first non-zero coefficient, if any.
    pub fn leading_column(&self) -> Option<usize> {
        self.coefficients().iter().position(|e| !e.is_zero())
    }

    fn zip_with(
        &mut self,
        other: &Row,
        op: impl Fn(&Rational, &Rational) -> Result<Rational, RationalError>,
    ) -> Result<(), MatrixError> {
        if self.len() != other.len() {
            return Err(MatrixError::ShapeMismatch {
                left: self.len(),
                right: other.len(),
            });
        }

        self.data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| op(a, b))
            .collect::<Result<_, _>>()?;
        Ok(())
    }

    fn map_with(
        &mut self,
        op: impl Fn(&Rational) -> Result<Rational, RationalError>,
    ) -> Result<(), MatrixError> {
        self.data = self.data.iter().map(op).collect::<Result<_, _>>()?;
        Ok(())
    }

    pub fn add_assign(&mut self, other: &Row) -> Result<(), MatrixError> {
        self.zip_with(other, Rational::add)
    }

    pub fn sub_assign(&mut self, other: &Row) -> Result<(), MatrixError> {
        self.zip_with(other, Rational::sub)
    }

    /// Multiply entry by entry.
    pub fn mul_assign(&mut self, other: &Row) -> Result<(), MatrixError> {
        self.zip_with(other, Rational::mul)
    }

    /// Divide entry by entry.
    pub fn div_assign(&mut self, other: &Row) -> Result<(), MatrixError> {
        self.zip_with(other, Rational::div)
    }

    pub fn mul_scalar_assign(&mut self, scalar: &Rational) -> Result<(), MatrixError> {
        self.map_with(|e| e.mul(scalar))
    }

    pub fn div_scalar_assign(&mut self, scalar: &Rational) -> Result<(), MatrixError> {
        if scalar.is_zero() {
            return Err(RationalError::DivisionByZero.into());
        }
        self.map_with(|e| e.div(scalar))
    }

    pub fn mul_int_assign(&mut self, scalar: i64) -> Result<(), MatrixError> {
        self.map_with(|e| e.mul_int(scalar))
    }

    pub fn div_int_assign(&mut self, scalar: i64) -> Result<(), MatrixError> {
        if scalar == 0 {
            return Err(RationalError::DivisionByZero.into());
        }
        self.map_with(|e| e.div_int(scalar))
    }

    /// Return a copy of the row multiplied by `scalar`.
    pub fn mul_scalar(&self, scalar: &Rational) -> Result<Row, MatrixError> {
        let mut r = self.clone();
        r.mul_scalar_assign(scalar)?;
        Ok(r)
    }

    /// Return a copy of the row divided by `scalar`.
    pub fn div_scalar(&self, scalar: &Rational) -> Result<Row, MatrixError> {
        let mut r = self.clone();
        r.div_scalar_assign(scalar)?;
        Ok(r)
    }
}

impl Index<usize> for Row {
    type Output = Rational;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl IndexMut<usize> for Row {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Rational {
        &mut self.data[index]
    }
}

impl Display for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        VectorPrinter::new(self.as_slice(), PrintOptions::default()).fmt(f)
    }
}

/// Order rows such that rows with larger leading entries come first.
///
/// Rows are compared entry by entry up to the length of the shorter one. At the first
/// differing entry, the row with the larger value sorts first. If all compared entries
/// are equal, the longer row sorts first.
pub fn compare_rows(a: &[Rational], b: &[Rational]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        if x != y {
            return y.cmp(x);
        }
    }

    b.len().cmp(&a.len())
}

/// The outcome of a row reduction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reduction {
    /// The number of pivots that were assigned.
    pub rank: usize,
    /// The number of rows that were visited, including a degenerate row.
    pub processed_rows: usize,
    /// The row whose coefficients all reduced to zero, at which the reduction stopped.
    pub degenerate_row: Option<usize>,
}

/// The solution of a linear system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    values: Vec<Rational>,
    rank: usize,
    degenerate_row: Option<usize>,
}

impl Solution {
    /// The value of every variable, `values()[i]` belonging to `Xi`.
    pub fn values(&self) -> &[Rational] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Rational> {
        self.values
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn degenerate_row(&self) -> Option<usize> {
        self.degenerate_row
    }

    /// Returns `true` iff every variable received a pivot, so that the values are fully
    /// determined by the system.
    pub fn is_determined(&self) -> bool {
        self.rank == self.values.len()
    }
}

/// An augmented coefficient matrix: `neqs` rows of `nvars + 1` rationals.
#[derive(Clone, Hash, PartialEq, Eq, Debug)]
pub struct Matrix {
    rows: Vec<Row>,
    nvars: usize,
}

impl Matrix {
    /// Check that a system with `nvars` variables and `neqs` equations can be solved.
    pub fn check_dimensions(nvars: usize, neqs: usize) -> Result<(), MatrixError> {
        if nvars == 0 || neqs < nvars {
            Err(MatrixError::InvalidDimensions {
                vars: nvars,
                eqs: neqs,
            })
        } else {
            Ok(())
        }
    }

    /// Create a zeroed system with `nvars` variables and `neqs` equations.
    pub fn new(nvars: usize, neqs: usize) -> Result<Matrix, MatrixError> {
        Matrix::check_dimensions(nvars, neqs)?;

        Ok(Matrix {
            rows: (0..neqs).map(|_| Row::new_zero(nvars + 1)).collect(),
            nvars,
        })
    }

    /// Create a system from its rows, each holding the coefficients followed by the right-hand side.
    pub fn from_rows(rows: Vec<Row>) -> Result<Matrix, MatrixError> {
        let ncols = rows.first().map(|r| r.len()).unwrap_or(0);

        for r in &rows {
            if r.len() != ncols {
                return Err(MatrixError::ShapeMismatch {
                    left: ncols,
                    right: r.len(),
                });
            }
        }

        let nvars = ncols.saturating_sub(1);
        Matrix::check_dimensions(nvars, rows.len())?;

        Ok(Matrix { rows, nvars })
    }

    /// Create a system from a 2-dimensional vector of rationals.
    pub fn from_nested_vec(matrix: Vec<Vec<Rational>>) -> Result<Matrix, MatrixError> {
        Matrix::from_rows(matrix.into_iter().map(Row::from).collect())
    }

    /// Return the number of variables.
    pub fn nvars(&self) -> usize {
        self.nvars
    }

    /// Return the number of equations.
    pub fn neqs(&self) -> usize {
        self.rows.len()
    }

    /// Return the number of columns, including the right-hand side.
    pub fn ncols(&self) -> usize {
        self.nvars + 1
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> &Row {
        &self.rows[index]
    }

    /// Sort the rows with [`compare_rows`].
    pub fn sort_rows(&mut self) {
        self.rows.sort_by(|a, b| compare_rows(a.as_slice(), b.as_slice()));
    }

    /// Bring the matrix into row echelon form in place, with every pivot equal to one.
    ///
    /// The rows are processed from top to bottom. Every entry of the current row that lies
    /// in a column with an assigned pivot is eliminated using the row that owns that pivot.
    /// The first remaining non-zero coefficient then becomes the pivot of the row.
    /// When a row has no coefficient left, the system is underdetermined or contains a
    /// redundant equation and the remaining rows are left untouched.
    #[instrument(level = "debug", skip(self), fields(neqs = self.neqs(), nvars = self.nvars))]
    pub fn row_reduce(&mut self) -> Result<Reduction, MatrixError> {
        // pivot column -> row that has a one in that column
        let mut pivots: HashMap<usize, usize> = HashMap::new();
        let mut next_pivot_column = 0;

        for r in 0..self.rows.len() {
            for c in 0..next_pivot_column {
                let factor = self.rows[r][c];
                if factor.is_zero() {
                    continue;
                }

                if let Some(&owner) = pivots.get(&c) {
                    let scaled = self.rows[owner].mul_scalar(&factor)?;
                    self.rows[r].sub_assign(&scaled)?;
                }
            }

            while next_pivot_column < self.nvars && self.rows[r][next_pivot_column].is_zero() {
                next_pivot_column += 1;
            }

            if next_pivot_column == self.nvars {
                if pivots.len() == self.nvars {
                    debug!(row = r, rhs = %self.rows[r][self.nvars], "Redundant equation");
                } else {
                    warn!(
                        row = r,
                        rank = pivots.len(),
                        "Equation has no pivot: the system is underdetermined or inconsistent"
                    );
                }

                return Ok(Reduction {
                    rank: pivots.len(),
                    processed_rows: r + 1,
                    degenerate_row: Some(r),
                });
            }

            let pivot = self.rows[r][next_pivot_column];
            self.rows[r].div_scalar_assign(&pivot)?;
            debug!(row = r, column = next_pivot_column, %pivot, "Normalized pivot");

            pivots.insert(next_pivot_column, r);
            next_pivot_column += 1;
        }

        Ok(Reduction {
            rank: pivots.len(),
            processed_rows: self.rows.len(),
            degenerate_row: None,
        })
    }

    /// Solve a matrix in row echelon form by back substitution.
    ///
    /// No consistency check is performed. Variables that cannot be assigned stay zero.
    pub fn back_substitute(&self) -> Result<Vec<Rational>, MatrixError> {
        self.back_substitute_rows(self.rows.len())
    }

    fn back_substitute_rows(&self, nrows: usize) -> Result<Vec<Rational>, MatrixError> {
        let last = self.nvars - 1;
        let mut solution = vec![Rational::zero(); self.nvars];
        let mut next_unsolved_column = Some(last);

        for row in self.rows[..nrows].iter().rev() {
            let Some(cursor) = next_unsolved_column else {
                break;
            };

            // skip the columns that are zero in this row
            let Some(column) = (0..=cursor).rev().find(|&c| !row[c].is_zero()) else {
                continue;
            };

            let mut value = row[self.nvars];
            for c in column + 1..=last {
                value.sub_assign(&row[c].mul(&solution[c])?)?;
            }

            solution[column] = value;
            next_unsolved_column = column.checked_sub(1);
        }

        Ok(solution)
    }

    /// Sort, row reduce and back substitute the system in place.
    ///
    /// A degenerate equation stops the elimination early. The solution is then computed
    /// from the rows that received a pivot, which are the first `rank` rows, and
    /// [`Solution::is_determined`] returns `false` when not every variable received a pivot.
    #[instrument(level = "debug", skip(self))]
    pub fn solve(&mut self) -> Result<Solution, MatrixError> {
        self.sort_rows();
        let reduction = self.row_reduce()?;
        // every row before the degenerate one owns a pivot
        let values = self.back_substitute_rows(reduction.rank)?;

        Ok(Solution {
            values,
            rank: reduction.rank,
            degenerate_row: reduction.degenerate_row,
        })
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = Rational;

    #[inline]
    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.rows[index.0][index.1]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    #[inline]
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Rational {
        &mut self.rows[index.0][index.1]
    }
}

impl Display for Matrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        MatrixPrinter::new(self, PrintOptions::default()).fmt(f)
    }
}
