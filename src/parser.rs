//! Read a linear system as a stream of whitespace-separated tokens.
//!
//! The expected input is the number of variables, the number of equations and then,
//! for every equation, its coefficients followed by its right-hand side:
//!
//! ```
//! use ratsolve::parser::read_system;
//!
//! let input = "2 2\n1 1 3\n1 -1 1\n";
//! let mut m = read_system(input.as_bytes(), None).unwrap();
//! let s = m.solve().unwrap();
//! assert_eq!(s.values()[0].to_string(), "2");
//! ```

use std::{
    collections::VecDeque,
    fmt::Display,
    io::{self, BufRead, Write},
};

use tracing::debug;

use crate::{
    domains::rational::{Rational, RationalError},
    tensors::matrix::{Matrix, MatrixError, Row},
};

/// Errors that can occur when reading a linear system.
#[derive(Debug)]
pub enum ReadError {
    Io(io::Error),
    UnexpectedEnd {
        expected: String,
    },
    /// A variable or equation count that is not a positive integer.
    InvalidCount {
        what: &'static str,
        token: String,
    },
    /// A malformed coefficient (`column` is `Some`) or right-hand side (`column` is `None`).
    Value {
        equation: usize,
        column: Option<usize>,
        source: RationalError,
    },
    Matrix(MatrixError),
}

impl Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::Io(e) => write!(f, "Could not read input: {}", e),
            ReadError::UnexpectedEnd { expected } => {
                write!(f, "Unexpected end of input: expected {}", expected)
            }
            ReadError::InvalidCount { what, token } => {
                write!(f, "The {} must be a positive integer, got '{}'", what, token)
            }
            ReadError::Value {
                equation,
                column: Some(c),
                source,
            } => write!(f, "Bad coefficient X{} of eq{}: {}", c, equation, source),
            ReadError::Value {
                equation,
                column: None,
                source,
            } => write!(f, "Bad right-hand side of eq{}: {}", equation, source),
            ReadError::Matrix(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadError::Io(e) => Some(e),
            ReadError::Value { source, .. } => Some(source),
            ReadError::Matrix(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ReadError {
    fn from(e: io::Error) -> Self {
        ReadError::Io(e)
    }
}

impl From<MatrixError> for ReadError {
    fn from(e: MatrixError) -> Self {
        ReadError::Matrix(e)
    }
}

/// A tokenizer over any buffered reader. Lines are only read when more tokens are needed,
/// so that interactive prompts and answers stay interleaved.
pub struct SystemReader<R: BufRead> {
    reader: R,
    tokens: VecDeque<String>,
}

impl<R: BufRead> SystemReader<R> {
    pub fn new(reader: R) -> SystemReader<R> {
        SystemReader {
            reader,
            tokens: VecDeque::new(),
        }
    }

    /// Return the next token, or `None` at the end of the input.
    pub fn next_token(&mut self) -> Result<Option<String>, ReadError> {
        while self.tokens.is_empty() {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.tokens.extend(line.split_whitespace().map(|t| t.to_owned()));
        }

        Ok(self.tokens.pop_front())
    }

    fn expect_token(&mut self, expected: impl FnOnce() -> String) -> Result<String, ReadError> {
        self.next_token()?.ok_or_else(|| ReadError::UnexpectedEnd {
            expected: expected(),
        })
    }

    /// Read a positive integer.
    pub fn read_count(&mut self, what: &'static str) -> Result<usize, ReadError> {
        let token = self.expect_token(|| format!("the {}", what))?;
        match token.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ReadError::InvalidCount { what, token }),
        }
    }

    /// Read the value in `column` of `equation`, where `None` denotes the right-hand side.
    pub fn read_value(
        &mut self,
        equation: usize,
        column: Option<usize>,
    ) -> Result<Rational, ReadError> {
        let token = self.expect_token(|| match column {
            Some(c) => format!("coefficient X{} of eq{}", c, equation),
            None => format!("right-hand side of eq{}", equation),
        })?;

        token.parse().map_err(|source| ReadError::Value {
            equation,
            column,
            source,
        })
    }
}

fn prompt(out: &mut Option<&mut dyn Write>, args: std::fmt::Arguments) -> Result<(), ReadError> {
    if let Some(w) = out.as_deref_mut() {
        w.write_fmt(args)?;
        w.flush()?;
    }
    Ok(())
}

/// Read a linear system from `input`. If `prompts` is set, a prompt is written to it
/// before every value is read.
///
/// The dimensions are validated before any coefficient is read.
pub fn read_system<R: BufRead>(
    input: R,
    prompts: Option<&mut dyn Write>,
) -> Result<Matrix, ReadError> {
    read_system_from(&mut SystemReader::new(input), prompts)
}

/// Read a linear system from an existing [`SystemReader`].
pub fn read_system_from<R: BufRead>(
    reader: &mut SystemReader<R>,
    mut prompts: Option<&mut dyn Write>,
) -> Result<Matrix, ReadError> {
    prompt(&mut prompts, format_args!("Enter number of variables, Xi: "))?;
    let nvars = reader.read_count("number of variables")?;
    prompt(&mut prompts, format_args!("Enter number of equations, Ej: "))?;
    let neqs = reader.read_count("number of equations")?;

    Matrix::check_dimensions(nvars, neqs)?;
    debug!(nvars, neqs, "Reading linear system");

    prompt(&mut prompts, format_args!("Enter coefficients for variable Xi\n"))?;
    // the counts are untrusted, so nothing is allocated from them up front
    let mut rows = vec![];
    for i in 0..neqs {
        prompt(&mut prompts, format_args!("eq{}: \n", i))?;

        let mut row = vec![];
        for j in 0..nvars {
            prompt(&mut prompts, format_args!("   X{}: ", j))?;
            row.push(reader.read_value(i, Some(j))?);
        }

        prompt(&mut prompts, format_args!("   eq{} = ", i))?;
        row.push(reader.read_value(i, None)?);

        rows.push(Row::from(row));
    }

    Ok(Matrix::from_rows(rows)?)
}
