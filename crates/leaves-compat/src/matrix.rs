//! Tab-delimited numeric matrices.
//!
//! Both sides of a case write predictions in the same plain format: one row
//! per line, fields separated by tabs, no header. Blank lines and `#` comments
//! are ignored; a field that is empty or not a number reads as NaN.

use crate::error::MatrixError;
use std::fmt;
use std::path::Path;

/// Matrix dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl Shape {
    pub fn size(&self) -> usize {
        self.rows * self.cols
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.rows, self.cols)
    }
}

/// Dense row-major matrix of `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    shape: Shape,
    values: Vec<f64>,
}

impl Matrix {
    /// Build from rows; every row must have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, MatrixError> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        let mut values = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(MatrixError::Ragged {
                    origin: "<rows>".to_string(),
                    line: i + 1,
                    expected: cols,
                    found: row.len(),
                });
            }
            values.extend_from_slice(row);
        }
        Ok(Self {
            shape: Shape {
                rows: rows.len(),
                cols,
            },
            values,
        })
    }

    /// Parse tab-delimited text.
    pub fn parse_tsv(text: &str) -> Result<Self, MatrixError> {
        parse(text, "<input>")
    }

    /// Load a tab-delimited file.
    pub fn load_tsv(path: &Path) -> Result<Self, MatrixError> {
        let text = std::fs::read_to_string(path).map_err(|source| MatrixError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse(&text, &path.display().to_string())
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Values in row-major order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.shape.rows || col >= self.shape.cols {
            return None;
        }
        self.values.get(row * self.shape.cols + col).copied()
    }
}

fn parse(text: &str, origin: &str) -> Result<Matrix, MatrixError> {
    let mut values = Vec::new();
    let mut rows = 0;
    let mut cols = None;

    for (idx, raw) in text.lines().enumerate() {
        let line = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        if line.trim().is_empty() {
            continue;
        }

        let before = values.len();
        values.extend(line.split('\t').map(parse_field));
        let found = values.len() - before;

        match cols {
            None => cols = Some(found),
            Some(expected) if expected != found => {
                return Err(MatrixError::Ragged {
                    origin: origin.to_string(),
                    line: idx + 1,
                    expected,
                    found,
                });
            }
            Some(_) => {}
        }
        rows += 1;
    }

    Ok(Matrix {
        shape: Shape {
            rows,
            cols: cols.unwrap_or(0),
        },
        values,
    })
}

fn parse_field(field: &str) -> f64 {
    field.trim().parse().unwrap_or(f64::NAN)
}
