//! Tolerant matrix comparison.

use crate::error::{CaseError, CompareError};
use crate::matrix::{Matrix, Shape};
use std::path::Path;
use tracing::{debug, info};

/// How far two matrices may drift apart and still count as equal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Largest absolute difference for an entry to match.
    pub abs: f64,
    /// Fraction of entries allowed to exceed `abs` (0.0 = none).
    pub max_mismatch_ratio: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            abs: 1e-9,
            max_mismatch_ratio: 0.0,
        }
    }
}

impl Tolerance {
    /// Absolute tolerance with no mismatches allowed.
    pub fn new(abs: f64) -> Self {
        Self {
            abs,
            ..Self::default()
        }
    }

    pub fn with_mismatch_ratio(mut self, ratio: f64) -> Self {
        self.max_mismatch_ratio = ratio;
        self
    }

    /// Number of mismatching entries tolerated for `total` entries.
    pub fn allowed_mismatches(&self, total: usize) -> f64 {
        self.max_mismatch_ratio * total as f64
    }
}

/// Statistics of a successful comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonSummary {
    pub shape: Shape,
    pub mismatches: usize,
    pub allowed: f64,
    /// Largest absolute difference seen, ignoring NaN entries.
    pub max_abs_diff: f64,
}

/// Compare two matrices under `tolerance`.
///
/// An entry mismatches when `|a - b| > tolerance.abs`; NaN differences never
/// count. The comparison fails when the mismatch count exceeds
/// `max_mismatch_ratio * size`, so hitting the allowance exactly still passes.
pub fn compare(
    m1: &Matrix,
    m2: &Matrix,
    tolerance: &Tolerance,
) -> Result<ComparisonSummary, CompareError> {
    if m1.shape() != m2.shape() {
        return Err(CompareError::ShapeMismatch {
            left: m1.shape(),
            right: m2.shape(),
        });
    }

    let mut mismatches = 0;
    let mut max_abs_diff = 0.0_f64;
    for (a, b) in m1.values().iter().zip(m2.values()) {
        let diff = (a - b).abs();
        if diff > tolerance.abs {
            mismatches += 1;
        }
        max_abs_diff = max_abs_diff.max(diff);
    }

    let allowed = tolerance.allowed_mismatches(m1.shape().size());
    debug!(mismatches, allowed, max_abs_diff, "Compared matrices");
    if mismatches as f64 > allowed {
        return Err(CompareError::TooManyMismatches {
            mismatches,
            allowed,
        });
    }

    Ok(ComparisonSummary {
        shape: m1.shape(),
        mismatches,
        allowed,
        max_abs_diff,
    })
}

/// Load two tab-delimited files and [`compare`] them.
pub fn compare_matrices(
    path1: &Path,
    path2: &Path,
    tolerance: &Tolerance,
) -> Result<ComparisonSummary, CaseError> {
    info!("Compare matrices from files: {:?} and {:?}", path1, path2);
    let m1 = Matrix::load_tsv(path1)?;
    let m2 = Matrix::load_tsv(path2)?;
    Ok(compare(&m1, &m2, tolerance)?)
}
