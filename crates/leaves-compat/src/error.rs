//! Error types for case execution and matrix comparison.

use crate::matrix::Shape;
use leaves_venv::ExecError;
use std::path::PathBuf;
use thiserror::Error;

/// Two output matrices disagree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompareError {
    #[error("m1.shape != m2.shape ({left} != {right})")]
    ShapeMismatch { left: Shape, right: Shape },

    #[error("number of mismatches = {mismatches} (maximum allowed {allowed})")]
    TooManyMismatches { mismatches: usize, allowed: f64 },
}

/// A matrix file could not be loaded.
#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{origin}: line {line} has {found} columns, expected {expected}")]
    Ragged {
        origin: String,
        line: usize,
        expected: usize,
        found: usize,
    },
}

/// Anything that can go wrong while running one case.
#[derive(Error, Debug)]
pub enum CaseError {
    #[error("IO error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error("no executable found: {0}")]
    MissingExecutable(String),

    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error(transparent)]
    Compare(#[from] CompareError),
}

impl CaseError {
    /// Whether the case ran to completion and only the outputs disagreed.
    pub fn is_mismatch(&self) -> bool {
        matches!(self, CaseError::Compare(_))
    }
}
