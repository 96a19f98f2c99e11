//! leaves-compat - cross-implementation compatibility harness
//!
//! Checks that the leaves Go library predicts exactly what the Python
//! libraries it ports predict, release by release:
//! - provisions one virtual environment per (library, version)
//! - runs each case's Python program, then builds and runs its Go program
//! - compares the two prediction matrices within a tolerance
//! - renders a markdown pass/fail grid per library

pub mod case;
pub mod cases;
pub mod compare;
pub mod config;
pub mod error;
pub mod matrix;
pub mod report;
pub mod runner;
pub mod telemetry;
pub mod workspace;

// Re-export key types
pub use case::{Case, CaseExecution, CaseOptions, CaseState, CaseVerdict, GoModule, LEAVES_MODULE};
pub use compare::{compare, compare_matrices, ComparisonSummary, Tolerance};
pub use config::HarnessConfig;
pub use error::{CaseError, CompareError, MatrixError};
pub use matrix::{Matrix, Shape};
pub use report::ReportFormatter;
pub use runner::{CaseRunner, Outcome};
pub use telemetry::init_tracing;
pub use workspace::Workspace;

pub use leaves_venv::{
    is_go_available, is_python_available, EnvError, Environment, EnvironmentManager,
    LibraryVariant,
};
