//! leaves-venv: isolated Python environments for the leaves compatibility harness
//!
//! Each (library, version) pair gets its own virtual environment under a
//! shared root, named `<library>_<version>`. Environments are created with
//! `python3 -m venv` and provisioned with pip; with reuse enabled an existing
//! directory is returned untouched.
//!
//! The crate also carries the small process runner the harness uses for every
//! external program (pip, python, go).

pub mod error;
pub mod exec;
pub mod library;
pub mod venv;

pub use error::{EnvError, ExecError};
pub use exec::{execute, ExecOutput};
pub use library::{LibraryVariant, AUXILIARY_PACKAGE};
pub use venv::{env_name, Environment, EnvironmentManager};

/// Result type for environment operations
pub type Result<T> = std::result::Result<T, EnvError>;

/// Check whether a Python interpreter can be started
pub fn is_python_available(interpreter: &std::path::Path) -> bool {
    std::process::Command::new(interpreter)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Check whether the Go toolchain can be started
pub fn is_go_available(go: &std::path::Path) -> bool {
    std::process::Command::new(go)
        .arg("version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_missing_toolchains_reported_unavailable() {
        assert!(!is_python_available(Path::new("/nonexistent/python3")));
        assert!(!is_go_available(Path::new("/nonexistent/go")));
    }
}
