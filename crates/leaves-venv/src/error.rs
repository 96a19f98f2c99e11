//! Error types for leaves-venv

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while running an external program
#[derive(Error, Debug)]
pub enum ExecError {
    /// Command line was empty
    #[error("empty command")]
    EmptyCommand,

    /// Program could not be started
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Program ran but exited unsuccessfully
    #[error("'{command}' exited with code {code}: {stderr}")]
    NonZeroExit {
        command: String,
        /// Exit code, -1 when the process was killed by a signal
        code: i32,
        stderr: String,
    },
}

/// Errors that can occur while activating an environment
#[derive(Error, Debug)]
pub enum EnvError {
    /// Environment path exists but is something other than a directory.
    ///
    /// This is a broken invocation rather than a transient failure and is
    /// never retried.
    #[error("'{0}' should be directory")]
    NotADirectory(PathBuf),

    /// Environment creation or package installation failed
    #[error("environment provisioning failed: {0}")]
    Exec(#[from] ExecError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
