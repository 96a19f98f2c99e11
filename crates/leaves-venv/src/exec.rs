//! Blocking-style execution of external programs.
//!
//! Every call waits for the child to exit before returning. There is no
//! timeout: package installs and model training can legitimately take minutes.

use crate::error::ExecError;
use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

/// Captured result of a successful program run.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    /// Command line, for logging.
    pub command: String,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,

    /// Duration in milliseconds.
    pub duration_ms: u64,
}

/// Run `command` (first element is the program) and wait for it to finish.
///
/// `cwd` sets the child's working directory; the harness process itself never
/// changes directory. A non-zero exit is an error carrying the child's stderr.
pub async fn execute<S: AsRef<OsStr>>(
    command: &[S],
    cwd: Option<&Path>,
) -> Result<ExecOutput, ExecError> {
    let (program, args) = command.split_first().ok_or(ExecError::EmptyCommand)?;
    let command_line = display_command(command);
    let start = Instant::now();

    debug!(command = %command_line, cwd = ?cwd, "Executing");

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let child = cmd.spawn().map_err(|source| ExecError::Spawn {
        program: program.as_ref().to_string_lossy().into_owned(),
        source,
    })?;
    let output = child
        .wait_with_output()
        .await
        .map_err(|source| ExecError::Spawn {
            program: program.as_ref().to_string_lossy().into_owned(),
            source,
        })?;

    let duration_ms = start.elapsed().as_millis() as u64;
    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    debug!(
        command = %command_line,
        exit_code,
        duration_ms,
        "Finished"
    );

    if !output.status.success() {
        return Err(ExecError::NonZeroExit {
            command: command_line,
            code: exit_code,
            stderr: stderr.trim_end().to_string(),
        });
    }

    Ok(ExecOutput {
        command: command_line,
        stdout,
        stderr,
        duration_ms,
    })
}

fn display_command<S: AsRef<OsStr>>(command: &[S]) -> String {
    command
        .iter()
        .map(|part| part.as_ref().to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_execute_simple_command() {
        let result = execute(&["echo", "hello"], None)
            .await
            .expect("execute failed");
        assert!(result.stdout.contains("hello"));
        assert_eq!(result.command, "echo hello");
    }

    #[tokio::test]
    async fn test_execute_captures_stderr_of_successful_run() {
        let result = execute(&["sh", "-c", "echo warning >&2"], None)
            .await
            .expect("execute failed");
        assert_eq!(result.stderr.trim_end(), "warning");
        assert!(result.stdout.is_empty());
        assert_eq!(result.command, "sh -c echo warning >&2");
    }

    #[tokio::test]
    async fn test_execute_failing_command() {
        let err = execute(&["sh", "-c", "echo boom >&2; exit 3"], None)
            .await
            .unwrap_err();
        match err {
            ExecError::NonZeroExit { code, stderr, .. } => {
                assert_eq!(code, 3);
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_execute_missing_program() {
        let err = execute(&["/nonexistent/definitely-not-here"], None)
            .await
            .unwrap_err();
        assert!(matches!(err, ExecError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_execute_empty_command() {
        let empty: [&str; 0] = [];
        let err = execute(&empty, None).await.unwrap_err();
        assert!(matches!(err, ExecError::EmptyCommand));
    }

    #[tokio::test]
    async fn test_execute_uses_working_directory() {
        let dir = tempdir().unwrap();
        execute(&["sh", "-c", "echo here > marker.txt"], Some(dir.path()))
            .await
            .expect("execute failed");
        assert!(dir.path().join("marker.txt").is_file());
    }
}
