//! Case definition and the per-run execution state machine.
//!
//! A [`Case`] describes one scenario: the Python program that produces
//! reference output, the Go program that produces leaves output, and how the
//! two outputs are compared. [`CaseExecution`] drives a case through
//!
//! ```text
//! Unprepared -> DirReady -> ReferenceRun -> PortRun -> Compared -> Done
//! ```
//!
//! dropping to `Failed` from whichever state an error is hit in. Errors never
//! escape [`CaseExecution::run`]; they become a failed [`CaseVerdict`].

use crate::error::CaseError;
use crate::workspace::Workspace;
use leaves_venv::{execute, Environment, ExecOutput, LibraryVariant};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Go module path of the leaves library.
pub const LEAVES_MODULE: &str = "github.com/zhongdai/leaves";

/// One compatibility scenario.
pub trait Case: Send + Sync {
    /// Identifier used in reports, e.g. `LGBinaryBreastCancer`.
    fn name(&self) -> &'static str;

    /// Library the reference program uses.
    fn library(&self) -> LibraryVariant;

    /// Library releases the case is run against.
    fn versions(&self) -> &'static [&'static str];

    /// Reference program. Runs with the workspace as working directory.
    fn python_code(&self) -> String;

    /// leaves program. Built and run with the workspace as working directory.
    fn go_code(&self) -> String;

    /// Check the outputs both programs left in `workspace`.
    fn compare(&self, workspace: &Workspace) -> Result<(), CaseError>;

    /// Base name of the generated source files and the built executable.
    fn file_stem(&self) -> String {
        self.name().to_lowercase()
    }
}

/// Settings shared by every case execution in a harness run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseOptions {
    /// Local leaves checkout to build against instead of a published release.
    pub leaves_path: Option<PathBuf>,
    /// Go toolchain binary.
    pub go_binary: PathBuf,
}

impl Default for CaseOptions {
    fn default() -> Self {
        Self {
            leaves_path: None,
            go_binary: PathBuf::from("go"),
        }
    }
}

/// `go.mod` pinning a module to a local source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoModule<'a> {
    pub module: &'a str,
    pub local_path: &'a Path,
}

impl<'a> GoModule<'a> {
    pub fn local(module: &'a str, local_path: &'a Path) -> Self {
        Self { module, local_path }
    }

    pub fn render(&self) -> String {
        format!(
            "module main\n\nrequire \"{module}\" v0.0.0\nreplace \"{module}\" v0.0.0 => \"{path}\"\n",
            module = self.module,
            path = self.local_path.display(),
        )
    }
}

/// Position of an execution in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseState {
    Unprepared,
    DirReady,
    ReferenceRun,
    PortRun,
    Compared,
    Done,
    Failed,
}

impl CaseState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CaseState::Done | CaseState::Failed)
    }
}

/// Result of running one case against one environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseVerdict {
    pub success: bool,
    /// Error text on failure, empty on success.
    pub reason: String,
}

impl CaseVerdict {
    pub fn passed() -> Self {
        Self {
            success: true,
            reason: String::new(),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            reason: reason.into(),
        }
    }
}

/// A single run of a case, bound to one environment.
pub struct CaseExecution<'a> {
    case: &'a dyn Case,
    env: &'a Environment,
    options: &'a CaseOptions,
    dirname: Option<PathBuf>,
    state: CaseState,
}

impl<'a> CaseExecution<'a> {
    /// `dirname` fixes the workspace; `None` uses an ephemeral directory.
    pub fn new(
        case: &'a dyn Case,
        env: &'a Environment,
        options: &'a CaseOptions,
        dirname: Option<&Path>,
    ) -> Self {
        Self {
            case,
            env,
            options,
            dirname: dirname.map(Path::to_path_buf),
            state: CaseState::Unprepared,
        }
    }

    pub fn state(&self) -> CaseState {
        self.state
    }

    /// Run the case to completion. Never fails; see [`CaseVerdict`].
    ///
    /// Running a finished execution again starts over from `Unprepared`.
    pub async fn run(&mut self) -> CaseVerdict {
        let span = info_span!("case", case = self.case.name(), env = %self.env.env_name);
        self.run_inner().instrument(span).await
    }

    async fn run_inner(&mut self) -> CaseVerdict {
        if self.state.is_terminal() {
            debug!(previous = ?self.state, "Rerunning finished case");
            self.state = CaseState::Unprepared;
        }
        info!("Run case: {} on {}", self.case.name(), self.env.env_name);

        let workspace = match Workspace::prepare(self.dirname.as_deref()) {
            Ok(ws) => ws,
            Err(source) => {
                let path = self.dirname.clone().unwrap_or_else(std::env::temp_dir);
                return self.fail(CaseError::Io { path, source });
            }
        };
        self.advance(CaseState::DirReady);
        info!(
            "Dir: {} (delete: {})",
            workspace.path().display(),
            workspace.is_ephemeral()
        );

        let verdict = match self.execute(&workspace).await {
            Ok(()) => {
                self.advance(CaseState::Done);
                CaseVerdict::passed()
            }
            Err(e) => self.fail(e),
        };

        workspace.release();
        verdict
    }

    async fn execute(&mut self, workspace: &Workspace) -> Result<(), CaseError> {
        self.run_python(workspace).await?;
        self.advance(CaseState::ReferenceRun);

        self.run_go(workspace).await?;
        self.advance(CaseState::PortRun);

        self.case.compare(workspace)?;
        self.advance(CaseState::Compared);
        Ok(())
    }

    async fn run_python(&self, workspace: &Workspace) -> Result<(), CaseError> {
        let script = format!("{}.py", self.case.file_stem());
        workspace.write(&script, self.case.python_code())?;

        info!("Run {}", script);
        let output = execute(
            &[self.env.python_path.as_os_str(), OsStr::new(&script)],
            Some(workspace.path()),
        )
        .await?;
        log_output(&output);
        Ok(())
    }

    async fn run_go(&self, workspace: &Workspace) -> Result<(), CaseError> {
        let stem = self.case.file_stem();
        let script = format!("{stem}.go");
        workspace.write(&script, self.case.go_code())?;

        if let Some(leaves_path) = &self.options.leaves_path {
            let module = GoModule::local(LEAVES_MODULE, leaves_path);
            debug!(path = ?leaves_path, "Pinning leaves to local checkout");
            workspace.write("go.mod", module.render())?;
        }

        info!("Build {}", script);
        let build = execute(
            &[
                self.options.go_binary.as_os_str(),
                OsStr::new("build"),
                OsStr::new(&script),
            ],
            Some(workspace.path()),
        )
        .await?;
        log_output(&build);

        let executable = workspace.file(&stem);
        if !executable.is_file() {
            return Err(CaseError::MissingExecutable(stem));
        }

        info!("Run {}", stem);
        let output = execute(&[executable.as_os_str()], Some(workspace.path())).await?;
        log_output(&output);
        Ok(())
    }

    fn advance(&mut self, next: CaseState) {
        debug!(from = ?self.state, to = ?next, "State transition");
        self.state = next;
    }

    fn fail(&mut self, err: CaseError) -> CaseVerdict {
        if err.is_mismatch() {
            warn!(state = ?self.state, error = %err, "Outputs disagree");
        } else {
            error!(state = ?self.state, error = %err, details = ?err, "Case failed");
        }
        self.advance(CaseState::Failed);
        CaseVerdict::failed(err.to_string())
    }
}

fn log_output(output: &ExecOutput) {
    debug!(
        command = %output.command,
        duration_ms = output.duration_ms,
        stdout = %output.stdout.trim_end(),
        stderr = %output.stderr.trim_end(),
        "Program finished"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_go_module_render() {
        let module = GoModule::local(LEAVES_MODULE, Path::new("/src/leaves"));
        assert_eq!(
            module.render(),
            "module main\n\n\
             require \"github.com/zhongdai/leaves\" v0.0.0\n\
             replace \"github.com/zhongdai/leaves\" v0.0.0 => \"/src/leaves\"\n"
        );
    }

    #[test]
    fn test_verdict_constructors() {
        assert_eq!(
            CaseVerdict::passed(),
            CaseVerdict {
                success: true,
                reason: String::new()
            }
        );
        let failed = CaseVerdict::failed("boom");
        assert!(!failed.success);
        assert_eq!(failed.reason, "boom");
    }

    #[test]
    fn test_terminal_states() {
        assert!(CaseState::Done.is_terminal());
        assert!(CaseState::Failed.is_terminal());
        assert!(!CaseState::Compared.is_terminal());
        assert!(!CaseState::Unprepared.is_terminal());
    }

    #[test]
    fn test_default_options() {
        let options = CaseOptions::default();
        assert!(options.leaves_path.is_none());
        assert_eq!(options.go_binary, PathBuf::from("go"));
    }
}
