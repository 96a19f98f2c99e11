//! Virtual environment provisioning
//!
//! One environment per (library, version) pair lives under a shared root
//! directory. With reuse enabled an existing environment directory is trusted
//! as-is, which keeps repeated harness runs from reinstalling every release.

use crate::error::EnvError;
use crate::exec::execute;
use crate::library::LibraryVariant;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A provisioned Python environment for one library release.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Environment {
    /// Root directory of the virtual environment
    pub env_dir: PathBuf,
    /// Interpreter used to run reference programs
    pub python_path: PathBuf,
    /// Installer used to provision packages
    pub pip_path: PathBuf,
    /// `<library>_<version>`, unique under the environment root
    pub env_name: String,
    /// Library this environment was provisioned for
    pub library: LibraryVariant,
    /// Installed library release
    pub version: String,
}

impl Environment {
    /// Describe the environment for `library`/`version` under `root`.
    ///
    /// Pure path arithmetic; nothing on disk is touched.
    pub fn describe(root: &Path, library: LibraryVariant, version: &str) -> Self {
        let env_name = env_name(library, version);
        let env_dir = root.join(&env_name);
        Environment {
            python_path: env_dir.join("bin").join("python"),
            pip_path: env_dir.join("bin").join("pip"),
            env_dir,
            env_name,
            library,
            version: version.to_string(),
        }
    }
}

/// Deterministic environment name for a (library, version) pair.
pub fn env_name(library: LibraryVariant, version: &str) -> String {
    format!("{}_{}", library.lower_name(), version)
}

/// Creates or reuses virtual environments under a root directory.
#[derive(Debug, Clone)]
pub struct EnvironmentManager {
    root_dir: PathBuf,
    reuse_envs: bool,
    interpreter: PathBuf,
}

impl EnvironmentManager {
    /// Manager rooted at `root_dir` (made absolute against the current directory).
    pub fn new(root_dir: impl AsRef<Path>, reuse_envs: bool) -> Result<Self> {
        Ok(Self {
            root_dir: std::path::absolute(root_dir.as_ref())?,
            reuse_envs,
            interpreter: PathBuf::from("python3"),
        })
    }

    /// Use `interpreter` to create new environments instead of `python3`.
    pub fn with_interpreter(mut self, interpreter: impl Into<PathBuf>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn reuse_envs(&self) -> bool {
        self.reuse_envs
    }

    /// Return a ready environment for `library` at `version`.
    ///
    /// Fails with [`EnvError::NotADirectory`] when the environment path is
    /// occupied by a non-directory. Installation failures are returned as-is.
    pub async fn activate(&self, library: LibraryVariant, version: &str) -> Result<Environment> {
        info!(library = %library, version, "Activating environment");
        let env = Environment::describe(&self.root_dir, library, version);

        if self.exists(&env)? && self.reuse_envs {
            info!(env = %env.env_name, "Using existing environment");
            return Ok(env);
        }

        info!(env = %env.env_name, path = ?env.env_dir, "Creating new environment");
        let venv_cmd = [
            self.interpreter.as_os_str(),
            OsStr::new("-m"),
            OsStr::new("venv"),
            OsStr::new("--clear"),
            OsStr::new("--symlinks"),
            env.env_dir.as_os_str(),
        ];
        execute(&venv_cmd, None).await?;

        for package in library.install_plan(version) {
            info!(env = %env.env_name, package = %package, "Installing");
            execute(
                &[
                    env.pip_path.as_os_str(),
                    OsStr::new("install"),
                    OsStr::new(&package),
                ],
                None,
            )
            .await?;
        }

        Ok(env)
    }

    /// Environments already provisioned under the root, sorted by library then name.
    ///
    /// Directories whose names do not parse as `<library>_<version>` are skipped.
    pub fn list_existing(&self) -> Result<Vec<Environment>> {
        if !self.root_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut envs = Vec::new();
        for entry in std::fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some((lib, version)) = name.split_once('_') else {
                debug!(name = %name, "Skipping unrecognised directory");
                continue;
            };
            match LibraryVariant::from_lower_name(lib) {
                Some(library) if !version.is_empty() => {
                    envs.push(Environment::describe(&self.root_dir, library, version));
                }
                _ => debug!(name = %name, "Skipping unrecognised directory"),
            }
        }

        envs.sort_by(|a, b| (a.library, &a.env_name).cmp(&(b.library, &b.env_name)));
        Ok(envs)
    }

    fn exists(&self, env: &Environment) -> Result<bool> {
        match std::fs::metadata(&env.env_dir) {
            Ok(meta) if meta.is_dir() => Ok(true),
            Ok(_) => Err(EnvError::NotADirectory(env.env_dir.clone())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
