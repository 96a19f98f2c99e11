//! Harness configuration.

use crate::case::CaseOptions;
use crate::runner::CaseRunner;
use leaves_venv::{EnvironmentManager, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything a harness run needs to know about the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Directory holding one virtual environment per (library, version).
    pub env_root: PathBuf,
    /// Trust existing environment directories instead of recreating them.
    pub reuse_envs: bool,
    /// Fixed workspace for every case; kept after the run.
    pub workdir: Option<PathBuf>,
    /// Local leaves checkout to build against.
    pub leaves_path: Option<PathBuf>,
    /// Interpreter used to create environments.
    pub python: PathBuf,
    /// Go toolchain binary.
    pub go: PathBuf,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            env_root: PathBuf::from(".envs"),
            reuse_envs: false,
            workdir: None,
            leaves_path: None,
            python: PathBuf::from("python3"),
            go: PathBuf::from("go"),
        }
    }
}

impl HarnessConfig {
    pub fn environment_manager(&self) -> Result<EnvironmentManager> {
        Ok(EnvironmentManager::new(&self.env_root, self.reuse_envs)?
            .with_interpreter(&self.python))
    }

    /// Case options; the leaves path is made absolute because `go.mod` is
    /// written into a workspace elsewhere on disk.
    pub fn case_options(&self) -> Result<CaseOptions> {
        let leaves_path = match &self.leaves_path {
            Some(path) => Some(std::path::absolute(path)?),
            None => None,
        };
        Ok(CaseOptions {
            leaves_path,
            go_binary: self.go.clone(),
        })
    }

    pub fn runner(&self) -> Result<CaseRunner> {
        Ok(CaseRunner::new(
            self.environment_manager()?,
            self.case_options()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::default();
        assert_eq!(config.python, PathBuf::from("python3"));
        assert_eq!(config.go, PathBuf::from("go"));
        assert!(!config.reuse_envs);
        assert!(config.workdir.is_none());
    }

    #[test]
    fn test_case_options_absolutize_leaves_path() {
        let config = HarnessConfig {
            leaves_path: Some(PathBuf::from("../leaves")),
            go: PathBuf::from("/usr/local/go/bin/go"),
            ..HarnessConfig::default()
        };
        let options = config.case_options().unwrap();
        let path = options.leaves_path.unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("leaves"));
        assert_eq!(options.go_binary, PathBuf::from("/usr/local/go/bin/go"));
    }

    #[test]
    fn test_environment_manager_uses_config() {
        let config = HarnessConfig {
            env_root: PathBuf::from("/tmp/envs"),
            reuse_envs: true,
            ..HarnessConfig::default()
        };
        let manager = config.environment_manager().unwrap();
        assert_eq!(manager.root_dir(), std::path::Path::new("/tmp/envs"));
        assert!(manager.reuse_envs());
    }
}
