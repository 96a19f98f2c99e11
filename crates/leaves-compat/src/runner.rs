//! Runs cases across library versions and collects outcomes.

use crate::case::{Case, CaseExecution, CaseOptions};
use leaves_venv::{EnvError, Environment, EnvironmentManager};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Recorded result of one case against one environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Environment the case ran in.
    pub env: Environment,

    /// Case name.
    pub case: String,

    /// Whether both implementations agreed.
    pub is_success: bool,

    /// Failure reason (empty on success).
    pub reason: String,
}

/// Sequential case runner.
///
/// Outcomes accumulate across calls; running the same (case, version) twice
/// records two outcomes.
pub struct CaseRunner {
    envs: EnvironmentManager,
    options: CaseOptions,
    outcomes: Vec<Outcome>,
}

impl CaseRunner {
    pub fn new(envs: EnvironmentManager, options: CaseOptions) -> Self {
        Self {
            envs,
            options,
            outcomes: Vec::new(),
        }
    }

    /// Run `case` against every version it declares.
    ///
    /// Stops at the first environment that cannot be activated.
    pub async fn run(&mut self, case: &dyn Case, dirname: Option<&Path>) -> Result<(), EnvError> {
        for version in case.versions() {
            self.run_single(case, version, dirname).await?;
        }
        Ok(())
    }

    /// Run `case` against one `version`.
    ///
    /// Case failures are recorded as outcomes; only environment activation
    /// errors are returned, in which case nothing is recorded.
    pub async fn run_single(
        &mut self,
        case: &dyn Case,
        version: &str,
        dirname: Option<&Path>,
    ) -> Result<(), EnvError> {
        let env = self.envs.activate(case.library(), version).await?;

        let verdict = CaseExecution::new(case, &env, &self.options, dirname)
            .run()
            .await;

        info!(
            case = case.name(),
            env = %env.env_name,
            success = verdict.success,
            "Case finished"
        );

        self.outcomes.push(Outcome {
            env,
            case: case.name().to_string(),
            is_success: verdict.success,
            reason: verdict.reason,
        });
        Ok(())
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Number of outcomes that passed.
    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success).count()
    }

    /// Number of outcomes that failed.
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_success).count()
    }
}
