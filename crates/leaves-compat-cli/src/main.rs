//! leaves-compat - compatibility harness CLI
//!
//! Runs the registered compatibility cases against every declared release of
//! the Python library they port, and renders the markdown pass/fail grid.
//!
//! ## Commands
//!
//! - `run`: Run cases and write the report
//! - `list`: Show registered cases and their versions
//! - `envs`: Show provisioned virtual environments

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use leaves_compat::{
    cases, init_tracing, is_go_available, is_python_available, Case, CaseRunner, HarnessConfig,
    ReportFormatter,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};

#[derive(Parser)]
#[command(name = "leaves-compat")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compatibility harness for the leaves model port", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(flatten)]
    harness: HarnessArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct HarnessArgs {
    /// Directory holding the virtual environments
    #[arg(long, env = "LEAVES_COMPAT_ENV_ROOT", default_value = ".envs", global = true)]
    env_root: PathBuf,

    /// Reuse existing environments instead of recreating them
    #[arg(long, env = "LEAVES_COMPAT_REUSE_ENVS", global = true)]
    reuse_envs: bool,

    /// Fixed working directory for cases (kept after the run)
    #[arg(long, env = "LEAVES_COMPAT_DIR", global = true)]
    workdir: Option<PathBuf>,

    /// Local leaves checkout to build against
    #[arg(long, env = "LEAVES_PATH", global = true)]
    leaves_path: Option<PathBuf>,

    /// Python interpreter used to create environments
    #[arg(long, env = "LEAVES_COMPAT_PYTHON", default_value = "python3", global = true)]
    python: PathBuf,

    /// Go toolchain binary
    #[arg(long, env = "LEAVES_COMPAT_GO", default_value = "go", global = true)]
    go: PathBuf,
}

impl From<HarnessArgs> for HarnessConfig {
    fn from(args: HarnessArgs) -> Self {
        Self {
            env_root: args.env_root,
            reuse_envs: args.reuse_envs,
            workdir: args.workdir,
            leaves_path: args.leaves_path,
            python: args.python,
            go: args.go,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run compatibility cases and render the report
    Run {
        /// Case to run (repeatable, default: all registered cases)
        #[arg(short, long = "case")]
        cases: Vec<String>,

        /// Run only this library version instead of every declared one
        #[arg(long)]
        version: Option<String>,

        /// Write the markdown report here instead of stdout
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Also export raw outcomes as JSON
        #[arg(long)]
        outcomes_json: Option<PathBuf>,
    },

    /// List registered cases
    List,

    /// List provisioned environments
    Envs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    let config = HarnessConfig::from(cli.harness);

    match cli.command {
        Commands::Run {
            cases,
            version,
            report,
            outcomes_json,
        } => {
            cmd_run(
                &config,
                &cases,
                version.as_deref(),
                report.as_deref(),
                outcomes_json.as_deref(),
            )
            .await
        }
        Commands::List => cmd_list(),
        Commands::Envs => cmd_envs(&config),
    }
}

/// Resolve case names against the registry; no names selects every case.
///
/// With `version` and no explicit names, only cases declaring that release
/// are selected. Named cases run any requested release.
fn select_cases(names: &[String], version: Option<&str>) -> Result<Vec<Box<dyn Case>>> {
    if !names.is_empty() {
        return names
            .iter()
            .map(|name| cases::find(name).with_context(|| format!("Unknown case: {}", name)))
            .collect();
    }

    let mut selected = cases::registry();
    if let Some(version) = version {
        selected.retain(|case| case.versions().iter().any(|v| *v == version));
        if selected.is_empty() {
            bail!("No registered case declares version {}", version);
        }
    }
    Ok(selected)
}

/// Fail fast when the toolchains a run needs cannot be started.
fn check_toolchains(config: &HarnessConfig) -> Result<()> {
    if !is_go_available(&config.go) {
        bail!("Go toolchain not found: {}", config.go.display());
    }
    if !is_python_available(&config.python) {
        if !config.reuse_envs {
            bail!("Python interpreter not found: {}", config.python.display());
        }
        warn!(
            python = ?config.python,
            "Python interpreter not found, only existing environments can be used"
        );
    }
    Ok(())
}

async fn cmd_run(
    config: &HarnessConfig,
    case_names: &[String],
    version: Option<&str>,
    report_path: Option<&Path>,
    outcomes_path: Option<&Path>,
) -> Result<()> {
    let selected = select_cases(case_names, version)?;
    check_toolchains(config)?;
    let mut runner = config
        .runner()
        .context("Failed to set up the environment manager")?;

    info!(
        cases = selected.len(),
        env_root = ?config.env_root,
        reuse = config.reuse_envs,
        "Starting compatibility run"
    );

    // An environment failure stops the run, but what ran so far is still reported.
    let mut fatal = None;
    for case in &selected {
        let dirname = config.workdir.as_deref();
        let result = match version {
            Some(version) => runner.run_single(case.as_ref(), version, dirname).await,
            None => runner.run(case.as_ref(), dirname).await,
        };
        if let Err(e) = result {
            fatal = Some(
                anyhow::Error::new(e)
                    .context(format!("Failed to prepare environment for {}", case.name())),
            );
            break;
        }
    }

    let report = ReportFormatter::new(runner.outcomes()).report();
    match report_path {
        Some(path) => {
            std::fs::write(path, &report)
                .with_context(|| format!("Failed to write report to {:?}", path))?;
            info!(path = ?path, "Report written");
        }
        None => print!("{}", report),
    }

    if let Some(path) = outcomes_path {
        let json = serde_json::to_string_pretty(runner.outcomes())?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write outcomes to {:?}", path))?;
        info!(path = ?path, "Outcomes exported");
    }

    print_summary(&runner);

    if let Some(err) = fatal {
        return Err(err);
    }
    let failed = runner.failed_count();
    if failed > 0 {
        bail!("{} of {} case runs failed", failed, runner.outcomes().len());
    }
    Ok(())
}

/// Pass/fail lines go to stderr so a report on stdout stays clean.
fn print_summary(runner: &CaseRunner) {
    let outcomes = runner.outcomes();
    let passed = runner.passed_count();
    eprintln!();
    eprintln!(
        "Status: {}",
        if passed == outcomes.len() {
            "✓ PASSED"
        } else {
            "✗ FAILED"
        }
    );
    eprintln!("Passed: {}/{}", passed, outcomes.len());
    eprintln!();

    for outcome in outcomes {
        let status = if outcome.is_success { "✓" } else { "✗" };
        eprintln!("  {} {} on {}", status, outcome.case, outcome.env.env_name);
        if !outcome.is_success {
            eprintln!("      {}", outcome.reason);
        }
    }
}

fn cmd_list() -> Result<()> {
    for case in cases::registry() {
        println!(
            "{} ({}): {}",
            case.name(),
            case.library(),
            case.versions().join(", ")
        );
    }
    Ok(())
}

fn cmd_envs(config: &HarnessConfig) -> Result<()> {
    let manager = config.environment_manager()?;
    let envs = manager
        .list_existing()
        .with_context(|| format!("Failed to scan {:?}", manager.root_dir()))?;

    let python = is_python_available(&config.python);
    println!(
        "Python ({}): {}",
        config.python.display(),
        if python { "yes" } else { "no" }
    );
    let go = is_go_available(&config.go);
    println!(
        "Go ({}): {}",
        config.go.display(),
        if go { "yes" } else { "no" }
    );
    println!();

    if envs.is_empty() {
        println!("No environments under {}", manager.root_dir().display());
        return Ok(());
    }

    for env in envs {
        println!("{:<24} {}", env.env_name, env.env_dir.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::os::unix::fs::PermissionsExt;

    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_accepts_repeated_cases() {
        let cli = Cli::try_parse_from([
            "leaves-compat",
            "run",
            "--case",
            "LGBinaryBreastCancer",
            "-c",
            "XGBinaryBreastCancer",
            "--version",
            "2.3.0",
        ])
        .unwrap();

        match cli.command {
            Commands::Run { cases, version, .. } => {
                assert_eq!(cases, vec!["LGBinaryBreastCancer", "XGBinaryBreastCancer"]);
                assert_eq!(version.as_deref(), Some("2.3.0"));
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_harness_flags_map_into_config() {
        let cli = Cli::try_parse_from([
            "leaves-compat",
            "envs",
            "--env-root",
            "/tmp/envs",
            "--reuse-envs",
            "--leaves-path",
            "../leaves",
        ])
        .unwrap();

        let config = HarnessConfig::from(cli.harness);
        assert_eq!(config.env_root, PathBuf::from("/tmp/envs"));
        assert!(config.reuse_envs);
        assert_eq!(config.leaves_path, Some(PathBuf::from("../leaves")));
    }

    #[test]
    fn test_select_cases_defaults_to_registry() {
        let selected = select_cases(&[], None).unwrap();
        assert_eq!(selected.len(), cases::registry().len());
    }

    #[test]
    fn test_select_cases_by_name() {
        let selected = select_cases(&["lgmulticlassiris".to_string()], None).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name(), "LGMulticlassIris");
    }

    #[test]
    fn test_select_unknown_case_fails() {
        let err = select_cases(&["Nope".to_string()], None).err().unwrap();
        assert!(err.to_string().contains("Unknown case: Nope"));
    }

    #[test]
    fn test_version_without_cases_keeps_declaring_cases_only() {
        let selected = select_cases(&[], Some("2.3.0")).unwrap();
        let names: Vec<&str> = selected.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["LGBinaryBreastCancer", "LGMulticlassIris"]);

        let err = select_cases(&[], Some("99.0")).err().unwrap();
        assert!(err.to_string().contains("No registered case declares version 99.0"));
    }

    #[test]
    fn test_named_case_runs_any_version() {
        let selected = select_cases(&["XGBinaryBreastCancer".to_string()], Some("2.3.0")).unwrap();
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn test_missing_go_fails_preflight() {
        let config = HarnessConfig {
            go: PathBuf::from("/nonexistent/go"),
            ..HarnessConfig::default()
        };
        let err = check_toolchains(&config).unwrap_err();
        assert!(err.to_string().contains("Go toolchain not found"));
    }

    #[test]
    fn test_missing_python_allowed_when_reusing() {
        let tools = tempfile::tempdir().unwrap();
        let go = write_script(tools.path(), "go", "#!/bin/sh\nexit 0\n");
        let mut config = HarnessConfig {
            go,
            python: PathBuf::from("/nonexistent/python3"),
            reuse_envs: true,
            ..HarnessConfig::default()
        };
        assert!(check_toolchains(&config).is_ok());

        config.reuse_envs = false;
        let err = check_toolchains(&config).unwrap_err();
        assert!(err.to_string().contains("Python interpreter not found"));
    }

    #[tokio::test]
    async fn test_environment_failure_still_writes_report() {
        let temp_dir = tempfile::tempdir().unwrap();
        let envs = temp_dir.path().join("envs");
        std::fs::create_dir_all(&envs).unwrap();
        std::fs::write(envs.join("lightgbm_2.3.0"), b"not a venv").unwrap();
        let go = write_script(temp_dir.path(), "go", "#!/bin/sh\nexit 0\n");
        let report = temp_dir.path().join("report.md");

        let config = HarnessConfig {
            env_root: envs,
            reuse_envs: true,
            python: PathBuf::from("/nonexistent/python3"),
            go,
            ..HarnessConfig::default()
        };
        let err = cmd_run(
            &config,
            &["LGBinaryBreastCancer".to_string()],
            Some("2.3.0"),
            Some(&report),
            None,
        )
        .await
        .unwrap_err();

        assert!(err
            .to_string()
            .contains("Failed to prepare environment for LGBinaryBreastCancer"));
        let text = std::fs::read_to_string(&report).unwrap();
        assert!(text.contains("This file is autogenerated"));
    }

    #[test]
    fn test_cmd_envs_on_missing_root() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = HarnessConfig {
            env_root: temp_dir.path().join("absent"),
            ..HarnessConfig::default()
        };
        assert!(cmd_envs(&config).is_ok());
    }
}
