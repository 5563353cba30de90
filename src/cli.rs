//! CLI argument parsing.
use clap::Parser;
use std::path::PathBuf;

use crate::{config::DEFAULT_CONFIG_FILE, targets::BuildTarget};

/// Runs the unit, integration and dev dashboard tests affected by the
/// current change.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    /// Path to the configuration file. Defaults are used when it is missing.
    pub config: PathBuf,

    #[arg(long, default_value = ".")]
    /// Path inside the git repository under test.
    pub repo: PathBuf,

    #[arg(long)]
    /// Treat the build as a pull request build (true) or a post-merge build
    /// (false) instead of reading the CI environment.
    pub pull_request: Option<bool>,

    #[arg(long = "target", value_name = "TARGET")]
    /// Build target to test instead of classifying changed files. Repeatable,
    /// e.g. --target RUNTIME --target UNIT_TEST.
    pub targets: Vec<BuildTarget>,

    #[arg(long)]
    /// Task runner used to launch test suites. Overrides the config file.
    pub task_runner: Option<String>,

    #[arg(long, default_value_t = false)]
    /// Log commands instead of running them.
    pub dry_run: bool,

    #[arg(long, default_value_t = false)]
    /// Enable debug logging.
    pub debug: bool,
}
