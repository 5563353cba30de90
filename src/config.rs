//! Configuration loading and parsing for `local-tests.toml` files.
//!
//! Every field is optional; a missing file yields the defaults used by the
//! project's own CI.
use log::*;
use serde::Deserialize;
use std::{fs, path::Path};

use crate::{Result, targets::BuildTarget};

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "local-tests.toml";

/// Default task runner used to launch test suites.
pub const DEFAULT_TASK_RUNNER: &str = "gulp";

/// Default branch changes are compared against.
pub const DEFAULT_BASE_BRANCH: &str = "master";

/// Placeholder substituted with the CI build number in download commands.
pub const BUILD_NUMBER_PLACEHOLDER: &str = "$BUILD_NUMBER";

/// Maps repository paths onto a build target.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TargetRule {
    /// Target reported for matching files.
    pub target: BuildTarget,
    /// Regular expressions matched against repository relative paths.
    pub patterns: Vec<String>,
    /// Paths matching any of these expressions are skipped by this rule.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl TargetRule {
    fn new(target: BuildTarget, patterns: &[&str], exclude: &[&str]) -> Self {
        Self {
            target,
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            exclude: exclude.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Path rules describing the default repository layout.
pub fn default_target_rules() -> Vec<TargetRule> {
    vec![
        TargetRule::new(
            BuildTarget::BuildSystem,
            &[
                "^build-system/",
                "^gulpfile\\.js$",
                "^package\\.json$",
                "^yarn\\.lock$",
                "^babel\\.config\\.js$",
            ],
            &["^build-system/server/app-index/", "^build-system/global-configs/"],
        ),
        TargetRule::new(
            BuildTarget::DevDashboard,
            &["^build-system/server/app-index/"],
            &[],
        ),
        TargetRule::new(
            BuildTarget::UnitTest,
            &["^test/unit/", "^extensions/[^/]+/[^/]+/test/"],
            &["/test/integration/"],
        ),
        TargetRule::new(
            BuildTarget::IntegrationTest,
            &[
                "^test/integration/",
                "^extensions/[^/]+/[^/]+/test/integration/",
            ],
            &[],
        ),
        TargetRule::new(BuildTarget::Docs, &["\\.md$"], &[]),
        TargetRule::new(
            BuildTarget::FlagConfig,
            &["^build-system/global-configs/"],
            &[],
        ),
        TargetRule::new(BuildTarget::Validator, &["^validator/"], &[]),
        TargetRule::new(BuildTarget::VisualDiff, &["^test/visual-diff/"], &[]),
    ]
}

/// Commands that fetch and unpack the shared build output.
pub fn default_download_commands() -> Vec<String> {
    vec![
        format!(
            "gsutil cp gs://amp-travis-builds/amp_dist_{BUILD_NUMBER_PLACEHOLDER}.zip ."
        ),
        format!("unzip -o amp_dist_{BUILD_NUMBER_PLACEHOLDER}.zip"),
    ]
}

/// Root configuration structure for `local-tests.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Executable used to run the test suites (default: gulp).
    pub task_runner: String,
    /// Branch the current change is compared against (default: master).
    pub base_branch: String,
    /// Commands run in order to download shared build output.
    pub download_commands: Vec<String>,
    /// Path rules used to classify changed files. Replaces the defaults
    /// entirely when set.
    #[serde(rename = "target")]
    pub targets: Vec<TargetRule>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            task_runner: DEFAULT_TASK_RUNNER.into(),
            base_branch: DEFAULT_BASE_BRANCH.into(),
            download_commands: default_download_commands(),
            targets: default_target_rules(),
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, falling back to defaults when the file
    /// does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(
                "no configuration found at {}: using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        info!("loading configuration from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.task_runner.trim().is_empty() {
            return Err(crate::LocalTestsError::invalid_config(
                "task_runner must not be empty",
            ));
        }

        if self.base_branch.trim().is_empty() {
            return Err(crate::LocalTestsError::invalid_config(
                "base_branch must not be empty",
            ));
        }

        if let Some(rule) = self.targets.iter().find(|r| r.patterns.is_empty())
        {
            return Err(crate::LocalTestsError::invalid_config(format!(
                "target rule for {} has no patterns",
                rule.target
            )));
        }

        Ok(())
    }
}
