//! Turns a set of changed files into a [`BuildTargets`] snapshot.
use log::*;
use regex::Regex;

#[cfg(test)]
use mockall::automock;

use crate::{
    Result,
    config::TargetRule,
    repo::Repository,
    targets::types::{BuildTarget, BuildTargets},
};

/// Source of the build targets affected by the current change.
#[cfg_attr(test, automock)]
pub trait TargetClassifier {
    /// Query the targets for the current change. Repeated calls return the
    /// same snapshot.
    fn determine_build_targets(&self) -> Result<BuildTargets>;
}

struct CompiledRule {
    target: BuildTarget,
    patterns: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl CompiledRule {
    fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(path))
            && !self.exclude.iter().any(|e| e.is_match(path))
    }
}

/// Ordered path rules. A file may match several rules; a file that matches
/// none of them is treated as runtime code.
pub struct TargetRules {
    rules: Vec<CompiledRule>,
}

impl TargetRules {
    pub fn new(rules: &[TargetRule]) -> Result<Self> {
        let mut compiled = vec![];

        for rule in rules {
            let patterns = rule
                .patterns
                .iter()
                .map(|p| Regex::new(p))
                .collect::<std::result::Result<Vec<Regex>, regex::Error>>()?;

            let exclude = rule
                .exclude
                .iter()
                .map(|p| Regex::new(p))
                .collect::<std::result::Result<Vec<Regex>, regex::Error>>()?;

            compiled.push(CompiledRule {
                target: rule.target,
                patterns,
                exclude,
            });
        }

        Ok(Self { rules: compiled })
    }

    /// Classify a single repository relative path.
    pub fn targets_for_file(&self, path: &str) -> Vec<BuildTarget> {
        let matched = self
            .rules
            .iter()
            .filter(|r| r.matches(path))
            .map(|r| r.target)
            .collect::<Vec<BuildTarget>>();

        if matched.is_empty() {
            return vec![BuildTarget::Runtime];
        }

        matched
    }

    pub fn classify<S: AsRef<str>>(&self, files: &[S]) -> BuildTargets {
        let mut targets = BuildTargets::new();

        for file in files {
            let file = file.as_ref();
            let file_targets = self.targets_for_file(file);
            debug!("{file} -> {file_targets:?}");
            for target in file_targets {
                targets.insert(target);
            }
        }

        targets
    }
}

/// Classifies the files changed on the current branch of a git repository.
pub struct GitClassifier<'a> {
    repo: &'a Repository,
    rules: TargetRules,
}

impl<'a> GitClassifier<'a> {
    pub fn new(repo: &'a Repository, rules: TargetRules) -> Self {
        Self { repo, rules }
    }
}

impl TargetClassifier for GitClassifier<'_> {
    fn determine_build_targets(&self) -> Result<BuildTargets> {
        let files = self.repo.changed_files()?;
        info!("found {} changed files", files.len());
        let targets = self.rules.classify(&files);
        info!("build targets for this change: {targets}");
        Ok(targets)
    }
}

/// Fixed targets, typically passed on the command line.
pub struct StaticClassifier {
    targets: BuildTargets,
}

impl StaticClassifier {
    pub fn new(targets: BuildTargets) -> Self {
        Self { targets }
    }
}

impl TargetClassifier for StaticClassifier {
    fn determine_build_targets(&self) -> Result<BuildTargets> {
        info!("using build targets from command line: {}", self.targets);
        Ok(self.targets.clone())
    }
}
