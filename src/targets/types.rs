use serde::Deserialize;
use std::{collections::BTreeSet, fmt};
use strum::{Display, EnumString};

/// Coarse category describing which part of the project a change touches.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildTarget {
    Runtime,
    BuildSystem,
    UnitTest,
    IntegrationTest,
    DevDashboard,
    Docs,
    FlagConfig,
    Validator,
    VisualDiff,
}

/// Targets that make running any local test suite worthwhile.
pub const RELEVANT_TARGETS: [BuildTarget; 5] = [
    BuildTarget::Runtime,
    BuildTarget::BuildSystem,
    BuildTarget::UnitTest,
    BuildTarget::IntegrationTest,
    BuildTarget::DevDashboard,
];

/// Read-only snapshot of the targets affected by the current change.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildTargets(BTreeSet<BuildTarget>);

impl BuildTargets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, target: BuildTarget) -> bool {
        self.0.contains(&target)
    }

    /// True when at least one of `targets` is present.
    pub fn has_any(&self, targets: &[BuildTarget]) -> bool {
        targets.iter().any(|t| self.has(*t))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuildTarget> {
        self.0.iter()
    }

    pub(crate) fn insert(&mut self, target: BuildTarget) {
        self.0.insert(target);
    }
}

impl FromIterator<BuildTarget> for BuildTargets {
    fn from_iter<I: IntoIterator<Item = BuildTarget>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for BuildTargets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "(none)");
        }

        let names = self
            .0
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<String>>();

        write!(f, "{}", names.join(", "))
    }
}
