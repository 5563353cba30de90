//! Decides which test suites a build runs, and in which order.
use std::fmt;

use crate::targets::{BuildTarget, BuildTargets, RELEVANT_TARGETS};

/// Targets that call for the unit test passes.
pub const UNIT_TEST_TARGETS: [BuildTarget; 3] = [
    BuildTarget::Runtime,
    BuildTarget::BuildSystem,
    BuildTarget::UnitTest,
];

/// Targets that call for the integration test pass.
pub const INTEGRATION_TEST_TARGETS: [BuildTarget; 3] = [
    BuildTarget::Runtime,
    BuildTarget::BuildSystem,
    BuildTarget::IntegrationTest,
];

/// Kind of test suite a step runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Unit tests restricted to locally changed files.
    LocalChanges,
    Integration,
    Unit,
    DevDashboard,
    /// End-to-end tests. Disabled until the suite is stable.
    E2e,
}

/// A single task runner invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestStep {
    pub kind: StepKind,
    pub command: String,
    /// Disabled steps keep their place in the sequence but never run.
    pub enabled: bool,
}

impl TestStep {
    fn new(kind: StepKind, command: String) -> Self {
        Self {
            kind,
            command,
            enabled: true,
        }
    }

    fn disabled(kind: StepKind, command: String) -> Self {
        Self {
            kind,
            command,
            enabled: false,
        }
    }
}

impl fmt::Display for TestStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.enabled {
            write!(f, "{}", self.command)
        } else {
            write!(f, "{} (disabled)", self.command)
        }
    }
}

/// Outcome of planning a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestPlan {
    /// Nothing relevant changed: no download, no tests.
    Skip,
    /// Download the shared build output once, then run `steps` in order.
    Run(Vec<TestStep>),
}

impl TestPlan {
    pub fn new(
        targets: &BuildTargets,
        is_pull_request: bool,
        task_runner: &str,
    ) -> Self {
        if is_pull_request {
            Self::pull_request(targets, task_runner)
        } else {
            Self::post_merge(task_runner)
        }
    }

    /// Post-merge builds run every suite regardless of what changed.
    fn post_merge(task_runner: &str) -> Self {
        Self::Run(vec![
            TestStep::new(
                StepKind::Integration,
                format!("{task_runner} test --integration --nobuild --coverage"),
            ),
            TestStep::new(
                StepKind::Unit,
                format!(
                    "{task_runner} test --unit --nobuild --headless --coverage"
                ),
            ),
            TestStep::new(
                StepKind::DevDashboard,
                format!("{task_runner} test --dev_dashboard --nobuild"),
            ),
            TestStep::disabled(
                StepKind::E2e,
                format!("{task_runner} e2e --nobuild"),
            ),
        ])
    }

    fn pull_request(targets: &BuildTargets, task_runner: &str) -> Self {
        if !targets.has_any(&RELEVANT_TARGETS) {
            return Self::Skip;
        }

        let mut steps = vec![];

        if targets.has_any(&UNIT_TEST_TARGETS) {
            steps.push(TestStep::new(
                StepKind::LocalChanges,
                format!("{task_runner} test --nobuild --headless --local-changes"),
            ));
        }

        if targets.has_any(&INTEGRATION_TEST_TARGETS) {
            steps.push(TestStep::new(
                StepKind::Integration,
                format!(
                    "{task_runner} test --integration --nobuild --headless --coverage"
                ),
            ));
        }

        // Checked again on purpose: the changed-files pass above and the full
        // unit suite are two separate runs.
        if targets.has_any(&UNIT_TEST_TARGETS) {
            steps.push(TestStep::new(
                StepKind::Unit,
                format!(
                    "{task_runner} test --unit --nobuild --headless --coverage"
                ),
            ));
            steps.push(TestStep::disabled(
                StepKind::E2e,
                format!("{task_runner} e2e --nobuild"),
            ));
        }

        if targets.has(BuildTarget::DevDashboard) {
            steps.push(TestStep::new(
                StepKind::DevDashboard,
                format!("{task_runner} test --dev_dashboard --nobuild"),
            ));
        }

        Self::Run(steps)
    }

    /// Steps that actually execute, in order.
    pub fn enabled_steps(&self) -> Vec<&TestStep> {
        match self {
            Self::Skip => vec![],
            Self::Run(steps) => steps.iter().filter(|s| s.enabled).collect(),
        }
    }
}
