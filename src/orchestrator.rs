//! Runs the local test suites affected by the change under test.
//!
//! Post-merge builds run every suite. Pull request builds print what changed,
//! bail out early when nothing relevant changed, and otherwise run only the
//! suites implicated by the build targets. The first failing command aborts
//! the rest of the sequence.
use log::*;

use crate::{
    Result,
    build_output::BuildOutput,
    ci::CiEnvironment,
    exec::{CommandRunner, Stopwatch},
    repo::ChangeReporter,
    targets::{BuildTargets, TargetClassifier},
};

pub mod plan;

pub use plan::{StepKind, TestPlan, TestStep};

/// Label used for timing and log output.
pub const LABEL: &str = "local-tests";

/// Message logged when a pull request does not touch anything tested here.
pub const SKIP_MESSAGE: &str = "Skipping unit and integration tests because this commit does not affect the runtime, build system, unit test files, integration test files, or the dev dashboard.";

/// Inputs describing the build being tested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    pub targets: BuildTargets,
    pub is_pull_request: bool,
}

impl BuildContext {
    /// Query build targets from `classifier`. Post-merge builds never look at
    /// the targets, so a classification failure there only costs the log
    /// line and leaves the set empty.
    pub fn determine(
        classifier: &dyn TargetClassifier,
        is_pull_request: bool,
    ) -> Result<Self> {
        let targets = match classifier.determine_build_targets() {
            Ok(targets) => targets,
            Err(err) if !is_pull_request => {
                warn!("{LABEL}: unable to determine build targets: {err}");
                BuildTargets::new()
            }
            Err(err) => return Err(err),
        };

        Ok(Self {
            targets,
            is_pull_request,
        })
    }
}

/// Collaborators used by [`LocalTests`].
pub struct LocalTestsParams<'a> {
    /// Executable used to run the test suites.
    pub task_runner: String,
    pub runner: &'a dyn CommandRunner,
    pub build_output: &'a dyn BuildOutput,
    pub reporter: &'a dyn ChangeReporter,
    pub stopwatch: &'a dyn Stopwatch,
}

pub struct LocalTests<'a> {
    task_runner: String,
    runner: &'a dyn CommandRunner,
    build_output: &'a dyn BuildOutput,
    reporter: &'a dyn ChangeReporter,
    stopwatch: &'a dyn Stopwatch,
}

impl<'a> LocalTests<'a> {
    pub fn new(params: LocalTestsParams<'a>) -> Self {
        Self {
            task_runner: params.task_runner,
            runner: params.runner,
            build_output: params.build_output,
            reporter: params.reporter,
            stopwatch: params.stopwatch,
        }
    }

    /// Determine the build targets, then plan and run the test suites. The
    /// overall timer covers classification and is stopped exactly once,
    /// whether the run succeeds, skips, or fails.
    pub fn run(
        &self,
        classifier: &dyn TargetClassifier,
        ci: &CiEnvironment,
    ) -> Result<()> {
        let started = self.stopwatch.start(LABEL, LABEL);
        let result = BuildContext::determine(classifier, ci.is_pull_request)
            .and_then(|context| self.run_tests(&context));
        self.stopwatch.stop(LABEL, LABEL, started);
        result
    }

    fn run_tests(&self, context: &BuildContext) -> Result<()> {
        info!(
            "{LABEL}: pull request build: {}, build targets: {}",
            context.is_pull_request, context.targets
        );

        if context.is_pull_request
            && let Err(err) = self.reporter.print_change_summary(LABEL)
        {
            warn!("{LABEL}: unable to print change summary: {err}");
        }

        let plan = TestPlan::new(
            &context.targets,
            context.is_pull_request,
            &self.task_runner,
        );

        let steps = match plan {
            TestPlan::Skip => {
                info!("{LABEL}: {SKIP_MESSAGE}");
                return Ok(());
            }
            TestPlan::Run(steps) => steps,
        };

        self.build_output.download(LABEL)?;

        for step in steps.iter() {
            if !step.enabled {
                debug!("{LABEL}: not running disabled step: {step}");
                continue;
            }

            self.runner.run(&step.command)?;
        }

        Ok(())
    }
}
