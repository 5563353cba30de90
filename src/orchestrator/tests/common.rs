//! Common test utilities for orchestrator tests.

use mockall::{Sequence, predicate::eq};
use std::time::Instant;

use crate::{
    Result,
    build_output::MockBuildOutput,
    ci::CiEnvironment,
    exec::{MockCommandRunner, MockStopwatch},
    orchestrator::{BuildContext, LABEL, LocalTests, LocalTestsParams},
    repo::MockChangeReporter,
    targets::{BuildTarget, StaticClassifier, TargetClassifier},
};

pub use crate::LocalTestsError;

pub const POST_MERGE_INTEGRATION: &str =
    "gulp test --integration --nobuild --coverage";
pub const PR_INTEGRATION: &str =
    "gulp test --integration --nobuild --headless --coverage";
pub const UNIT: &str = "gulp test --unit --nobuild --headless --coverage";
pub const LOCAL_CHANGES: &str =
    "gulp test --nobuild --headless --local-changes";
pub const DEV_DASHBOARD: &str = "gulp test --dev_dashboard --nobuild";
pub const E2E: &str = "gulp e2e --nobuild";

/// All collaborators of [`LocalTests`] as mocks. Set expectations on the
/// fields, then call [`Mocks::run`].
pub struct Mocks {
    pub runner: MockCommandRunner,
    pub build_output: MockBuildOutput,
    pub reporter: MockChangeReporter,
    pub stopwatch: MockStopwatch,
    pub seq: Sequence,
}

impl Mocks {
    /// Mocks with the overall timer expected to start and stop exactly once.
    pub fn new() -> Self {
        let mut mocks = Self::without_timer();
        mocks
            .stopwatch
            .expect_start()
            .with(eq(LABEL), eq(LABEL))
            .times(1)
            .returning(|_, _| Instant::now());
        mocks
            .stopwatch
            .expect_stop()
            .withf(|name, label, _| name == LABEL && label == LABEL)
            .times(1)
            .return_const(());
        mocks
    }

    /// Mocks with no stopwatch expectations set.
    pub fn without_timer() -> Self {
        Self {
            runner: MockCommandRunner::new(),
            build_output: MockBuildOutput::new(),
            reporter: MockChangeReporter::new(),
            stopwatch: MockStopwatch::new(),
            seq: Sequence::new(),
        }
    }

    pub fn expect_change_summary(&mut self) {
        self.reporter
            .expect_print_change_summary()
            .with(eq(LABEL))
            .times(1)
            .in_sequence(&mut self.seq)
            .returning(|_| Ok(()));
    }

    pub fn expect_no_change_summary(&mut self) {
        self.reporter.expect_print_change_summary().times(0);
    }

    pub fn expect_download(&mut self) {
        self.build_output
            .expect_download()
            .with(eq(LABEL))
            .times(1)
            .in_sequence(&mut self.seq)
            .returning(|_| Ok(()));
    }

    pub fn expect_no_download(&mut self) {
        self.build_output.expect_download().times(0);
    }

    /// Expect `commands` to run successfully, in order.
    pub fn expect_commands(&mut self, commands: &[&'static str]) {
        for command in commands {
            self.runner
                .expect_run()
                .with(eq(*command))
                .times(1)
                .in_sequence(&mut self.seq)
                .returning(|_| Ok(()));
        }
    }

    /// Expect `command` to run and fail with `code`.
    pub fn expect_failing_command(&mut self, command: &'static str, code: i32) {
        self.runner
            .expect_run()
            .with(eq(command))
            .times(1)
            .in_sequence(&mut self.seq)
            .returning(move |c| Err(LocalTestsError::command_failed(c, code)));
    }

    pub fn expect_never_runs(&mut self, command: &'static str) {
        self.runner.expect_run().with(eq(command)).times(0);
    }

    pub fn run(&self, context: &BuildContext) -> Result<()> {
        let classifier = StaticClassifier::new(context.targets.clone());
        self.run_with(&classifier, context.is_pull_request)
    }

    /// Run with targets coming from `classifier`.
    pub fn run_with(
        &self,
        classifier: &dyn TargetClassifier,
        is_pull_request: bool,
    ) -> Result<()> {
        let ci = CiEnvironment {
            is_pull_request,
            build_number: None,
        };

        let local_tests = LocalTests::new(LocalTestsParams {
            task_runner: "gulp".into(),
            runner: &self.runner,
            build_output: &self.build_output,
            reporter: &self.reporter,
            stopwatch: &self.stopwatch,
        });

        local_tests.run(classifier, &ci)
    }
}

pub fn pull_request(targets: &[BuildTarget]) -> BuildContext {
    BuildContext {
        targets: targets.iter().copied().collect(),
        is_pull_request: true,
    }
}

pub fn post_merge(targets: &[BuildTarget]) -> BuildContext {
    BuildContext {
        targets: targets.iter().copied().collect(),
        is_pull_request: false,
    }
}
