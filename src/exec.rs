//! Synchronous command execution and wall clock timing.

pub mod runner;
pub mod stopwatch;

pub use runner::{CommandRunner, ShellRunner};
pub use stopwatch::{LogStopwatch, Stopwatch, format_elapsed};

#[cfg(test)]
pub use runner::MockCommandRunner;
#[cfg(test)]
pub use stopwatch::MockStopwatch;
