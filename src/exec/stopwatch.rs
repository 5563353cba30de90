use log::*;
use std::time::{Duration, Instant};

#[cfg(test)]
use mockall::automock;

/// Measures and reports elapsed wall time for a named unit of work.
#[cfg_attr(test, automock)]
pub trait Stopwatch {
    /// Report that `name` started and return its start time.
    fn start(&self, name: &str, label: &str) -> Instant;
    /// Report the time `name` took since `started`.
    fn stop(&self, name: &str, label: &str, started: Instant);
}

/// Formats a duration as `<minutes>m <seconds>s`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!("{}m {}s", total / 60, total % 60)
}

/// Stopwatch that reports through the logger.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogStopwatch;

impl Stopwatch for LogStopwatch {
    fn start(&self, name: &str, label: &str) -> Instant {
        info!("{label}: Running {name}...");
        Instant::now()
    }

    fn stop(&self, name: &str, label: &str, started: Instant) {
        info!(
            "{label}: Done running {name} Total time: {}",
            format_elapsed(started.elapsed())
        );
    }
}
