//! Detection of the CI context the build runs in.
use log::*;
use std::env;

/// Travis event type, `pull_request` for builds of proposed changes.
pub const TRAVIS_EVENT_TYPE: &str = "TRAVIS_EVENT_TYPE";
/// Travis build number, used to name shared build artifacts.
pub const TRAVIS_BUILD_NUMBER: &str = "TRAVIS_BUILD_NUMBER";
/// GitHub Actions event name.
pub const GITHUB_EVENT_NAME: &str = "GITHUB_EVENT_NAME";
/// GitHub Actions run number.
pub const GITHUB_RUN_NUMBER: &str = "GITHUB_RUN_NUMBER";

const PULL_REQUEST_EVENTS: [&str; 2] = ["pull_request", "pull_request_target"];

/// Snapshot of the CI environment taken once at startup.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CiEnvironment {
    /// True when building a proposed change that is under review.
    pub is_pull_request: bool,
    /// Build number of the current CI run, if any.
    pub build_number: Option<String>,
}

impl CiEnvironment {
    /// Read the CI context from process environment variables.
    pub fn detect() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read the CI context through `lookup`. Travis variables take precedence
    /// over GitHub Actions ones.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_pull_request = match lookup(TRAVIS_EVENT_TYPE) {
            Some(event) => event == "pull_request",
            None => lookup(GITHUB_EVENT_NAME)
                .map(|event| PULL_REQUEST_EVENTS.contains(&event.as_str()))
                .unwrap_or(false),
        };

        let build_number = lookup(TRAVIS_BUILD_NUMBER)
            .or_else(|| lookup(GITHUB_RUN_NUMBER))
            .filter(|n| !n.is_empty());

        let ci = Self {
            is_pull_request,
            build_number,
        };

        debug!("detected ci environment: {ci:?}");

        ci
    }

    /// Force pull request detection to `is_pull_request`.
    pub fn with_pull_request(self, is_pull_request: bool) -> Self {
        Self {
            is_pull_request,
            ..self
        }
    }
}
