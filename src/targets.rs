//! Build target classification.
//!
//! Maps the files a change touches onto coarse build targets (runtime, build
//! system, unit tests, ...) so CI only runs the suites a change can affect.

pub mod classifier;
pub mod types;

pub use classifier::{
    GitClassifier, StaticClassifier, TargetClassifier, TargetRules,
};
pub use types::{BuildTarget, BuildTargets, RELEVANT_TARGETS};

#[cfg(test)]
pub use classifier::MockTargetClassifier;
