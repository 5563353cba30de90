pub mod build_output;
pub mod ci;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod exec;
pub mod orchestrator;
pub mod repo;
pub mod targets;

pub use error::{LocalTestsError, Result};
pub use orchestrator::{BuildContext, LocalTests, LocalTestsParams};
