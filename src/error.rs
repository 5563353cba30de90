//! Custom error types for local-tests.

use thiserror::Error;

/// Exit code reported for failures that did not come from a test command.
pub const GENERIC_FAILURE_CODE: i32 = 1;

/// Main error type for local-tests operations.
#[derive(Error, Debug)]
pub enum LocalTestsError {
    // Command execution errors
    #[error("Command failed with exit code {code}: {command}")]
    CommandFailed { command: String, code: i32 },

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Git errors
    #[error("Git operation failed: {0}")]
    GitError(#[from] git2::Error),

    // Parsing errors
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("Regular expression error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] log::SetLoggerError),

    // Generic wrapper for other errors
    #[error(transparent)]
    Other(#[from] color_eyre::Report),
}

/// Result type alias using LocalTestsError
pub type Result<T> = std::result::Result<T, LocalTestsError>;

impl LocalTestsError {
    /// Create a command failure error
    pub fn command_failed(command: impl Into<String>, code: i32) -> Self {
        Self::CommandFailed {
            command: command.into(),
            code,
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Process exit code that represents this error. A failed command hands
    /// its own exit code through so CI sees exactly what the task runner
    /// returned.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandFailed { code, .. } if *code != 0 => *code,
            _ => GENERIC_FAILURE_CODE,
        }
    }
}

// Implement From for std::io::Error - wraps in Other variant for generic I/O errors
impl From<std::io::Error> for LocalTestsError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(color_eyre::Report::from(err))
    }
}
