//! CLI-specific error types and exit code mapping

use cvelint_core::error::CvelintError;
use cvelint_linter::LinterError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The lint run finished but some files could not be processed.
    #[error("lint failed for {failed} file(s)")]
    LintFailures {
        /// Number of files that failed
        failed: usize,
    },

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from cvelint-core.
    #[error("{0}")]
    Core(#[from] CvelintError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                              |
    /// |------|--------------------------------------|
    /// | 0    | Success                              |
    /// | 1    | General / command error              |
    /// | 2    | Configuration error                  |
    /// | 3    | Repository or git error              |
    /// | 4    | Lint finished with per-file failures |
    /// | 10   | IO error                             |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::LintFailures { .. } => 4,
            Self::Io(_) => 10,
            Self::Core(core) => match core {
                CvelintError::Config(_) => 2,
                CvelintError::Repository(_) => 3,
                CvelintError::Io(_) => 10,
                CvelintError::Lint(_) => 1,
            },
            Self::JsonSerialize(_) | Self::Command(_) => 1,
        }
    }
}

impl From<LinterError> for CliError {
    fn from(e: LinterError) -> Self {
        Self::Core(e.into())
    }
}
