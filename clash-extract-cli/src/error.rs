use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Conversion or name-map error from the core library
    #[error("{0}")]
    Extract(#[from] clash_extract_core::ExtractError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// One or more tables in a batch failed
    #[error("{failed} of {total} tables failed to convert")]
    BatchFailed { failed: usize, total: usize },
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
