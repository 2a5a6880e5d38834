//! Error types for the docrender CLI

use color_eyre::eyre::Report;
use thiserror::Error;

/// CLI error type with minimal variants
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or saved
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// API communication errors outside a workflow
    #[error("API error: {0}")]
    Api(#[from] docrender_sdk::ApiError),

    /// An upload or run stopped early
    #[error(transparent)]
    Workflow(#[from] docrender_sdk::WorkflowError),

    /// Local file errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Bad key or value on the command line
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Everything else (using color-eyre's Report for rich errors)
    #[error(transparent)]
    Internal(#[from] Report),
}

impl CliError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(Report::msg(message.into()))
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
