//! Error types for orgpush.

use thiserror::Error;

use crate::publish::PublishStep;

/// Every failure that can end a run.
#[derive(Debug, Error)]
pub enum OrgpushError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("prompt failed: {0}")]
    Prompt(String),

    #[error("Failed to create repository. Status code: {status}. Error message: {message}")]
    ProvisionFailed { status: u16, message: String },

    #[error("repository API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected repository API response: {0}")]
    InvalidResponse(String),

    #[error("Error during git operations: git {step} failed: {detail}")]
    GitFailed { step: PublishStep, detail: String },

    #[error("No changes to commit. Make sure there are files in the directory.")]
    NothingToCommit,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl OrgpushError {
    /// Process exit code for this class of failure.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::ProvisionFailed { .. } | Self::Http(_) | Self::InvalidResponse(_) => 2,
            Self::NothingToCommit => 3,
            Self::GitFailed { .. } => 4,
            Self::Config(_)
            | Self::InvalidInput(_)
            | Self::Prompt(_)
            | Self::Io(_)
            | Self::Serialization(_) => 1,
        }
    }

    /// Short machine-readable code used in robot output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::InvalidInput(_) => "invalid_input",
            Self::Prompt(_) => "prompt",
            Self::ProvisionFailed { .. } => "provision_failed",
            Self::Http(_) => "http",
            Self::InvalidResponse(_) => "invalid_response",
            Self::GitFailed { .. } => "git_failed",
            Self::NothingToCommit => "nothing_to_commit",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
        }
    }
}

pub type Result<T> = std::result::Result<T, OrgpushError>;
