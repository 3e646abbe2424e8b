use std::fmt;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow the hosting scheduler to distinguish between different
/// types of failures and successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - the harvest completed (possibly with partial per-repository results)
    Success = 0,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (retry budget exhausted, transport failure, etc.)
    ApplicationError = 3,
    /// Required environment configuration is absent; the run never started
    MissingConfiguration = 4,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
            ExitCode::MissingConfiguration => write!(f, "Missing Configuration (4)"),
        }
    }
}

/// Application-specific errors for the alert harvest.
///
/// Uses thiserror to derive Display and Error traits automatically. Only two
/// variants are fatal to a run: `MissingConfiguration` and
/// `RetryBudgetExhausted`. Everything else is absorbed at the layer that
/// observes it and degrades to partial results.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("{variable} environment variable is not set")]
    MissingConfiguration { variable: &'static str },

    /// Raised when every attempt against one endpoint was throttled. Continuing
    /// to issue requests past this point risks credential suspension, so the
    /// whole run stops.
    #[error("retry budget exhausted after {attempts} throttled attempts for {url}")]
    RetryBudgetExhausted { url: String, attempts: u32 },

    #[error("invalid bucket destination '{spec}': {reason}")]
    InvalidBucketSpec { spec: String, reason: String },

    #[error("malformed response from {url}: {details}")]
    MalformedResponse { url: String, details: String },

    #[error("repository name '{full_name}' is not in owner/name form")]
    InvalidRepositoryName { full_name: String },
}

impl HarvestError {
    /// Whether this error must abort the entire run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            HarvestError::MissingConfiguration { .. } | HarvestError::RetryBudgetExhausted { .. }
        )
    }
}
