use std::sync::Arc;

use thiserror::Error;

use crate::ErrorCode;

/// Result type used throughout the provider.
pub type Result<T> = std::result::Result<T, Error>;

/// Faults raised by flag resolution.
///
/// Every resolution either returns [`ResolutionDetails`](crate::ResolutionDetails) or fails with
/// exactly one of these. Conditions that have a sensible default (flag not found, provider not
/// ready) are not errors; they are reported through the returned details instead.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// Catch-all for missing evaluation context and unexpected backend failures.
    #[error("{message}")]
    General {
        /// Human-readable description.
        message: String,
        /// Backend error that caused this fault, if any.
        #[source]
        source: Option<Arc<SplitError>>,
    },

    /// The backend returned a treatment that cannot be converted to the requested type.
    #[error("{0}")]
    Parse(String),

    /// Evaluation context has no targeting key.
    #[error("{0}")]
    TargetingKeyMissing(String),
}

impl Error {
    pub(crate) fn general(message: impl Into<String>) -> Error {
        Error::General {
            message: message.into(),
            source: None,
        }
    }

    /// Error code reported alongside this fault.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Error::General { .. } => ErrorCode::General,
            Error::Parse(_) => ErrorCode::ParseError,
            Error::TargetingKeyMissing(_) => ErrorCode::TargetingKeyMissing,
        }
    }
}

/// Errors reported by the Split SDK client or factory.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum SplitError {
    /// The SDK did not become ready within the requested time.
    #[error("timed out waiting for split sdk to become ready")]
    Timeout,

    /// The factory has been destroyed and can no longer serve evaluations.
    #[error("split client has been destroyed")]
    Destroyed,

    /// Any other failure inside the SDK.
    #[error("split sdk error: {0}")]
    Backend(String),
}

impl From<SplitError> for Error {
    fn from(value: SplitError) -> Self {
        Error::General {
            message: "error getting treatment from split".to_owned(),
            source: Some(Arc::new(value)),
        }
    }
}
