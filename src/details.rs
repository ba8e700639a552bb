use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Why a particular value was returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reason {
    /// The Split SDK returned a treatment for the subject.
    TargetingMatch,
    /// The default value was used because no treatment was available.
    Default,
    /// The default value was used because of an error.
    Error,
}

/// Error codes reported in [`ResolutionDetails`] or attached to [`Error`](crate::Error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Split returned no treatment or the "control" treatment.
    FlagNotFound,
    /// Treatment could not be converted to the requested type.
    ParseError,
    /// Evaluation context has no targeting key.
    TargetingKeyMissing,
    /// The Split SDK has not finished loading flag definitions.
    ProviderNotReady,
    /// Any other error.
    General,
}

/// Metadata attached to a resolution.
///
/// When treatment configuration is requested, the configuration string is stored under
/// [`ResolutionDetails::CONFIG_KEY`].
pub type FlagMetadata = HashMap<String, String>;

/// Result of a single flag resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionDetails<T> {
    /// Resolved value. Always of the requested type, either converted from the treatment or the
    /// caller-provided default.
    pub value: T,
    /// Raw treatment returned by Split.
    pub variant: Option<String>,
    /// Why `value` was returned.
    pub reason: Reason,
    /// Set whenever the default value was returned because of a problem.
    pub error_code: Option<ErrorCode>,
    /// Additional data about the flag, see [`FlagMetadata`].
    pub flag_metadata: Option<FlagMetadata>,
}

impl<T> ResolutionDetails<T> {
    /// Metadata key holding the treatment configuration.
    pub const CONFIG_KEY: &'static str = "config";

    pub(crate) fn matched(value: T, variant: String, config: Option<String>) -> Self {
        ResolutionDetails {
            value,
            variant: Some(variant),
            reason: Reason::TargetingMatch,
            error_code: None,
            flag_metadata: config
                .map(|config| FlagMetadata::from([(Self::CONFIG_KEY.to_owned(), config)])),
        }
    }

    pub(crate) fn flag_not_found(default_value: T, variant: Option<String>) -> Self {
        ResolutionDetails {
            value: default_value,
            variant,
            reason: Reason::Default,
            error_code: Some(ErrorCode::FlagNotFound),
            flag_metadata: None,
        }
    }

    pub(crate) fn provider_not_ready(default_value: T) -> Self {
        ResolutionDetails {
            value: default_value,
            variant: None,
            reason: Reason::Error,
            error_code: Some(ErrorCode::ProviderNotReady),
            flag_metadata: None,
        }
    }

    /// Treatment configuration, if it was requested and Split returned one.
    pub fn config(&self) -> Option<&str> {
        self.flag_metadata
            .as_ref()?
            .get(Self::CONFIG_KEY)
            .map(String::as_str)
    }

    /// Map `ResolutionDetails.value` using the `f` function.
    pub fn map<T2, F: FnOnce(T) -> T2>(self, f: F) -> ResolutionDetails<T2> {
        ResolutionDetails {
            value: f(self.value),
            variant: self.variant,
            reason: self.reason,
            error_code: self.error_code,
            flag_metadata: self.flag_metadata,
        }
    }
}
