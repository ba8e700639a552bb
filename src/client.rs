//! Interfaces of the Split SDK consumed by the provider.
//!
//! The provider does not evaluate flags itself. Targeting and rollout decisions are made by a
//! Split client, which is plugged in through the traits in this module. Blocking SDKs implement
//! [`SplitClient`] and [`SplitFactory`]; async SDKs implement [`AsyncSplitClient`] and
//! [`AsyncSplitFactory`].
use std::{sync::Arc, time::Duration};

use async_trait::async_trait;

use crate::{Attributes, SplitError};

/// Treatment label Split returns when it cannot evaluate a flag.
pub const CONTROL_TREATMENT: &str = "control";

/// Result of a single Split evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Treatment {
    /// Treatment label. `None` if Split returned nothing.
    pub treatment: Option<String>,
    /// Configuration attached to the treatment. Only filled by
    /// [`SplitClient::get_treatment_with_config`].
    pub config: Option<String>,
}

impl Treatment {
    /// Treatment without configuration.
    pub fn new(treatment: impl Into<String>) -> Treatment {
        Treatment {
            treatment: Some(treatment.into()),
            config: None,
        }
    }

    /// Treatment with configuration.
    pub fn with_config(treatment: impl Into<String>, config: impl Into<String>) -> Treatment {
        Treatment {
            treatment: Some(treatment.into()),
            config: Some(config.into()),
        }
    }

    /// Returns `true` if Split has no usable treatment: absent, empty, or the "control" treatment.
    pub fn is_missing(&self) -> bool {
        match self.treatment.as_deref() {
            None | Some("") | Some(CONTROL_TREATMENT) => true,
            Some(_) => false,
        }
    }
}

impl From<Option<String>> for Treatment {
    fn from(treatment: Option<String>) -> Self {
        Treatment {
            treatment,
            config: None,
        }
    }
}

/// A blocking Split client.
pub trait SplitClient: Send + Sync {
    /// Evaluate `flag_key` for the subject identified by `key`.
    fn get_treatment(
        &self,
        key: &str,
        flag_key: &str,
        attributes: &Attributes,
    ) -> Result<Option<String>, SplitError>;

    /// Evaluate `flag_key`, also returning the configuration attached to the treatment.
    ///
    /// The default implementation delegates to [`SplitClient::get_treatment`] and returns no
    /// configuration.
    fn get_treatment_with_config(
        &self,
        key: &str,
        flag_key: &str,
        attributes: &Attributes,
    ) -> Result<Treatment, SplitError> {
        self.get_treatment(key, flag_key, attributes)
            .map(Treatment::from)
    }
}

/// A blocking Split factory: owns the SDK state and hands out clients.
pub trait SplitFactory: Send + Sync {
    /// Block until the SDK has loaded flag definitions.
    ///
    /// Must fail with [`SplitError::Timeout`] if the SDK is not ready after `timeout`.
    fn block_until_ready(&self, timeout: Duration) -> Result<(), SplitError>;

    /// Client bound to this factory.
    fn client(&self) -> Arc<dyn SplitClient>;

    /// Release SDK resources. Clients stop serving evaluations afterwards.
    fn destroy(&self);
}

/// Async counterpart of [`SplitClient`].
#[async_trait]
pub trait AsyncSplitClient: Send + Sync {
    /// See [`SplitClient::get_treatment`].
    async fn get_treatment(
        &self,
        key: &str,
        flag_key: &str,
        attributes: &Attributes,
    ) -> Result<Option<String>, SplitError>;

    /// See [`SplitClient::get_treatment_with_config`].
    async fn get_treatment_with_config(
        &self,
        key: &str,
        flag_key: &str,
        attributes: &Attributes,
    ) -> Result<Treatment, SplitError> {
        self.get_treatment(key, flag_key, attributes)
            .await
            .map(Treatment::from)
    }
}

/// Async counterpart of [`SplitFactory`].
#[async_trait]
pub trait AsyncSplitFactory: Send + Sync {
    /// See [`SplitFactory::block_until_ready`].
    async fn block_until_ready(&self, timeout: Duration) -> Result<(), SplitError>;

    /// Client bound to this factory.
    fn client(&self) -> Arc<dyn AsyncSplitClient>;

    /// Release SDK resources.
    async fn destroy(&self);
}

#[cfg(test)]
mod tests {
    use super::Treatment;

    #[test]
    fn missing_treatments() {
        assert!(Treatment::default().is_missing());
        assert!(Treatment::new("").is_missing());
        assert!(Treatment::new("control").is_missing());
        assert!(Treatment::with_config("control", "{}").is_missing());
    }

    #[test]
    fn present_treatments() {
        assert!(!Treatment::new("on").is_missing());
        // Only the exact label is reserved.
        assert!(!Treatment::new("Control").is_missing());
        assert!(!Treatment::new(" ").is_missing());
    }
}
