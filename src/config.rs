use std::{sync::Arc, time::Duration};

use crate::{AsyncSplitFactory, AsyncSplitProvider, SplitFactory, SplitProvider};

/// Configuration for [`SplitProvider`] and [`AsyncSplitProvider`].
// Not implementing `Copy` as we may add non-copyable fields in the future.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// How long to block waiting for the SDK to get ready when the provider is created.
    ///
    /// Defaults to [`ProviderConfig::DEFAULT_READY_BLOCK_TIME`].
    pub ready_block_time: Duration,
    /// How long a single readiness check may wait while the SDK is not ready yet. Every
    /// evaluation performs such a check until the SDK reports ready once.
    ///
    /// Defaults to [`ProviderConfig::DEFAULT_READINESS_PROBE_TIMEOUT`].
    pub readiness_probe_timeout: Duration,
    /// Request treatment configuration from Split and attach it to resolution metadata.
    ///
    /// Defaults to `false`.
    pub with_treatment_config: bool,
}

impl ProviderConfig {
    /// Default value for [`ProviderConfig::ready_block_time`].
    pub const DEFAULT_READY_BLOCK_TIME: Duration = Duration::from_secs(10);
    /// Default value for [`ProviderConfig::readiness_probe_timeout`].
    pub const DEFAULT_READINESS_PROBE_TIMEOUT: Duration = Duration::from_millis(100);

    /// Create a new `ProviderConfig` using default configuration.
    pub fn new() -> ProviderConfig {
        ProviderConfig::default()
    }

    /// Update initial ready block time with `ready_block_time`.
    pub fn with_ready_block_time(mut self, ready_block_time: Duration) -> ProviderConfig {
        self.ready_block_time = ready_block_time;
        self
    }

    /// Update readiness probe timeout with `timeout`.
    pub fn with_readiness_probe_timeout(mut self, timeout: Duration) -> ProviderConfig {
        self.readiness_probe_timeout = timeout;
        self
    }

    /// Request treatment configuration along with treatments.
    pub fn with_treatment_config(mut self, enabled: bool) -> ProviderConfig {
        self.with_treatment_config = enabled;
        self
    }

    /// Create a new [`SplitProvider`] backed by `factory`.
    ///
    /// Blocks for up to [`ProviderConfig::ready_block_time`].
    pub fn to_provider(self, factory: Arc<dyn SplitFactory>) -> SplitProvider {
        SplitProvider::from_factory(factory, self)
    }

    /// Create a new [`AsyncSplitProvider`] backed by `factory`.
    pub async fn to_async_provider(self, factory: Arc<dyn AsyncSplitFactory>) -> AsyncSplitProvider {
        AsyncSplitProvider::from_factory(factory, self).await
    }
}

impl Default for ProviderConfig {
    fn default() -> ProviderConfig {
        ProviderConfig {
            ready_block_time: ProviderConfig::DEFAULT_READY_BLOCK_TIME,
            readiness_probe_timeout: ProviderConfig::DEFAULT_READINESS_PROBE_TIMEOUT,
            with_treatment_config: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::ProviderConfig;

    #[test]
    fn builder_overrides_defaults() {
        let config = ProviderConfig::new()
            .with_ready_block_time(Duration::from_secs(1))
            .with_readiness_probe_timeout(Duration::from_millis(5))
            .with_treatment_config(true);

        assert_eq!(config.ready_block_time, Duration::from_secs(1));
        assert_eq!(config.readiness_probe_timeout, Duration::from_millis(5));
        assert!(config.with_treatment_config);
    }

    #[test]
    fn defaults() {
        let config = ProviderConfig::default();

        assert_eq!(config.ready_block_time, Duration::from_secs(10));
        assert_eq!(config.readiness_probe_timeout, Duration::from_millis(100));
        assert!(!config.with_treatment_config);
    }
}
