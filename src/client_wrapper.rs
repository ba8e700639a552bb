//! Readiness tracking for the Split SDK.
//!
//! The Split SDK needs to download flag definitions before it can serve evaluations. Wrappers in
//! this module answer "is the SDK ready?" cheaply: once the SDK has been observed ready, the
//! answer is cached and the SDK is never asked again.
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use crate::{AsyncSplitClient, AsyncSplitFactory, ProviderConfig, SplitClient, SplitError, SplitFactory};

/// One-way flag that goes from not-ready to ready and never back.
///
/// Concurrent callers may race to set it. That is harmless: a redundant readiness probe is
/// idempotent.
#[derive(Debug, Default)]
pub(crate) struct ReadyLatch(AtomicBool);

impl ReadyLatch {
    pub(crate) fn new() -> ReadyLatch {
        ReadyLatch::default()
    }

    pub(crate) fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub(crate) fn set(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Record the outcome of a readiness probe. Returns whether the SDK is ready.
    fn observe(&self, result: Result<(), SplitError>) -> bool {
        match result {
            Ok(()) => {
                if !self.is_set() {
                    log::debug!(target: "split", "split sdk is ready");
                }
                self.set();
                true
            }
            Err(SplitError::Timeout) => {
                log::debug!(target: "split", "split sdk timed out");
                false
            }
            Err(err) => {
                log::warn!(target: "split", "error waiting for split sdk to become ready: {:?}", err);
                false
            }
        }
    }
}

/// Wraps a blocking [`SplitFactory`] and tracks its readiness.
pub struct SplitClientWrapper {
    factory: Arc<dyn SplitFactory>,
    client: Arc<dyn SplitClient>,
    ready: ReadyLatch,
    probe_timeout: Duration,
}

impl SplitClientWrapper {
    /// Wrap `factory`, blocking for up to [`ProviderConfig::ready_block_time`] for the SDK to get
    /// ready.
    ///
    /// Timing out is not an error: the wrapper is created anyway and readiness is checked again
    /// on every [`SplitClientWrapper::is_sdk_ready`] call.
    pub fn new(factory: Arc<dyn SplitFactory>, config: &ProviderConfig) -> SplitClientWrapper {
        let ready = ReadyLatch::new();
        ready.observe(factory.block_until_ready(config.ready_block_time));

        let client = factory.client();
        SplitClientWrapper {
            factory,
            client,
            ready,
            probe_timeout: config.readiness_probe_timeout,
        }
    }

    /// Returns `true` if the SDK can serve evaluations.
    ///
    /// While the SDK is not ready, each call blocks for up to
    /// [`ProviderConfig::readiness_probe_timeout`]. Once the SDK has been observed ready, this
    /// returns immediately without calling the SDK.
    pub fn is_sdk_ready(&self) -> bool {
        if self.ready.is_set() {
            return true;
        }
        self.ready
            .observe(self.factory.block_until_ready(self.probe_timeout))
    }

    /// The wrapped client.
    pub fn client(&self) -> &Arc<dyn SplitClient> {
        &self.client
    }

    /// Destroy the underlying factory.
    pub fn destroy(&self) {
        log::debug!(target: "split", "destroying split factory");
        self.factory.destroy();
    }
}

/// Wraps an [`AsyncSplitFactory`] and tracks its readiness.
///
/// Works on any executor. Inside a tokio runtime (with the time driver enabled) readiness
/// probes are additionally cut off after [`ProviderConfig::readiness_probe_timeout`]; elsewhere
/// the factory is trusted to honor the timeout it is given.
pub struct AsyncSplitClientWrapper {
    factory: Arc<dyn AsyncSplitFactory>,
    client: Arc<dyn AsyncSplitClient>,
    ready: ReadyLatch,
    probe_timeout: Duration,
}

impl AsyncSplitClientWrapper {
    /// Wrap `factory`, waiting for up to [`ProviderConfig::ready_block_time`] for the SDK to get
    /// ready. Only the calling task is suspended.
    pub async fn new(
        factory: Arc<dyn AsyncSplitFactory>,
        config: &ProviderConfig,
    ) -> AsyncSplitClientWrapper {
        let ready = ReadyLatch::new();
        ready.observe(wait_until_ready(&*factory, config.ready_block_time).await);

        let client = factory.client();
        AsyncSplitClientWrapper {
            factory,
            client,
            ready,
            probe_timeout: config.readiness_probe_timeout,
        }
    }

    /// Async counterpart of [`SplitClientWrapper::is_sdk_ready`].
    pub async fn is_sdk_ready(&self) -> bool {
        if self.ready.is_set() {
            return true;
        }
        self.ready
            .observe(wait_until_ready(&*self.factory, self.probe_timeout).await)
    }

    /// The wrapped client.
    pub fn client(&self) -> &Arc<dyn AsyncSplitClient> {
        &self.client
    }

    /// Destroy the underlying factory.
    pub async fn destroy(&self) {
        log::debug!(target: "split", "destroying split factory");
        self.factory.destroy().await;
    }
}

/// Wait for `factory` to get ready, enforcing `timeout` even if the factory does not.
///
/// The timeout is only enforced inside a tokio runtime. On other executors the factory's own
/// `block_until_ready` timeout is relied upon.
async fn wait_until_ready(
    factory: &dyn AsyncSplitFactory,
    timeout: Duration,
) -> Result<(), SplitError> {
    if tokio::runtime::Handle::try_current().is_err() {
        return factory.block_until_ready(timeout).await;
    }
    match tokio::time::timeout(timeout, factory.block_until_ready(timeout)).await {
        Ok(result) => result,
        Err(_elapsed) => Err(SplitError::Timeout),
    }
}
