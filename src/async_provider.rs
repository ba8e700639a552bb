use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    client_wrapper::AsyncSplitClientWrapper,
    resolver::{resolve_treatment, targeting_key, FlagValue},
    AsyncFeatureProvider, AsyncSplitClient, AsyncSplitFactory, Attributes, Error,
    EvaluationContext, ProviderConfig, ProviderMetadata, ResolutionDetails, Result, SplitProvider,
    Treatment,
};

/// Async counterpart of [`SplitProvider`].
///
/// Resolution semantics are identical. Readiness probes and treatment lookups are awaited, so
/// only the calling task is suspended. Dropping a resolution future cancels it; the provider
/// holds no per-call resources.
///
/// Any executor can drive it. See [`AsyncSplitClientWrapper`](crate::AsyncSplitClientWrapper)
/// for how readiness probes are bounded inside and outside a tokio runtime.
pub struct AsyncSplitProvider {
    client: Arc<dyn AsyncSplitClient>,
    wrapper: Option<AsyncSplitClientWrapper>,
    with_treatment_config: bool,
    metadata: ProviderMetadata,
}

impl AsyncSplitProvider {
    /// Create a provider from an existing client, assumed to be ready.
    pub fn new(client: Arc<dyn AsyncSplitClient>) -> AsyncSplitProvider {
        AsyncSplitProvider {
            client,
            wrapper: None,
            with_treatment_config: false,
            metadata: ProviderMetadata::new(SplitProvider::NAME),
        }
    }

    /// Create a provider from a factory, waiting for up to
    /// [`ProviderConfig::ready_block_time`] for the SDK to get ready.
    pub async fn from_factory(
        factory: Arc<dyn AsyncSplitFactory>,
        config: ProviderConfig,
    ) -> AsyncSplitProvider {
        let wrapper = AsyncSplitClientWrapper::new(factory, &config).await;
        AsyncSplitProvider {
            client: wrapper.client().clone(),
            wrapper: Some(wrapper),
            with_treatment_config: config.with_treatment_config,
            metadata: ProviderMetadata::new(SplitProvider::NAME),
        }
    }

    /// Request treatment configuration along with treatments.
    pub fn with_treatment_config(mut self, enabled: bool) -> AsyncSplitProvider {
        self.with_treatment_config = enabled;
        self
    }

    /// Returns `true` if the underlying SDK can serve evaluations.
    pub async fn is_ready(&self) -> bool {
        match &self.wrapper {
            Some(wrapper) => wrapper.is_sdk_ready().await,
            None => true,
        }
    }

    /// Destroy the Split factory this provider was created from.
    pub async fn shutdown(&self) {
        if let Some(wrapper) = &self.wrapper {
            wrapper.destroy().await;
        }
    }

    async fn evaluate<T: FlagValue>(
        &self,
        flag_key: &str,
        default_value: T,
        context: Option<&EvaluationContext>,
    ) -> Result<ResolutionDetails<T>> {
        let context = context.ok_or_else(|| {
            Error::general("Evaluation Context must be provided for the Split Provider")
        })?;

        if !self.is_ready().await {
            log::debug!(target: "split", flag_key; "split sdk is not ready, using default value");
            return Ok(ResolutionDetails::provider_not_ready(default_value));
        }

        let targeting_key = targeting_key(context)?;
        let treatment = self
            .get_treatment(targeting_key, flag_key, &context.attributes)
            .await?;

        resolve_treatment(flag_key, default_value, treatment)
    }

    async fn get_treatment(
        &self,
        targeting_key: &str,
        flag_key: &str,
        attributes: &Attributes,
    ) -> Result<Treatment> {
        let result = if self.with_treatment_config {
            self.client
                .get_treatment_with_config(targeting_key, flag_key, attributes)
                .await
        } else {
            self.client
                .get_treatment(targeting_key, flag_key, attributes)
                .await
                .map(Treatment::from)
        };

        result.map_err(|err| {
            log::warn!(target: "split",
                       flag_key,
                       targeting_key;
                       "error getting treatment: {:?}", err);
            Error::from(err)
        })
    }
}

#[async_trait]
impl AsyncFeatureProvider for AsyncSplitProvider {
    fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    async fn resolve_bool_value(
        &self,
        flag_key: &str,
        default_value: bool,
        context: Option<&EvaluationContext>,
    ) -> Result<ResolutionDetails<bool>> {
        self.evaluate(flag_key, default_value, context).await
    }

    async fn resolve_string_value(
        &self,
        flag_key: &str,
        default_value: String,
        context: Option<&EvaluationContext>,
    ) -> Result<ResolutionDetails<String>> {
        self.evaluate(flag_key, default_value, context).await
    }

    async fn resolve_int_value(
        &self,
        flag_key: &str,
        default_value: i64,
        context: Option<&EvaluationContext>,
    ) -> Result<ResolutionDetails<i64>> {
        self.evaluate(flag_key, default_value, context).await
    }

    async fn resolve_float_value(
        &self,
        flag_key: &str,
        default_value: f64,
        context: Option<&EvaluationContext>,
    ) -> Result<ResolutionDetails<f64>> {
        self.evaluate(flag_key, default_value, context).await
    }

    async fn resolve_struct_value(
        &self,
        flag_key: &str,
        default_value: serde_json::Value,
        context: Option<&EvaluationContext>,
    ) -> Result<ResolutionDetails<serde_json::Value>> {
        self.evaluate(flag_key, default_value, context).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{atomic::Ordering, Arc};

    use async_trait::async_trait;
    use serde_json::json;

    use crate::{
        client_wrapper::tests::FakeFactory, AsyncFeatureProvider, AsyncSplitClient,
        AsyncSplitProvider, Attributes, Error, ErrorCode, EvaluationContext, ProviderConfig,
        Reason, SplitError, Treatment,
    };

    struct StaticClient(Option<&'static str>);

    #[async_trait]
    impl AsyncSplitClient for StaticClient {
        async fn get_treatment(
            &self,
            _key: &str,
            _flag_key: &str,
            _attributes: &Attributes,
        ) -> Result<Option<String>, SplitError> {
            tokio::task::yield_now().await;
            Ok(self.0.map(str::to_owned))
        }

        async fn get_treatment_with_config(
            &self,
            key: &str,
            flag_key: &str,
            attributes: &Attributes,
        ) -> Result<Treatment, SplitError> {
            let treatment = self.get_treatment(key, flag_key, attributes).await?;
            Ok(Treatment {
                treatment,
                config: Some("{\"size\": 3}".to_owned()),
            })
        }
    }

    struct FailingClient;

    #[async_trait]
    impl AsyncSplitClient for FailingClient {
        async fn get_treatment(
            &self,
            _key: &str,
            _flag_key: &str,
            _attributes: &Attributes,
        ) -> Result<Option<String>, SplitError> {
            Err(SplitError::Destroyed)
        }
    }

    fn context() -> EvaluationContext {
        EvaluationContext::new("someKey")
    }

    #[tokio::test]
    async fn resolves_typed_values() {
        let provider = AsyncSplitProvider::new(Arc::new(StaticClient(Some("on"))));
        let details = provider
            .resolve_bool_value("flag", false, Some(&context()))
            .await
            .unwrap();
        assert!(details.value);
        assert_eq!(details.reason, Reason::TargetingMatch);

        let provider = AsyncSplitProvider::new(Arc::new(StaticClient(Some("32"))));
        assert_eq!(
            provider
                .resolve_int_value("flag", 0, Some(&context()))
                .await
                .unwrap()
                .value,
            32
        );
        assert_eq!(
            provider
                .resolve_float_value("flag", 0.0, Some(&context()))
                .await
                .unwrap()
                .value,
            32.0
        );

        let provider = AsyncSplitProvider::new(Arc::new(StaticClient(Some(r#"{"key": "value"}"#))));
        assert_eq!(
            provider
                .resolve_struct_value("flag", json!(null), Some(&context()))
                .await
                .unwrap()
                .value,
            json!({"key": "value"})
        );
    }

    #[tokio::test]
    async fn missing_treatment_uses_default() {
        let provider = AsyncSplitProvider::new(Arc::new(StaticClient(None)));

        let details = provider
            .resolve_string_value("flag", "blah".to_owned(), Some(&context()))
            .await
            .unwrap();
        assert_eq!(details.value, "blah");
        assert_eq!(details.variant, None);
        assert_eq!(details.error_code, Some(ErrorCode::FlagNotFound));
    }

    #[tokio::test]
    async fn faults_are_raised() {
        let provider = AsyncSplitProvider::new(Arc::new(StaticClient(Some("50.5"))));
        assert!(matches!(
            provider.resolve_int_value("flag", 0, Some(&context())).await,
            Err(Error::Parse(_))
        ));
        assert!(matches!(
            provider
                .resolve_int_value("flag", 0, Some(&EvaluationContext::default()))
                .await,
            Err(Error::TargetingKeyMissing(_))
        ));
        assert!(matches!(
            provider.resolve_int_value("flag", 0, None).await,
            Err(Error::General { source: None, .. })
        ));

        let provider = AsyncSplitProvider::new(Arc::new(FailingClient));
        let err = provider
            .resolve_bool_value("flag", false, Some(&context()))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::General);
    }

    #[tokio::test]
    async fn treatment_config_is_attached() {
        let provider =
            AsyncSplitProvider::new(Arc::new(StaticClient(Some("red")))).with_treatment_config(true);

        let details = provider
            .resolve_string_value("flag", "blue".to_owned(), Some(&context()))
            .await
            .unwrap();
        assert_eq!(details.value, "red");
        assert_eq!(details.config(), Some("{\"size\": 3}"));
    }

    #[tokio::test]
    async fn not_ready_short_circuits_without_lookup() {
        let factory = FakeFactory::new(false);
        let provider = ProviderConfig::new()
            .to_async_provider(factory.clone())
            .await;

        let details = provider
            .resolve_float_value("flag", 1.5, Some(&context()))
            .await
            .unwrap();
        assert_eq!(details.value, 1.5);
        assert_eq!(details.reason, Reason::Error);
        assert_eq!(details.error_code, Some(ErrorCode::ProviderNotReady));
        assert_eq!(factory.lookups(), 0);

        factory.ready.store(true, Ordering::SeqCst);
        let details = provider
            .resolve_string_value("flag", "off".to_owned(), Some(&context()))
            .await
            .unwrap();
        assert_eq!(details.value, "on");
        assert_eq!(factory.lookups(), 1);

        provider.shutdown().await;
        assert!(factory.destroyed.load(Ordering::SeqCst));
    }

    #[test]
    fn resolves_outside_tokio() {
        let factory = FakeFactory::new(true);

        let details = futures::executor::block_on(async {
            let provider = ProviderConfig::new().to_async_provider(factory.clone()).await;
            provider
                .resolve_bool_value("flag", false, Some(&context()))
                .await
        })
        .unwrap();

        assert!(details.value);
        assert_eq!(details.reason, Reason::TargetingMatch);
        assert_eq!(factory.lookups(), 1);
    }
}
