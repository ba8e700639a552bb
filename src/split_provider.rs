use std::sync::Arc;

use crate::{
    client_wrapper::SplitClientWrapper,
    resolver::{resolve_treatment, targeting_key, FlagValue},
    Attributes, Error, EvaluationContext, FeatureProvider, ProviderConfig, ProviderMetadata,
    ResolutionDetails, Result, SplitClient, SplitFactory, Treatment,
};

/// A blocking OpenFeature provider backed by a Split client.
///
/// Every resolution blocks the calling thread while the Split client evaluates the flag (and,
/// until the SDK is ready, while readiness is probed).
///
/// # Examples
/// ```
/// # use std::sync::Arc;
/// # use split_openfeature::{EvaluationContext, FeatureProvider, SplitClient, SplitProvider};
/// # fn test(client: Arc<dyn SplitClient>) {
/// let provider = SplitProvider::new(client);
/// let enabled = provider
///     .resolve_bool_value("my_feature", false, Some(&EvaluationContext::new("user-id")))
///     .map(|details| details.value)
///     // default value
///     .unwrap_or(false);
/// # }
/// ```
pub struct SplitProvider {
    client: Arc<dyn SplitClient>,
    /// `None` if the provider was created from a bare client, in which case the client is
    /// assumed to be ready.
    wrapper: Option<SplitClientWrapper>,
    with_treatment_config: bool,
    metadata: ProviderMetadata,
}

impl SplitProvider {
    /// Provider name reported in [`ProviderMetadata`].
    pub const NAME: &'static str = "Split";

    /// Create a provider from an existing client.
    ///
    /// The client is assumed to be ready; readiness is not checked before evaluations.
    pub fn new(client: Arc<dyn SplitClient>) -> SplitProvider {
        SplitProvider {
            client,
            wrapper: None,
            with_treatment_config: false,
            metadata: ProviderMetadata::new(SplitProvider::NAME),
        }
    }

    /// Create a provider from a factory.
    ///
    /// Blocks for up to [`ProviderConfig::ready_block_time`] for the SDK to get ready. If the SDK
    /// is not ready by then, evaluations return the default value with
    /// [`ErrorCode::ProviderNotReady`](crate::ErrorCode::ProviderNotReady) until it is.
    pub fn from_factory(factory: Arc<dyn SplitFactory>, config: ProviderConfig) -> SplitProvider {
        let wrapper = SplitClientWrapper::new(factory, &config);
        SplitProvider {
            client: wrapper.client().clone(),
            wrapper: Some(wrapper),
            with_treatment_config: config.with_treatment_config,
            metadata: ProviderMetadata::new(SplitProvider::NAME),
        }
    }

    /// Request treatment configuration along with treatments.
    pub fn with_treatment_config(mut self, enabled: bool) -> SplitProvider {
        self.with_treatment_config = enabled;
        self
    }

    /// Returns `true` if the underlying SDK can serve evaluations.
    pub fn is_ready(&self) -> bool {
        self.wrapper
            .as_ref()
            .map_or(true, SplitClientWrapper::is_sdk_ready)
    }

    /// Destroy the Split factory this provider was created from.
    ///
    /// Does nothing if the provider was created from a bare client: its lifecycle belongs to the
    /// caller.
    pub fn shutdown(&self) {
        if let Some(wrapper) = &self.wrapper {
            wrapper.destroy();
        }
    }

    fn evaluate<T: FlagValue>(
        &self,
        flag_key: &str,
        default_value: T,
        context: Option<&EvaluationContext>,
    ) -> Result<ResolutionDetails<T>> {
        let context = context.ok_or_else(|| {
            Error::general("Evaluation Context must be provided for the Split Provider")
        })?;

        if !self.is_ready() {
            log::debug!(target: "split", flag_key; "split sdk is not ready, using default value");
            return Ok(ResolutionDetails::provider_not_ready(default_value));
        }

        let targeting_key = targeting_key(context)?;
        let treatment = self.get_treatment(targeting_key, flag_key, &context.attributes)?;

        resolve_treatment(flag_key, default_value, treatment)
    }

    fn get_treatment(
        &self,
        targeting_key: &str,
        flag_key: &str,
        attributes: &Attributes,
    ) -> Result<Treatment> {
        let result = if self.with_treatment_config {
            self.client
                .get_treatment_with_config(targeting_key, flag_key, attributes)
        } else {
            self.client
                .get_treatment(targeting_key, flag_key, attributes)
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

impl FeatureProvider for SplitProvider {
    fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    fn resolve_bool_value(
        &self,
        flag_key: &str,
        default_value: bool,
        context: Option<&EvaluationContext>,
    ) -> Result<ResolutionDetails<bool>> {
        self.evaluate(flag_key, default_value, context)
    }

    fn resolve_string_value(
        &self,
        flag_key: &str,
        default_value: String,
        context: Option<&EvaluationContext>,
    ) -> Result<ResolutionDetails<String>> {
        self.evaluate(flag_key, default_value, context)
    }

    fn resolve_int_value(
        &self,
        flag_key: &str,
        default_value: i64,
        context: Option<&EvaluationContext>,
    ) -> Result<ResolutionDetails<i64>> {
        self.evaluate(flag_key, default_value, context)
    }

    fn resolve_float_value(
        &self,
        flag_key: &str,
        default_value: f64,
        context: Option<&EvaluationContext>,
    ) -> Result<ResolutionDetails<f64>> {
        self.evaluate(flag_key, default_value, context)
    }

    fn resolve_struct_value(
        &self,
        flag_key: &str,
        default_value: serde_json::Value,
        context: Option<&EvaluationContext>,
    ) -> Result<ResolutionDetails<serde_json::Value>> {
        self.evaluate(flag_key, default_value, context)
    }
}
