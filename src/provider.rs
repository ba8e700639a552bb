//! The flag evaluation contract implemented by providers.
use std::sync::Arc;

use async_trait::async_trait;

use crate::{Error, EvaluationContext, Reason, ResolutionDetails, Result};

/// Static identity of a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderMetadata {
    /// Provider name.
    pub name: String,
}

impl ProviderMetadata {
    /// Create metadata with the given name.
    pub fn new(name: impl Into<String>) -> ProviderMetadata {
        ProviderMetadata { name: name.into() }
    }
}

/// Evaluation hook. All stages are no-ops unless overridden.
pub trait Hook: Send + Sync {
    /// Called before a flag is resolved.
    fn before(&self, _flag_key: &str, _context: Option<&EvaluationContext>) {}

    /// Called after a flag is resolved successfully.
    fn after(&self, _flag_key: &str, _variant: Option<&str>, _reason: Reason) {}

    /// Called when resolution fails.
    fn error(&self, _flag_key: &str, _error: &Error) {}
}

/// A blocking flag provider.
///
/// Each `resolve_*` method either returns fully populated [`ResolutionDetails`] or fails with an
/// [`Error`]. `context` is `None` when the caller did not supply an evaluation context.
pub trait FeatureProvider: Send + Sync {
    /// Provider identity.
    fn metadata(&self) -> &ProviderMetadata;

    /// Hooks contributed by the provider.
    fn provider_hooks(&self) -> Vec<Arc<dyn Hook>> {
        Vec::new()
    }

    /// Resolve a boolean flag.
    fn resolve_bool_value(
        &self,
        flag_key: &str,
        default_value: bool,
        context: Option<&EvaluationContext>,
    ) -> Result<ResolutionDetails<bool>>;

    /// Resolve a string flag.
    fn resolve_string_value(
        &self,
        flag_key: &str,
        default_value: String,
        context: Option<&EvaluationContext>,
    ) -> Result<ResolutionDetails<String>>;

    /// Resolve an integer flag.
    fn resolve_int_value(
        &self,
        flag_key: &str,
        default_value: i64,
        context: Option<&EvaluationContext>,
    ) -> Result<ResolutionDetails<i64>>;

    /// Resolve a floating-point flag.
    fn resolve_float_value(
        &self,
        flag_key: &str,
        default_value: f64,
        context: Option<&EvaluationContext>,
    ) -> Result<ResolutionDetails<f64>>;

    /// Resolve a structured (JSON) flag.
    fn resolve_struct_value(
        &self,
        flag_key: &str,
        default_value: serde_json::Value,
        context: Option<&EvaluationContext>,
    ) -> Result<ResolutionDetails<serde_json::Value>>;
}

/// Async counterpart of [`FeatureProvider`].
#[async_trait]
pub trait AsyncFeatureProvider: Send + Sync {
    /// Provider identity.
    fn metadata(&self) -> &ProviderMetadata;

    /// Hooks contributed by the provider.
    fn provider_hooks(&self) -> Vec<Arc<dyn Hook>> {
        Vec::new()
    }

    /// Resolve a boolean flag.
    async fn resolve_bool_value(
        &self,
        flag_key: &str,
        default_value: bool,
        context: Option<&EvaluationContext>,
    ) -> Result<ResolutionDetails<bool>>;

    /// Resolve a string flag.
    async fn resolve_string_value(
        &self,
        flag_key: &str,
        default_value: String,
        context: Option<&EvaluationContext>,
    ) -> Result<ResolutionDetails<String>>;

    /// Resolve an integer flag.
    async fn resolve_int_value(
        &self,
        flag_key: &str,
        default_value: i64,
        context: Option<&EvaluationContext>,
    ) -> Result<ResolutionDetails<i64>>;

    /// Resolve a floating-point flag.
    async fn resolve_float_value(
        &self,
        flag_key: &str,
        default_value: f64,
        context: Option<&EvaluationContext>,
    ) -> Result<ResolutionDetails<f64>>;

    /// Resolve a structured (JSON) flag.
    async fn resolve_struct_value(
        &self,
        flag_key: &str,
        default_value: serde_json::Value,
        context: Option<&EvaluationContext>,
    ) -> Result<ResolutionDetails<serde_json::Value>>;
}
