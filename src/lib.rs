//! An [OpenFeature](https://openfeature.dev) provider for [Split](https://split.io).
//!
//! # Overview
//!
//! The provider does not evaluate flags itself. It asks a Split client for a *treatment* (a
//! string label) and converts it into the value type requested by the caller: `bool`, `String`,
//! `i64`, `f64`, or a JSON [`serde_json::Value`]. The result is returned as
//! [`ResolutionDetails`], carrying the treatment as the variant along with a [`Reason`] and an
//! optional [`ErrorCode`].
//!
//! [`SplitProvider`] works with blocking Split SDKs ([`SplitClient`], [`SplitFactory`]).
//! [`AsyncSplitProvider`] works with async ones ([`AsyncSplitClient`], [`AsyncSplitFactory`]).
//! Both share the same resolution rules. [`AsyncSplitProvider`] runs on any executor; inside a
//! tokio runtime its readiness probes are additionally bounded with `tokio::time::timeout`.
//!
//! # Error Handling
//!
//! A missing flag (no treatment or the `"control"` treatment) and an SDK that is not ready yet are
//! not errors: the default value is returned with [`ErrorCode::FlagNotFound`] or
//! [`ErrorCode::ProviderNotReady`] respectively.
//!
//! Everything else is reported as an [`Error`]: a missing evaluation context or an SDK failure
//! ([`Error::General`]), a treatment that cannot be converted to the requested type
//! ([`Error::Parse`]), or a missing targeting key ([`Error::TargetingKeyMissing`]).
//!
//! # Logging
//!
//! The package uses the [`log`](https://docs.rs/log/latest/log/) crate for logging messages, under
//! the `split` target. Consider integrating a `log`-compatible logger implementation for better
//! visibility into provider operations.
//!
//! # Examples
//!
//! Examples can be found in the `demos` directory of the crate repository.

#![warn(rustdoc::missing_crate_level_docs)]
#![warn(missing_docs)]

mod async_provider;
mod client;
mod client_wrapper;
mod config;
mod context;
mod details;
mod error;
mod provider;
mod resolver;
mod split_provider;

pub use async_provider::AsyncSplitProvider;
pub use client::{
    AsyncSplitClient, AsyncSplitFactory, SplitClient, SplitFactory, Treatment, CONTROL_TREATMENT,
};
pub use client_wrapper::{AsyncSplitClientWrapper, SplitClientWrapper};
pub use config::ProviderConfig;
pub use context::{AttributeValue, Attributes, EvaluationContext};
pub use details::{ErrorCode, FlagMetadata, Reason, ResolutionDetails};
pub use error::{Error, Result, SplitError};
pub use provider::{AsyncFeatureProvider, FeatureProvider, Hook, ProviderMetadata};
pub use resolver::{FlagType, FlagValue};
pub use split_provider::SplitProvider;
