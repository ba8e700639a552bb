use std::collections::HashMap;

use derive_more::From;
use serde::{Deserialize, Serialize};

/// Type alias for a HashMap representing key-value pairs of attributes.
///
/// Attributes are passed to the Split SDK as is.
///
/// # Examples
/// ```
/// # use split_openfeature::{Attributes, AttributeValue};
/// let attributes = [
///     ("age".to_owned(), 30.0.into()),
///     ("is_premium_member".to_owned(), true.into()),
///     ("username".to_owned(), "john_doe".into()),
/// ].into_iter().collect::<Attributes>();
/// ```
pub type Attributes = HashMap<String, AttributeValue>;

/// Enum representing possible values of an attribute.
///
/// Conveniently implements `From` conversions for `String`, `&str`, `i64`, `f64`, `bool`, and
/// lists of values.
#[derive(Debug, Serialize, Deserialize, PartialEq, PartialOrd, From, Clone)]
#[serde(untagged)]
pub enum AttributeValue {
    /// A string value.
    String(String),
    /// An integer value. Kept exact so large numbers (e.g. millisecond timestamps) survive.
    // Must come before `Number`: untagged deserialization picks the first matching variant.
    Integer(i64),
    /// A numerical value.
    Number(f64),
    /// A boolean value.
    Boolean(bool),
    /// A list of values, used by Split's set matchers.
    Array(Vec<AttributeValue>),
    /// A null value or absence of value.
    Null,
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<Vec<&str>> for AttributeValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Array(values.into_iter().map(AttributeValue::from).collect())
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(values: Vec<String>) -> Self {
        Self::Array(values.into_iter().map(AttributeValue::from).collect())
    }
}

/// Evaluation context: who is being evaluated and what is known about them.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationContext {
    /// Identifier of the evaluated subject. Split calls this the "key".
    pub targeting_key: Option<String>,
    /// Subject attributes forwarded to the Split SDK.
    #[serde(default)]
    pub attributes: Attributes,
}

impl EvaluationContext {
    /// Create a context for the given targeting key.
    ///
    /// ```
    /// # use split_openfeature::EvaluationContext;
    /// let context = EvaluationContext::new("user-id").with_attribute("plan", "premium");
    /// assert_eq!(context.targeting_key(), Some("user-id"));
    /// ```
    pub fn new(targeting_key: impl Into<String>) -> EvaluationContext {
        EvaluationContext {
            targeting_key: Some(targeting_key.into()),
            attributes: Attributes::new(),
        }
    }

    /// Add an attribute to the context.
    pub fn with_attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> EvaluationContext {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Targeting key, if present and non-empty.
    pub fn targeting_key(&self) -> Option<&str> {
        self.targeting_key.as_deref().filter(|key| !key.is_empty())
    }
}
