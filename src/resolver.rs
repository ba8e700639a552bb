//! Conversion of Split treatments into typed flag values.
//!
//! This is shared by the blocking and the async provider: only fetching the treatment differs
//! between them.
use crate::{Error, EvaluationContext, Reason, ResolutionDetails, Result, Treatment};

/// Type of value requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagType {
    /// `bool`
    Boolean,
    /// `String`
    String,
    /// `i64`
    Integer,
    /// `f64`
    Float,
    /// `serde_json::Value`
    Object,
}

/// A value type that can be produced from a Split treatment.
pub trait FlagValue: Sized {
    /// Tag for this type.
    const FLAG_TYPE: FlagType;

    /// Convert a treatment label into a value of this type.
    ///
    /// Fails with [`Error::Parse`] if the treatment is not a valid representation.
    fn from_treatment(treatment: &str) -> Result<Self>;
}

impl FlagValue for bool {
    const FLAG_TYPE: FlagType = FlagType::Boolean;

    fn from_treatment(treatment: &str) -> Result<bool> {
        if treatment.eq_ignore_ascii_case("true") || treatment.eq_ignore_ascii_case("on") {
            Ok(true)
        } else if treatment.eq_ignore_ascii_case("false") || treatment.eq_ignore_ascii_case("off") {
            Ok(false)
        } else {
            Err(Error::Parse(
                "Could not convert treatment to boolean".to_owned(),
            ))
        }
    }
}

impl FlagValue for String {
    const FLAG_TYPE: FlagType = FlagType::String;

    fn from_treatment(treatment: &str) -> Result<String> {
        Ok(treatment.to_owned())
    }
}

impl FlagValue for i64 {
    const FLAG_TYPE: FlagType = FlagType::Integer;

    fn from_treatment(treatment: &str) -> Result<i64> {
        trim_ascii_whitespace(treatment)
            .parse()
            .map_err(|_| Error::Parse("Could not convert treatment to integer".to_owned()))
    }
}

impl FlagValue for f64 {
    const FLAG_TYPE: FlagType = FlagType::Float;

    /// Integer literals are tried first, then float literals.
    fn from_treatment(treatment: &str) -> Result<f64> {
        let treatment = trim_ascii_whitespace(treatment);
        treatment
            .parse::<i64>()
            .map(|i| i as f64)
            .or_else(|_| treatment.parse::<f64>())
            .map_err(|_| Error::Parse("Could not convert treatment to float".to_owned()))
    }
}

impl FlagValue for serde_json::Value {
    const FLAG_TYPE: FlagType = FlagType::Object;

    fn from_treatment(treatment: &str) -> Result<serde_json::Value> {
        serde_json::from_str(treatment)
            .map_err(|err| Error::Parse(format!("Could not convert treatment to object: {err}")))
    }
}

fn trim_ascii_whitespace(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_ascii_whitespace())
}

/// Extract the targeting key from `context`, failing if it is missing or empty.
pub(crate) fn targeting_key(context: &EvaluationContext) -> Result<&str> {
    context
        .targeting_key()
        .ok_or_else(|| Error::TargetingKeyMissing("Missing targeting key".to_owned()))
}

/// Classify `treatment` and convert it into `T`.
///
/// Missing treatments (absent, empty, or "control") resolve to `default_value` with
/// [`ErrorCode::FlagNotFound`](crate::ErrorCode::FlagNotFound); the raw label is still reported
/// as the variant. Everything else is converted with [`FlagValue::from_treatment`].
pub(crate) fn resolve_treatment<T: FlagValue>(
    flag_key: &str,
    default_value: T,
    treatment: Treatment,
) -> Result<ResolutionDetails<T>> {
    if treatment.is_missing() {
        log::trace!(target: "split",
                    flag_key,
                    variant:? = treatment.treatment,
                    reason:? = Reason::Default;
                    "no treatment, using default value");
        return Ok(ResolutionDetails::flag_not_found(
            default_value,
            treatment.treatment,
        ));
    }

    let Treatment { treatment, config } = treatment;
    let variant = treatment.unwrap_or_default();

    let value = T::from_treatment(&variant).inspect_err(|err| {
        log::warn!(target: "split",
                   flag_key,
                   treatment = variant,
                   flag_type:? = T::FLAG_TYPE;
                   "{}", err);
    })?;

    log::trace!(target: "split",
                flag_key,
                variant,
                reason:? = Reason::TargetingMatch;
                "resolved flag");
    Ok(ResolutionDetails::matched(value, variant, config))
}
