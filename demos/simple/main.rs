use std::{collections::HashMap, sync::Arc, time::Duration};

use split_openfeature::{
    Attributes, EvaluationContext, FeatureProvider, ProviderConfig, SplitClient, SplitError,
    SplitFactory,
};

/// A stand-in for a real Split SDK: serves fixed treatments and is always ready.
struct StaticSplit {
    treatments: HashMap<&'static str, &'static str>,
}

impl SplitClient for StaticSplit {
    fn get_treatment(
        &self,
        key: &str,
        flag_key: &str,
        _attributes: &Attributes,
    ) -> Result<Option<String>, SplitError> {
        if flag_key == "my_feature" {
            let treatment = if key == "key" { "on" } else { "off" };
            return Ok(Some(treatment.to_owned()));
        }
        Ok(self.treatments.get(flag_key).map(|t| (*t).to_owned()))
    }
}

struct StaticFactory(Arc<StaticSplit>);

impl SplitFactory for StaticFactory {
    fn block_until_ready(&self, _timeout: Duration) -> Result<(), SplitError> {
        Ok(())
    }

    fn client(&self) -> Arc<dyn SplitClient> {
        self.0.clone()
    }

    fn destroy(&self) {}
}

pub fn main() -> split_openfeature::Result<()> {
    // Configure env_logger to see provider logs.
    env_logger::Builder::from_env(env_logger::Env::new().default_filter_or("split")).init();

    let targeting_key = std::env::var("SPLIT_TARGETING_KEY").unwrap_or_else(|_| "key".to_owned());

    let factory = StaticFactory(Arc::new(StaticSplit {
        treatments: HashMap::from([("int_feature", "32"), ("obj_feature", r#"{"key": "value"}"#)]),
    }));
    let provider = ProviderConfig::new().to_provider(Arc::new(factory));

    let context = EvaluationContext::new(targeting_key).with_attribute("plan", "premium");

    let enabled = provider.resolve_bool_value("my_feature", false, Some(&context))?;
    println!("my_feature: {:?}", enabled);

    let limit = provider.resolve_int_value("int_feature", 10, Some(&context))?;
    println!("int_feature: {:?}", limit);

    let settings = provider.resolve_struct_value("obj_feature", serde_json::json!({}), Some(&context))?;
    println!("obj_feature: {:?}", settings);

    // Flags Split does not know about resolve to the default value.
    let missing = provider.resolve_string_value("unknown", "default".to_owned(), Some(&context))?;
    println!("unknown: {:?}", missing);

    provider.shutdown();
    Ok(())
}
