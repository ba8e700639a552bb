//! In-memory Split backend driven by `tests/data/treatments.json`.
use std::{
    collections::HashMap,
    fs::File,
    io::BufReader,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use serde::Deserialize;

use split_openfeature::{
    AsyncSplitClient, AsyncSplitFactory, Attributes, SplitClient, SplitError, SplitFactory,
    Treatment, CONTROL_TREATMENT,
};

#[derive(Debug, Deserialize)]
pub struct FlagDefinition {
    treatment: String,
    #[serde(default)]
    keys: HashMap<String, String>,
    #[serde(default)]
    configs: HashMap<String, String>,
}

pub struct InMemoryClient {
    flags: HashMap<String, FlagDefinition>,
    destroyed: Arc<AtomicBool>,
}

impl InMemoryClient {
    fn evaluate(&self, key: &str, flag_key: &str) -> Result<Treatment, SplitError> {
        if self.destroyed.load(Ordering::SeqCst) {
            return Err(SplitError::Destroyed);
        }
        let Some(flag) = self.flags.get(flag_key) else {
            return Ok(Treatment::new(CONTROL_TREATMENT));
        };
        let treatment = flag.keys.get(key).unwrap_or(&flag.treatment);
        Ok(Treatment {
            treatment: Some(treatment.clone()),
            config: flag.configs.get(treatment).cloned(),
        })
    }
}

impl SplitClient for InMemoryClient {
    fn get_treatment(
        &self,
        key: &str,
        flag_key: &str,
        _attributes: &Attributes,
    ) -> Result<Option<String>, SplitError> {
        self.evaluate(key, flag_key).map(|t| t.treatment)
    }

    fn get_treatment_with_config(
        &self,
        key: &str,
        flag_key: &str,
        _attributes: &Attributes,
    ) -> Result<Treatment, SplitError> {
        self.evaluate(key, flag_key)
    }
}

#[async_trait]
impl AsyncSplitClient for InMemoryClient {
    async fn get_treatment(
        &self,
        key: &str,
        flag_key: &str,
        _attributes: &Attributes,
    ) -> Result<Option<String>, SplitError> {
        self.evaluate(key, flag_key).map(|t| t.treatment)
    }

    async fn get_treatment_with_config(
        &self,
        key: &str,
        flag_key: &str,
        _attributes: &Attributes,
    ) -> Result<Treatment, SplitError> {
        self.evaluate(key, flag_key)
    }
}

/// Factory that is always ready and serves flags from the fixture.
pub struct InMemoryFactory {
    client: Arc<InMemoryClient>,
    destroyed: Arc<AtomicBool>,
}

impl InMemoryFactory {
    pub fn from_fixture() -> Arc<InMemoryFactory> {
        let f = File::open("tests/data/treatments.json")
            .expect("Failed to open tests/data/treatments.json");
        let flags: HashMap<String, FlagDefinition> =
            serde_json::from_reader(BufReader::new(f)).unwrap();

        let destroyed = Arc::new(AtomicBool::new(false));
        Arc::new(InMemoryFactory {
            client: Arc::new(InMemoryClient {
                flags,
                destroyed: destroyed.clone(),
            }),
            destroyed,
        })
    }

    pub fn client(&self) -> Arc<InMemoryClient> {
        self.client.clone()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }
}

impl SplitFactory for InMemoryFactory {
    fn block_until_ready(&self, _timeout: Duration) -> Result<(), SplitError> {
        Ok(())
    }

    fn client(&self) -> Arc<dyn SplitClient> {
        self.client.clone()
    }

    fn destroy(&self) {
        self.destroyed.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl AsyncSplitFactory for InMemoryFactory {
    async fn block_until_ready(&self, _timeout: Duration) -> Result<(), SplitError> {
        Ok(())
    }

    fn client(&self) -> Arc<dyn AsyncSplitClient> {
        self.client.clone()
    }

    async fn destroy(&self) {
        self.destroyed.store(true, Ordering::SeqCst);
    }
}
