//! In-memory backend for probe tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use crate::core::backend::{BackendError, ModelBackend, RawModel};

use super::ModelDescriptor;

/// Recorded generate call: (model, prompt, max_output_tokens).
pub type Call = (String, String, u32);

/// Backend with a fixed catalog and per-model scripted failures.
/// Models without a scripted failure succeed.
#[derive(Default)]
pub struct ScriptedBackend {
    catalog: Vec<RawModel>,
    catalog_error: Option<String>,
    failures: HashMap<String, String>,
    call_latency: Duration,
    calls: RefCell<Vec<Call>>,
}

impl ScriptedBackend {
    pub fn with_catalog(catalog: Vec<RawModel>) -> Self {
        Self {
            catalog,
            ..Default::default()
        }
    }

    pub fn failing_catalog(message: &str) -> Self {
        Self {
            catalog_error: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn fail(mut self, model: &str, message: &str) -> Self {
        self.failures.insert(model.to_string(), message.to_string());
        self
    }

    pub fn with_call_latency(mut self, latency: Duration) -> Self {
        self.call_latency = latency;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

impl ModelBackend for ScriptedBackend {
    async fn list_models(&self) -> Result<Vec<RawModel>, BackendError> {
        match &self.catalog_error {
            Some(msg) => Err(BackendError::Decode(msg.clone())),
            None => Ok(self.catalog.clone()),
        }
    }

    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        max_output_tokens: u32,
    ) -> Result<(), BackendError> {
        self.calls
            .borrow_mut()
            .push((model.to_string(), prompt.to_string(), max_output_tokens));
        if !self.call_latency.is_zero() {
            tokio::time::sleep(self.call_latency).await;
        }
        match self.failures.get(model) {
            Some(msg) => Err(BackendError::Decode(msg.clone())),
            None => Ok(()),
        }
    }
}

pub fn descriptor(name: &str) -> ModelDescriptor {
    ModelDescriptor {
        name: name.to_string(),
        display_name: None,
        input_token_limit: 0,
        output_token_limit: 0,
    }
}
