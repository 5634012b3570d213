use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use workout_extractor::ollama::{Generator, ModelError};

#[derive(Clone)]
pub struct MockGenerator {
    pub response: Value,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockGenerator {
    pub fn new(response: Value) -> Self {
        Self {
            response,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            response: Value::Null,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<Value, ModelError> {
        self.calls.lock().unwrap().push(prompt.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(ModelError::Unavailable(msg.clone()));
        }
        Ok(self.response.clone())
    }
}
