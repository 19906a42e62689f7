//! Mock text generator for testing purposes.

use async_trait::async_trait;
use std::sync::Mutex;

use super::{LlmError, TextGenerator};

/// Answers with a fixed reply and records every prompt it receives.
///
/// Once [`MockGenerator::fail_with`] is set every call fails instead.
#[derive(Debug, Default)]
pub struct MockGenerator {
    default_reply: Mutex<Option<String>>,
    failure: Mutex<Option<String>>,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator that always answers `reply`
    pub fn replying(reply: impl Into<String>) -> Self {
        let mock = Self::new();
        mock.set_default_reply(reply);
        mock
    }

    /// Generator whose calls always fail with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        let mock = Self::new();
        mock.fail_with(message);
        mock
    }

    pub fn set_default_reply(&self, reply: impl Into<String>) {
        *self.default_reply.lock().unwrap() = Some(reply.into());
    }

    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(message.into());
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    fn model(&self) -> &str {
        "mock-model"
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(LlmError::Other(message));
        }
        Ok(self.default_reply.lock().unwrap().clone().unwrap_or_default())
    }

    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        Ok(vec!["models/mock-model".to_string()])
    }
}
