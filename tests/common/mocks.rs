use async_trait::async_trait;
use skill_relay::{Error, Result, llm::LlmClient};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Stub backend that answers `"answer: <prompt>"` and records every prompt it receives.
#[derive(Debug, Default)]
pub struct StubLlmClient {
    pub prompts: Arc<Mutex<Vec<String>>>,
    pub error: Option<String>,
    pub empty: bool,
    /// When set, each call waits for a notification before answering.
    pub gate: Option<Arc<Notify>>,
}

impl StubLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_empty_answer(mut self) -> Self {
        self.empty = true;
        self
    }

    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn prompt_log(&self) -> Arc<Mutex<Vec<String>>> {
        self.prompts.clone()
    }
}

pub fn expected_answer(prompt: &str) -> String {
    format!("answer: {}", prompt)
}

#[async_trait]
impl LlmClient for StubLlmClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        if let Some(ref gate) = self.gate {
            gate.notified().await;
        }

        if let Some(ref error) = self.error {
            return Err(Error::llm(error.clone()));
        }

        if self.empty {
            return Ok(String::new());
        }

        Ok(expected_answer(prompt))
    }
}
