use super::types::ChatMessage;
use crate::{Result, config::LlmConfig};
use async_openai::{Client, config::OpenAIConfig, types as openai_types};
use async_trait::async_trait;
use tracing::debug;

/// Opaque prompt-to-text backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the backend's answer text for `prompt`, possibly empty.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
    system_prompt: Option<String>,
    temperature: f32,
}

impl OpenAiClient {
    pub fn new(config: LlmConfig) -> Self {
        let mut openai_config =
            OpenAIConfig::new().with_api_key(config.api_key.unwrap_or_default());

        if !config.base_url.is_empty() {
            openai_config = openai_config.with_api_base(config.base_url);
        }

        let client = Client::with_config(openai_config);

        Self {
            client,
            model: config.model,
            system_prompt: config.system_prompt,
            temperature: config.temperature,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_messages(&self, prompt: &str) -> Result<Vec<openai_types::ChatCompletionRequestMessage>> {
        let mut messages = Vec::with_capacity(2);
        if let Some(ref system_prompt) = self.system_prompt {
            messages.push(ChatMessage::system(system_prompt.as_str()).to_openai_message()?);
        }
        messages.push(ChatMessage::user(prompt).to_openai_message()?);
        Ok(messages)
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let messages = self.build_messages(prompt)?;

        debug!(
            "Creating chat completion with {} messages for model {}",
            messages.len(),
            self.model
        );

        let request = openai_types::CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()?;

        let response = self.client.chat().create(request).await?;

        debug!(
            "Received chat completion response with {} choices",
            response.choices.len()
        );

        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}
