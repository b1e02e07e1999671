use super::client::{LlmClient, OpenAiClient};
use crate::config::LlmConfig;
use std::{fmt, sync::Arc};
use tracing::{debug, error, warn};

/// Shown to the user whenever no answer could be produced.
pub const FALLBACK_ANSWER: &str =
    "죄송해요, 지금은 답변을 드릴 수 없어요. 잠시 후 다시 시도해 주세요.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotConfigured,
    UpstreamError,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "not_configured"),
            Self::UpstreamError => write!(f, "upstream_error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferenceResult {
    Answer(String),
    Failure { kind: FailureKind, detail: String },
}

impl InferenceResult {
    pub fn failure(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            detail: detail.into(),
        }
    }

    /// The user-facing text: the answer itself or the fallback sentence.
    pub fn into_text(self) -> String {
        match self {
            Self::Answer(text) => text,
            Self::Failure { .. } => FALLBACK_ANSWER.to_string(),
        }
    }
}

enum Backend {
    Ready(Arc<dyn LlmClient>),
    Unavailable(String),
}

/// Stateless wrapper around the generation backend, built once at startup.
pub struct InferenceGateway {
    backend: Backend,
}

impl InferenceGateway {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            backend: Backend::Ready(client),
        }
    }

    /// A gateway whose every call fails with `NotConfigured`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            backend: Backend::Unavailable(reason.into()),
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        let has_key = config
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty());

        if !has_key {
            warn!(
                "No API key configured for provider '{}'; answers will degrade to the fallback text",
                config.provider
            );
            return Self::unavailable(format!("missing API key for {}", config.provider));
        }

        Self::new(Arc::new(OpenAiClient::new(config.clone())))
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.backend, Backend::Ready(_))
    }

    /// Runs the backend and reports the structured outcome.
    pub async fn try_infer(&self, prompt: &str) -> InferenceResult {
        let client = match &self.backend {
            Backend::Ready(client) => client,
            Backend::Unavailable(reason) => {
                return InferenceResult::failure(FailureKind::NotConfigured, reason.as_str());
            }
        };

        match client.complete(prompt).await {
            Ok(text) if text.trim().is_empty() => {
                InferenceResult::failure(FailureKind::UpstreamError, "backend returned no text")
            }
            Ok(text) => InferenceResult::Answer(text),
            Err(e) => InferenceResult::failure(FailureKind::UpstreamError, e.to_string()),
        }
    }

    /// Never fails: backend problems are logged and replaced by [`FALLBACK_ANSWER`].
    pub async fn infer(&self, prompt: &str) -> String {
        let result = self.try_infer(prompt).await;

        match &result {
            InferenceResult::Answer(text) => {
                debug!("Inference produced {} characters", text.chars().count());
            }
            InferenceResult::Failure {
                kind: FailureKind::NotConfigured,
                detail,
            } => warn!(kind = %FailureKind::NotConfigured, "Inference skipped: {}", detail),
            InferenceResult::Failure { kind, detail } => {
                error!(kind = %kind, "Inference failed: {}", detail)
            }
        }

        result.into_text()
    }
}
