mod client;
mod gateway;
mod types;

pub use client::{LlmClient, OpenAiClient};
pub use gateway::{FALLBACK_ANSWER, FailureKind, InferenceGateway, InferenceResult};
pub use types::{ChatMessage, Role};
