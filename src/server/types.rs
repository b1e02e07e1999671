use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Skill payload sent by the chatbot platform. Only the fields the relay reads are modelled.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRequest {
    pub user_request: UserRequest,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    pub utterance: String,
    #[serde(default)]
    pub callback_url: Option<String>,
}

/// A validated request, owned by the handler for its duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingRequest {
    pub utterance: String,
    pub callback_url: Option<String>,
}

impl TryFrom<SkillRequest> for IncomingRequest {
    type Error = Error;

    fn try_from(request: SkillRequest) -> Result<Self> {
        let UserRequest {
            utterance,
            callback_url,
        } = request.user_request;

        if utterance.is_empty() {
            return Err(Error::malformed("utterance is empty"));
        }

        Ok(Self {
            utterance,
            callback_url: callback_url.filter(|url| !url.trim().is_empty()),
        })
    }
}

/// The platform's reply envelope carrying one simple text output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillResponse {
    pub version: String,
    pub template: SkillTemplate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTemplate {
    pub outputs: Vec<SkillOutput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillOutput {
    pub simple_text: SimpleText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleText {
    pub text: String,
}

impl SkillResponse {
    pub const VERSION: &'static str = "2.0";

    pub fn simple_text(text: impl Into<String>) -> Self {
        Self {
            version: Self::VERSION.to_string(),
            template: SkillTemplate {
                outputs: vec![SkillOutput {
                    simple_text: SimpleText { text: text.into() },
                }],
            },
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.template
            .outputs
            .first()
            .map(|output| output.simple_text.text.as_str())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
