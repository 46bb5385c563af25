use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use url::Url;

use super::provider::ContentSource;
use super::request::ContentRequest;
use crate::error::{ContentConfigError, ContentError};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

const SYSTEM_PROMPT: &str = "You write short, friendly English vocabulary exercises. \
     Reply with JSON only.";

/// Connection settings for the generative text service.
#[derive(Clone, Debug)]
pub struct ContentConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl ContentConfig {
    /// Read settings from `LINGO_AI_API_KEY`, `LINGO_AI_BASE_URL` and `LINGO_AI_MODEL`.
    ///
    /// Returns `None` when no key is set or the settings are unusable.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        match Self::from_lookup(|key| env::var(key).ok()) {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %err, "ignoring content service settings");
                None
            }
        }
    }

    /// Build settings from an arbitrary variable lookup.
    ///
    /// A missing or blank API key yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `ContentConfigError::InvalidBaseUrl` if the base URL does not parse.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, ContentConfigError> {
        let Some(api_key) = normalize(lookup("LINGO_AI_API_KEY")) else {
            return Ok(None);
        };
        let base_url =
            normalize(lookup("LINGO_AI_BASE_URL")).unwrap_or_else(|| DEFAULT_BASE_URL.into());
        if Url::parse(&base_url).is_err() {
            return Err(ContentConfigError::InvalidBaseUrl(base_url));
        }
        let model = normalize(lookup("LINGO_AI_MODEL")).unwrap_or_else(|| DEFAULT_MODEL.into());
        Ok(Some(Self {
            base_url,
            api_key,
            model,
        }))
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Client for an OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct GenerativeClient {
    client: Client,
    config: ContentConfig,
}

impl GenerativeClient {
    #[must_use]
    pub fn new(config: ContentConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn payload(&self, request: &ContentRequest) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_owned(),
                },
                ChatMessage {
                    role: "user",
                    content: request.instruction(),
                },
            ],
            temperature: 0.9,
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaSpec {
                    name: request.schema_name(),
                    strict: false,
                    schema: request.schema(),
                },
            },
        }
    }
}

#[async_trait]
impl ContentSource for GenerativeClient {
    async fn generate(&self, request: &ContentRequest) -> Result<String, ContentError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&self.payload(request))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ContentError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty())
            .ok_or(ContentError::EmptyResponse)?;

        Ok(content)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaSpec,
}

#[derive(Debug, Serialize)]
struct JsonSchemaSpec {
    name: &'static str,
    strict: bool,
    schema: Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}
