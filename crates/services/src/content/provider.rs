use std::sync::Arc;

use async_trait::async_trait;
use lingo_core::model::{QuizQuestion, WordOfTheDay, validate_quiz};
use serde::Deserialize;
use tracing::{debug, warn};

use super::client::{ContentConfig, GenerativeClient};
use super::fallback::{fallback_word, sample_fallback_quiz};
use super::request::{ContentRequest, QUIZ_LENGTH};
use crate::error::ContentError;

/// A text-generation backend that answers a `ContentRequest` with raw JSON text.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Produce the response text for a request.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` when the backend cannot produce a response.
    async fn generate(&self, request: &ContentRequest) -> Result<String, ContentError>;
}

/// Quiz payloads arrive either as a bare array or wrapped in an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum QuizPayload {
    List(Vec<QuizQuestion>),
    Wrapped { questions: Vec<QuizQuestion> },
}

impl QuizPayload {
    fn into_questions(self) -> Vec<QuizQuestion> {
        match self {
            Self::List(questions) | Self::Wrapped { questions } => questions,
        }
    }
}

/// Serves daily words and quizzes, always with a usable result.
#[derive(Clone, Default)]
pub struct ContentProvider {
    source: Option<Arc<dyn ContentSource>>,
}

impl ContentProvider {
    #[must_use]
    pub fn new(source: Option<Arc<dyn ContentSource>>) -> Self {
        Self { source }
    }

    /// Provider that only serves bundled content.
    #[must_use]
    pub fn offline() -> Self {
        Self::default()
    }

    /// Provider backed by the HTTP client when a key is configured.
    #[must_use]
    pub fn from_env() -> Self {
        let source = ContentConfig::from_env()
            .map(|config| Arc::new(GenerativeClient::new(config)) as Arc<dyn ContentSource>);
        Self::new(source)
    }

    /// Whether a live service will be tried.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.source.is_some()
    }

    /// Fetch a word from the live service.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` if no service is configured, the call fails, or
    /// the payload does not match the word shape.
    pub async fn try_fetch_daily_word(&self) -> Result<WordOfTheDay, ContentError> {
        let text = self.generate(&ContentRequest::DailyWord).await?;
        let word: WordOfTheDay = serde_json::from_str(strip_code_fence(&text))?;
        word.validate()?;
        Ok(word)
    }

    /// Fetch a quiz from the live service.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` if no service is configured, the call fails, or
    /// the payload is not exactly `QUIZ_LENGTH` valid questions with unique ids.
    pub async fn try_fetch_quiz(&self, topic: Option<&str>) -> Result<Vec<QuizQuestion>, ContentError> {
        let text = self.generate(&ContentRequest::quiz(topic)).await?;
        let questions = serde_json::from_str::<QuizPayload>(strip_code_fence(&text))?.into_questions();
        validate_quiz(&questions, QUIZ_LENGTH)?;
        Ok(questions)
    }

    /// Today's word; the bundled word on any failure.
    pub async fn fetch_daily_word(&self) -> WordOfTheDay {
        match self.try_fetch_daily_word().await {
            Ok(word) => {
                debug!(word = %word.word, "live daily word");
                word
            }
            Err(err) => {
                log_fallback("daily word", &err);
                fallback_word()
            }
        }
    }

    /// A quiz of `QUIZ_LENGTH` questions; a shuffled bundled sample on any failure.
    pub async fn fetch_quiz(&self, topic: Option<&str>) -> Vec<QuizQuestion> {
        match self.try_fetch_quiz(topic).await {
            Ok(questions) => {
                debug!(count = questions.len(), "live quiz");
                questions
            }
            Err(err) => {
                log_fallback("quiz", &err);
                sample_fallback_quiz(QUIZ_LENGTH)
            }
        }
    }

    async fn generate(&self, request: &ContentRequest) -> Result<String, ContentError> {
        let source = self.source.as_ref().ok_or(ContentError::Disabled)?;
        let text = source.generate(request).await?;
        if text.trim().is_empty() {
            return Err(ContentError::EmptyResponse);
        }
        Ok(text)
    }
}

fn log_fallback(kind: &str, err: &ContentError) {
    if matches!(err, ContentError::Disabled) {
        debug!(kind, "no content service configured, using bundled content");
    } else {
        warn!(kind, error = %err, "content fetch failed, using bundled content");
    }
}

/// Models sometimes wrap JSON in a markdown fence.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.strip_suffix("```").unwrap_or(rest);
    let body = match body.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &body[4..],
        _ => body,
    };
    body.trim()
}
