use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shape violations in generated (or bundled) learning content.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContentShapeError {
    #[error("field `{0}` must not be blank")]
    BlankField(&'static str),

    #[error("word must list at least one synonym")]
    NoSynonyms,

    #[error("question `{id}` needs at least two options")]
    TooFewOptions { id: String },

    #[error("question `{id}` must have its answer among the options exactly once")]
    AnswerNotInOptions { id: String },

    #[error("expected {expected} questions, got {actual}")]
    WrongQuestionCount { expected: usize, actual: usize },

    #[error("duplicate question id `{0}`")]
    DuplicateId(String),
}

/// A single word-of-the-day card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordOfTheDay {
    pub word: String,
    pub definition: String,
    pub example: String,
    pub synonyms: Vec<String>,
    pub emoji: String,
    pub ipa: String,
}

impl WordOfTheDay {
    /// Check that every field is populated.
    ///
    /// # Errors
    ///
    /// Returns `ContentShapeError` for a blank field or an empty synonym list.
    pub fn validate(&self) -> Result<(), ContentShapeError> {
        let fields = [
            ("word", &self.word),
            ("definition", &self.definition),
            ("example", &self.example),
            ("emoji", &self.emoji),
            ("ipa", &self.ipa),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ContentShapeError::BlankField(name));
            }
        }
        if self.synonyms.is_empty() {
            return Err(ContentShapeError::NoSynonyms);
        }
        if self.synonyms.iter().any(|s| s.trim().is_empty()) {
            return Err(ContentShapeError::BlankField("synonyms"));
        }
        Ok(())
    }
}
