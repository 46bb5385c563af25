use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::ContentShapeError;

/// Presentation style of a question. Grading is identical for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    #[serde(rename = "multiple-choice")]
    MultipleChoice,
    #[serde(rename = "fill-blank")]
    FillBlank,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
}

impl QuizQuestion {
    /// Grade a chosen option by exact match.
    #[must_use]
    pub fn is_correct(&self, option: &str) -> bool {
        option == self.correct_answer
    }

    /// Check the question is answerable.
    ///
    /// # Errors
    ///
    /// Returns `ContentShapeError` if text is blank, there are fewer than two
    /// options, or the answer does not match exactly one option.
    pub fn validate(&self) -> Result<(), ContentShapeError> {
        if self.id.trim().is_empty() {
            return Err(ContentShapeError::BlankField("id"));
        }
        if self.question.trim().is_empty() {
            return Err(ContentShapeError::BlankField("question"));
        }
        if self.options.len() < 2 {
            return Err(ContentShapeError::TooFewOptions {
                id: self.id.clone(),
            });
        }
        let matches = self
            .options
            .iter()
            .filter(|option| **option == self.correct_answer)
            .count();
        if matches != 1 {
            return Err(ContentShapeError::AnswerNotInOptions {
                id: self.id.clone(),
            });
        }
        Ok(())
    }
}

/// Validate a full quiz: exact length, every question well-formed, ids unique.
///
/// # Errors
///
/// Returns the first `ContentShapeError` found.
pub fn validate_quiz(questions: &[QuizQuestion], expected_len: usize) -> Result<(), ContentShapeError> {
    if questions.len() != expected_len {
        return Err(ContentShapeError::WrongQuestionCount {
            expected: expected_len,
            actual: questions.len(),
        });
    }
    let mut seen = HashSet::with_capacity(questions.len());
    for question in questions {
        question.validate()?;
        if !seen.insert(question.id.as_str()) {
            return Err(ContentShapeError::DuplicateId(question.id.clone()));
        }
    }
    Ok(())
}
