use serde_json::{Value, json};

/// Number of questions in every quiz.
pub const QUIZ_LENGTH: usize = 5;

/// Topic used when the caller does not pick one.
pub const DEFAULT_QUIZ_TOPIC: &str = "General English";

/// What to ask the generative service for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentRequest {
    DailyWord,
    Quiz { topic: String },
}

impl ContentRequest {
    /// Quiz request, falling back to the default topic for blank input.
    #[must_use]
    pub fn quiz(topic: Option<&str>) -> Self {
        let topic = topic
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_QUIZ_TOPIC);
        Self::Quiz {
            topic: topic.to_owned(),
        }
    }

    /// Short name for the target schema.
    #[must_use]
    pub fn schema_name(&self) -> &'static str {
        match self {
            Self::DailyWord => "word_of_the_day",
            Self::Quiz { .. } => "quiz",
        }
    }

    /// Natural-language instruction sent to the model.
    #[must_use]
    pub fn instruction(&self) -> String {
        match self {
            Self::DailyWord => "Generate a random, interesting English word for an \
                 intermediate learner. Include definition, example sentence, 3 synonyms, \
                 an emoji that represents it, and its IPA pronunciation."
                .to_owned(),
            Self::Quiz { topic } => format!(
                "Generate {QUIZ_LENGTH} multiple-choice or fill-in-the-blank quiz questions \
                 about {topic} for an English learner. Ensure they are varied and fun. \
                 Each correctAnswer must be exactly one of its options."
            ),
        }
    }

    /// JSON schema the response must conform to.
    #[must_use]
    pub fn schema(&self) -> Value {
        match self {
            Self::DailyWord => word_schema(),
            Self::Quiz { .. } => json!({
                "type": "object",
                "properties": {
                    "questions": {
                        "type": "array",
                        "minItems": QUIZ_LENGTH,
                        "maxItems": QUIZ_LENGTH,
                        "items": question_schema(),
                    }
                },
                "required": ["questions"],
                "additionalProperties": false,
            }),
        }
    }
}

fn word_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "word": { "type": "string" },
            "definition": { "type": "string" },
            "example": { "type": "string" },
            "synonyms": { "type": "array", "items": { "type": "string" }, "minItems": 1 },
            "emoji": { "type": "string" },
            "ipa": { "type": "string" },
        },
        "required": ["word", "definition", "example", "synonyms", "emoji", "ipa"],
        "additionalProperties": false,
    })
}

fn question_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "string" },
            "question": { "type": "string" },
            "options": { "type": "array", "items": { "type": "string" } },
            "correctAnswer": { "type": "string" },
            "type": { "type": "string", "enum": ["multiple-choice", "fill-blank"] },
        },
        "required": ["id", "question", "options", "correctAnswer", "type"],
        "additionalProperties": false,
    })
}
