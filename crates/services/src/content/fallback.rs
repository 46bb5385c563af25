//! Bundled content served when the generative service is unavailable.

use lingo_core::model::{QuestionKind, QuizQuestion, WordOfTheDay};
use rand::rng;
use rand::seq::SliceRandom;

/// The word served whenever a live word cannot be fetched.
#[must_use]
pub fn fallback_word() -> WordOfTheDay {
    WordOfTheDay {
        word: "Serendipity".into(),
        definition: "The occurrence and development of events by chance in a happy or beneficial way."
            .into(),
        example: "It was pure serendipity that we met at the coffee shop right before the rain started."
            .into(),
        synonyms: vec!["Chance".into(), "Fate".into(), "Luck".into()],
        emoji: "🍀".into(),
        ipa: "/ˌsɛrənˈdɪpɪti/".into(),
    }
}

fn question(
    id: &str,
    kind: QuestionKind,
    question: &str,
    options: [&str; 4],
    correct_answer: &str,
) -> QuizQuestion {
    QuizQuestion {
        id: id.to_owned(),
        question: question.to_owned(),
        options: options.iter().map(|o| (*o).to_owned()).collect(),
        correct_answer: correct_answer.to_owned(),
        kind,
    }
}

/// The fixed ten-question pool.
#[must_use]
pub fn fallback_quiz_pool() -> Vec<QuizQuestion> {
    use QuestionKind::{FillBlank, MultipleChoice};

    vec![
        question(
            "q1",
            MultipleChoice,
            "Which word is a synonym for 'Happy'?",
            ["Sad", "Joyful", "Angry", "Tired"],
            "Joyful",
        ),
        question(
            "q2",
            FillBlank,
            "The cat sat ___ the mat.",
            ["in", "on", "at", "to"],
            "on",
        ),
        question(
            "q3",
            MultipleChoice,
            "What is the opposite of 'Cold'?",
            ["Hot", "Freezing", "Cool", "Icy"],
            "Hot",
        ),
        question(
            "q4",
            MultipleChoice,
            "Which of these is a fruit?",
            ["Carrot", "Apple", "Potato", "Broccoli"],
            "Apple",
        ),
        question(
            "q5",
            FillBlank,
            "She ___ to the store yesterday.",
            ["go", "goes", "went", "going"],
            "went",
        ),
        question(
            "q6",
            MultipleChoice,
            "Select the correct plural form of 'Child'.",
            ["Childs", "Children", "Childrens", "Childes"],
            "Children",
        ),
        question(
            "q7",
            FillBlank,
            "I have been waiting ___ two hours.",
            ["since", "for", "in", "by"],
            "for",
        ),
        question(
            "q8",
            MultipleChoice,
            "What does the idiom 'Break a leg' mean?",
            ["Get hurt", "Good luck", "Give up", "Run fast"],
            "Good luck",
        ),
        question(
            "q9",
            MultipleChoice,
            "Which word is a verb?",
            ["Run", "Blue", "Table", "Quickly"],
            "Run",
        ),
        question(
            "q10",
            FillBlank,
            "He is ___ than his brother.",
            ["tall", "taller", "tallest", "more tall"],
            "taller",
        ),
    ]
}

/// Shuffle the pool and keep the first `count` questions.
#[must_use]
pub fn sample_fallback_quiz(count: usize) -> Vec<QuizQuestion> {
    let mut pool = fallback_quiz_pool();
    pool.shuffle(&mut rng());
    pool.truncate(count);
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_core::model::validate_quiz;
    use std::collections::HashSet;

    #[test]
    fn bundled_content_is_well_formed() {
        assert!(fallback_word().validate().is_ok());
        let pool = fallback_quiz_pool();
        assert!(validate_quiz(&pool, 10).is_ok());
    }

    #[test]
    fn sample_is_a_subset_without_repeats() {
        let pool_ids: HashSet<String> = fallback_quiz_pool().into_iter().map(|q| q.id).collect();
        for _ in 0..50 {
            let sample = sample_fallback_quiz(5);
            assert_eq!(sample.len(), 5);
            let ids: HashSet<&str> = sample.iter().map(|q| q.id.as_str()).collect();
            assert_eq!(ids.len(), 5);
            assert!(ids.iter().all(|id| pool_ids.contains(*id)));
        }
    }

    #[test]
    fn oversized_sample_returns_whole_pool() {
        assert_eq!(sample_fallback_quiz(50).len(), 10);
    }

    #[test]
    fn every_question_eventually_appears() {
        let mut seen = HashSet::new();
        for _ in 0..200 {
            seen.extend(sample_fallback_quiz(5).into_iter().map(|q| q.id));
        }
        assert_eq!(seen.len(), 10);
    }
}
