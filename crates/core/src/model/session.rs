use thiserror::Error;

use crate::model::{DAILY_WORD_XP, QuizQuestion, WordOfTheDay, XP_PER_CORRECT_ANSWER};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz has no questions")]
    Empty,

    #[error("quiz is already finished")]
    Finished,

    #[error("current question was already answered")]
    AlreadyAnswered,

    #[error("current question has not been answered yet")]
    NotAnswered,

    #[error("quiz is not finished")]
    Unfinished,

    #[error("quiz reward was already claimed")]
    AlreadyRewarded,
}

/// One word-of-the-day viewing.
///
/// The `completed` flag gates the experience award so it can only be claimed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyWordSession {
    word: WordOfTheDay,
    revealed: bool,
    completed: bool,
}

impl DailyWordSession {
    #[must_use]
    pub fn new(word: WordOfTheDay) -> Self {
        Self {
            word,
            revealed: false,
            completed: false,
        }
    }

    #[must_use]
    pub fn word(&self) -> &WordOfTheDay {
        &self.word
    }

    /// Flip the card between the word and its definition.
    pub fn flip(&mut self) {
        self.revealed = !self.revealed;
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Mark the word as learned. Yields the xp to award on the first call only.
    pub fn complete(&mut self) -> Option<u64> {
        if self.completed {
            return None;
        }
        self.completed = true;
        Some(DAILY_WORD_XP)
    }
}

/// Result of answering the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub selected: String,
    pub correct: bool,
    pub correct_answer: String,
}

/// A run through an ordered list of quiz questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    current: usize,
    score: u32,
    answer: Option<AnswerOutcome>,
    finished: bool,
    rewarded: bool,
}

impl QuizSession {
    /// Start a quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` if no questions are supplied.
    pub fn new(questions: Vec<QuizQuestion>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::Empty);
        }
        Ok(Self {
            questions,
            current: 0,
            score: 0,
            answer: None,
            finished: false,
            rewarded: false,
        })
    }

    /// The question being asked, or `None` once the quiz is finished.
    #[must_use]
    pub fn current(&self) -> Option<&QuizQuestion> {
        if self.finished {
            return None;
        }
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Answer the current question. Only the first answer counts.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Finished` after the last question, or
    /// `QuizError::AlreadyAnswered` if this question already has an answer.
    pub fn answer(&mut self, option: &str) -> Result<AnswerOutcome, QuizError> {
        if self.finished {
            return Err(QuizError::Finished);
        }
        if self.answer.is_some() {
            return Err(QuizError::AlreadyAnswered);
        }
        let question = &self.questions[self.current];
        let correct = question.is_correct(option);
        if correct {
            self.score = self.score.saturating_add(1);
        }
        let outcome = AnswerOutcome {
            selected: option.to_owned(),
            correct,
            correct_answer: question.correct_answer.clone(),
        };
        self.answer = Some(outcome.clone());
        Ok(outcome)
    }

    /// Move to the next question, or finish after the last one.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotAnswered` if the current question has no answer yet,
    /// or `QuizError::Finished` if there is nothing left.
    pub fn advance(&mut self) -> Result<(), QuizError> {
        if self.finished {
            return Err(QuizError::Finished);
        }
        if self.answer.is_none() {
            return Err(QuizError::NotAnswered);
        }
        self.answer = None;
        if self.current + 1 < self.questions.len() {
            self.current += 1;
        } else {
            self.finished = true;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.finished && self.score as usize == self.questions.len()
    }

    /// Share of questions already passed, in percent.
    #[must_use]
    pub fn progress_percent(&self) -> u32 {
        if self.finished {
            return 100;
        }
        let percent = self.current * 100 / self.questions.len();
        u32::try_from(percent).unwrap_or(100)
    }

    /// Experience earned so far.
    #[must_use]
    pub fn xp_earned(&self) -> u64 {
        u64::from(self.score) * XP_PER_CORRECT_ANSWER
    }

    /// Claim the reward for a finished quiz. Succeeds once.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Unfinished` before the quiz ends and
    /// `QuizError::AlreadyRewarded` on repeated calls.
    pub fn finish(&mut self) -> Result<u64, QuizError> {
        if !self.finished {
            return Err(QuizError::Unfinished);
        }
        if self.rewarded {
            return Err(QuizError::AlreadyRewarded);
        }
        self.rewarded = true;
        Ok(self.xp_earned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionKind;

    fn questions(n: usize) -> Vec<QuizQuestion> {
        (1..=n)
            .map(|i| QuizQuestion {
                id: format!("q{i}"),
                question: format!("Question {i}"),
                options: vec!["right".into(), "wrong".into()],
                correct_answer: "right".into(),
                kind: QuestionKind::MultipleChoice,
            })
            .collect()
    }

    fn word() -> WordOfTheDay {
        WordOfTheDay {
            word: "Serendipity".into(),
            definition: "A happy accident.".into(),
            example: "It was serendipity.".into(),
            synonyms: vec!["Luck".into()],
            emoji: "🍀".into(),
            ipa: "/ˌsɛrənˈdɪpɪti/".into(),
        }
    }

    #[test]
    fn daily_word_awards_once() {
        let mut session = DailyWordSession::new(word());
        session.flip();
        assert!(session.is_revealed());
        assert_eq!(session.complete(), Some(DAILY_WORD_XP));
        assert_eq!(session.complete(), None);
        assert!(session.is_completed());
    }

    #[test]
    fn empty_quiz_is_rejected() {
        assert_eq!(QuizSession::new(Vec::new()), Err(QuizError::Empty));
    }

    #[test]
    fn scores_three_of_five() {
        let mut quiz = QuizSession::new(questions(5)).unwrap();
        for (i, choice) in ["right", "wrong", "right", "wrong", "right"].iter().enumerate() {
            assert_eq!(quiz.current_index(), i);
            let outcome = quiz.answer(choice).unwrap();
            assert_eq!(outcome.correct, *choice == "right");
            assert_eq!(outcome.correct_answer, "right");
            quiz.advance().unwrap();
        }
        assert!(quiz.is_finished());
        assert!(quiz.current().is_none());
        assert_eq!(quiz.score(), 3);
        assert!(!quiz.is_perfect());
        assert_eq!(quiz.finish(), Ok(30));
        assert_eq!(quiz.finish(), Err(QuizError::AlreadyRewarded));
    }

    #[test]
    fn second_answer_does_not_count() {
        let mut quiz = QuizSession::new(questions(2)).unwrap();
        quiz.answer("wrong").unwrap();
        assert_eq!(quiz.answer("right"), Err(QuizError::AlreadyAnswered));
        assert_eq!(quiz.score(), 0);
    }

    #[test]
    fn cannot_skip_unanswered_question() {
        let mut quiz = QuizSession::new(questions(2)).unwrap();
        assert_eq!(quiz.advance(), Err(QuizError::NotAnswered));
        assert_eq!(quiz.finish(), Err(QuizError::Unfinished));
    }

    #[test]
    fn progress_tracks_position() {
        let mut quiz = QuizSession::new(questions(4)).unwrap();
        assert_eq!(quiz.progress_percent(), 0);
        quiz.answer("right").unwrap();
        quiz.advance().unwrap();
        assert_eq!(quiz.progress_percent(), 25);
        while !quiz.is_finished() {
            quiz.answer("right").unwrap();
            quiz.advance().unwrap();
        }
        assert_eq!(quiz.progress_percent(), 100);
        assert!(quiz.is_perfect());
        assert_eq!(quiz.answer("right"), Err(QuizError::Finished));
    }
}
