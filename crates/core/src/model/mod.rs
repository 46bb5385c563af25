mod progress;
mod quiz;
mod session;
mod word;

pub use progress::{
    Activity, DAILY_WORD_XP, OnboardingStage, ProgressError, UserProgress, XP_PER_CORRECT_ANSWER,
    XP_PER_LEVEL, level_for_xp,
};
pub use quiz::{QuestionKind, QuizQuestion, validate_quiz};
pub use session::{AnswerOutcome, DailyWordSession, QuizError, QuizSession};
pub use word::{ContentShapeError, WordOfTheDay};
