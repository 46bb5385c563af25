use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Experience points granted for finishing a daily word.
pub const DAILY_WORD_XP: u64 = 15;

/// Experience points granted per correct quiz answer.
pub const XP_PER_CORRECT_ANSWER: u64 = 10;

/// Experience points needed to climb one level.
pub const XP_PER_LEVEL: u64 = 100;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("name must not be blank")]
    EmptyName,

    #[error("daily word award must be greater than zero")]
    ZeroAward,

    #[error("streak must be at least 1")]
    InvalidStreak,
}

/// Which learning activity produced an experience award.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Activity {
    DailyWord,
    Quiz,
}

/// Whether the learner has finished signing up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingStage {
    Onboarding,
    Active,
}

/// Level reached with the given amount of experience.
///
/// `level = floor(xp / 100) + 1`
#[must_use]
pub fn level_for_xp(xp: u64) -> u32 {
    u32::try_from(xp / XP_PER_LEVEL)
        .unwrap_or(u32::MAX)
        .saturating_add(1)
}

/// The learner's single progress record.
///
/// `level` is not stored: it is always derived from `xp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProgress {
    name: String,
    xp: u64,
    streak: u32,
    last_login_date: NaiveDate,
    words_learned: u32,
    lessons_completed: u32,
}

impl UserProgress {
    /// Fresh record for a first run.
    #[must_use]
    pub fn new_default(today: NaiveDate) -> Self {
        Self {
            name: String::new(),
            xp: 0,
            streak: 1,
            last_login_date: today,
            words_learned: 0,
            lessons_completed: 0,
        }
    }

    /// Rehydrate a record from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::InvalidStreak` if `streak` is zero.
    pub fn from_persisted(
        name: String,
        xp: u64,
        streak: u32,
        last_login_date: NaiveDate,
        words_learned: u32,
        lessons_completed: u32,
    ) -> Result<Self, ProgressError> {
        if streak == 0 {
            return Err(ProgressError::InvalidStreak);
        }
        Ok(Self {
            name,
            xp,
            streak,
            last_login_date,
            words_learned,
            lessons_completed,
        })
    }

    /// Returns a copy with the learner's name set.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::EmptyName` if the trimmed name is empty.
    pub fn complete_onboarding(&self, name: &str) -> Result<Self, ProgressError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProgressError::EmptyName);
        }
        Ok(Self {
            name: name.to_owned(),
            ..self.clone()
        })
    }

    /// Returns a copy with `amount` experience added and the counter for
    /// `activity` bumped by one.
    ///
    /// Calling this twice grants double credit. A quiz with no correct answers
    /// still counts as a completed lesson, so `Activity::Quiz` accepts zero.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::ZeroAward` if `amount` is zero for `Activity::DailyWord`.
    pub fn award_experience(&self, amount: u64, activity: Activity) -> Result<Self, ProgressError> {
        if amount == 0 && activity == Activity::DailyWord {
            return Err(ProgressError::ZeroAward);
        }
        let mut next = self.clone();
        next.xp = next.xp.saturating_add(amount);
        match activity {
            Activity::DailyWord => next.words_learned = next.words_learned.saturating_add(1),
            Activity::Quiz => next.lessons_completed = next.lessons_completed.saturating_add(1),
        }
        Ok(next)
    }

    #[must_use]
    pub fn stage(&self) -> OnboardingStage {
        if self.name.is_empty() {
            OnboardingStage::Onboarding
        } else {
            OnboardingStage::Active
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn xp(&self) -> u64 {
        self.xp
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        level_for_xp(self.xp)
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.streak
    }

    #[must_use]
    pub fn last_login_date(&self) -> NaiveDate {
        self.last_login_date
    }

    #[must_use]
    pub fn words_learned(&self) -> u32 {
        self.words_learned
    }

    #[must_use]
    pub fn lessons_completed(&self) -> u32 {
        self.lessons_completed
    }
}
