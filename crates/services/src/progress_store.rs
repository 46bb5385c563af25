use std::sync::Arc;

use lingo_core::model::{Activity, ProgressError, UserProgress};
use lingo_core::time::Clock;
use storage::repository::{ProgressRepository, StorageError};
use tracing::{error, info, warn};

/// Whether the last write reached durable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    Saved,
    Failed,
}

/// Owns the load/save boundary for the learner's progress record.
///
/// Mutations return the updated record; the caller keeps it as the
/// authoritative copy even when persisting fails.
#[derive(Clone)]
pub struct ProgressStore {
    clock: Clock,
    repo: Arc<dyn ProgressRepository>,
}

impl ProgressStore {
    #[must_use]
    pub fn new(clock: Clock, repo: Arc<dyn ProgressRepository>) -> Self {
        Self { clock, repo }
    }

    /// Load the persisted record, or a fresh default one.
    ///
    /// Missing, corrupt and unreachable slots all yield the default record,
    /// which is not written back until the first mutation. An unreachable slot
    /// is logged at `error` since the next save overwrites whatever it held.
    pub async fn load(&self) -> UserProgress {
        match self.repo.load_progress().await {
            Ok(Some(progress)) => progress,
            Ok(None) => self.default_progress(),
            Err(StorageError::Serialization(reason)) => {
                warn!(%reason, "stored progress is corrupt, starting fresh");
                self.default_progress()
            }
            Err(err) => {
                error!(error = %err, "progress slot unreachable, starting fresh");
                self.default_progress()
            }
        }
    }

    /// Overwrite the persisted record. Failures are logged, never returned.
    pub async fn save(&self, progress: &UserProgress) -> PersistOutcome {
        match self.repo.save_progress(progress).await {
            Ok(()) => PersistOutcome::Saved,
            Err(err) => {
                warn!(error = %err, "failed to persist progress, keeping in-memory copy");
                PersistOutcome::Failed
            }
        }
    }

    /// Set the learner's name and persist.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::EmptyName` for a blank name; nothing is persisted.
    pub async fn complete_onboarding(
        &self,
        progress: &UserProgress,
        name: &str,
    ) -> Result<UserProgress, ProgressError> {
        let next = progress.complete_onboarding(name)?;
        info!(name = next.name(), "onboarding completed");
        self.save(&next).await;
        Ok(next)
    }

    /// Grant experience for a finished activity and persist.
    ///
    /// Each call grants credit; callers must invoke it once per completed activity.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::ZeroAward` for a zero daily-word award; nothing is persisted.
    pub async fn award_experience(
        &self,
        progress: &UserProgress,
        amount: u64,
        activity: Activity,
    ) -> Result<UserProgress, ProgressError> {
        let next = progress.award_experience(amount, activity)?;
        info!(
            amount,
            ?activity,
            xp = next.xp(),
            level = next.level(),
            "experience awarded"
        );
        self.save(&next).await;
        Ok(next)
    }

    fn default_progress(&self) -> UserProgress {
        UserProgress::new_default(self.clock.today())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lingo_core::model::OnboardingStage;
    use lingo_core::time::fixed_clock;
    use storage::repository::InMemoryRepository;

    struct FailingRepository;

    #[async_trait]
    impl ProgressRepository for FailingRepository {
        async fn load_progress(&self) -> Result<Option<UserProgress>, StorageError> {
            Err(StorageError::Connection("disk unplugged".into()))
        }

        async fn save_progress(&self, _progress: &UserProgress) -> Result<(), StorageError> {
            Err(StorageError::Connection("quota exceeded".into()))
        }
    }

    fn store(repo: InMemoryRepository) -> ProgressStore {
        ProgressStore::new(fixed_clock(), Arc::new(repo))
    }

    #[tokio::test]
    async fn load_defaults_without_persisting() {
        let repo = InMemoryRepository::new();
        let progress = store(repo.clone()).load().await;
        assert_eq!(progress, UserProgress::new_default(fixed_clock().today()));
        assert!(repo.raw().unwrap().is_none());
    }

    #[tokio::test]
    async fn load_treats_corrupt_slot_as_absent() {
        let progress = store(InMemoryRepository::with_raw("][")).load().await;
        assert_eq!(progress.xp(), 0);
        assert_eq!(progress.level(), 1);
        assert_eq!(progress.streak(), 1);
        assert_eq!(progress.stage(), OnboardingStage::Onboarding);
    }

    #[tokio::test]
    async fn unreachable_slot_loads_default() {
        let store = ProgressStore::new(fixed_clock(), Arc::new(FailingRepository));
        let progress = store.load().await;
        assert_eq!(progress, UserProgress::new_default(fixed_clock().today()));
    }

    #[tokio::test]
    async fn zero_score_quiz_is_persisted_as_lesson() {
        let repo = InMemoryRepository::new();
        let store = store(repo);
        let progress = store.load().await;
        let progress = store.complete_onboarding(&progress, "Ava").await.unwrap();
        let progress = store
            .award_experience(&progress, 0, Activity::Quiz)
            .await
            .unwrap();
        assert_eq!(progress.xp(), 0);
        assert_eq!(progress.lessons_completed(), 1);
        assert_eq!(store.load().await, progress);
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let repo = InMemoryRepository::new();
        let store = store(repo);
        let progress = UserProgress::from_persisted(
            "Ava".into(),
            340,
            4,
            fixed_clock().today(),
            7,
            9,
        )
        .unwrap();
        assert_eq!(store.save(&progress).await, PersistOutcome::Saved);
        assert_eq!(store.load().await, progress);
    }

    #[tokio::test]
    async fn rejected_onboarding_leaves_slot_untouched() {
        let repo = InMemoryRepository::new();
        let store = store(repo.clone());
        let progress = store.load().await;
        assert_eq!(
            store.complete_onboarding(&progress, "   ").await,
            Err(ProgressError::EmptyName)
        );
        assert!(repo.raw().unwrap().is_none());
    }

    #[tokio::test]
    async fn mutations_are_persisted() {
        let repo = InMemoryRepository::new();
        let store = store(repo.clone());
        let progress = store.load().await;
        let progress = store.complete_onboarding(&progress, "Ava").await.unwrap();
        let progress = store
            .award_experience(&progress, 15, Activity::DailyWord)
            .await
            .unwrap();

        let reloaded = store.load().await;
        assert_eq!(reloaded, progress);
        assert_eq!(reloaded.words_learned(), 1);
    }

    #[tokio::test]
    async fn write_failures_keep_in_memory_record() {
        let store = ProgressStore::new(fixed_clock(), Arc::new(FailingRepository));
        let progress = store.load().await;
        let progress = store.complete_onboarding(&progress, "Ava").await.unwrap();
        let progress = store
            .award_experience(&progress, 30, Activity::Quiz)
            .await
            .unwrap();
        assert_eq!(progress.xp(), 30);
        assert_eq!(progress.lessons_completed(), 1);
        assert_eq!(store.save(&progress).await, PersistOutcome::Failed);
    }
}
