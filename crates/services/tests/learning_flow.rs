use std::sync::Arc;

use lingo_core::model::{Activity, DailyWordSession, OnboardingStage, QuizSession, UserProgress};
use lingo_core::time::fixed_clock;
use services::{AppServices, ContentProvider, ProgressStore};
use storage::repository::{InMemoryRepository, ProgressRepository};

#[tokio::test]
async fn new_learner_onboards_and_learns_a_word() {
    let app = AppServices::in_memory(fixed_clock(), ContentProvider::offline());
    let store = app.progress();

    let progress = store.load().await;
    assert_eq!(progress.name(), "");
    assert_eq!(progress.stage(), OnboardingStage::Onboarding);

    let progress = store.complete_onboarding(&progress, "Ava").await.unwrap();
    assert_eq!(progress.name(), "Ava");
    assert_eq!(progress.stage(), OnboardingStage::Active);

    let mut session = DailyWordSession::new(app.content().fetch_daily_word().await);
    assert_eq!(session.word().word, "Serendipity");
    session.flip();

    let award = session.complete().expect("first completion awards xp");
    let progress = store
        .award_experience(&progress, award, Activity::DailyWord)
        .await
        .unwrap();
    assert!(session.complete().is_none());

    assert_eq!(progress.xp(), 15);
    assert_eq!(progress.level(), 1);
    assert_eq!(progress.words_learned(), 1);
    assert_eq!(progress.lessons_completed(), 0);
}

#[tokio::test]
async fn quiz_with_three_correct_answers_levels_up() {
    let repo = InMemoryRepository::new();
    let seeded =
        UserProgress::from_persisted("Ava".into(), 95, 1, fixed_clock().today(), 2, 0).unwrap();
    repo.save_progress(&seeded).await.unwrap();

    let store = ProgressStore::new(fixed_clock(), Arc::new(repo.clone()));
    let progress = store.load().await;
    assert_eq!(progress.xp(), 95);

    let questions = ContentProvider::offline().fetch_quiz(None).await;
    let mut quiz = QuizSession::new(questions).unwrap();
    let mut answered_right = 0;
    while let Some(question) = quiz.current().cloned() {
        let choice = if answered_right < 3 {
            answered_right += 1;
            question.correct_answer.clone()
        } else {
            question
                .options
                .iter()
                .find(|option| **option != question.correct_answer)
                .cloned()
                .unwrap()
        };
        quiz.answer(&choice).unwrap();
        quiz.advance().unwrap();
    }
    assert_eq!(quiz.score(), 3);

    let earned = quiz.finish().unwrap();
    assert_eq!(earned, 30);
    let progress = store
        .award_experience(&progress, earned, Activity::Quiz)
        .await
        .unwrap();

    assert_eq!(progress.xp(), 125);
    assert_eq!(progress.level(), 2);
    assert_eq!(progress.lessons_completed(), 1);
    assert_eq!(progress.words_learned(), 2);

    let restarted = ProgressStore::new(fixed_clock(), Arc::new(repo));
    assert_eq!(restarted.load().await, progress);
}

#[tokio::test]
async fn zero_score_quiz_counts_lesson() {
    let app = AppServices::in_memory(fixed_clock(), ContentProvider::offline());
    let store = app.progress();
    let progress = store.load().await;
    let progress = store.complete_onboarding(&progress, "Ava").await.unwrap();

    let mut quiz = QuizSession::new(app.content().fetch_quiz(None).await).unwrap();
    while let Some(question) = quiz.current().cloned() {
        let wrong = question
            .options
            .iter()
            .find(|option| **option != question.correct_answer)
            .cloned()
            .unwrap();
        quiz.answer(&wrong).unwrap();
        quiz.advance().unwrap();
    }
    assert_eq!(quiz.score(), 0);

    let progress = store
        .award_experience(&progress, quiz.finish().unwrap(), Activity::Quiz)
        .await
        .unwrap();
    assert_eq!(progress.xp(), 0);
    assert_eq!(progress.lessons_completed(), 1);
    assert_eq!(store.load().await, progress);
}

#[tokio::test]
async fn sqlite_backed_services_survive_restart() {
    let url = "sqlite:file:memdb_services_restart?mode=memory&cache=shared";
    let app = AppServices::new_sqlite(url, fixed_clock(), ContentProvider::offline())
        .await
        .expect("sqlite services");
    let store = app.progress();
    let progress = store.load().await;
    let progress = store.complete_onboarding(&progress, "  Ava  ").await.unwrap();
    let progress = store
        .award_experience(&progress, 15, Activity::DailyWord)
        .await
        .unwrap();

    let again = AppServices::new_sqlite(url, fixed_clock(), ContentProvider::offline())
        .await
        .expect("sqlite services");
    drop(app);
    assert_eq!(again.progress().load().await, progress);
}
