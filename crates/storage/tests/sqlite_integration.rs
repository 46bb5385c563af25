use lingo_core::model::{Activity, UserProgress};
use lingo_core::time::fixed_clock;
use storage::repository::{PROGRESS_KEY, ProgressRepository, Storage};
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

fn learner() -> UserProgress {
    UserProgress::new_default(fixed_clock().today())
        .complete_onboarding("Ava")
        .unwrap()
}

#[tokio::test]
async fn sqlite_slot_starts_empty() {
    let repo = connect("memdb_empty").await;
    assert!(repo.load_progress().await.unwrap().is_none());
}

#[tokio::test]
async fn sqlite_roundtrip_overwrites_slot() {
    let repo = connect("memdb_roundtrip").await;

    let first = learner();
    repo.save_progress(&first).await.unwrap();

    let second = first.award_experience(15, Activity::DailyWord).unwrap();
    repo.save_progress(&second).await.unwrap();

    let loaded = repo.load_progress().await.unwrap().expect("stored");
    assert_eq!(loaded, second);
    assert_eq!(loaded.words_learned(), 1);

    let raw = repo.get_raw(PROGRESS_KEY).await.unwrap().expect("raw");
    assert!(raw.contains("\"wordsLearned\":1"));
}

#[tokio::test]
async fn sqlite_corrupt_slot_is_an_error() {
    let repo = connect("memdb_corrupt").await;
    repo.put_raw(PROGRESS_KEY, "{\"xp\": \"lots\"}").await.unwrap();
    assert!(repo.load_progress().await.is_err());
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = connect("memdb_migrate_twice").await;
    repo.migrate().await.expect("second migrate");
    repo.save_progress(&learner()).await.unwrap();
    assert!(repo.load_progress().await.unwrap().is_some());
}

#[tokio::test]
async fn storage_sqlite_wires_progress_repo() {
    let storage = Storage::sqlite("sqlite:file:memdb_storage?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage.progress.save_progress(&learner()).await.unwrap();
    let loaded = storage.progress.load_progress().await.unwrap().unwrap();
    assert_eq!(loaded.name(), "Ava");
}
