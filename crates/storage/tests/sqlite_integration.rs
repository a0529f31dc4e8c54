use std::collections::BTreeMap;

use course_core::model::{
    CourseId, LearnerId, LessonId, ProgressKey, ProgressRecord, QuizId, SessionContext,
};
use course_core::time::fixed_now;
use storage::repository::{LocalProgressRepository, SessionRepository, StorageError};
use storage::sqlite::SqliteRepository;

async fn repo(name: &str) -> SqliteRepository {
    let repo = SqliteRepository::connect(&format!("sqlite:file:{name}?mode=memory&cache=shared"))
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

fn key(learner: &str) -> ProgressKey {
    ProgressKey::new(CourseId::new("-Nq7course"), LearnerId::new(learner))
}

#[tokio::test]
async fn sqlite_round_trips_progress_record() {
    let repo = repo("memdb_progress_roundtrip").await;
    let record = ProgressRecord {
        completed_lessons: vec![LessonId::new("1712000000001")],
        quiz_answers: BTreeMap::from([(QuizId::new("1712000000009"), 2)]),
        quiz_submitted: BTreeMap::from([(QuizId::new("1712000000009"), true)]),
        quiz_results: BTreeMap::from([(QuizId::new("1712000000009"), true)]),
        certificate_unlocked: false,
        overall_progress: 67,
        last_updated: Some(fixed_now()),
    };

    repo.save_progress(&key("ada"), &record).await.unwrap();
    let loaded = repo.load_progress(&key("ada")).await.unwrap();
    assert_eq!(loaded, Some(record));
    assert!(repo.load_progress(&key("grace")).await.unwrap().is_none());
}

#[tokio::test]
async fn sqlite_save_overwrites_previous_record() {
    let repo = repo("memdb_progress_overwrite").await;
    let first = ProgressRecord {
        overall_progress: 10,
        ..ProgressRecord::default()
    };
    let second = ProgressRecord {
        overall_progress: 40,
        ..ProgressRecord::default()
    };
    repo.save_progress(&key("ada"), &first).await.unwrap();
    repo.save_progress(&key("ada"), &second).await.unwrap();

    let loaded = repo.load_progress(&key("ada")).await.unwrap().unwrap();
    assert_eq!(loaded.overall_progress, 40);
}

#[tokio::test]
async fn sqlite_uses_browser_key_scheme() {
    let repo = repo("memdb_progress_keys").await;
    repo.save_progress(&key("ada"), &ProgressRecord::default())
        .await
        .unwrap();

    let stored: Option<String> =
        sqlx::query_scalar("SELECT key FROM local_storage WHERE key = 'course_-Nq7course_ada'")
            .fetch_optional(repo.pool())
            .await
            .unwrap();
    assert!(stored.is_some());
}

#[tokio::test]
async fn sqlite_reports_malformed_json() {
    let repo = repo("memdb_progress_malformed").await;
    sqlx::query("INSERT INTO local_storage (key, value, updated_at) VALUES (?1, ?2, ?3)")
        .bind("course_-Nq7course_ada")
        .bind("[1, 2")
        .bind(fixed_now())
        .execute(repo.pool())
        .await
        .unwrap();

    let err = repo.load_progress(&key("ada")).await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}

#[tokio::test]
async fn sqlite_session_lifecycle() {
    let repo = repo("memdb_session").await;
    assert!(repo.current_session().await.unwrap().is_none());

    repo.save_session(&SessionContext::new("ada")).await.unwrap();
    assert_eq!(
        repo.current_session().await.unwrap(),
        Some(SessionContext::new("ada"))
    );

    repo.clear_session().await.unwrap();
    assert!(repo.current_session().await.unwrap().is_none());
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = repo("memdb_migrate_twice").await;
    repo.migrate().await.expect("second migrate");
}
