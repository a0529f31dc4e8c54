mod common;

use std::sync::Arc;

use common::{FakeRemote, sample_course};
use course_core::model::{CourseId, LearnerId, LessonId};
use course_core::time::fixed_clock;
use serde_json::json;
use services::{AppServices, RemoteError, SessionError};
use storage::{InMemoryRepository, Storage};

fn services_over(repo: &InMemoryRepository, remote: &Arc<FakeRemote>) -> AppServices {
    let storage = Storage {
        progress: Arc::new(repo.clone()),
        sessions: Arc::new(repo.clone()),
    };
    AppServices::with_parts(storage, remote.clone(), remote.clone(), fixed_clock())
}

fn course_id() -> CourseId {
    CourseId::new("rust-101")
}

#[tokio::test]
async fn sign_in_stores_username_under_user_key() {
    let repo = InMemoryRepository::new();
    let services = services_over(&repo, &FakeRemote::with_course(sample_course()));

    let session = services.sign_in(LearnerId::new("ada")).await.unwrap();
    assert_eq!(session.learner().as_str(), "ada");

    let raw = repo.raw("user").unwrap().expect("stored session");
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored, json!({"username": "ada"}));

    let current = services.current_session().await.unwrap().unwrap();
    assert_eq!(current.learner(), &LearnerId::new("ada"));
}

#[tokio::test]
async fn sign_out_forgets_the_learner() {
    let repo = InMemoryRepository::new();
    let services = services_over(&repo, &FakeRemote::with_course(sample_course()));

    services.sign_in(LearnerId::new("ada")).await.unwrap();
    services.sign_out().await.unwrap();

    assert!(repo.raw("user").unwrap().is_none());
    assert!(services.current_session().await.unwrap().is_none());
    assert!(matches!(
        services.open_course(&course_id()).await,
        Err(SessionError::NotSignedIn)
    ));
}

#[tokio::test]
async fn opening_a_course_needs_a_stored_session() {
    let remote = FakeRemote::with_course(sample_course());
    let services =
        AppServices::with_parts(Storage::in_memory(), remote.clone(), remote, fixed_clock());

    let result = services.open_course(&course_id()).await;
    assert!(matches!(result, Err(SessionError::NotSignedIn)));
}

#[tokio::test]
async fn opened_course_shares_the_sync_service() {
    let remote = FakeRemote::with_course(sample_course());
    let services = AppServices::with_parts(
        Storage::in_memory(),
        remote.clone(),
        remote.clone(),
        fixed_clock(),
    );
    services.sign_in(LearnerId::new("ada")).await.unwrap();

    let mut session = services.open_course(&course_id()).await.unwrap();
    assert_eq!(session.key().to_string(), "course_rust-101_ada");
    assert!(session.mark_lesson_complete(&LessonId::new("l1")).await);
    session.flush().await;

    let reloaded = services.sync().load(session.key(), sample_course()).await;
    assert!(reloaded.tracker.state().is_lesson_completed(&LessonId::new("l1")));
    assert_eq!(reloaded.tracker.state().overall_progress(), 25);
    assert_eq!(remote.fetch_count(), 1);
    assert_eq!(remote.pushes().len(), 1);
}

#[tokio::test]
async fn account_endpoints_need_an_api_client() {
    let repo = InMemoryRepository::new();
    let services = services_over(&repo, &FakeRemote::with_course(sample_course()));
    services.sign_in(LearnerId::new("ada")).await.unwrap();

    assert!(matches!(
        services.enroll(&course_id()).await,
        Err(SessionError::Remote(RemoteError::Disabled))
    ));
    assert!(matches!(
        services.enrolled_courses().await,
        Err(SessionError::Remote(RemoteError::Disabled))
    ));
    assert!(matches!(
        services.list_courses(None, None).await,
        Err(SessionError::Remote(RemoteError::Disabled))
    ));
}

#[tokio::test]
async fn enrollment_without_session_is_refused_first() {
    let services = services_over(
        &InMemoryRepository::new(),
        &FakeRemote::with_course(sample_course()),
    );
    assert!(matches!(
        services.enroll(&course_id()).await,
        Err(SessionError::NotSignedIn)
    ));
}
