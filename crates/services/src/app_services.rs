use std::sync::Arc;

use course_core::model::{CourseId, LearnerId, SessionContext};
use storage::repository::{SessionRepository, Storage};

use crate::api_client::{ApiClient, CourseOverview, EnrolledCourse, Enrollment};
use crate::config::ApiConfig;
use crate::course_session::CourseSession;
use crate::error::{AppServicesError, RemoteError, SessionError};
use crate::progress_sync::ProgressSyncService;
use crate::remote::{CourseCatalog, RemoteProgress};
use crate::Clock;

/// Assembles app-facing services around one storage backend and one API.
#[derive(Clone)]
pub struct AppServices {
    sessions: Arc<dyn SessionRepository>,
    catalog: Arc<dyn CourseCatalog>,
    api: Option<Arc<ApiClient>>,
    sync: ProgressSyncService,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the HTTP API.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the HTTP
    /// client cannot be built.
    pub async fn new_sqlite(
        db_url: &str,
        api: ApiConfig,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let client = Arc::new(ApiClient::new(api)?);
        tracing::debug!(api = %client.config().base_url, "app services ready");

        let catalog: Arc<dyn CourseCatalog> = client.clone();
        let remote: Arc<dyn RemoteProgress> = client.clone();
        let mut services = Self::with_parts(storage, catalog, remote, clock);
        services.api = Some(client);
        Ok(services)
    }

    /// Wire services from explicit parts. Account endpoints are unavailable.
    #[must_use]
    pub fn with_parts(
        storage: Storage,
        catalog: Arc<dyn CourseCatalog>,
        remote: Arc<dyn RemoteProgress>,
        clock: Clock,
    ) -> Self {
        let sync = ProgressSyncService::new(clock, Arc::clone(&storage.progress), remote);
        Self {
            sessions: storage.sessions,
            catalog,
            api: None,
            sync,
        }
    }

    #[must_use]
    pub fn sync(&self) -> ProgressSyncService {
        self.sync.clone()
    }

    /// Remember `learner` as the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the session cannot be written.
    pub async fn sign_in(&self, learner: LearnerId) -> Result<SessionContext, SessionError> {
        let session = SessionContext::new(learner);
        self.sessions.save_session(&session).await?;
        tracing::info!(learner = %session.learner(), "signed in");
        Ok(session)
    }

    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the session cannot be removed.
    pub async fn sign_out(&self) -> Result<(), SessionError> {
        self.sessions.clear_session().await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the session store is unreadable.
    pub async fn current_session(&self) -> Result<Option<SessionContext>, SessionError> {
        Ok(self.sessions.current_session().await?)
    }

    /// Open a course for the signed-in learner.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotSignedIn` without a session, or the course
    /// retrieval failure.
    pub async fn open_course(&self, course_id: &CourseId) -> Result<CourseSession, SessionError> {
        let session = self.current_session().await?;
        CourseSession::open(
            self.catalog.as_ref(),
            self.sync.clone(),
            course_id,
            session.as_ref(),
        )
        .await
    }

    /// # Errors
    ///
    /// Returns `SessionError::NotSignedIn` without a session, or the API failure.
    pub async fn enroll(&self, course_id: &CourseId) -> Result<Enrollment, SessionError> {
        let session = self.require_session().await?;
        Ok(self.api()?.enroll(course_id, session.learner()).await?)
    }

    /// # Errors
    ///
    /// Returns `SessionError::NotSignedIn` without a session, or the API failure.
    pub async fn enrolled_courses(&self) -> Result<Vec<EnrolledCourse>, SessionError> {
        let session = self.require_session().await?;
        Ok(self.api()?.enrolled_courses(session.learner()).await?)
    }

    /// # Errors
    ///
    /// Returns the API failure.
    pub async fn list_courses(
        &self,
        category: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<CourseOverview>, SessionError> {
        Ok(self.api()?.list_courses(category, search).await?)
    }

    async fn require_session(&self) -> Result<SessionContext, SessionError> {
        self.current_session()
            .await?
            .ok_or(SessionError::NotSignedIn)
    }

    fn api(&self) -> Result<&ApiClient, RemoteError> {
        self.api
            .as_deref()
            .ok_or(RemoteError::Disabled)
    }
}
