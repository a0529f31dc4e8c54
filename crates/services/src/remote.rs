use async_trait::async_trait;

use course_core::model::{Course, CourseId, ProgressKey, ProgressRecord};

use crate::error::RemoteError;

/// Read access to published courses.
#[async_trait]
pub trait CourseCatalog: Send + Sync {
    /// # Errors
    ///
    /// Returns `RemoteError::NotFound` for unknown courses, or a transport error.
    async fn fetch_course(&self, id: &CourseId) -> Result<Course, RemoteError>;
}

/// Server-side copy of learner progress.
#[async_trait]
pub trait RemoteProgress: Send + Sync {
    /// Fetch the stored record, `None` when the server has none.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` on transport failures, unexpected statuses or
    /// bodies that do not parse as a progress record.
    async fn fetch_progress(&self, key: &ProgressKey) -> Result<Option<ProgressRecord>, RemoteError>;

    /// Replace the stored record.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` when the server rejects or never receives the record.
    async fn upsert_progress(&self, key: &ProgressKey, record: &ProgressRecord) -> Result<(), RemoteError>;
}
