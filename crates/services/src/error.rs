//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by the course and progress API client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RemoteError {
    #[error("course api is not configured")]
    Disabled,
    #[error("resource not found")]
    NotFound,
    #[error("learner is already enrolled in this course")]
    AlreadyEnrolled,
    #[error("request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("invalid api base url: {0}")]
    InvalidBaseUrl(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `ProgressSyncService`.
///
/// Only the local write can fail a save; remote pushes are logged.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyncError {
    #[error(transparent)]
    Local(#[from] StorageError),
}

/// Errors emitted while opening or driving a course session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no learner is signed in")]
    NotSignedIn,
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}
