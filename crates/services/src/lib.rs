#![forbid(unsafe_code)]

pub mod api_client;
pub mod app_services;
pub mod config;
pub mod course_session;
pub mod error;
pub mod progress_sync;
pub mod remote;

pub use course_core::Clock;

pub use api_client::{ApiClient, CourseOverview, EnrolledCourse, Enrollment};
pub use app_services::AppServices;
pub use config::ApiConfig;
pub use course_session::{CourseSession, ProgressSummary};
pub use error::{AppServicesError, RemoteError, SessionError, SyncError};
pub use progress_sync::{LoadedProgress, ProgressSyncService};
pub use remote::{CourseCatalog, RemoteProgress};
