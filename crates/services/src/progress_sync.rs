use std::sync::Arc;

use tokio::task::JoinHandle;

use course_core::model::{Course, ProgressKey, ProgressRecord};
use course_core::{Clock, ProgressTracker};
use storage::repository::LocalProgressRepository;

use crate::error::SyncError;
use crate::remote::RemoteProgress;

/// Progress resolved by [`ProgressSyncService::load`].
#[derive(Debug)]
pub struct LoadedProgress {
    pub tracker: ProgressTracker,
    /// The stored record predates an unlock the recomputed state grants.
    pub stale: bool,
}

impl LoadedProgress {
    fn resumed(course: Course, record: &ProgressRecord, clock: Clock) -> Self {
        let tracker = ProgressTracker::from_record(course, record, clock);
        let stale = tracker.state().certificate_unlocked() && !record.certificate_unlocked;
        Self { tracker, stale }
    }

    fn fresh(course: Course, clock: Clock) -> Self {
        Self {
            tracker: ProgressTracker::new(course, clock),
            stale: false,
        }
    }
}

/// Keeps local progress authoritative and mirrors it to the server.
///
/// Loads prefer the local record, fall back to the server (caching what it
/// returns), and finally start empty. Saves write locally first, then push
/// to the server on a detached task whose failures are only logged.
#[derive(Clone)]
pub struct ProgressSyncService {
    clock: Clock,
    local: Arc<dyn LocalProgressRepository>,
    remote: Arc<dyn RemoteProgress>,
}

impl ProgressSyncService {
    #[must_use]
    pub fn new(
        clock: Clock,
        local: Arc<dyn LocalProgressRepository>,
        remote: Arc<dyn RemoteProgress>,
    ) -> Self {
        Self {
            clock,
            local,
            remote,
        }
    }

    /// Resolve the learner's progress for `course`. Never fails.
    pub async fn load(&self, key: &ProgressKey, course: Course) -> LoadedProgress {
        match self.local.load_progress(key).await {
            Ok(Some(record)) => {
                tracing::debug!(%key, "progress loaded from local store");
                return LoadedProgress::resumed(course, &record, self.clock);
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(%key, error = %err, "ignoring unreadable local progress");
            }
        }

        match self.remote.fetch_progress(key).await {
            Ok(Some(record)) => {
                tracing::debug!(%key, "progress loaded from server");
                if let Err(err) = self.local.save_progress(key, &record).await {
                    tracing::warn!(%key, error = %err, "failed to cache server progress locally");
                }
                return LoadedProgress::resumed(course, &record, self.clock);
            }
            Ok(None) => {
                tracing::debug!(%key, "no saved progress, starting fresh");
            }
            Err(err) => {
                tracing::warn!(%key, error = %err, "failed to fetch progress from server");
            }
        }

        LoadedProgress::fresh(course, self.clock)
    }

    /// Persist the tracker's state locally and start the server push.
    ///
    /// The record is stamped with the current time before it is written. The
    /// returned handle resolves once the push has finished, successfully or
    /// not; dropping it does not cancel the push.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Local` if the local write fails. Nothing is pushed
    /// in that case.
    pub async fn save(
        &self,
        key: &ProgressKey,
        tracker: &ProgressTracker,
    ) -> Result<JoinHandle<()>, SyncError> {
        let record = ProgressRecord {
            last_updated: Some(self.clock.now()),
            ..tracker.to_record()
        };
        self.local.save_progress(key, &record).await?;

        let remote = Arc::clone(&self.remote);
        let key = key.clone();
        Ok(tokio::spawn(async move {
            match remote.upsert_progress(&key, &record).await {
                Ok(()) => tracing::debug!(%key, "progress pushed to server"),
                Err(err) => tracing::warn!(%key, error = %err, "failed to push progress to server"),
            }
        }))
    }
}
