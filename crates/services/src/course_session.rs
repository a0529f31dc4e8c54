use tokio::task::JoinHandle;

use course_core::completion::CompletionCounts;
use course_core::model::{CourseId, LessonId, ProgressKey, QuizId, QuizState, SessionContext};
use course_core::navigation::NextTarget;
use course_core::{ProgressTracker, video};

use crate::error::SessionError;
use crate::progress_sync::{LoadedProgress, ProgressSyncService};
use crate::remote::CourseCatalog;

/// Snapshot of a learner's standing in a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSummary {
    pub completed_lessons: usize,
    pub total_lessons: usize,
    pub submitted_quizzes: usize,
    pub total_quizzes: usize,
    pub correct_answers: usize,
    pub percent: u8,
    pub certificate_unlocked: bool,
}

/// One learner working through one course.
///
/// Mutations return `true` when they changed the progress. Only changes are
/// persisted; rejected inputs leave storage untouched.
pub struct CourseSession {
    key: ProgressKey,
    tracker: ProgressTracker,
    sync: ProgressSyncService,
    active_lesson: Option<LessonId>,
    pushes: Vec<JoinHandle<()>>,
}

impl CourseSession {
    /// Fetch the course and resume the learner's progress.
    ///
    /// Lessons and quizzes served without ids get positional ones. Duplicate
    /// ids are logged and the course still opens. When the resumed record
    /// unlocks the certificate on recompute, the unlock is saved right away.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotSignedIn` without a session, and surfaces
    /// course retrieval failures. Progress loading never fails.
    pub async fn open(
        catalog: &dyn CourseCatalog,
        sync: ProgressSyncService,
        course_id: &CourseId,
        session: Option<&SessionContext>,
    ) -> Result<Self, SessionError> {
        let session = session.ok_or(SessionError::NotSignedIn)?;

        let mut course = catalog.fetch_course(course_id).await?;
        if course.id.as_str().is_empty() {
            course.id = course_id.clone();
        }
        let filled = course.fill_missing_ids();
        if filled > 0 {
            tracing::debug!(course = %course_id, filled, "assigned positional ids");
        }
        if let Err(err) = course.validate() {
            tracing::warn!(course = %course_id, error = %err, "course has duplicate ids");
        }

        let key = ProgressKey::new(course_id.clone(), session.learner().clone());
        let LoadedProgress { tracker, stale } = sync.load(&key, course).await;
        let active_lesson = tracker.course().first_lesson().map(|lesson| lesson.id.clone());

        tracing::info!(
            %key,
            percent = tracker.state().overall_progress(),
            unlocked = tracker.state().certificate_unlocked(),
            "course session opened"
        );

        let mut course_session = Self {
            key,
            tracker,
            sync,
            active_lesson,
            pushes: Vec::new(),
        };
        if stale {
            tracing::info!(key = %course_session.key, "certificate unlocked on resume");
            course_session.persist_if(true).await;
        }
        Ok(course_session)
    }

    #[must_use]
    pub fn key(&self) -> &ProgressKey {
        &self.key
    }

    #[must_use]
    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    pub async fn mark_lesson_complete(&mut self, lesson_id: &LessonId) -> bool {
        let changed = self.tracker.mark_lesson_complete(lesson_id);
        self.persist_if(changed).await
    }

    pub async fn mark_all_lessons_complete(&mut self) -> bool {
        let changed = self.tracker.mark_all_lessons_complete();
        self.persist_if(changed).await
    }

    pub async fn select_answer(&mut self, quiz_id: &QuizId, option: usize) -> bool {
        let changed = self.tracker.select_quiz_answer(quiz_id, option);
        self.persist_if(changed).await
    }

    pub async fn submit_quiz(&mut self, quiz_id: &QuizId) -> bool {
        let changed = self.tracker.submit_quiz(quiz_id);
        self.persist_if(changed).await
    }

    /// Returns how many quizzes were submitted.
    pub async fn submit_all_answered(&mut self) -> usize {
        let submitted = self.tracker.submit_all_answered();
        self.persist_if(submitted > 0).await;
        submitted
    }

    /// Force-complete the course and unlock the certificate.
    pub async fn complete_course(&mut self) -> bool {
        let changed = self.tracker.bulk_complete();
        if changed {
            tracing::info!(key = %self.key, "course force-completed");
        }
        self.persist_if(changed).await
    }

    /// Make a lesson active. Unknown lessons are ignored.
    pub fn select_lesson(&mut self, lesson_id: &LessonId) -> bool {
        if self.tracker.course().lesson(lesson_id).is_none() {
            return false;
        }
        self.active_lesson = Some(lesson_id.clone());
        true
    }

    #[must_use]
    pub fn active_lesson(&self) -> Option<&LessonId> {
        self.active_lesson.as_ref()
    }

    /// Embeddable video URL of the active lesson.
    #[must_use]
    pub fn active_video_url(&self) -> Option<String> {
        let lesson = self.tracker.course().lesson(self.active_lesson.as_ref()?)?;
        Some(video::embed_url(&lesson.video_url))
    }

    #[must_use]
    pub fn next_target(&self) -> Option<NextTarget> {
        self.tracker.next_target(self.active_lesson.as_ref())
    }

    /// Follow the next target, activating it when it is a lesson.
    pub fn go_next(&mut self) -> Option<NextTarget> {
        let target = self.next_target()?;
        if let NextTarget::Lesson(id) = &target {
            self.active_lesson = Some(id.clone());
        }
        Some(target)
    }

    #[must_use]
    pub fn summary(&self) -> ProgressSummary {
        let state = self.tracker.state();
        let CompletionCounts {
            completed_lessons,
            total_lessons,
            submitted_quizzes,
            total_quizzes,
        } = self.tracker.counts();
        ProgressSummary {
            completed_lessons,
            total_lessons,
            submitted_quizzes,
            total_quizzes,
            correct_answers: state.correct_quiz_count(),
            percent: state.overall_progress(),
            certificate_unlocked: state.certificate_unlocked(),
        }
    }

    /// The course certificate link, once unlocked.
    #[must_use]
    pub fn certificate_link(&self) -> Option<&str> {
        if !self.tracker.state().certificate_unlocked() {
            return None;
        }
        self.tracker.course().certificate_link.as_deref()
    }

    #[must_use]
    pub fn has_uncompleted_lessons(&self) -> bool {
        let state = self.tracker.state();
        self.tracker
            .course()
            .lessons
            .iter()
            .any(|lesson| !state.is_lesson_completed(&lesson.id))
    }

    #[must_use]
    pub fn has_answered_unsubmitted(&self) -> bool {
        let state = self.tracker.state();
        self.tracker
            .course()
            .quizzes
            .iter()
            .any(|quiz| matches!(state.quiz_state(&quiz.id), QuizState::Answered { .. }))
    }

    /// Every quiz has a selected or submitted answer.
    #[must_use]
    pub fn all_questions_answered(&self) -> bool {
        let state = self.tracker.state();
        self.tracker
            .course()
            .quizzes
            .iter()
            .all(|quiz| state.quiz_state(&quiz.id) != QuizState::Unanswered)
    }

    /// Wait for every server push started by this session.
    pub async fn flush(&mut self) {
        for push in self.pushes.drain(..) {
            if let Err(err) = push.await {
                tracing::warn!(key = %self.key, error = %err, "progress push task failed");
            }
        }
    }

    async fn persist_if(&mut self, changed: bool) -> bool {
        if !changed {
            return false;
        }
        match self.sync.save(&self.key, &self.tracker).await {
            Ok(push) => {
                self.pushes.retain(|push| !push.is_finished());
                self.pushes.push(push);
            }
            Err(err) => {
                tracing::error!(key = %self.key, error = %err, "failed to save progress locally");
            }
        }
        true
    }
}
