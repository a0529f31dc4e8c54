//! Forward navigation through a course: lessons in order, then open quizzes,
//! then the certificate.

use crate::model::{Course, LessonId, ProgressState, QuizId};

/// Where a "next" action leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextTarget {
    Lesson(LessonId),
    Quiz(QuizId),
    Certificate,
}

/// Resolve the next target for the active lesson.
///
/// Returns `None` when there is nowhere to go forward. An active lesson that
/// is not part of the course is treated like no active lesson.
#[must_use]
pub fn next_target(
    course: &Course,
    active_lesson: Option<&LessonId>,
    state: &ProgressState,
) -> Option<NextTarget> {
    if let Some(index) = active_lesson.and_then(|id| course.lesson_index(id)) {
        if let Some(next) = course.lessons.get(index + 1) {
            return Some(NextTarget::Lesson(next.id.clone()));
        }
    }

    if let Some(quiz) = course
        .quizzes
        .iter()
        .find(|quiz| !state.is_quiz_submitted(&quiz.id))
    {
        return Some(NextTarget::Quiz(quiz.id.clone()));
    }

    (state.overall_progress() == 100).then_some(NextTarget::Certificate)
}
