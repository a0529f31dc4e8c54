use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use crate::completion::CompletionCounts;
use crate::model::course::Course;
use crate::model::ids::{LessonId, QuizId};

/// Where a learner stands on a single quiz.
///
/// A quiz moves `Unanswered -> Answered -> Submitted`. The selected option may
/// change freely while `Answered`; once `Submitted` the state is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuizState {
    #[default]
    Unanswered,
    Answered { option: usize },
    /// `option` is `None` only for records hydrated from storage that were
    /// locked in without a stored answer.
    Submitted { option: Option<usize>, correct: bool },
}

impl QuizState {
    /// The option currently selected, if any.
    #[must_use]
    pub fn selected(self) -> Option<usize> {
        match self {
            QuizState::Unanswered => None,
            QuizState::Answered { option } => Some(option),
            QuizState::Submitted { option, .. } => option,
        }
    }

    #[must_use]
    pub fn is_submitted(self) -> bool {
        matches!(self, QuizState::Submitted { .. })
    }

    /// The graded result. Only present after submission.
    #[must_use]
    pub fn result(self) -> Option<bool> {
        match self {
            QuizState::Submitted { correct, .. } => Some(correct),
            _ => None,
        }
    }
}

/// A learner's progress through one course.
///
/// `overall_progress` is derived and only refreshed through
/// [`ProgressTracker`](crate::tracker::ProgressTracker). `certificate_unlocked`
/// never goes back to `false`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressState {
    pub(crate) completed_lessons: BTreeSet<LessonId>,
    pub(crate) quizzes: BTreeMap<QuizId, QuizState>,
    pub(crate) overall_progress: u8,
    pub(crate) certificate_unlocked: bool,
    pub(crate) last_updated: Option<DateTime<Utc>>,
}

impl ProgressState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn completed_lessons(&self) -> &BTreeSet<LessonId> {
        &self.completed_lessons
    }

    #[must_use]
    pub fn is_lesson_completed(&self, id: &LessonId) -> bool {
        self.completed_lessons.contains(id)
    }

    /// State of a quiz. Quizzes never touched report `Unanswered`.
    #[must_use]
    pub fn quiz_state(&self, id: &QuizId) -> QuizState {
        self.quizzes.get(id).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn is_quiz_submitted(&self, id: &QuizId) -> bool {
        self.quiz_state(id).is_submitted()
    }

    #[must_use]
    pub fn submitted_quiz_count(&self) -> usize {
        self.quizzes.values().filter(|s| s.is_submitted()).count()
    }

    /// Number of submitted quizzes graded as correct.
    #[must_use]
    pub fn correct_quiz_count(&self) -> usize {
        self.quizzes
            .values()
            .filter(|s| s.result() == Some(true))
            .count()
    }

    #[must_use]
    pub fn overall_progress(&self) -> u8 {
        self.overall_progress
    }

    #[must_use]
    pub fn certificate_unlocked(&self) -> bool {
        self.certificate_unlocked
    }

    #[must_use]
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// Counts used by the completion engine for the given course.
    #[must_use]
    pub fn counts(&self, course: &Course) -> CompletionCounts {
        CompletionCounts {
            completed_lessons: self.completed_lessons.len(),
            total_lessons: course.lessons.len(),
            submitted_quizzes: self.submitted_quiz_count(),
            total_quizzes: course.quizzes.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untouched_quiz_is_unanswered() {
        let state = ProgressState::new();
        let quiz = QuizId::new("q");
        assert_eq!(state.quiz_state(&quiz), QuizState::Unanswered);
        assert!(!state.is_quiz_submitted(&quiz));
    }

    #[test]
    fn quiz_state_accessors() {
        assert_eq!(QuizState::Answered { option: 2 }.selected(), Some(2));
        assert_eq!(QuizState::Answered { option: 2 }.result(), None);

        let submitted = QuizState::Submitted {
            option: None,
            correct: false,
        };
        assert!(submitted.is_submitted());
        assert_eq!(submitted.selected(), None);
        assert_eq!(submitted.result(), Some(false));
    }

    #[test]
    fn counts_track_submitted_and_correct() {
        let mut state = ProgressState::new();
        state.quizzes.insert(
            QuizId::new("a"),
            QuizState::Submitted {
                option: Some(1),
                correct: true,
            },
        );
        state.quizzes.insert(
            QuizId::new("b"),
            QuizState::Submitted {
                option: Some(0),
                correct: false,
            },
        );
        state
            .quizzes
            .insert(QuizId::new("c"), QuizState::Answered { option: 3 });

        assert_eq!(state.submitted_quiz_count(), 2);
        assert_eq!(state.correct_quiz_count(), 1);
    }
}
