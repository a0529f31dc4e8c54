use crate::completion::CompletionCounts;
use crate::model::{Course, LessonId, ProgressRecord, ProgressState, QuizId, QuizState};
use crate::navigation::{self, NextTarget};
use crate::time::Clock;

/// Holds and mutates the progress of one learner in one course.
///
/// Every operation returns `true` when it changed the state. Rejected inputs
/// (unknown ids, re-selecting a submitted quiz, submitting without an answer)
/// return `false` and leave the state untouched. After each change the
/// percentage is recomputed and the unlock rule re-evaluated.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    course: Course,
    state: ProgressState,
    clock: Clock,
}

impl ProgressTracker {
    /// Start with empty progress.
    #[must_use]
    pub fn new(course: Course, clock: Clock) -> Self {
        Self::with_state(course, ProgressState::new(), clock)
    }

    /// Resume from existing progress. Derived fields are recomputed.
    #[must_use]
    pub fn with_state(course: Course, state: ProgressState, clock: Clock) -> Self {
        let mut tracker = Self {
            course,
            state,
            clock,
        };
        tracker.recompute();
        tracker
    }

    /// Resume from a persisted record.
    #[must_use]
    pub fn from_record(course: Course, record: &ProgressRecord, clock: Clock) -> Self {
        let state = ProgressState::from_record(&course, record);
        Self::with_state(course, state, clock)
    }

    #[must_use]
    pub fn course(&self) -> &Course {
        &self.course
    }

    #[must_use]
    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    #[must_use]
    pub fn to_record(&self) -> ProgressRecord {
        ProgressRecord::from_state(&self.state)
    }

    #[must_use]
    pub fn counts(&self) -> CompletionCounts {
        self.state.counts(&self.course)
    }

    /// Mark a lesson as completed. Idempotent.
    pub fn mark_lesson_complete(&mut self, lesson_id: &LessonId) -> bool {
        if self.course.lesson(lesson_id).is_none() {
            return false;
        }
        if !self.state.completed_lessons.insert(lesson_id.clone()) {
            return false;
        }
        self.touch();
        true
    }

    /// Mark every lesson in the course as completed.
    ///
    /// Unlike [`bulk_complete`](Self::bulk_complete) this does not force the
    /// certificate; the regular unlock rule applies.
    pub fn mark_all_lessons_complete(&mut self) -> bool {
        let mut changed = false;
        for lesson in &self.course.lessons {
            changed |= self.state.completed_lessons.insert(lesson.id.clone());
        }
        if changed {
            self.touch();
        }
        changed
    }

    /// Select an answer for a quiz that has not been submitted yet.
    pub fn select_quiz_answer(&mut self, quiz_id: &QuizId, option: usize) -> bool {
        if self.course.quiz(quiz_id).is_none() {
            return false;
        }
        match self.state.quiz_state(quiz_id) {
            QuizState::Submitted { .. } => false,
            QuizState::Answered { option: current } if current == option => false,
            QuizState::Unanswered | QuizState::Answered { .. } => {
                self.state
                    .quizzes
                    .insert(quiz_id.clone(), QuizState::Answered { option });
                self.touch();
                true
            }
        }
    }

    /// Lock in the selected answer and grade it.
    ///
    /// Requires a selected answer. Submitting twice keeps the first result.
    pub fn submit_quiz(&mut self, quiz_id: &QuizId) -> bool {
        if !self.lock_in(quiz_id) {
            return false;
        }
        self.touch();
        true
    }

    /// Submit every answered, unsubmitted quiz in course order.
    ///
    /// Returns how many quizzes were submitted; unanswered quizzes are skipped.
    pub fn submit_all_answered(&mut self) -> usize {
        let ids: Vec<QuizId> = self.course.quizzes.iter().map(|q| q.id.clone()).collect();
        let submitted = ids.iter().filter(|id| self.lock_in(id)).count();
        if submitted > 0 {
            self.touch();
        }
        submitted
    }

    /// Force-complete the course.
    ///
    /// Marks every lesson, submits every open quiz (choosing the correct
    /// option for quizzes the learner never answered) and unlocks the
    /// certificate regardless of the unlock rule.
    pub fn bulk_complete(&mut self) -> bool {
        let mut changed = false;
        for lesson in &self.course.lessons {
            changed |= self.state.completed_lessons.insert(lesson.id.clone());
        }

        for quiz in &self.course.quizzes {
            let option = match self.state.quiz_state(&quiz.id) {
                QuizState::Submitted { .. } => continue,
                QuizState::Answered { option } => option,
                QuizState::Unanswered => quiz.correct_option,
            };
            self.state.quizzes.insert(
                quiz.id.clone(),
                QuizState::Submitted {
                    option: Some(option),
                    correct: quiz.is_correct(option),
                },
            );
            changed = true;
        }

        if !self.state.certificate_unlocked {
            self.state.certificate_unlocked = true;
            changed = true;
        }

        if changed {
            self.touch();
        }
        changed
    }

    /// Refresh the percentage and unlock the certificate when the unlock rule
    /// holds. Never clears an unlocked certificate.
    pub fn recompute(&mut self) {
        let counts = self.counts();
        self.state.overall_progress = counts.percent();
        if counts.unlocks() {
            self.state.certificate_unlocked = true;
        }
    }

    /// The forward-navigation target from `active_lesson`.
    #[must_use]
    pub fn next_target(&self, active_lesson: Option<&LessonId>) -> Option<NextTarget> {
        navigation::next_target(&self.course, active_lesson, &self.state)
    }

    fn lock_in(&mut self, quiz_id: &QuizId) -> bool {
        let Some(quiz) = self.course.quiz(quiz_id) else {
            return false;
        };
        let QuizState::Answered { option } = self.state.quiz_state(quiz_id) else {
            return false;
        };
        let correct = quiz.is_correct(option);
        self.state.quizzes.insert(
            quiz_id.clone(),
            QuizState::Submitted {
                option: Some(option),
                correct,
            },
        );
        true
    }

    fn touch(&mut self) {
        self.recompute();
        self.state.last_updated = Some(self.clock.now());
    }
}
