//! Aggregate progress and the certificate unlock rule.
//!
//! The percentage alone is not enough to unlock: a course without lessons or
//! quizzes reports 100, so the lesson and quiz counts are checked as well.

/// Completed and total item counts for one course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompletionCounts {
    pub completed_lessons: usize,
    pub total_lessons: usize,
    pub submitted_quizzes: usize,
    pub total_quizzes: usize,
}

impl CompletionCounts {
    /// Integer percentage of completed lessons plus submitted quizzes.
    ///
    /// Rounds half up. An empty course is 100% complete.
    #[must_use]
    pub fn percent(&self) -> u8 {
        let total = self.total_lessons + self.total_quizzes;
        if total == 0 {
            return 100;
        }
        let done = (self.completed_lessons + self.submitted_quizzes).min(total);
        let rounded = (200 * done + total) / (2 * total);
        u8::try_from(rounded.min(100)).unwrap_or(100)
    }

    /// Whether the certificate may be unlocked from these counts.
    #[must_use]
    pub fn unlocks(&self) -> bool {
        self.percent() == 100
            && self.completed_lessons == self.total_lessons
            && self.submitted_quizzes == self.total_quizzes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(done_l: usize, total_l: usize, done_q: usize, total_q: usize) -> CompletionCounts {
        CompletionCounts {
            completed_lessons: done_l,
            total_lessons: total_l,
            submitted_quizzes: done_q,
            total_quizzes: total_q,
        }
    }

    #[test]
    fn percent_uses_both_lessons_and_quizzes() {
        assert_eq!(counts(2, 4, 1, 2).percent(), 50);
        assert_eq!(counts(0, 4, 0, 2).percent(), 0);
        assert_eq!(counts(4, 4, 2, 2).percent(), 100);
    }

    #[test]
    fn percent_rounds_half_up() {
        // 1/8 = 12.5
        assert_eq!(counts(1, 8, 0, 0).percent(), 13);
        // 1/3 = 33.3
        assert_eq!(counts(1, 3, 0, 0).percent(), 33);
        // 2/3 = 66.7
        assert_eq!(counts(0, 0, 2, 3).percent(), 67);
    }

    #[test]
    fn empty_course_is_complete_and_unlocks() {
        let empty = counts(0, 0, 0, 0);
        assert_eq!(empty.percent(), 100);
        assert!(empty.unlocks());
    }

    #[test]
    fn quiz_only_course_needs_every_quiz() {
        assert!(!counts(0, 0, 1, 2).unlocks());
        assert!(counts(0, 0, 2, 2).unlocks());
    }

    #[test]
    fn partial_progress_does_not_unlock() {
        assert!(!counts(3, 4, 2, 2).unlocks());
        assert!(!counts(4, 4, 1, 2).unlocks());
    }
}
