use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::course::Course;
use crate::model::ids::{LessonId, QuizId};
use crate::model::progress::{ProgressState, QuizState};

/// Persisted shape of a learner's course progress.
///
/// Both the local store and the progress API exchange this exact JSON layout,
/// three parallel quiz maps included. It is a transport format only: the
/// domain works on [`ProgressState`], which keeps one tagged state per quiz.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressRecord {
    pub completed_lessons: Vec<LessonId>,
    pub quiz_answers: BTreeMap<QuizId, usize>,
    pub quiz_submitted: BTreeMap<QuizId, bool>,
    pub quiz_results: BTreeMap<QuizId, bool>,
    pub certificate_unlocked: bool,
    pub overall_progress: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl ProgressRecord {
    /// Project the domain state onto the persisted maps.
    #[must_use]
    pub fn from_state(state: &ProgressState) -> Self {
        let mut record = Self {
            completed_lessons: state.completed_lessons.iter().cloned().collect(),
            certificate_unlocked: state.certificate_unlocked,
            overall_progress: u32::from(state.overall_progress),
            last_updated: state.last_updated,
            ..Self::default()
        };

        for (id, quiz) in &state.quizzes {
            if let Some(option) = quiz.selected() {
                record.quiz_answers.insert(id.clone(), option);
            }
            if let QuizState::Submitted { correct, .. } = quiz {
                record.quiz_submitted.insert(id.clone(), true);
                record.quiz_results.insert(id.clone(), *correct);
            }
        }

        record
    }
}

impl ProgressState {
    /// Hydrate from a persisted record for the given course.
    ///
    /// Lessons and quizzes the course no longer contains are dropped, a
    /// `false` submission flag counts as not submitted, and a submission with no
    /// stored result is graded incorrect. `overall_progress` is left at zero:
    /// callers recompute it through the tracker.
    #[must_use]
    pub fn from_record(course: &Course, record: &ProgressRecord) -> Self {
        let completed_lessons = record
            .completed_lessons
            .iter()
            .filter(|id| course.lesson(id).is_some())
            .cloned()
            .collect();

        let mut quizzes = BTreeMap::new();
        for quiz in &course.quizzes {
            let answer = record.quiz_answers.get(&quiz.id).copied();
            let submitted = record.quiz_submitted.get(&quiz.id).copied().unwrap_or(false);
            let state = if submitted {
                QuizState::Submitted {
                    option: answer,
                    correct: record.quiz_results.get(&quiz.id).copied().unwrap_or(false),
                }
            } else if let Some(option) = answer {
                QuizState::Answered { option }
            } else {
                continue;
            };
            quizzes.insert(quiz.id.clone(), state);
        }

        Self {
            completed_lessons,
            quizzes,
            overall_progress: 0,
            certificate_unlocked: record.certificate_unlocked,
            last_updated: record.last_updated,
        }
    }
}
