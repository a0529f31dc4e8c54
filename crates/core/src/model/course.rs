use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{CourseId, LessonId, QuizId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("lesson id {0} appears more than once")]
    DuplicateLessonId(LessonId),

    #[error("quiz id {0} appears more than once")]
    DuplicateQuizId(QuizId),
}

//
// ─── CONTENT ───────────────────────────────────────────────────────────────────
//

/// A video-based unit of course content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    #[serde(default)]
    pub id: LessonId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub video_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Lesson {
    #[must_use]
    pub fn new(id: impl Into<LessonId>, title: impl Into<String>, video_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            video_url: video_url.into(),
            description: None,
        }
    }
}

/// A single multiple-choice question.
///
/// Authoring tools produce four options, but any count is accepted here and
/// `correct_option` is not range-checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    #[serde(default)]
    pub id: QuizId,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_option: usize,
}

impl Quiz {
    #[must_use]
    pub fn new(
        id: impl Into<QuizId>,
        question: impl Into<String>,
        options: Vec<String>,
        correct_option: usize,
    ) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            options,
            correct_option,
        }
    }

    #[must_use]
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_option
    }
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

/// A course as served by the course API. Read-only to the learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(default)]
    pub id: CourseId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_username: Option<String>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
    #[serde(default)]
    pub quizzes: Vec<Quiz>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_link: Option<String>,
}

impl Course {
    #[must_use]
    pub fn new(id: impl Into<CourseId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            thumbnail_url: None,
            category: None,
            creator_username: None,
            lessons: Vec::new(),
            quizzes: Vec::new(),
            certificate_link: None,
        }
    }

    #[must_use]
    pub fn with_lessons(mut self, lessons: Vec<Lesson>) -> Self {
        self.lessons = lessons;
        self
    }

    #[must_use]
    pub fn with_quizzes(mut self, quizzes: Vec<Quiz>) -> Self {
        self.quizzes = quizzes;
        self
    }

    #[must_use]
    pub fn with_certificate_link(mut self, link: impl Into<String>) -> Self {
        self.certificate_link = Some(link.into());
        self
    }

    /// Check that lesson and quiz ids are unique within the course.
    ///
    /// # Errors
    ///
    /// Returns the first duplicated lesson or quiz id.
    pub fn validate(&self) -> Result<(), CourseError> {
        let mut lessons = HashSet::with_capacity(self.lessons.len());
        for lesson in &self.lessons {
            if !lessons.insert(&lesson.id) {
                return Err(CourseError::DuplicateLessonId(lesson.id.clone()));
            }
        }
        let mut quizzes = HashSet::with_capacity(self.quizzes.len());
        for quiz in &self.quizzes {
            if !quizzes.insert(&quiz.id) {
                return Err(CourseError::DuplicateQuizId(quiz.id.clone()));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn lesson(&self, id: &LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|lesson| &lesson.id == id)
    }

    #[must_use]
    pub fn lesson_index(&self, id: &LessonId) -> Option<usize> {
        self.lessons.iter().position(|lesson| &lesson.id == id)
    }

    #[must_use]
    pub fn quiz(&self, id: &QuizId) -> Option<&Quiz> {
        self.quizzes.iter().find(|quiz| &quiz.id == id)
    }

    #[must_use]
    pub fn first_lesson(&self) -> Option<&Lesson> {
        self.lessons.first()
    }

    /// Give lessons and quizzes served without an id a positional one
    /// (`lesson-<index>`, `quiz-<index>`, zero-based).
    ///
    /// Returns how many ids were assigned.
    pub fn fill_missing_ids(&mut self) -> usize {
        let mut filled = 0;
        for (index, lesson) in self.lessons.iter_mut().enumerate() {
            if lesson.id.as_str().is_empty() {
                lesson.id = LessonId::new(format!("lesson-{index}"));
                filled += 1;
            }
        }
        for (index, quiz) in self.quizzes.iter_mut().enumerate() {
            if quiz.id.as_str().is_empty() {
                quiz.id = QuizId::new(format!("quiz-{index}"));
                filled += 1;
            }
        }
        filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        vec!["a".into(), "b".into(), "c".into(), "d".into()]
    }

    #[test]
    fn deserializes_api_payload() {
        let json = r#"{
            "id": "-Nx1",
            "title": "Rust 101",
            "description": "Intro",
            "thumbnailUrl": "https://img/x.png",
            "category": "programming",
            "creatorUsername": "grace",
            "lessons": [{"id": 1712000000001, "title": "Ownership", "videoUrl": "https://youtu.be/abc"}],
            "quizzes": [{"id": "1712000000002", "question": "?", "options": ["a","b"], "correctOption": 1}],
            "students": 12
        }"#;
        let course: Course = serde_json::from_str(json).unwrap();
        assert_eq!(course.lessons[0].id, LessonId::new("1712000000001"));
        assert_eq!(course.quizzes[0].correct_option, 1);
        assert!(course.certificate_link.is_none());
    }

    #[test]
    fn id_less_items_get_positional_ids() {
        let json = r#"{
            "title": "Keyed by the backend",
            "lessons": [
                {"title": "One", "videoUrl": "https://vimeo.com/1"},
                {"id": "kept", "title": "Two"}
            ],
            "quizzes": [{"question": "?", "options": ["a", "b"], "correctOption": 0}]
        }"#;
        let mut course: Course = serde_json::from_str(json).unwrap();
        assert_eq!(course.fill_missing_ids(), 2);

        assert_eq!(course.lessons[0].id, LessonId::new("lesson-0"));
        assert_eq!(course.lessons[1].id, LessonId::new("kept"));
        assert_eq!(course.quizzes[0].id, QuizId::new("quiz-0"));
        assert_eq!(course.fill_missing_ids(), 0);
        assert!(course.validate().is_ok());
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let course: Course = serde_json::from_str(r#"{"id": "c", "title": "Empty"}"#).unwrap();
        assert!(course.lessons.is_empty());
        assert!(course.quizzes.is_empty());
    }

    #[test]
    fn validate_rejects_duplicate_lessons() {
        let course = Course::new("c", "Dupes").with_lessons(vec![
            Lesson::new("l1", "One", ""),
            Lesson::new("l1", "Again", ""),
        ]);
        assert_eq!(
            course.validate(),
            Err(CourseError::DuplicateLessonId(LessonId::new("l1")))
        );
    }

    #[test]
    fn validate_rejects_duplicate_quizzes() {
        let course = Course::new("c", "Dupes").with_quizzes(vec![
            Quiz::new("q1", "?", options(), 0),
            Quiz::new("q1", "??", options(), 1),
        ]);
        assert_eq!(
            course.validate(),
            Err(CourseError::DuplicateQuizId(QuizId::new("q1")))
        );
    }

    #[test]
    fn lookup_helpers() {
        let course = Course::new("c", "Lookups")
            .with_lessons(vec![Lesson::new("l1", "One", ""), Lesson::new("l2", "Two", "")])
            .with_quizzes(vec![Quiz::new("q1", "?", options(), 2)]);
        assert_eq!(course.lesson_index(&LessonId::new("l2")), Some(1));
        assert!(course.lesson(&LessonId::new("zz")).is_none());
        assert!(course.quiz(&QuizId::new("q1")).unwrap().is_correct(2));
        assert!(course.validate().is_ok());
    }
}
