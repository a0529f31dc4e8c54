#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use course_core::model::{Course, CourseId, Lesson, ProgressKey, ProgressRecord, Quiz};
use reqwest::StatusCode;
use services::{CourseCatalog, RemoteError, RemoteProgress};

/// In-process stand-in for the course and progress API.
#[derive(Default)]
pub struct FakeRemote {
    courses: Mutex<HashMap<CourseId, Course>>,
    records: Mutex<HashMap<String, ProgressRecord>>,
    pushes: Mutex<Vec<(String, ProgressRecord)>>,
    fetches: AtomicUsize,
    failing: AtomicBool,
}

impl FakeRemote {
    pub fn with_course(course: Course) -> Arc<Self> {
        let remote = Self::default();
        remote.courses.lock().unwrap().insert(course.id.clone(), course);
        Arc::new(remote)
    }

    pub fn put_record(&self, key: &ProgressKey, record: ProgressRecord) {
        self.records.lock().unwrap().insert(key.to_string(), record);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn pushes(&self) -> Vec<(String, ProgressRecord)> {
        self.pushes.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), RemoteError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RemoteError::HttpStatus(StatusCode::INTERNAL_SERVER_ERROR));
        }
        Ok(())
    }
}

#[async_trait]
impl CourseCatalog for FakeRemote {
    async fn fetch_course(&self, id: &CourseId) -> Result<Course, RemoteError> {
        self.courses
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or(RemoteError::NotFound)
    }
}

#[async_trait]
impl RemoteProgress for FakeRemote {
    async fn fetch_progress(&self, key: &ProgressKey) -> Result<Option<ProgressRecord>, RemoteError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.records.lock().unwrap().get(&key.to_string()).cloned())
    }

    async fn upsert_progress(&self, key: &ProgressKey, record: &ProgressRecord) -> Result<(), RemoteError> {
        self.check()?;
        self.records
            .lock()
            .unwrap()
            .insert(key.to_string(), record.clone());
        self.pushes
            .lock()
            .unwrap()
            .push((key.to_string(), record.clone()));
        Ok(())
    }
}

/// Two lessons, two quizzes (correct options 1 and 0) and a certificate.
pub fn sample_course() -> Course {
    Course::new("rust-101", "Rust 101")
        .with_lessons(vec![
            Lesson::new("l1", "Ownership", "https://www.youtube.com/watch?v=own123&t=10"),
            Lesson::new("l2", "Borrowing", "https://vimeo.com/777"),
        ])
        .with_quizzes(vec![
            Quiz::new("q1", "Who owns?", options(), 1),
            Quiz::new("q2", "Who borrows?", options(), 0),
        ])
        .with_certificate_link("https://certs.example.com/rust-101")
}

fn options() -> Vec<String> {
    vec!["a".into(), "b".into(), "c".into(), "d".into()]
}
