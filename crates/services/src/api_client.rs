use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use course_core::model::{Course, CourseId, LearnerId, ProgressKey, ProgressRecord};

use crate::config::ApiConfig;
use crate::error::RemoteError;
use crate::remote::{CourseCatalog, RemoteProgress};

/// HTTP client for the learner backend.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: ApiConfig,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns `RemoteError::Http` if the HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, RemoteError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// List published courses, optionally filtered by category and a search term.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` on transport failures or unexpected statuses.
    pub async fn list_courses(
        &self,
        category: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<CourseOverview>, RemoteError> {
        let mut url = self.config.endpoint(&["api", "courses"])?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(category) = category {
                query.append_pair("category", category);
            }
            if let Some(search) = search {
                query.append_pair("search", search);
            }
        }
        // an empty query string would leave a dangling `?`
        if url.query() == Some("") {
            url.set_query(None);
        }

        let response = self.client.get(url).send().await?;
        Ok(ok(response)?.json().await?)
    }

    /// Enroll a learner in a course.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::AlreadyEnrolled` on a conflict,
    /// `RemoteError::NotFound` for unknown courses or learners.
    pub async fn enroll(
        &self,
        course_id: &CourseId,
        learner: &LearnerId,
    ) -> Result<Enrollment, RemoteError> {
        let url = self
            .config
            .endpoint(&["api", "courses", course_id.as_str(), "enroll"])?;
        let response = self
            .client
            .post(url)
            .json(&EnrollRequest {
                username: learner.as_str(),
            })
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            return Err(RemoteError::AlreadyEnrolled);
        }
        let enrollment: Enrollment = ok(response)?.json().await?;
        tracing::info!(course = %course_id, learner = %learner, "enrolled");
        Ok(enrollment)
    }

    /// Courses the learner is enrolled in, each with its server-side percentage.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` on transport failures or unexpected statuses.
    pub async fn enrolled_courses(
        &self,
        learner: &LearnerId,
    ) -> Result<Vec<EnrolledCourse>, RemoteError> {
        let url = self
            .config
            .endpoint(&["api", "users", learner.as_str(), "enrolled-courses"])?;
        let response = self.client.get(url).send().await?;
        Ok(ok(response)?.json().await?)
    }

    fn progress_url(&self, key: &ProgressKey) -> Result<url::Url, RemoteError> {
        self.config.endpoint(&[
            "api",
            "users",
            key.learner().as_str(),
            "courses",
            key.course_id().as_str(),
            "progress",
        ])
    }
}

#[async_trait]
impl CourseCatalog for ApiClient {
    async fn fetch_course(&self, id: &CourseId) -> Result<Course, RemoteError> {
        let url = self.config.endpoint(&["courses", id.as_str()])?;
        let response = self.client.get(url).send().await?;
        Ok(ok(response)?.json().await?)
    }
}

#[async_trait]
impl RemoteProgress for ApiClient {
    async fn fetch_progress(&self, key: &ProgressKey) -> Result<Option<ProgressRecord>, RemoteError> {
        let response = self.client.get(self.progress_url(key)?).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(ok(response)?.json().await?))
    }

    async fn upsert_progress(&self, key: &ProgressKey, record: &ProgressRecord) -> Result<(), RemoteError> {
        let response = self
            .client
            .post(self.progress_url(key)?)
            .json(record)
            .send()
            .await?;
        ok(response)?;
        Ok(())
    }
}

fn ok(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(RemoteError::NotFound);
    }
    if !status.is_success() {
        return Err(RemoteError::HttpStatus(status));
    }
    Ok(response)
}

#[derive(Debug, Serialize)]
struct EnrollRequest<'a> {
    username: &'a str,
}

/// Catalog entry as listed by the course browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseOverview {
    pub id: CourseId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub creator_username: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// An enrolled course with the learner's server-side percentage.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledCourse {
    pub id: CourseId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub progress: u32,
}

/// Server acknowledgement of an enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub enrollment_date: Option<DateTime<Utc>>,
}
