//! Grading service client
//!
//! The grading service owns submissions and code execution; this core
//! only reads them and forwards tutor feedback. Failures surface as a
//! typed unavailability so aggregate views can absorb them per question
//! instead of aborting unrelated work.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    config::GradingConfig,
    error::AppError,
    models::{Feedback, Submission},
};

/// Grading service failure modes
#[derive(Debug, thiserror::Error)]
pub enum GradingError {
    #[error("grading service timed out")]
    Timeout,

    #[error("grading service unreachable: {0}")]
    Unreachable(String),

    #[error("grading service returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Feedback posted by a tutor against a submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub submission_id: i64,
    pub line: i32,
    pub hints: Vec<String>,
}

/// Read/annotate access to the grading service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GradingClient: Send + Sync {
    /// Submissions for a (question, student) pair, most recent first
    async fn get_submissions(
        &self,
        question_id: i64,
        student_id: i64,
    ) -> Result<Vec<Submission>, GradingError>;

    /// Every submission ever made against a question, any student
    async fn get_question_submissions(
        &self,
        question_id: i64,
    ) -> Result<Vec<Submission>, GradingError>;

    async fn post_feedback(&self, request: FeedbackRequest) -> Result<Feedback, GradingError>;
}

/// reqwest-backed grading client
pub struct HttpGradingClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpGradingClient {
    pub fn new(config: &GradingConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Configuration(format!("grading client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn map_err(err: reqwest::Error) -> GradingError {
        if err.is_timeout() {
            GradingError::Timeout
        } else if err.is_decode() {
            GradingError::InvalidResponse(err.to_string())
        } else {
            GradingError::Unreachable(err.to_string())
        }
    }
}

#[async_trait]
impl GradingClient for HttpGradingClient {
    async fn get_submissions(
        &self,
        question_id: i64,
        student_id: i64,
    ) -> Result<Vec<Submission>, GradingError> {
        let url = format!(
            "{}/submissions?questionId={}&studentId={}",
            self.base_url, question_id, student_id
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(Self::map_err)?
            .error_for_status()
            .map_err(Self::map_err)?;

        response.json().await.map_err(Self::map_err)
    }

    async fn get_question_submissions(
        &self,
        question_id: i64,
    ) -> Result<Vec<Submission>, GradingError> {
        let url = format!("{}/questions/{}/submissions", self.base_url, question_id);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(Self::map_err)?
            .error_for_status()
            .map_err(Self::map_err)?;

        response.json().await.map_err(Self::map_err)
    }

    async fn post_feedback(&self, request: FeedbackRequest) -> Result<Feedback, GradingError> {
        let url = format!("{}/feedbacks", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(Self::map_err)?
            .error_for_status()
            .map_err(Self::map_err)?;

        response.json().await.map_err(Self::map_err)
    }
}
