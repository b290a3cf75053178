//! Submission view response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Feedback;

/// Per-question submission state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Submitted,
    NotSubmitted,
    /// The grading service could not be reached for this question
    GradingUnavailable,
}

/// One entry per question, in the assignment's question order
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSubmissionEntry {
    pub question_id: i64,
    pub question_title: String,
    pub status: SubmissionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub feedbacks: Vec<Feedback>,
}

/// Consolidated submission state for one assignment and one student
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentSubmissionsResponse {
    pub assignment_id: i64,
    pub title: String,
    pub deadline: DateTime<Utc>,
    pub entries: Vec<QuestionSubmissionEntry>,
}

/// Student overview: one consolidated view per visible assignment
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentOverviewResponse {
    pub assignments: Vec<AssignmentSubmissionsResponse>,
}

/// One student's activity against a question, for grading dashboards
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSubmissionSummary {
    pub student_id: i64,
    pub student_name: String,
    pub last_submitted_at: DateTime<Utc>,
}

/// Tutor overview entry for a single question
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorQuestionOverview {
    pub assignment_id: i64,
    pub question_id: i64,
    pub question_title: String,
    /// Set when the grading service could not be reached for this question
    pub grading_unavailable: bool,
    pub students: Vec<StudentSubmissionSummary>,
}

/// Tutor overview: authored questions with their submitting students
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorOverviewResponse {
    pub questions: Vec<TutorQuestionOverview>,
}

/// Role-dependent overview payload
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum OverviewResponse {
    Student(StudentOverviewResponse),
    Tutor(TutorOverviewResponse),
}
