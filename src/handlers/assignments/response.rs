//! Assignment response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Assignment summary for list views
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentSummary {
    pub id: i64,
    pub title: String,
    pub deadline: DateTime<Utc>,
    pub is_published: bool,
    pub number_of_questions: usize,
}

/// Assignment list response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentsListResponse {
    pub assignments: Vec<AssignmentSummary>,
    pub total: usize,
}

/// Assignment detail with its ordered questions
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDetailResponse {
    pub id: i64,
    pub title: String,
    pub deadline: DateTime<Utc>,
    pub is_published: bool,
    pub authors: Vec<i64>,
    pub number_of_questions: usize,
    pub questions: Vec<QuestionSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Question summary inside an assignment detail
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSummary {
    pub id: i64,
    pub title: String,
    /// Deadline in effect: the question's own, or the assignment's
    pub deadline: DateTime<Utc>,
    pub position: i32,
    pub number_of_test_cases: usize,
}
