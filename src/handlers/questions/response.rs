//! Question response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Question detail with visibility-filtered test cases.
///
/// Students receive only public test cases and never the reference
/// solution; authors receive everything.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDetailResponse {
    pub id: i64,
    pub assignment_id: i64,
    pub title: String,
    pub description: String,
    pub deadline: Option<DateTime<Utc>>,
    /// Deadline in effect, falling back to the assignment deadline
    pub effective_deadline: DateTime<Utc>,
    pub position: i32,
    /// Total count, independent of how many test cases are shown
    pub number_of_test_cases: usize,
    pub test_cases: Vec<TestCaseView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_solution: Option<ReferenceSolutionView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Test case as exposed to a viewer
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseView {
    pub id: i64,
    pub input: String,
    pub output: String,
    pub is_public: bool,
}

/// Reference solution, authors only
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceSolutionView {
    pub id: i64,
    pub language: String,
    pub code: String,
}
