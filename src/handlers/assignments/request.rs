//! Assignment request DTOs
//!
//! The wire contract is camelCase JSON throughout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::MAX_ASSIGNMENT_TITLE_LENGTH;

/// Create assignment request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    #[validate(length(min = 1, max = MAX_ASSIGNMENT_TITLE_LENGTH))]
    pub title: String,

    pub deadline: DateTime<Utc>,

    /// Additional author ids; the requesting user is always included
    pub authors: Option<Vec<i64>>,
}

/// Update assignment request (partial; never touches the question set)
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssignmentRequest {
    #[validate(length(min = 1, max = MAX_ASSIGNMENT_TITLE_LENGTH))]
    pub title: Option<String>,

    pub deadline: Option<DateTime<Utc>>,

    /// Authors are append-only; removal is not supported
    pub add_authors: Option<Vec<i64>>,
}

/// Batch of questions to append to an assignment
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddQuestionsRequest {
    #[validate(length(min = 1))]
    pub questions: Vec<QuestionPayload>,
}

/// A question with its nested test cases and optional reference solution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPayload {
    pub title: String,
    pub description: String,
    /// Defaults to the parent assignment deadline when absent
    pub deadline: Option<DateTime<Utc>>,
    pub test_cases: Option<Vec<TestCasePayload>>,
    pub reference_solution: Option<ReferenceSolutionPayload>,
}

/// Test case payload; visibility defaults to public when omitted
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCasePayload {
    pub input: String,
    pub output: String,
    pub is_public: Option<bool>,
}

/// Reference solution payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceSolutionPayload {
    pub language: String,
    pub code: String,
}

/// List assignments query parameters.
///
/// Boolean parameters arrive as strings and are coerced explicitly so a
/// malformed value fails before any business logic runs.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAssignmentsQuery {
    pub include_past: Option<String>,
    pub is_published: Option<String>,
}
