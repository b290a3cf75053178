//! Test case model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Test case database model
///
/// Owned exclusively by one question. Public test cases are shown to
/// students before submission, private ones only to authors.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TestCase {
    pub id: i64,
    pub question_id: i64,
    pub input: String,
    pub output: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}
