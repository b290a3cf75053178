//! Reference solution model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Tutor-authored canonical solution for a question.
///
/// At most one per question; never shown to students.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ReferenceSolution {
    pub id: i64,
    pub question_id: i64,
    /// One of the identifiers in [`crate::constants::languages`]
    pub language: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
}
