//! Question request DTOs

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::constants::MAX_QUESTION_TITLE_LENGTH;

/// Update question request (partial content edit).
///
/// Structural changes (moving a question, changing its assignment) are
/// not expressible here by design.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1, max = MAX_QUESTION_TITLE_LENGTH))]
    pub title: Option<String>,

    pub description: Option<String>,

    pub deadline: Option<DateTime<Utc>>,
}
