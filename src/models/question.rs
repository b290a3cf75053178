//! Question model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Question domain model
///
/// Belongs to exactly one assignment; `position` records authoring order
/// within it.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub assignment_id: i64,
    pub title: String,
    pub description: String,
    /// Per-question deadline; falls back to the assignment deadline
    pub deadline: Option<DateTime<Utc>>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Question {
    /// Deadline in effect for this question
    pub fn effective_deadline(&self, assignment_deadline: DateTime<Utc>) -> DateTime<Utc> {
        self.deadline.unwrap_or(assignment_deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_effective_deadline_falls_back_to_parent() {
        let parent = Utc::now() + Duration::days(7);
        let q = Question {
            id: 1,
            assignment_id: 1,
            title: "Q1".to_string(),
            description: "d".to_string(),
            deadline: None,
            position: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(q.effective_deadline(parent), parent);

        let own = Utc::now() + Duration::days(3);
        let q = Question {
            deadline: Some(own),
            ..q
        };
        assert_eq!(q.effective_deadline(parent), own);
    }
}
