//! Assignment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Assignment domain model
///
/// `question_ids` reflects authoring order; the question count is always
/// derived from it and never stored on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub title: String,
    pub deadline: DateTime<Utc>,
    pub is_published: bool,
    pub authors: Vec<i64>,
    pub question_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    /// Number of questions, derived from the ordered question list
    pub fn number_of_questions(&self) -> usize {
        self.question_ids.len()
    }

    /// Whether the given user authors this assignment
    pub fn is_author(&self, user_id: i64) -> bool {
        self.authors.contains(&user_id)
    }

    /// Whether the given user may see this assignment at all.
    ///
    /// Drafts are visible only to their authors; published assignments
    /// are visible to everyone with platform access.
    pub fn is_visible_to(&self, user_id: i64) -> bool {
        self.is_published || self.is_author(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(is_published: bool, authors: Vec<i64>) -> Assignment {
        Assignment {
            id: 1,
            title: "A1".to_string(),
            deadline: Utc::now(),
            is_published,
            authors,
            question_ids: vec![10, 11],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_number_of_questions_is_derived() {
        let a = assignment(false, vec![42]);
        assert_eq!(a.number_of_questions(), 2);
    }

    #[test]
    fn test_draft_visibility() {
        let a = assignment(false, vec![42]);
        assert!(a.is_visible_to(42));
        assert!(!a.is_visible_to(7));
    }

    #[test]
    fn test_published_visibility() {
        let a = assignment(true, vec![42]);
        assert!(a.is_visible_to(7));
    }
}
