//! Submission model (grading-service contract)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A student's code attempt against a question, owned by the grading
/// service and read-only here. The wire contract is camelCase JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: i64,
    pub question_id: i64,
    pub student_id: i64,
    pub code: String,
    pub language: String,
    #[serde(default)]
    pub feedbacks: Vec<Feedback>,
    pub created_on: DateTime<Utc>,
}

/// Line-level feedback attached to a submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub line: i32,
    #[serde(default)]
    pub hints: Vec<String>,
}

/// Select the most recent submission from a grading-service result set.
///
/// Most recent means maximum `created_on`; ties are broken by submission
/// id descending so the selection stays deterministic.
pub fn most_recent(submissions: Vec<Submission>) -> Option<Submission> {
    submissions
        .into_iter()
        .max_by(|a, b| a.created_on.cmp(&b.created_on).then(a.id.cmp(&b.id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn submission(id: i64, created_on: DateTime<Utc>) -> Submission {
        Submission {
            id,
            question_id: 1,
            student_id: 2,
            code: "print(1)".to_string(),
            language: "python".to_string(),
            feedbacks: vec![],
            created_on,
        }
    }

    #[test]
    fn test_most_recent_by_date() {
        let early = Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2026, 1, 2, 10, 0, 0).unwrap();
        let picked = most_recent(vec![submission(1, late), submission(2, early)]).unwrap();
        assert_eq!(picked.id, 1);
    }

    #[test]
    fn test_most_recent_tie_broken_by_id_descending() {
        let t = Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap();
        let picked = most_recent(vec![submission(3, t), submission(7, t), submission(5, t)]).unwrap();
        assert_eq!(picked.id, 7);
    }

    #[test]
    fn test_most_recent_empty() {
        assert!(most_recent(vec![]).is_none());
    }

    #[test]
    fn test_submission_deserializes_camel_case() {
        let json = r#"{
            "id": 9,
            "questionId": 4,
            "studentId": 42,
            "code": "x = 1",
            "language": "python",
            "feedbacks": [{"line": 2, "hints": ["off by one"]}],
            "createdOn": "2026-03-01T12:00:00Z"
        }"#;
        let s: Submission = serde_json::from_str(json).unwrap();
        assert_eq!(s.question_id, 4);
        assert_eq!(s.feedbacks[0].line, 2);
    }
}
