//! Input validation
//!
//! Pure, stateless checks over incoming payloads. Every validator returns
//! `Ok(())` or an ordered list of field-level violations; bad input is a
//! normal outcome here, never a panic. Existence checks (author ids,
//! referenced entities) belong to the services, not to this module.

use chrono::{DateTime, Utc};

use crate::{
    constants::{
        MAX_ASSIGNMENT_TITLE_LENGTH, MAX_QUESTION_DESCRIPTION_LENGTH, MAX_QUESTION_TITLE_LENGTH,
        languages,
    },
    error::{AppError, AppResult, FieldViolation},
    handlers::assignments::request::{
        CreateAssignmentRequest, QuestionPayload, UpdateAssignmentRequest,
    },
    handlers::questions::request::UpdateQuestionRequest,
};

type Violations = Vec<FieldViolation>;

fn check(violations: Violations) -> Result<(), Violations> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn char_len(s: &str) -> u64 {
    s.chars().count() as u64
}

/// Validate an assignment creation payload
pub fn validate_assignment_create(req: &CreateAssignmentRequest) -> Result<(), Violations> {
    let mut violations = Vec::new();

    if req.title.trim().is_empty() {
        violations.push(FieldViolation::new("title", "must not be empty"));
    } else if char_len(&req.title) > MAX_ASSIGNMENT_TITLE_LENGTH {
        violations.push(FieldViolation::new(
            "title",
            format!("must be at most {} characters", MAX_ASSIGNMENT_TITLE_LENGTH),
        ));
    }

    if let Some(authors) = &req.authors {
        if authors.iter().any(|id| *id <= 0) {
            violations.push(FieldViolation::new("authors", "must contain positive user ids"));
        }
    }

    check(violations)
}

/// Validate an assignment update payload (all fields optional)
pub fn validate_assignment_update(req: &UpdateAssignmentRequest) -> Result<(), Violations> {
    let mut violations = Vec::new();

    if let Some(title) = &req.title {
        if title.trim().is_empty() {
            violations.push(FieldViolation::new("title", "must not be empty"));
        } else if char_len(title) > MAX_ASSIGNMENT_TITLE_LENGTH {
            violations.push(FieldViolation::new(
                "title",
                format!("must be at most {} characters", MAX_ASSIGNMENT_TITLE_LENGTH),
            ));
        }
    }

    if let Some(add_authors) = &req.add_authors {
        if add_authors.iter().any(|id| *id <= 0) {
            violations.push(FieldViolation::new(
                "addAuthors",
                "must contain positive user ids",
            ));
        }
    }

    check(violations)
}

/// Validate a question creation payload, including its nested test cases
/// and reference solution. `now` is the validation instant: a question
/// whose deadline has already passed cannot be authored.
pub fn validate_question_create(
    payload: &QuestionPayload,
    now: DateTime<Utc>,
) -> Result<(), Violations> {
    let mut violations = Vec::new();

    if payload.title.trim().is_empty() {
        violations.push(FieldViolation::new("title", "must not be empty"));
    } else if char_len(&payload.title) > MAX_QUESTION_TITLE_LENGTH {
        violations.push(FieldViolation::new(
            "title",
            format!("must be at most {} characters", MAX_QUESTION_TITLE_LENGTH),
        ));
    }

    if payload.description.is_empty() {
        violations.push(FieldViolation::new("description", "must not be empty"));
    } else if char_len(&payload.description) > MAX_QUESTION_DESCRIPTION_LENGTH {
        violations.push(FieldViolation::new(
            "description",
            format!(
                "must be at most {} characters",
                MAX_QUESTION_DESCRIPTION_LENGTH
            ),
        ));
    }

    if let Some(deadline) = payload.deadline {
        if deadline < now {
            violations.push(FieldViolation::new("deadline", "must not be in the past"));
        }
    }

    if let Some(solution) = &payload.reference_solution {
        if solution.code.trim().is_empty() {
            violations.push(FieldViolation::new(
                "referenceSolution.code",
                "must not be empty",
            ));
        }
        if let Err(reason) = validate_language(&solution.language) {
            violations.push(FieldViolation::new("referenceSolution.language", reason));
        }
    }

    if let Some(test_cases) = &payload.test_cases {
        if test_cases.is_empty() {
            violations.push(FieldViolation::new("testCases", "must not be empty when provided"));
        }
        for (i, tc) in test_cases.iter().enumerate() {
            if tc.input.is_empty() {
                violations.push(FieldViolation::new(
                    format!("testCases[{}].input", i),
                    "must not be empty",
                ));
            }
            if tc.output.is_empty() {
                violations.push(FieldViolation::new(
                    format!("testCases[{}].output", i),
                    "must not be empty",
                ));
            }
        }
    }

    check(violations)
}

/// Validate a question update payload (all fields optional).
///
/// Deadline extension is always allowed; moving a deadline below `now`
/// is rejected.
pub fn validate_question_update(
    patch: &UpdateQuestionRequest,
    now: DateTime<Utc>,
) -> Result<(), Violations> {
    let mut violations = Vec::new();

    if let Some(title) = &patch.title {
        if title.trim().is_empty() {
            violations.push(FieldViolation::new("title", "must not be empty"));
        } else if char_len(title) > MAX_QUESTION_TITLE_LENGTH {
            violations.push(FieldViolation::new(
                "title",
                format!("must be at most {} characters", MAX_QUESTION_TITLE_LENGTH),
            ));
        }
    }

    if let Some(description) = &patch.description {
        if description.is_empty() {
            violations.push(FieldViolation::new("description", "must not be empty"));
        } else if char_len(description) > MAX_QUESTION_DESCRIPTION_LENGTH {
            violations.push(FieldViolation::new(
                "description",
                format!(
                    "must be at most {} characters",
                    MAX_QUESTION_DESCRIPTION_LENGTH
                ),
            ));
        }
    }

    if let Some(deadline) = patch.deadline {
        if deadline < now {
            violations.push(FieldViolation::new("deadline", "must not be in the past"));
        }
    }

    check(violations)
}

/// Validate a reference-solution language identifier
pub fn validate_language(language: &str) -> Result<(), &'static str> {
    if languages::ALL.contains(&language) {
        Ok(())
    } else {
        Err("unsupported language")
    }
}

/// Coerce a boolean query parameter ("true"/"false", case-insensitive).
///
/// Malformed values fail the request before any business logic runs.
pub fn parse_bool_param(field: &str, value: &str) -> AppResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(AppError::validation(field, "must be a boolean")),
    }
}

/// Coerce a user-id query parameter (positive integer)
pub fn parse_user_id_param(field: &str, value: &str) -> AppResult<i64> {
    match value.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::validation(field, "must be a positive integer")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::assignments::request::{ReferenceSolutionPayload, TestCasePayload};
    use chrono::Duration;

    fn question_payload() -> QuestionPayload {
        QuestionPayload {
            title: "Q1".to_string(),
            description: "Write a program".to_string(),
            deadline: None,
            test_cases: Some(vec![TestCasePayload {
                input: "1".to_string(),
                output: "1".to_string(),
                is_public: None,
            }]),
            reference_solution: None,
        }
    }

    #[test]
    fn test_assignment_create_requires_title() {
        let req = CreateAssignmentRequest {
            title: "   ".to_string(),
            deadline: Utc::now(),
            authors: None,
        };
        let violations = validate_assignment_create(&req).unwrap_err();
        assert_eq!(violations[0].field, "title");
    }

    #[test]
    fn test_assignment_create_title_bound() {
        let req = CreateAssignmentRequest {
            title: "x".repeat(256),
            deadline: Utc::now(),
            authors: Some(vec![42]),
        };
        assert!(validate_assignment_create(&req).is_err());

        let req = CreateAssignmentRequest {
            title: "x".repeat(255),
            deadline: Utc::now(),
            authors: Some(vec![42]),
        };
        assert!(validate_assignment_create(&req).is_ok());
    }

    #[test]
    fn test_question_create_valid() {
        assert!(validate_question_create(&question_payload(), Utc::now()).is_ok());
    }

    #[test]
    fn test_question_create_past_deadline_rejected() {
        let now = Utc::now();
        let payload = QuestionPayload {
            deadline: Some(now - Duration::hours(1)),
            ..question_payload()
        };
        let violations = validate_question_create(&payload, now).unwrap_err();
        assert!(violations.iter().any(|v| v.field == "deadline"));
    }

    #[test]
    fn test_question_create_empty_test_case_rejected() {
        let payload = QuestionPayload {
            test_cases: Some(vec![TestCasePayload {
                input: "".to_string(),
                output: "1".to_string(),
                is_public: None,
            }]),
            ..question_payload()
        };
        let violations = validate_question_create(&payload, Utc::now()).unwrap_err();
        assert_eq!(violations[0].field, "testCases[0].input");
    }

    #[test]
    fn test_question_create_empty_test_case_list_rejected() {
        let payload = QuestionPayload {
            test_cases: Some(vec![]),
            ..question_payload()
        };
        assert!(validate_question_create(&payload, Utc::now()).is_err());
    }

    #[test]
    fn test_question_create_solution_checks() {
        let payload = QuestionPayload {
            reference_solution: Some(ReferenceSolutionPayload {
                language: "cobol".to_string(),
                code: "".to_string(),
            }),
            ..question_payload()
        };
        let violations = validate_question_create(&payload, Utc::now()).unwrap_err();
        let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
        assert!(fields.contains(&"referenceSolution.code"));
        assert!(fields.contains(&"referenceSolution.language"));
    }

    #[test]
    fn test_question_update_partial() {
        let patch = UpdateQuestionRequest {
            title: None,
            description: None,
            deadline: None,
        };
        assert!(validate_question_update(&patch, Utc::now()).is_ok());

        let patch = UpdateQuestionRequest {
            title: Some("".to_string()),
            description: None,
            deadline: Some(Utc::now() - Duration::minutes(5)),
        };
        let violations = validate_question_update(&patch, Utc::now()).unwrap_err();
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_validate_language() {
        assert!(validate_language("python").is_ok());
        assert!(validate_language("c").is_ok());
        assert!(validate_language("java").is_ok());
        assert!(validate_language("brainfuck").is_err());
    }

    #[test]
    fn test_parse_bool_param() {
        assert!(parse_bool_param("includePast", "true").unwrap());
        assert!(!parse_bool_param("includePast", "False").unwrap());
        assert!(parse_bool_param("includePast", "yes").is_err());
    }

    #[test]
    fn test_parse_user_id_param() {
        assert_eq!(parse_user_id_param("userId", "42").unwrap(), 42);
        assert!(parse_user_id_param("userId", "0").is_err());
        assert!(parse_user_id_param("userId", "-3").is_err());
        assert!(parse_user_id_param("userId", "abc").is_err());
    }
}
