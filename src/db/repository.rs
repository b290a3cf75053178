//! Entity repository abstraction
//!
//! The repository owns persistence and nothing else: no lifecycle rules
//! live here. Write operations that interact with the publish barrier
//! report what they saw through outcome enums, so the services decide
//! what each case means, while the check itself happens atomically under
//! the write.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    error::AppResult,
    models::{Assignment, Question, ReferenceSolution, TestCase},
};

/// Payload for creating an assignment
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub title: String,
    pub deadline: DateTime<Utc>,
    pub authors: Vec<i64>,
}

/// Partial update of an assignment's top-level fields.
///
/// Authors are append-only; there is no removal.
#[derive(Debug, Clone, Default)]
pub struct AssignmentPatch {
    pub title: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub add_authors: Vec<i64>,
}

/// Payload for creating a question with its nested entities
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub title: String,
    pub description: String,
    pub deadline: Option<DateTime<Utc>>,
    pub test_cases: Vec<NewTestCase>,
    pub reference_solution: Option<NewReferenceSolution>,
}

/// Payload for creating a test case
#[derive(Debug, Clone)]
pub struct NewTestCase {
    pub input: String,
    pub output: String,
    pub is_public: bool,
}

/// Payload for creating a reference solution
#[derive(Debug, Clone)]
pub struct NewReferenceSolution {
    pub language: String,
    pub code: String,
}

/// Partial update of a question's content fields
#[derive(Debug, Clone, Default)]
pub struct QuestionPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
}

/// Result of an atomic question-batch append
#[derive(Debug)]
pub enum AppendOutcome {
    /// All questions persisted, in the given order
    Appended(Vec<Question>),
    AssignmentMissing,
    /// The assignment was published at the moment of the write
    AssignmentPublished,
}

/// Result of a publish attempt
#[derive(Debug)]
pub enum PublishOutcome {
    Published(Assignment),
    Missing,
    /// Assignments without questions cannot be published
    Empty,
}

/// Result of a question removal
#[derive(Debug)]
pub enum RemoveOutcome {
    Removed,
    Missing,
    /// The parent assignment was published at the moment of the write
    AssignmentPublished,
}

/// Persistence abstraction for assignments, questions, test cases and
/// reference solutions.
#[async_trait]
pub trait EntityRepository: Send + Sync {
    async fn create_assignment(&self, new: NewAssignment) -> AppResult<Assignment>;

    async fn find_assignment(&self, id: i64) -> AppResult<Option<Assignment>>;

    async fn list_assignments(&self) -> AppResult<Vec<Assignment>>;

    async fn update_assignment(
        &self,
        id: i64,
        patch: AssignmentPatch,
    ) -> AppResult<Option<Assignment>>;

    /// Delete an assignment; cascades to questions, test cases and
    /// reference solutions. Returns whether anything was deleted.
    async fn delete_assignment(&self, id: i64) -> AppResult<bool>;

    /// Flip the one-way published flag. Re-checks emptiness under the
    /// write. Publishing an already published assignment succeeds.
    async fn publish_assignment(&self, id: i64) -> AppResult<PublishOutcome>;

    /// Persist a question batch with nested entities atomically,
    /// appending to the assignment's question order. The publish barrier
    /// is re-validated inside the write, not just at request entry.
    async fn append_questions(
        &self,
        assignment_id: i64,
        questions: Vec<NewQuestion>,
    ) -> AppResult<AppendOutcome>;

    /// Questions of an assignment in authoring order
    async fn questions_for_assignment(&self, assignment_id: i64) -> AppResult<Vec<Question>>;

    async fn find_question(&self, id: i64) -> AppResult<Option<Question>>;

    async fn update_question(
        &self,
        id: i64,
        patch: QuestionPatch,
    ) -> AppResult<Option<Question>>;

    /// Remove a question (structural change, draft parent only)
    async fn remove_question(&self, id: i64) -> AppResult<RemoveOutcome>;

    async fn test_cases_for_question(&self, question_id: i64) -> AppResult<Vec<TestCase>>;

    async fn solution_for_question(
        &self,
        question_id: i64,
    ) -> AppResult<Option<ReferenceSolution>>;
}
