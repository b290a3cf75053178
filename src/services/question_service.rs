//! Question service
//!
//! Content reads and edits for individual questions. The parent
//! assignment's visibility and publish state decide what a viewer gets:
//! students see public test cases only, authors see everything
//! including the reference solution, and structural removal is blocked
//! once the parent is published.

use crate::{
    db::repository::{EntityRepository, QuestionPatch, RemoveOutcome},
    error::{AppError, AppResult},
    handlers::questions::{
        request::UpdateQuestionRequest,
        response::{QuestionDetailResponse, ReferenceSolutionView, TestCaseView},
    },
    models::{Assignment, Question},
    utils::{time::now_utc, validation},
};

/// Question service for content reads and edits
pub struct QuestionService;

impl QuestionService {
    /// Get a question detail, filtered for the requesting viewer.
    ///
    /// A question in a draft assignment is opaque to non-authors, the
    /// same way the draft itself is.
    pub async fn get_question(
        repo: &dyn EntityRepository,
        question_id: i64,
        requester_id: i64,
    ) -> AppResult<QuestionDetailResponse> {
        let (question, assignment) = Self::load_visible(repo, question_id, requester_id).await?;

        let is_author = assignment.is_author(requester_id);

        let all_test_cases = repo.test_cases_for_question(question.id).await?;
        let total = all_test_cases.len();

        let test_cases: Vec<TestCaseView> = all_test_cases
            .into_iter()
            .filter(|tc| is_author || tc.is_public)
            .map(|tc| TestCaseView {
                id: tc.id,
                input: tc.input,
                output: tc.output,
                is_public: tc.is_public,
            })
            .collect();

        let reference_solution = if is_author {
            repo.solution_for_question(question.id)
                .await?
                .map(|s| ReferenceSolutionView {
                    id: s.id,
                    language: s.language,
                    code: s.code,
                })
        } else {
            None
        };

        let effective_deadline = question.effective_deadline(assignment.deadline);
        Ok(QuestionDetailResponse {
            id: question.id,
            assignment_id: question.assignment_id,
            title: question.title,
            description: question.description,
            deadline: question.deadline,
            effective_deadline,
            position: question.position,
            number_of_test_cases: total,
            test_cases,
            reference_solution,
            created_at: question.created_at,
            updated_at: question.updated_at,
        })
    }

    /// Edit a question's content fields.
    ///
    /// Content edits stay legal after publication; only structural
    /// changes are frozen by the publish barrier.
    pub async fn update_question(
        repo: &dyn EntityRepository,
        question_id: i64,
        requester_id: i64,
        payload: UpdateQuestionRequest,
    ) -> AppResult<QuestionDetailResponse> {
        let (question, assignment) = Self::load_visible(repo, question_id, requester_id).await?;

        if !assignment.is_author(requester_id) {
            return Err(AppError::Forbidden(
                "Only authors can update a question".to_string(),
            ));
        }

        validation::validate_question_update(&payload, now_utc())
            .map_err(AppError::Validation)?;

        repo.update_question(
            question.id,
            QuestionPatch {
                title: payload.title,
                description: payload.description,
                deadline: payload.deadline,
            },
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Question not found".to_string()))?;

        Self::get_question(repo, question_id, requester_id).await
    }

    /// Remove a question from its draft parent.
    ///
    /// Rejected once the parent is published; the barrier is re-checked
    /// under the write.
    pub async fn delete_question(
        repo: &dyn EntityRepository,
        question_id: i64,
        requester_id: i64,
    ) -> AppResult<()> {
        let (question, assignment) = Self::load_visible(repo, question_id, requester_id).await?;

        if !assignment.is_author(requester_id) {
            return Err(AppError::Forbidden(
                "Only authors can remove a question".to_string(),
            ));
        }

        if assignment.is_published {
            return Err(AppError::RejectedMutation(
                "Cannot remove a question from a published assignment".to_string(),
            ));
        }

        match repo.remove_question(question.id).await? {
            RemoveOutcome::Removed => Ok(()),
            RemoveOutcome::Missing => {
                Err(AppError::NotFound("Question not found".to_string()))
            }
            RemoveOutcome::AssignmentPublished => Err(AppError::RejectedMutation(
                "Cannot remove a question from a published assignment".to_string(),
            )),
        }
    }

    /// Load a question and its parent, applying draft opacity
    async fn load_visible(
        repo: &dyn EntityRepository,
        question_id: i64,
        requester_id: i64,
    ) -> AppResult<(Question, Assignment)> {
        let question = repo
            .find_question(question_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Question not found".to_string()))?;

        let assignment = repo
            .find_assignment(question.assignment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Question not found".to_string()))?;

        if !assignment.is_visible_to(requester_id) {
            return Err(AppError::NotFound("Question not found".to_string()));
        }

        Ok((question, assignment))
    }
}
