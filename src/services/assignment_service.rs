//! Assignment lifecycle service
//!
//! Owns the lifecycle rules: who may create and mutate assignments, the
//! one-way Draft -> Published transition, and the publish barrier that
//! freezes the question set once an assignment is published.

use crate::{
    clients::directory::UserDirectory,
    db::repository::{
        AppendOutcome, AssignmentPatch, EntityRepository, NewAssignment, NewQuestion,
        NewReferenceSolution, NewTestCase, PublishOutcome,
    },
    error::{AppError, AppResult, FieldViolation},
    handlers::assignments::{
        request::{
            CreateAssignmentRequest, QuestionPayload, UpdateAssignmentRequest,
        },
        response::{AssignmentDetailResponse, AssignmentSummary, QuestionSummary},
    },
    models::Assignment,
    utils::{
        time::{is_past, now_utc},
        validation,
    },
};

/// Assignment service for lifecycle rules
pub struct AssignmentService;

impl AssignmentService {
    /// Create a new draft assignment.
    ///
    /// The requesting user is seeded into the author set whether or not
    /// the payload lists them. Not idempotent.
    pub async fn create_assignment(
        repo: &dyn EntityRepository,
        directory: &dyn UserDirectory,
        requester_id: i64,
        payload: CreateAssignmentRequest,
    ) -> AppResult<AssignmentDetailResponse> {
        validation::validate_assignment_create(&payload).map_err(AppError::Validation)?;

        let mut authors = payload.authors.unwrap_or_default();
        if !authors.contains(&requester_id) {
            authors.push(requester_id);
        }

        Self::verify_authors_exist(directory, &authors).await?;

        let assignment = repo
            .create_assignment(NewAssignment {
                title: payload.title,
                deadline: payload.deadline,
                authors,
            })
            .await?;

        Self::to_detail(repo, assignment).await
    }

    /// Get an assignment detail, applying visibility rules.
    ///
    /// Drafts are opaque to non-authors: the response is NotFound, not
    /// Forbidden, so it does not reveal that the assignment exists.
    pub async fn get_assignment(
        repo: &dyn EntityRepository,
        assignment_id: i64,
        requester_id: i64,
    ) -> AppResult<AssignmentDetailResponse> {
        let assignment = repo
            .find_assignment(assignment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))?;

        if !assignment.is_visible_to(requester_id) {
            return Err(AppError::NotFound("Assignment not found".to_string()));
        }

        Self::to_detail(repo, assignment).await
    }

    /// List assignments visible to a user.
    ///
    /// Authored assignments are always visible; others only when
    /// published and, unless `include_past` is set, not yet past their
    /// deadline. Ordered by deadline ascending, ties by id.
    pub async fn list_assignments(
        repo: &dyn EntityRepository,
        user_id: i64,
        include_past: bool,
        is_published_filter: Option<bool>,
    ) -> AppResult<Vec<AssignmentSummary>> {
        let mut visible: Vec<Assignment> = repo
            .list_assignments()
            .await?
            .into_iter()
            .filter(|a| {
                if a.is_author(user_id) {
                    true
                } else {
                    a.is_published && (include_past || !is_past(a.deadline))
                }
            })
            .filter(|a| is_published_filter.is_none_or(|p| a.is_published == p))
            .collect();

        visible.sort_by_key(|a| (a.deadline, a.id));

        Ok(visible
            .into_iter()
            .map(|a| AssignmentSummary {
                id: a.id,
                title: a.title.clone(),
                deadline: a.deadline,
                is_published: a.is_published,
                number_of_questions: a.number_of_questions(),
            })
            .collect())
    }

    /// Update top-level fields. Allowed for drafts and published
    /// assignments alike; the question set is never touched here.
    pub async fn update_assignment(
        repo: &dyn EntityRepository,
        directory: &dyn UserDirectory,
        assignment_id: i64,
        requester_id: i64,
        payload: UpdateAssignmentRequest,
    ) -> AppResult<AssignmentDetailResponse> {
        let assignment = repo
            .find_assignment(assignment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))?;

        if !assignment.is_author(requester_id) {
            return Err(AppError::Forbidden(
                "Only authors can update an assignment".to_string(),
            ));
        }

        validation::validate_assignment_update(&payload).map_err(AppError::Validation)?;

        let add_authors = payload.add_authors.unwrap_or_default();
        Self::verify_authors_exist(directory, &add_authors).await?;

        let updated = repo
            .update_assignment(
                assignment_id,
                AssignmentPatch {
                    title: payload.title,
                    deadline: payload.deadline,
                    add_authors,
                },
            )
            .await?
            .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))?;

        Self::to_detail(repo, updated).await
    }

    /// Delete an assignment and everything it owns
    pub async fn delete_assignment(
        repo: &dyn EntityRepository,
        assignment_id: i64,
        requester_id: i64,
    ) -> AppResult<()> {
        let assignment = repo
            .find_assignment(assignment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))?;

        if !assignment.is_author(requester_id) {
            return Err(AppError::Forbidden(
                "Only authors can delete an assignment".to_string(),
            ));
        }

        repo.delete_assignment(assignment_id).await?;
        Ok(())
    }

    /// Append a batch of questions with their nested entities.
    ///
    /// All payloads are validated before anything is persisted; a
    /// violation in any question fails the whole call with zero writes.
    /// The repository re-checks the publish barrier under the write.
    pub async fn add_questions(
        repo: &dyn EntityRepository,
        assignment_id: i64,
        requester_id: i64,
        payloads: Vec<QuestionPayload>,
    ) -> AppResult<AssignmentDetailResponse> {
        let assignment = repo
            .find_assignment(assignment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))?;

        if !assignment.is_author(requester_id) {
            return Err(AppError::Forbidden(
                "Only authors can add questions".to_string(),
            ));
        }

        if assignment.is_published {
            return Err(AppError::RejectedMutation(
                "Cannot add questions to a published assignment".to_string(),
            ));
        }

        if payloads.is_empty() {
            return Err(AppError::validation("questions", "must not be empty"));
        }

        let now = now_utc();
        let mut violations: Vec<FieldViolation> = Vec::new();
        for (i, payload) in payloads.iter().enumerate() {
            if let Err(mut batch) = validation::validate_question_create(payload, now) {
                for violation in &mut batch {
                    violation.field = format!("questions[{}].{}", i, violation.field);
                }
                violations.append(&mut batch);
            }
        }
        if !violations.is_empty() {
            return Err(AppError::Validation(violations));
        }

        let new_questions: Vec<NewQuestion> =
            payloads.into_iter().map(Self::to_new_question).collect();

        match repo.append_questions(assignment_id, new_questions).await? {
            AppendOutcome::Appended(_) => {}
            AppendOutcome::AssignmentMissing => {
                return Err(AppError::NotFound("Assignment not found".to_string()));
            }
            AppendOutcome::AssignmentPublished => {
                return Err(AppError::RejectedMutation(
                    "Cannot add questions to a published assignment".to_string(),
                ));
            }
        }

        let updated = repo
            .find_assignment(assignment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))?;

        Self::to_detail(repo, updated).await
    }

    /// Publish an assignment. One-way: there is no unpublish.
    ///
    /// Publishing an empty assignment is rejected; publishing an already
    /// published assignment is a no-op success.
    pub async fn publish_assignment(
        repo: &dyn EntityRepository,
        assignment_id: i64,
        requester_id: i64,
    ) -> AppResult<AssignmentDetailResponse> {
        let assignment = repo
            .find_assignment(assignment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))?;

        if !assignment.is_author(requester_id) {
            return Err(AppError::Forbidden(
                "Only authors can publish an assignment".to_string(),
            ));
        }

        match repo.publish_assignment(assignment_id).await? {
            PublishOutcome::Published(published) => Self::to_detail(repo, published).await,
            PublishOutcome::Missing => {
                Err(AppError::NotFound("Assignment not found".to_string()))
            }
            PublishOutcome::Empty => Err(AppError::RejectedMutation(
                "Cannot publish an assignment without questions".to_string(),
            )),
        }
    }

    async fn verify_authors_exist(
        directory: &dyn UserDirectory,
        author_ids: &[i64],
    ) -> AppResult<()> {
        for id in author_ids {
            if directory.get_user(*id).await?.is_none() {
                return Err(AppError::validation(
                    "authors",
                    format!("user {} does not exist", id),
                ));
            }
        }
        Ok(())
    }

    fn to_new_question(payload: QuestionPayload) -> NewQuestion {
        NewQuestion {
            title: payload.title,
            description: payload.description,
            deadline: payload.deadline,
            test_cases: payload
                .test_cases
                .unwrap_or_default()
                .into_iter()
                .map(|tc| NewTestCase {
                    input: tc.input,
                    output: tc.output,
                    // Missing visibility means public, by product decision
                    is_public: tc.is_public.unwrap_or(true),
                })
                .collect(),
            reference_solution: payload.reference_solution.map(|s| NewReferenceSolution {
                language: s.language,
                code: s.code,
            }),
        }
    }

    pub(crate) async fn to_detail(
        repo: &dyn EntityRepository,
        assignment: Assignment,
    ) -> AppResult<AssignmentDetailResponse> {
        let questions = repo.questions_for_assignment(assignment.id).await?;

        let mut summaries = Vec::with_capacity(questions.len());
        for question in &questions {
            let test_cases = repo.test_cases_for_question(question.id).await?;
            summaries.push(QuestionSummary {
                id: question.id,
                title: question.title.clone(),
                deadline: question.effective_deadline(assignment.deadline),
                position: question.position,
                number_of_test_cases: test_cases.len(),
            });
        }

        Ok(AssignmentDetailResponse {
            id: assignment.id,
            title: assignment.title,
            deadline: assignment.deadline,
            is_published: assignment.is_published,
            authors: assignment.authors,
            number_of_questions: summaries.len(),
            questions: summaries,
            created_at: assignment.created_at,
            updated_at: assignment.updated_at,
        })
    }
}
