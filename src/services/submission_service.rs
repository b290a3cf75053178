//! Submission view coordinator
//!
//! Builds consolidated submission views by fanning out one grading
//! lookup per question, bounding each lookup with a timeout, and
//! merging the results back in the assignment's question order. A
//! failed lookup degrades that question's entry instead of failing the
//! whole view; only when every lookup fails does the view itself error.

use std::time::Duration;

use futures::future::join_all;
use tracing::warn;

use crate::{
    clients::{
        directory::UserDirectory,
        grading::{FeedbackRequest, GradingClient, GradingError},
    },
    db::repository::EntityRepository,
    error::{AppError, AppResult},
    handlers::submissions::response::{
        AssignmentSubmissionsResponse, OverviewResponse, QuestionSubmissionEntry,
        StudentOverviewResponse, StudentSubmissionSummary, SubmissionStatus,
        TutorOverviewResponse, TutorQuestionOverview,
    },
    models::{submission::most_recent, Assignment, Feedback, Question, Submission, User},
};

/// Coordinator for consolidated submission views
pub struct SubmissionService;

impl SubmissionService {
    /// Consolidated submission state for one assignment and one student.
    ///
    /// The target student defaults to the requester; querying another
    /// user's state requires authorship of the assignment.
    pub async fn assignment_submissions(
        repo: &dyn EntityRepository,
        grading: &dyn GradingClient,
        lookup_timeout: Duration,
        assignment_id: i64,
        requester_id: i64,
        target_user_id: Option<i64>,
    ) -> AppResult<AssignmentSubmissionsResponse> {
        let assignment = repo
            .find_assignment(assignment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))?;

        if !assignment.is_visible_to(requester_id) {
            return Err(AppError::NotFound("Assignment not found".to_string()));
        }

        let student_id = target_user_id.unwrap_or(requester_id);
        if student_id != requester_id && !assignment.is_author(requester_id) {
            return Err(AppError::Forbidden(
                "Only authors can view another user's submissions".to_string(),
            ));
        }

        let questions = repo.questions_for_assignment(assignment_id).await?;
        let (entries, all_unavailable) =
            Self::consolidate(grading, lookup_timeout, &questions, student_id).await;

        if all_unavailable && !questions.is_empty() {
            return Err(AppError::GradingUnavailable);
        }

        Ok(AssignmentSubmissionsResponse {
            assignment_id: assignment.id,
            title: assignment.title,
            deadline: assignment.deadline,
            entries,
        })
    }

    /// Role-dependent overview.
    ///
    /// Students get one consolidated view per visible assignment; tutors
    /// get their authored questions with the students who submitted.
    /// Tutors may request another user's overview via `target_user_id`.
    pub async fn overview(
        repo: &dyn EntityRepository,
        grading: &dyn GradingClient,
        directory: &dyn UserDirectory,
        lookup_timeout: Duration,
        requester_id: i64,
        target_user_id: Option<i64>,
    ) -> AppResult<OverviewResponse> {
        let requester = Self::resolve_user(directory, requester_id).await?;

        let target = match target_user_id {
            Some(id) if id != requester_id => {
                if !requester.is_tutor() {
                    return Err(AppError::Forbidden(
                        "Only tutors can view another user's overview".to_string(),
                    ));
                }
                Self::resolve_user(directory, id).await?
            }
            _ => requester,
        };

        if target.is_tutor() {
            Self::tutor_overview(repo, grading, directory, lookup_timeout, &target)
                .await
                .map(OverviewResponse::Tutor)
        } else {
            Self::student_overview(repo, grading, lookup_timeout, &target)
                .await
                .map(OverviewResponse::Student)
        }
    }

    /// Forward tutor feedback to the grading service.
    ///
    /// The grading service owns feedback storage; this only gates the
    /// call on the tutor role.
    pub async fn post_feedback(
        grading: &dyn GradingClient,
        directory: &dyn UserDirectory,
        requester_id: i64,
        request: FeedbackRequest,
    ) -> AppResult<Feedback> {
        let requester = Self::resolve_user(directory, requester_id).await?;
        if !requester.is_tutor() {
            return Err(AppError::Forbidden(
                "Only tutors can post feedback".to_string(),
            ));
        }

        grading
            .post_feedback(request)
            .await
            .map_err(Self::map_grading_error)
    }

    async fn student_overview(
        repo: &dyn EntityRepository,
        grading: &dyn GradingClient,
        lookup_timeout: Duration,
        student: &User,
    ) -> AppResult<StudentOverviewResponse> {
        let mut visible: Vec<Assignment> = repo
            .list_assignments()
            .await?
            .into_iter()
            .filter(|a| a.is_visible_to(student.id))
            .collect();
        visible.sort_by_key(|a| (a.deadline, a.id));

        let mut assignments = Vec::with_capacity(visible.len());
        for assignment in visible {
            let questions = repo.questions_for_assignment(assignment.id).await?;
            // Failures degrade entries here; the overview never aborts
            let (entries, _) =
                Self::consolidate(grading, lookup_timeout, &questions, student.id).await;
            assignments.push(AssignmentSubmissionsResponse {
                assignment_id: assignment.id,
                title: assignment.title,
                deadline: assignment.deadline,
                entries,
            });
        }

        Ok(StudentOverviewResponse { assignments })
    }

    async fn tutor_overview(
        repo: &dyn EntityRepository,
        grading: &dyn GradingClient,
        directory: &dyn UserDirectory,
        lookup_timeout: Duration,
        tutor: &User,
    ) -> AppResult<TutorOverviewResponse> {
        let mut authored: Vec<Assignment> = repo
            .list_assignments()
            .await?
            .into_iter()
            .filter(|a| a.is_author(tutor.id))
            .collect();
        authored.sort_by_key(|a| (a.deadline, a.id));

        let mut questions_out = Vec::new();
        for assignment in authored {
            let questions = repo.questions_for_assignment(assignment.id).await?;

            let lookups = questions.iter().map(|q| {
                Self::bounded_lookup(lookup_timeout, grading.get_question_submissions(q.id))
            });
            let results = join_all(lookups).await;

            for (question, result) in questions.iter().zip(results) {
                questions_out.push(
                    Self::question_overview(directory, &assignment, question, result).await?,
                );
            }
        }

        Ok(TutorOverviewResponse {
            questions: questions_out,
        })
    }

    async fn question_overview(
        directory: &dyn UserDirectory,
        assignment: &Assignment,
        question: &Question,
        result: Result<Vec<Submission>, GradingError>,
    ) -> AppResult<TutorQuestionOverview> {
        let submissions = match result {
            Ok(submissions) => submissions,
            Err(err) => {
                warn!(question_id = question.id, error = %err, "grading lookup failed");
                return Ok(TutorQuestionOverview {
                    assignment_id: assignment.id,
                    question_id: question.id,
                    question_title: question.title.clone(),
                    grading_unavailable: true,
                    students: Vec::new(),
                });
            }
        };

        // Latest activity per student
        let mut latest: std::collections::BTreeMap<i64, chrono::DateTime<chrono::Utc>> =
            std::collections::BTreeMap::new();
        for submission in submissions {
            latest
                .entry(submission.student_id)
                .and_modify(|at| {
                    if submission.created_on > *at {
                        *at = submission.created_on;
                    }
                })
                .or_insert(submission.created_on);
        }

        let mut students = Vec::with_capacity(latest.len());
        for (student_id, last_submitted_at) in latest {
            let student_name = match directory.get_user(student_id).await? {
                Some(user) => user.name,
                None => format!("user {}", student_id),
            };
            students.push(StudentSubmissionSummary {
                student_id,
                student_name,
                last_submitted_at,
            });
        }
        students.sort_by(|a, b| {
            a.student_name
                .cmp(&b.student_name)
                .then(a.student_id.cmp(&b.student_id))
        });

        Ok(TutorQuestionOverview {
            assignment_id: assignment.id,
            question_id: question.id,
            question_title: question.title.clone(),
            grading_unavailable: false,
            students,
        })
    }

    /// Fan out one lookup per question, merge in question order.
    ///
    /// Returns the entries plus whether every lookup failed.
    async fn consolidate(
        grading: &dyn GradingClient,
        lookup_timeout: Duration,
        questions: &[Question],
        student_id: i64,
    ) -> (Vec<QuestionSubmissionEntry>, bool) {
        let lookups = questions.iter().map(|q| {
            Self::bounded_lookup(lookup_timeout, grading.get_submissions(q.id, student_id))
        });
        let results = join_all(lookups).await;

        let mut all_unavailable = !questions.is_empty();
        let entries = questions
            .iter()
            .zip(results)
            .map(|(question, result)| match result {
                Ok(submissions) => {
                    all_unavailable = false;
                    Self::entry_from_submissions(question, submissions)
                }
                Err(err) => {
                    warn!(question_id = question.id, error = %err, "grading lookup failed");
                    QuestionSubmissionEntry {
                        question_id: question.id,
                        question_title: question.title.clone(),
                        status: SubmissionStatus::GradingUnavailable,
                        submission_id: None,
                        submitted_at: None,
                        language: None,
                        feedbacks: Vec::new(),
                    }
                }
            })
            .collect();

        (entries, all_unavailable)
    }

    fn entry_from_submissions(
        question: &Question,
        submissions: Vec<Submission>,
    ) -> QuestionSubmissionEntry {
        match most_recent(submissions) {
            Some(submission) => QuestionSubmissionEntry {
                question_id: question.id,
                question_title: question.title.clone(),
                status: SubmissionStatus::Submitted,
                submission_id: Some(submission.id),
                submitted_at: Some(submission.created_on),
                language: Some(submission.language),
                feedbacks: submission.feedbacks,
            },
            None => QuestionSubmissionEntry {
                question_id: question.id,
                question_title: question.title.clone(),
                status: SubmissionStatus::NotSubmitted,
                submission_id: None,
                submitted_at: None,
                language: None,
                feedbacks: Vec::new(),
            },
        }
    }

    async fn bounded_lookup<F>(
        lookup_timeout: Duration,
        lookup: F,
    ) -> Result<Vec<Submission>, GradingError>
    where
        F: std::future::Future<Output = Result<Vec<Submission>, GradingError>>,
    {
        match tokio::time::timeout(lookup_timeout, lookup).await {
            Ok(result) => result,
            Err(_) => Err(GradingError::Timeout),
        }
    }

    async fn resolve_user(directory: &dyn UserDirectory, user_id: i64) -> AppResult<User> {
        directory
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    fn map_grading_error(err: GradingError) -> AppError {
        match err {
            GradingError::Timeout => AppError::UpstreamTimeout("grading service".to_string()),
            _ => AppError::GradingUnavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::directory::MockUserDirectory;
    use crate::clients::grading::MockGradingClient;
    use crate::db::memory::MemoryRepository;
    use crate::handlers::assignments::request::{
        CreateAssignmentRequest, QuestionPayload, TestCasePayload,
    };
    use crate::services::assignment_service::AssignmentService;
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};
    use crate::utils::time::now_utc;

    const AUTHOR: i64 = 42;
    const STUDENT: i64 = 7;
    const TIMEOUT: Duration = Duration::from_millis(200);

    fn directory() -> MockUserDirectory {
        let mut directory = MockUserDirectory::new();
        directory.expect_get_user().returning(|id| {
            let role = if id == AUTHOR { "tutor" } else { "student" };
            Ok(Some(User {
                id,
                name: format!("user-{}", id),
                email: None,
                role: role.to_string(),
            }))
        });
        directory
    }

    fn question_payload(title: &str) -> QuestionPayload {
        QuestionPayload {
            title: title.to_string(),
            description: "d".to_string(),
            deadline: None,
            test_cases: Some(vec![TestCasePayload {
                input: "1".to_string(),
                output: "1".to_string(),
                is_public: None,
            }]),
            reference_solution: None,
        }
    }

    async fn seed_published(repo: &MemoryRepository, titles: &[&str]) -> (i64, Vec<i64>) {
        let directory = directory();
        let detail = AssignmentService::create_assignment(
            repo,
            &directory,
            AUTHOR,
            CreateAssignmentRequest {
                title: "A1".to_string(),
                deadline: now_utc() + ChronoDuration::days(7),
                authors: None,
            },
        )
        .await
        .unwrap();

        let payloads = titles.iter().map(|t| question_payload(t)).collect();
        let detail = AssignmentService::add_questions(repo, detail.id, AUTHOR, payloads)
            .await
            .unwrap();
        AssignmentService::publish_assignment(repo, detail.id, AUTHOR)
            .await
            .unwrap();

        let question_ids = detail.questions.iter().map(|q| q.id).collect();
        (detail.id, question_ids)
    }

    fn submission(id: i64, question_id: i64, student_id: i64, hour: u32) -> Submission {
        Submission {
            id,
            question_id,
            student_id,
            code: "x = 1".to_string(),
            language: "python".to_string(),
            feedbacks: vec![],
            created_on: Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_entries_follow_question_order() {
        let repo = MemoryRepository::new();
        let (assignment_id, question_ids) = seed_published(&repo, &["Q1", "Q2", "Q3"]).await;

        let q1 = question_ids[0];
        let mut grading = MockGradingClient::new();
        grading
            .expect_get_submissions()
            .returning(move |question_id, student_id| {
                if question_id == q1 {
                    Ok(vec![submission(1, question_id, student_id, 10)])
                } else {
                    Ok(vec![])
                }
            });

        let view = SubmissionService::assignment_submissions(
            &repo,
            &grading,
            TIMEOUT,
            assignment_id,
            STUDENT,
            None,
        )
        .await
        .unwrap();

        let ids: Vec<i64> = view.entries.iter().map(|e| e.question_id).collect();
        assert_eq!(ids, question_ids);
        assert_eq!(view.entries[0].status, SubmissionStatus::Submitted);
        assert_eq!(view.entries[0].submission_id, Some(1));
        assert_eq!(view.entries[1].status, SubmissionStatus::NotSubmitted);
    }

    #[tokio::test]
    async fn test_partial_grading_failure_degrades_single_entry() {
        let repo = MemoryRepository::new();
        let (assignment_id, question_ids) = seed_published(&repo, &["Q1", "Q2"]).await;

        let q2 = question_ids[1];
        let mut grading = MockGradingClient::new();
        grading
            .expect_get_submissions()
            .returning(move |question_id, student_id| {
                if question_id == q2 {
                    Err(GradingError::Unreachable("connection refused".to_string()))
                } else {
                    Ok(vec![submission(1, question_id, student_id, 10)])
                }
            });

        let view = SubmissionService::assignment_submissions(
            &repo,
            &grading,
            TIMEOUT,
            assignment_id,
            STUDENT,
            None,
        )
        .await
        .unwrap();

        assert_eq!(view.entries[0].status, SubmissionStatus::Submitted);
        assert_eq!(view.entries[1].status, SubmissionStatus::GradingUnavailable);
        assert!(view.entries[1].submission_id.is_none());
    }

    #[tokio::test]
    async fn test_total_grading_failure_errors() {
        let repo = MemoryRepository::new();
        let (assignment_id, _) = seed_published(&repo, &["Q1", "Q2"]).await;

        let mut grading = MockGradingClient::new();
        grading
            .expect_get_submissions()
            .returning(|_, _| Err(GradingError::Timeout));

        let err = SubmissionService::assignment_submissions(
            &repo,
            &grading,
            TIMEOUT,
            assignment_id,
            STUDENT,
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::GradingUnavailable));
    }

    #[tokio::test]
    async fn test_most_recent_submission_selected() {
        let repo = MemoryRepository::new();
        let (assignment_id, question_ids) = seed_published(&repo, &["Q1"]).await;
        let q1 = question_ids[0];

        let mut grading = MockGradingClient::new();
        grading.expect_get_submissions().returning(move |_, sid| {
            Ok(vec![
                submission(5, q1, sid, 9),
                submission(8, q1, sid, 11),
                submission(6, q1, sid, 10),
            ])
        });

        let view = SubmissionService::assignment_submissions(
            &repo,
            &grading,
            TIMEOUT,
            assignment_id,
            STUDENT,
            None,
        )
        .await
        .unwrap();

        assert_eq!(view.entries[0].submission_id, Some(8));
    }

    #[tokio::test]
    async fn test_viewing_other_user_requires_authorship() {
        let repo = MemoryRepository::new();
        let (assignment_id, _) = seed_published(&repo, &["Q1"]).await;

        let mut grading = MockGradingClient::new();
        grading
            .expect_get_submissions()
            .returning(|_, _| Ok(vec![]));

        let err = SubmissionService::assignment_submissions(
            &repo,
            &grading,
            TIMEOUT,
            assignment_id,
            STUDENT,
            Some(99),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        // The author may target any student
        let view = SubmissionService::assignment_submissions(
            &repo,
            &grading,
            TIMEOUT,
            assignment_id,
            AUTHOR,
            Some(STUDENT),
        )
        .await
        .unwrap();
        assert_eq!(view.entries.len(), 1);
    }

    #[tokio::test]
    async fn test_student_overview_skips_drafts_and_absorbs_failures() {
        let repo = MemoryRepository::new();
        let directory = directory();
        let (published_id, _) = seed_published(&repo, &["Q1"]).await;

        // A draft the student must not see
        AssignmentService::create_assignment(
            &repo,
            &directory,
            AUTHOR,
            CreateAssignmentRequest {
                title: "draft".to_string(),
                deadline: now_utc() + ChronoDuration::days(3),
                authors: None,
            },
        )
        .await
        .unwrap();

        let mut grading = MockGradingClient::new();
        grading
            .expect_get_submissions()
            .returning(|_, _| Err(GradingError::Timeout));

        let overview = SubmissionService::overview(
            &repo,
            &grading,
            &directory,
            TIMEOUT,
            STUDENT,
            None,
        )
        .await
        .unwrap();

        match overview {
            OverviewResponse::Student(student) => {
                assert_eq!(student.assignments.len(), 1);
                assert_eq!(student.assignments[0].assignment_id, published_id);
                assert_eq!(
                    student.assignments[0].entries[0].status,
                    SubmissionStatus::GradingUnavailable
                );
            }
            OverviewResponse::Tutor(_) => panic!("expected a student overview"),
        }
    }

    #[tokio::test]
    async fn test_tutor_overview_groups_students_by_latest_activity() {
        let repo = MemoryRepository::new();
        let directory = directory();
        let (_, question_ids) = seed_published(&repo, &["Q1"]).await;
        let q1 = question_ids[0];

        let mut grading = MockGradingClient::new();
        grading.expect_get_question_submissions().returning(move |_| {
            Ok(vec![
                submission(1, q1, 7, 9),
                submission(2, q1, 7, 12),
                submission(3, q1, 9, 10),
            ])
        });

        let overview = SubmissionService::overview(
            &repo,
            &grading,
            &directory,
            TIMEOUT,
            AUTHOR,
            None,
        )
        .await
        .unwrap();

        match overview {
            OverviewResponse::Tutor(tutor) => {
                assert_eq!(tutor.questions.len(), 1);
                let question = &tutor.questions[0];
                assert!(!question.grading_unavailable);
                assert_eq!(question.students.len(), 2);
                let seven = question
                    .students
                    .iter()
                    .find(|s| s.student_id == 7)
                    .unwrap();
                assert_eq!(
                    seven.last_submitted_at,
                    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
                );
            }
            OverviewResponse::Student(_) => panic!("expected a tutor overview"),
        }
    }

    #[tokio::test]
    async fn test_tutor_overview_marks_unavailable_question() {
        let repo = MemoryRepository::new();
        let directory = directory();
        seed_published(&repo, &["Q1"]).await;

        let mut grading = MockGradingClient::new();
        grading
            .expect_get_question_submissions()
            .returning(|_| Err(GradingError::Unreachable("down".to_string())));

        let overview = SubmissionService::overview(
            &repo,
            &grading,
            &directory,
            TIMEOUT,
            AUTHOR,
            None,
        )
        .await
        .unwrap();

        match overview {
            OverviewResponse::Tutor(tutor) => {
                assert!(tutor.questions[0].grading_unavailable);
                assert!(tutor.questions[0].students.is_empty());
            }
            OverviewResponse::Student(_) => panic!("expected a tutor overview"),
        }
    }

    #[tokio::test]
    async fn test_student_cannot_view_other_overview() {
        let repo = MemoryRepository::new();
        let directory = directory();
        let grading = MockGradingClient::new();

        let err = SubmissionService::overview(
            &repo,
            &grading,
            &directory,
            TIMEOUT,
            STUDENT,
            Some(9),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_full_lifecycle_scenario() {
        // Author drafts, composes, publishes; a student's consolidated
        // view then reflects exactly one grading lookup per question.
        let repo = MemoryRepository::new();
        let directory = directory();

        let detail = AssignmentService::create_assignment(
            &repo,
            &directory,
            AUTHOR,
            CreateAssignmentRequest {
                title: "Week 3 exercises".to_string(),
                deadline: now_utc() + ChronoDuration::days(7),
                authors: None,
            },
        )
        .await
        .unwrap();

        let detail = AssignmentService::add_questions(
            &repo,
            detail.id,
            AUTHOR,
            vec![question_payload("Fizzbuzz"), question_payload("Primes")],
        )
        .await
        .unwrap();
        assert_eq!(detail.number_of_questions, 2);

        // Invisible to the student until published
        let err = SubmissionService::assignment_submissions(
            &repo,
            &MockGradingClient::new(),
            TIMEOUT,
            detail.id,
            STUDENT,
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        AssignmentService::publish_assignment(&repo, detail.id, AUTHOR)
            .await
            .unwrap();

        let fizzbuzz = detail.questions[0].id;
        let mut grading = MockGradingClient::new();
        grading
            .expect_get_submissions()
            .returning(move |question_id, student_id| {
                if question_id == fizzbuzz {
                    Ok(vec![submission(1, question_id, student_id, 10)])
                } else {
                    Ok(vec![])
                }
            });

        let view = SubmissionService::assignment_submissions(
            &repo,
            &grading,
            TIMEOUT,
            detail.id,
            STUDENT,
            None,
        )
        .await
        .unwrap();

        assert_eq!(view.entries.len(), 2);
        assert_eq!(view.entries[0].status, SubmissionStatus::Submitted);
        assert_eq!(view.entries[1].status, SubmissionStatus::NotSubmitted);
    }

    #[tokio::test]
    async fn test_post_feedback_tutor_only() {
        let directory = directory();

        let mut grading = MockGradingClient::new();
        grading.expect_post_feedback().returning(|request| {
            Ok(Feedback {
                line: request.line,
                hints: request.hints,
            })
        });

        let request = FeedbackRequest {
            submission_id: 8,
            line: 3,
            hints: vec!["check the loop bound".to_string()],
        };

        let err = SubmissionService::post_feedback(&grading, &directory, STUDENT, request.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let feedback = SubmissionService::post_feedback(&grading, &directory, AUTHOR, request)
            .await
            .unwrap();
        assert_eq!(feedback.line, 3);
    }
}
