//! In-memory entity repository for tests
//!
//! Behavioral service tests run against this instead of a live Postgres.
//! A single mutex around the whole state gives every write the same
//! atomicity the Postgres implementation gets from a transaction.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    error::AppResult,
    models::{Assignment, Question, ReferenceSolution, TestCase},
    utils::time::now_utc,
};

use super::repository::{
    AppendOutcome, AssignmentPatch, EntityRepository, NewAssignment, NewQuestion, PublishOutcome,
    QuestionPatch, RemoveOutcome,
};

#[derive(Debug, Clone)]
struct StoredAssignment {
    id: i64,
    title: String,
    deadline: DateTime<Utc>,
    is_published: bool,
    authors: Vec<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    next_id: i64,
    assignments: BTreeMap<i64, StoredAssignment>,
    questions: BTreeMap<i64, Question>,
    test_cases: BTreeMap<i64, TestCase>,
    solutions: BTreeMap<i64, ReferenceSolution>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn question_ids(&self, assignment_id: i64) -> Vec<i64> {
        let mut questions: Vec<&Question> = self
            .questions
            .values()
            .filter(|q| q.assignment_id == assignment_id)
            .collect();
        questions.sort_by_key(|q| (q.position, q.id));
        questions.iter().map(|q| q.id).collect()
    }

    fn to_assignment(&self, stored: &StoredAssignment) -> Assignment {
        Assignment {
            id: stored.id,
            title: stored.title.clone(),
            deadline: stored.deadline,
            is_published: stored.is_published,
            authors: stored.authors.clone(),
            question_ids: self.question_ids(stored.id),
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        }
    }
}

/// Mutex-backed repository with the same contract as [`super::PgRepository`]
#[derive(Default)]
pub struct MemoryRepository {
    state: Mutex<State>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntityRepository for MemoryRepository {
    async fn create_assignment(&self, new: NewAssignment) -> AppResult<Assignment> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let now = now_utc();
        let stored = StoredAssignment {
            id,
            title: new.title,
            deadline: new.deadline,
            is_published: false,
            authors: new.authors,
            created_at: now,
            updated_at: now,
        };
        state.assignments.insert(id, stored.clone());
        Ok(state.to_assignment(&stored))
    }

    async fn find_assignment(&self, id: i64) -> AppResult<Option<Assignment>> {
        let state = self.state.lock().unwrap();
        Ok(state.assignments.get(&id).map(|a| state.to_assignment(a)))
    }

    async fn list_assignments(&self) -> AppResult<Vec<Assignment>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .assignments
            .values()
            .map(|a| state.to_assignment(a))
            .collect())
    }

    async fn update_assignment(
        &self,
        id: i64,
        patch: AssignmentPatch,
    ) -> AppResult<Option<Assignment>> {
        let mut state = self.state.lock().unwrap();
        let Some(mut stored) = state.assignments.get(&id).cloned() else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            stored.title = title;
        }
        if let Some(deadline) = patch.deadline {
            stored.deadline = deadline;
        }
        for author in patch.add_authors {
            if !stored.authors.contains(&author) {
                stored.authors.push(author);
            }
        }
        stored.updated_at = now_utc();
        state.assignments.insert(id, stored.clone());
        Ok(Some(state.to_assignment(&stored)))
    }

    async fn delete_assignment(&self, id: i64) -> AppResult<bool> {
        let mut state = self.state.lock().unwrap();
        if state.assignments.remove(&id).is_none() {
            return Ok(false);
        }
        let question_ids: Vec<i64> = state
            .questions
            .values()
            .filter(|q| q.assignment_id == id)
            .map(|q| q.id)
            .collect();
        for qid in question_ids {
            state.questions.remove(&qid);
            state.test_cases.retain(|_, tc| tc.question_id != qid);
            state.solutions.retain(|_, s| s.question_id != qid);
        }
        Ok(true)
    }

    async fn publish_assignment(&self, id: i64) -> AppResult<PublishOutcome> {
        let mut state = self.state.lock().unwrap();
        let Some(mut stored) = state.assignments.get(&id).cloned() else {
            return Ok(PublishOutcome::Missing);
        };
        if state.question_ids(id).is_empty() {
            return Ok(PublishOutcome::Empty);
        }
        stored.is_published = true;
        stored.updated_at = now_utc();
        state.assignments.insert(id, stored.clone());
        Ok(PublishOutcome::Published(state.to_assignment(&stored)))
    }

    async fn append_questions(
        &self,
        assignment_id: i64,
        questions: Vec<NewQuestion>,
    ) -> AppResult<AppendOutcome> {
        let mut state = self.state.lock().unwrap();
        match state.assignments.get(&assignment_id) {
            None => return Ok(AppendOutcome::AssignmentMissing),
            Some(a) if a.is_published => return Ok(AppendOutcome::AssignmentPublished),
            Some(_) => {}
        }

        let next_position = state
            .questions
            .values()
            .filter(|q| q.assignment_id == assignment_id)
            .map(|q| q.position + 1)
            .max()
            .unwrap_or(0);

        let now = now_utc();
        let mut created = Vec::with_capacity(questions.len());

        for (offset, new) in questions.into_iter().enumerate() {
            let qid = state.next_id();
            let question = Question {
                id: qid,
                assignment_id,
                title: new.title,
                description: new.description,
                deadline: new.deadline,
                position: next_position + offset as i32,
                created_at: now,
                updated_at: now,
            };
            state.questions.insert(qid, question.clone());

            for tc in new.test_cases {
                let tcid = state.next_id();
                state.test_cases.insert(
                    tcid,
                    TestCase {
                        id: tcid,
                        question_id: qid,
                        input: tc.input,
                        output: tc.output,
                        is_public: tc.is_public,
                        created_at: now,
                    },
                );
            }

            if let Some(solution) = new.reference_solution {
                let sid = state.next_id();
                state.solutions.insert(
                    sid,
                    ReferenceSolution {
                        id: sid,
                        question_id: qid,
                        language: solution.language,
                        code: solution.code,
                        created_at: now,
                    },
                );
            }

            created.push(question);
        }

        if let Some(stored) = state.assignments.get_mut(&assignment_id) {
            stored.updated_at = now;
        }

        Ok(AppendOutcome::Appended(created))
    }

    async fn questions_for_assignment(&self, assignment_id: i64) -> AppResult<Vec<Question>> {
        let state = self.state.lock().unwrap();
        let mut questions: Vec<Question> = state
            .questions
            .values()
            .filter(|q| q.assignment_id == assignment_id)
            .cloned()
            .collect();
        questions.sort_by_key(|q| (q.position, q.id));
        Ok(questions)
    }

    async fn find_question(&self, id: i64) -> AppResult<Option<Question>> {
        let state = self.state.lock().unwrap();
        Ok(state.questions.get(&id).cloned())
    }

    async fn update_question(
        &self,
        id: i64,
        patch: QuestionPatch,
    ) -> AppResult<Option<Question>> {
        let mut state = self.state.lock().unwrap();
        let Some(mut question) = state.questions.get(&id).cloned() else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            question.title = title;
        }
        if let Some(description) = patch.description {
            question.description = description;
        }
        if let Some(deadline) = patch.deadline {
            question.deadline = Some(deadline);
        }
        question.updated_at = now_utc();
        state.questions.insert(id, question.clone());
        Ok(Some(question))
    }

    async fn remove_question(&self, id: i64) -> AppResult<RemoveOutcome> {
        let mut state = self.state.lock().unwrap();
        let Some(question) = state.questions.get(&id).cloned() else {
            return Ok(RemoveOutcome::Missing);
        };
        let published = state
            .assignments
            .get(&question.assignment_id)
            .map(|a| a.is_published)
            .unwrap_or(false);
        if published {
            return Ok(RemoveOutcome::AssignmentPublished);
        }
        state.questions.remove(&id);
        state.test_cases.retain(|_, tc| tc.question_id != id);
        state.solutions.retain(|_, s| s.question_id != id);
        Ok(RemoveOutcome::Removed)
    }

    async fn test_cases_for_question(&self, question_id: i64) -> AppResult<Vec<TestCase>> {
        let state = self.state.lock().unwrap();
        let mut test_cases: Vec<TestCase> = state
            .test_cases
            .values()
            .filter(|tc| tc.question_id == question_id)
            .cloned()
            .collect();
        test_cases.sort_by_key(|tc| tc.id);
        Ok(test_cases)
    }

    async fn solution_for_question(
        &self,
        question_id: i64,
    ) -> AppResult<Option<ReferenceSolution>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .solutions
            .values()
            .find(|s| s.question_id == question_id)
            .cloned())
    }
}
