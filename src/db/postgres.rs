//! Postgres entity repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::{
    error::AppResult,
    models::{Assignment, Question, ReferenceSolution, TestCase},
};

use super::repository::{
    AppendOutcome, AssignmentPatch, EntityRepository, NewAssignment, NewQuestion, PublishOutcome,
    QuestionPatch, RemoveOutcome,
};

/// Repository backed by a Postgres connection pool
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

/// Assignment row without its relations
#[derive(Debug, FromRow)]
struct AssignmentRow {
    id: i64,
    title: String,
    deadline: DateTime<Utc>,
    is_published: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach authors and ordered question ids to an assignment row
    async fn hydrate(&self, row: AssignmentRow) -> AppResult<Assignment> {
        let authors: Vec<i64> = sqlx::query_scalar(
            r#"SELECT user_id FROM assignment_authors WHERE assignment_id = $1 ORDER BY user_id"#,
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await?;

        let question_ids: Vec<i64> = sqlx::query_scalar(
            r#"SELECT id FROM questions WHERE assignment_id = $1 ORDER BY "position", id"#,
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Assignment {
            id: row.id,
            title: row.title,
            deadline: row.deadline,
            is_published: row.is_published,
            authors,
            question_ids,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl EntityRepository for PgRepository {
    async fn create_assignment(&self, new: NewAssignment) -> AppResult<Assignment> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, AssignmentRow>(
            r#"
            INSERT INTO assignments (title, deadline, is_published)
            VALUES ($1, $2, FALSE)
            RETURNING *
            "#,
        )
        .bind(&new.title)
        .bind(new.deadline)
        .fetch_one(&mut *tx)
        .await?;

        for author in &new.authors {
            sqlx::query(
                r#"
                INSERT INTO assignment_authors (assignment_id, user_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(row.id)
            .bind(author)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.hydrate(row).await
    }

    async fn find_assignment(&self, id: i64) -> AppResult<Option<Assignment>> {
        let row =
            sqlx::query_as::<_, AssignmentRow>(r#"SELECT * FROM assignments WHERE id = $1"#)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn list_assignments(&self) -> AppResult<Vec<Assignment>> {
        let rows = sqlx::query_as::<_, AssignmentRow>(r#"SELECT * FROM assignments ORDER BY id"#)
            .fetch_all(&self.pool)
            .await?;

        let mut assignments = Vec::with_capacity(rows.len());
        for row in rows {
            assignments.push(self.hydrate(row).await?);
        }

        Ok(assignments)
    }

    async fn update_assignment(
        &self,
        id: i64,
        patch: AssignmentPatch,
    ) -> AppResult<Option<Assignment>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, AssignmentRow>(
            r#"
            UPDATE assignments
            SET
                title = COALESCE($2, title),
                deadline = COALESCE($3, deadline),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.title)
        .bind(patch.deadline)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        for author in &patch.add_authors {
            sqlx::query(
                r#"
                INSERT INTO assignment_authors (assignment_id, user_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(id)
            .bind(author)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Some(self.hydrate(row).await?))
    }

    async fn delete_assignment(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query(r#"DELETE FROM assignments WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn publish_assignment(&self, id: i64) -> AppResult<PublishOutcome> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<bool> =
            sqlx::query_scalar(r#"SELECT is_published FROM assignments WHERE id = $1 FOR UPDATE"#)
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        if locked.is_none() {
            return Ok(PublishOutcome::Missing);
        }

        let question_count: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM questions WHERE assignment_id = $1"#)
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        if question_count == 0 {
            return Ok(PublishOutcome::Empty);
        }

        let row = sqlx::query_as::<_, AssignmentRow>(
            r#"
            UPDATE assignments
            SET is_published = TRUE, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(PublishOutcome::Published(self.hydrate(row).await?))
    }

    async fn append_questions(
        &self,
        assignment_id: i64,
        questions: Vec<NewQuestion>,
    ) -> AppResult<AppendOutcome> {
        let mut tx = self.pool.begin().await?;

        // Publish barrier re-checked under the row lock so a concurrent
        // publish cannot slip in between request entry and this write.
        let is_published: Option<bool> =
            sqlx::query_scalar(r#"SELECT is_published FROM assignments WHERE id = $1 FOR UPDATE"#)
                .bind(assignment_id)
                .fetch_optional(&mut *tx)
                .await?;

        match is_published {
            None => return Ok(AppendOutcome::AssignmentMissing),
            Some(true) => return Ok(AppendOutcome::AssignmentPublished),
            Some(false) => {}
        }

        let next_position: i32 = sqlx::query_scalar(
            r#"SELECT COALESCE(MAX("position") + 1, 0) FROM questions WHERE assignment_id = $1"#,
        )
        .bind(assignment_id)
        .fetch_one(&mut *tx)
        .await?;

        let mut created = Vec::with_capacity(questions.len());

        for (offset, new) in questions.into_iter().enumerate() {
            let question = sqlx::query_as::<_, Question>(
                r#"
                INSERT INTO questions (assignment_id, title, description, deadline, "position")
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
                "#,
            )
            .bind(assignment_id)
            .bind(&new.title)
            .bind(&new.description)
            .bind(new.deadline)
            .bind(next_position + offset as i32)
            .fetch_one(&mut *tx)
            .await?;

            for tc in &new.test_cases {
                sqlx::query(
                    r#"
                    INSERT INTO test_cases (question_id, input, output, is_public)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(question.id)
                .bind(&tc.input)
                .bind(&tc.output)
                .bind(tc.is_public)
                .execute(&mut *tx)
                .await?;
            }

            if let Some(solution) = &new.reference_solution {
                sqlx::query(
                    r#"
                    INSERT INTO reference_solutions (question_id, language, code)
                    VALUES ($1, $2, $3)
                    "#,
                )
                .bind(question.id)
                .bind(&solution.language)
                .bind(&solution.code)
                .execute(&mut *tx)
                .await?;
            }

            created.push(question);
        }

        sqlx::query(r#"UPDATE assignments SET updated_at = NOW() WHERE id = $1"#)
            .bind(assignment_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(AppendOutcome::Appended(created))
    }

    async fn questions_for_assignment(&self, assignment_id: i64) -> AppResult<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(
            r#"SELECT * FROM questions WHERE assignment_id = $1 ORDER BY "position", id"#,
        )
        .bind(assignment_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    async fn find_question(&self, id: i64) -> AppResult<Option<Question>> {
        let question = sqlx::query_as::<_, Question>(r#"SELECT * FROM questions WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(question)
    }

    async fn update_question(
        &self,
        id: i64,
        patch: QuestionPatch,
    ) -> AppResult<Option<Question>> {
        let question = sqlx::query_as::<_, Question>(
            r#"
            UPDATE questions
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                deadline = COALESCE($4, deadline),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(patch.deadline)
        .fetch_optional(&self.pool)
        .await?;

        Ok(question)
    }

    async fn remove_question(&self, id: i64) -> AppResult<RemoveOutcome> {
        let mut tx = self.pool.begin().await?;

        let parent: Option<(i64, bool)> = sqlx::query_as(
            r#"
            SELECT a.id, a.is_published
            FROM questions q
            JOIN assignments a ON a.id = q.assignment_id
            WHERE q.id = $1
            FOR UPDATE OF a
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        match parent {
            None => return Ok(RemoveOutcome::Missing),
            Some((_, true)) => return Ok(RemoveOutcome::AssignmentPublished),
            Some((assignment_id, false)) => {
                sqlx::query(r#"DELETE FROM questions WHERE id = $1"#)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;

                sqlx::query(r#"UPDATE assignments SET updated_at = NOW() WHERE id = $1"#)
                    .bind(assignment_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;

        Ok(RemoveOutcome::Removed)
    }

    async fn test_cases_for_question(&self, question_id: i64) -> AppResult<Vec<TestCase>> {
        let test_cases = sqlx::query_as::<_, TestCase>(
            r#"SELECT * FROM test_cases WHERE question_id = $1 ORDER BY id"#,
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(test_cases)
    }

    async fn solution_for_question(
        &self,
        question_id: i64,
    ) -> AppResult<Option<ReferenceSolution>> {
        let solution = sqlx::query_as::<_, ReferenceSolution>(
            r#"SELECT * FROM reference_solutions WHERE question_id = $1"#,
        )
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(solution)
    }
}
