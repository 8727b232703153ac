use std::time::Instant;

use async_trait::async_trait;
use tracing::debug;

use super::AssignmentStore;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::assignment::{
    encode_files, AssignmentColumn, AssignmentRow, ASSIGNMENT_COLUMNS,
};
use crate::database::models::{Assignment, AssignmentPatch, NewAssignment, UpdateOutcome};
use crate::database::query_builder::{bind_param_query, bind_param_query_as, UpdateBuilder};
use crate::filter::{AssignmentSort, Filter};

const TABLE: &str = "assignments";
const SEARCH_COLUMNS: &[&str] = &["title", "description"];

pub struct PgAssignmentRepository {
    db: DatabaseManager,
}

impl PgAssignmentRepository {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }

    async fn exists(&self, id: i64) -> Result<bool, DatabaseError> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM assignments WHERE id = $1")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(found.is_some())
    }
}

#[async_trait]
impl AssignmentStore for PgAssignmentRepository {
    async fn list(&self, filter: &Filter<AssignmentSort>) -> Result<Vec<Assignment>, DatabaseError> {
        let sql = filter.to_sql(TABLE, ASSIGNMENT_COLUMNS, SEARCH_COLUMNS);

        let started = Instant::now();
        let mut q = sqlx::query_as::<_, AssignmentRow>(&sql.query);
        for p in sql.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let rows = q.fetch_all(self.db.pool()).await?;
        self.db.observe(started, &sql.query);

        Ok(rows.into_iter().map(Assignment::from).collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Assignment>, DatabaseError> {
        let query = format!("SELECT {} FROM assignments WHERE id = $1", ASSIGNMENT_COLUMNS);
        let row = sqlx::query_as::<_, AssignmentRow>(&query)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(row.map(Assignment::from))
    }

    async fn create(&self, input: &NewAssignment) -> Result<i64, DatabaseError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO assignments (title, description, due_date, files, created_at, updated_at)
             VALUES ($1, $2, $3, $4, NOW(), NOW())
             RETURNING id",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.due_date)
        .bind(encode_files(&input.files))
        .fetch_one(self.db.pool())
        .await?;

        debug!("created assignment {}", id);
        Ok(id)
    }

    async fn update(&self, patch: &AssignmentPatch) -> Result<UpdateOutcome, DatabaseError> {
        if !self.exists(patch.id).await? {
            return Err(DatabaseError::NotFound("Assignment not found".to_string()));
        }

        let builder = UpdateBuilder::new(TABLE)
            .set_opt(AssignmentColumn::Title, patch.title.clone())
            .set_opt(AssignmentColumn::Description, patch.description.clone())
            .set_opt(AssignmentColumn::DueDate, patch.due_date.clone())
            .set_opt(AssignmentColumn::Files, patch.files.as_deref().map(encode_files))
            .touch("updated_at");

        let sql = match builder.to_sql(patch.id) {
            Some(sql) => sql,
            None => return Ok(UpdateOutcome::NoChange),
        };

        let mut q = sqlx::query(&sql.query);
        for p in sql.params.iter() {
            q = bind_param_query(q, p);
        }
        let result = q.execute(self.db.pool()).await?;

        Ok(match result.rows_affected() {
            0 => UpdateOutcome::NoChange,
            _ => UpdateOutcome::Updated,
        })
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tx = self.db.begin().await?;

        // Lock the parent so no comment can be attached while the cascade runs.
        let found: Option<i64> =
            sqlx::query_scalar("SELECT id FROM assignments WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if found.is_none() {
            return Err(DatabaseError::NotFound("Assignment not found".to_string()));
        }

        let removed_comments = sqlx::query("DELETE FROM comments WHERE assignment_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let removed = sqlx::query("DELETE FROM assignments WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed != 1 {
            tx.rollback().await?;
            return Err(DatabaseError::PartialFailure(format!(
                "assignment {} was not removed after deleting {} comments; rolled back",
                id, removed_comments
            )));
        }

        tx.commit().await?;
        debug!("deleted assignment {} with {} comments", id, removed_comments);
        Ok(())
    }
}
