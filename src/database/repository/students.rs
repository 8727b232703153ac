use std::time::Instant;

use async_trait::async_trait;
use tracing::debug;

use super::StudentStore;
use crate::database::manager::{expect_single_row, DatabaseError, DatabaseManager};
use crate::database::models::student::{StudentColumn, STUDENT_COLUMNS};
use crate::database::models::{NewStudent, Student, StudentCredentials, StudentPatch, UpdateOutcome};
use crate::database::query_builder::{bind_param_query, bind_param_query_as, UpdateBuilder};
use crate::filter::{Filter, StudentSort};

const TABLE: &str = "students";
const SEARCH_COLUMNS: &[&str] = &["name", "student_id", "email"];
const EMAIL_TAKEN: &str = "Email is already registered";
const STUDENT_TAKEN: &str = "Student ID or email is already registered";

pub struct PgStudentRepository {
    db: DatabaseManager,
}

impl PgStudentRepository {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StudentStore for PgStudentRepository {
    async fn list(&self, filter: &Filter<StudentSort>) -> Result<Vec<Student>, DatabaseError> {
        let sql = filter.to_sql(TABLE, STUDENT_COLUMNS, SEARCH_COLUMNS);

        let started = Instant::now();
        let mut q = sqlx::query_as::<_, Student>(&sql.query);
        for p in sql.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let students = q.fetch_all(self.db.pool()).await?;
        self.db.observe(started, &sql.query);

        Ok(students)
    }

    async fn get(&self, id: i64) -> Result<Option<Student>, DatabaseError> {
        let query = format!("SELECT {} FROM students WHERE id = $1", STUDENT_COLUMNS);
        let student = sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(student)
    }

    async fn find_by_student_id(&self, student_id: &str) -> Result<Option<Student>, DatabaseError> {
        let query = format!("SELECT {} FROM students WHERE student_id = $1", STUDENT_COLUMNS);
        let student = sqlx::query_as::<_, Student>(&query)
            .bind(student_id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(student)
    }

    async fn create(&self, input: &NewStudent) -> Result<Student, DatabaseError> {
        let query = format!(
            "INSERT INTO students (student_id, name, email, password_hash) VALUES ($1, $2, $3, $4) RETURNING {}",
            STUDENT_COLUMNS
        );
        let student = sqlx::query_as::<_, Student>(&query)
            .bind(&input.student_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| DatabaseError::conflict_on_unique(e, STUDENT_TAKEN))?;

        debug!("created student {} ({})", student.id, student.student_id);
        Ok(student)
    }

    async fn update(&self, patch: &StudentPatch) -> Result<UpdateOutcome, DatabaseError> {
        if self.get(patch.id).await?.is_none() {
            return Err(DatabaseError::NotFound("Student not found".to_string()));
        }

        let sql = match UpdateBuilder::new(TABLE)
            .set_opt(StudentColumn::Name, patch.name.clone())
            .set_opt(StudentColumn::Email, patch.email.clone())
            .to_sql(patch.id)
        {
            Some(sql) => sql,
            None => return Ok(UpdateOutcome::NoChange),
        };

        let mut q = sqlx::query(&sql.query);
        for p in sql.params.iter() {
            q = bind_param_query(q, p);
        }
        let result = q
            .execute(self.db.pool())
            .await
            .map_err(|e| DatabaseError::conflict_on_unique(e, EMAIL_TAKEN))?;

        Ok(match result.rows_affected() {
            0 => UpdateOutcome::NoChange,
            _ => UpdateOutcome::Updated,
        })
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        if self.get(id).await?.is_none() {
            return Err(DatabaseError::NotFound("Student not found".to_string()));
        }
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(self.db.pool())
            .await?;
        expect_single_row(result.rows_affected(), "Student")
    }

    async fn credentials_by_email(&self, email: &str) -> Result<Option<StudentCredentials>, DatabaseError> {
        let creds = sqlx::query_as::<_, StudentCredentials>(
            "SELECT id, name, email, password_hash FROM students WHERE lower(email) = lower($1) LIMIT 1",
        )
        .bind(email)
        .fetch_optional(self.db.pool())
        .await?;
        Ok(creds)
    }

    async fn credentials_by_id(&self, id: i64) -> Result<Option<StudentCredentials>, DatabaseError> {
        let creds = sqlx::query_as::<_, StudentCredentials>(
            "SELECT id, name, email, password_hash FROM students WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;
        Ok(creds)
    }

    async fn set_password_hash(&self, id: i64, password_hash: &str) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE students SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(self.db.pool())
            .await?;
        expect_single_row(result.rows_affected(), "Student")
    }
}
