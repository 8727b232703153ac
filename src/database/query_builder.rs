use serde_json::Value;
use sqlx::{self, postgres::PgArguments, FromRow};

use crate::filter::types::SqlResult;

/// A column a repository allows callers to change.
///
/// Implemented by closed per-table enums so the only text that reaches a SET
/// clause is a compile-time constant.
pub trait UpdatableColumn: Copy {
    fn name(&self) -> &'static str;
}

/// Accumulates `(column, bound value)` pairs for a conditional UPDATE.
pub struct UpdateBuilder<C: UpdatableColumn> {
    table_name: &'static str,
    sets: Vec<(C, Value)>,
    touch_column: Option<&'static str>,
}

impl<C: UpdatableColumn> UpdateBuilder<C> {
    pub fn new(table_name: &'static str) -> Self {
        Self {
            table_name,
            sets: Vec::new(),
            touch_column: None,
        }
    }

    pub fn set(mut self, column: C, value: impl Into<Value>) -> Self {
        self.sets.push((column, value.into()));
        self
    }

    pub fn set_opt<V: Into<Value>>(self, column: C, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    /// Column stamped with `NOW()` whenever the row actually changes.
    pub fn touch(mut self, column: &'static str) -> Self {
        self.touch_column = Some(column);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// `UPDATE ... WHERE id = $n AND (<some column differs>)`.
    ///
    /// The distinctness guard makes an update that would write identical values
    /// affect zero rows, so the caller can report "no change" and the touch
    /// column is only refreshed by a real change. Returns `None` when nothing
    /// was set.
    pub fn to_sql(&self, id: i64) -> Option<SqlResult> {
        if self.sets.is_empty() {
            return None;
        }

        let mut params = Vec::with_capacity(self.sets.len() + 1);
        let mut assignments = Vec::with_capacity(self.sets.len() + 1);
        let mut guards = Vec::with_capacity(self.sets.len());

        for (index, (column, value)) in self.sets.iter().enumerate() {
            let placeholder = format!("${}", index + 1);
            assignments.push(format!("\"{}\" = {}", column.name(), placeholder));
            guards.push(format!("\"{}\" IS DISTINCT FROM {}", column.name(), placeholder));
            params.push(value.clone());
        }
        if let Some(touch) = self.touch_column {
            assignments.push(format!("\"{}\" = NOW()", touch));
        }

        params.push(Value::from(id));
        let query = format!(
            "UPDATE \"{}\" SET {} WHERE \"id\" = ${} AND ({})",
            self.table_name,
            assignments.join(", "),
            params.len(),
            guards.join(" OR ")
        );

        Some(SqlResult { query, params })
    }
}

pub fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.as_str()),
        // Arrays and objects travel as their JSON text
        Value::Array(_) | Value::Object(_) => q.bind(v.to_string()),
    }
}

pub fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q Value,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.as_str()),
        Value::Array(_) | Value::Object(_) => q.bind(v.to_string()),
    }
}
