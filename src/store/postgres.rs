//! Postgres-backed table store.
//!
//! Rows travel as JSON: every statement funnels through `row_to_json` so the
//! handler layer never needs compile-time knowledge of the table's columns.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{
    postgres::{PgArguments, PgPoolOptions},
    PgPool, Row as SqlxRow,
};
use tracing::info;

use super::{EqFilter, Row, StoreError, TableStore};

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        info!("Created store connection pool");
        Ok(Self { pool })
    }

    /// Quote SQL identifier to prevent injection
    fn quote_identifier(name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    /// Render equality filters as a WHERE clause, pushing bind values.
    /// Null filter values become IS NULL and bind nothing.
    fn where_clause(filters: &[EqFilter], params: &mut Vec<Value>) -> String {
        if filters.is_empty() {
            return String::new();
        }
        let mut parts = Vec::with_capacity(filters.len());
        for (column, value) in filters {
            if value.is_null() {
                parts.push(format!("{} IS NULL", Self::quote_identifier(column)));
            } else {
                params.push(value.clone());
                parts.push(format!(
                    "{} = ${}",
                    Self::quote_identifier(column),
                    params.len()
                ));
            }
        }
        format!(" WHERE {}", parts.join(" AND "))
    }

    /// Render a row's columns and placeholders for INSERT, pushing bind values
    fn insert_clause(row: &Row, params: &mut Vec<Value>) -> (String, String) {
        let mut columns = Vec::with_capacity(row.len());
        let mut placeholders = Vec::with_capacity(row.len());
        for (column, value) in row {
            params.push(value.clone());
            columns.push(Self::quote_identifier(column));
            placeholders.push(format!("${}", params.len()));
        }
        (columns.join(", "), placeholders.join(", "))
    }

    async fn fetch_rows(&self, sql: &str, params: Vec<Value>) -> Result<Vec<Row>, StoreError> {
        let mut q = sqlx::query(sql);
        for p in params.iter() {
            q = bind_param(q, p);
        }
        let rows = q.fetch_all(&self.pool).await?;

        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value: Value = row.try_get("row")?;
            match value {
                Value::Object(map) => results.push(map),
                other => {
                    return Err(StoreError::QueryError(format!(
                        "unexpected row shape from store: {}",
                        other
                    )))
                }
            }
        }
        Ok(results)
    }
}

#[async_trait]
impl TableStore for PostgresStore {
    async fn select(&self, table: &str, filters: &[EqFilter]) -> Result<Vec<Row>, StoreError> {
        let mut params = Vec::new();
        let where_sql = Self::where_clause(filters, &mut params);
        let sql = format!(
            "SELECT row_to_json(t) AS row FROM (SELECT * FROM {}{}) t",
            Self::quote_identifier(table),
            where_sql
        );
        self.fetch_rows(&sql, params).await
    }

    async fn insert(&self, table: &str, row: Row) -> Result<Vec<Row>, StoreError> {
        if row.is_empty() {
            return Err(StoreError::QueryError("cannot insert an empty row".to_string()));
        }
        let mut params = Vec::new();
        let (columns, placeholders) = Self::insert_clause(&row, &mut params);
        let sql = format!(
            "WITH ins AS (INSERT INTO {} ({}) VALUES ({}) RETURNING *) \
             SELECT row_to_json(ins) AS row FROM ins",
            Self::quote_identifier(table),
            columns,
            placeholders
        );
        self.fetch_rows(&sql, params).await
    }

    async fn update(
        &self,
        table: &str,
        changes: Row,
        filters: &[EqFilter],
    ) -> Result<Vec<Row>, StoreError> {
        if changes.is_empty() {
            return Err(StoreError::QueryError("empty update set".to_string()));
        }
        let mut params = Vec::new();
        let mut assignments = Vec::with_capacity(changes.len());
        for (column, value) in &changes {
            params.push(value.clone());
            assignments.push(format!(
                "{} = ${}",
                Self::quote_identifier(column),
                params.len()
            ));
        }
        let where_sql = Self::where_clause(filters, &mut params);
        let sql = format!(
            "WITH upd AS (UPDATE {} SET {}{} RETURNING *) \
             SELECT row_to_json(upd) AS row FROM upd",
            Self::quote_identifier(table),
            assignments.join(", "),
            where_sql
        );
        self.fetch_rows(&sql, params).await
    }

    async fn delete(&self, table: &str, filters: &[EqFilter]) -> Result<Vec<Row>, StoreError> {
        let mut params = Vec::new();
        let where_sql = Self::where_clause(filters, &mut params);
        let sql = format!(
            "WITH del AS (DELETE FROM {}{} RETURNING *) \
             SELECT row_to_json(del) AS row FROM del",
            Self::quote_identifier(table),
            where_sql
        );
        self.fetch_rows(&sql, params).await
    }

    async fn upsert(
        &self,
        table: &str,
        row: Row,
        on_conflict: &str,
    ) -> Result<Vec<Row>, StoreError> {
        if row.is_empty() {
            return Err(StoreError::QueryError("cannot upsert an empty row".to_string()));
        }
        let mut params = Vec::new();
        let (columns, placeholders) = Self::insert_clause(&row, &mut params);

        let assignments: Vec<String> = row
            .keys()
            .filter(|column| column.as_str() != on_conflict)
            .map(|column| {
                let quoted = Self::quote_identifier(column);
                format!("{} = EXCLUDED.{}", quoted, quoted)
            })
            .collect();
        let conflict_action = if assignments.is_empty() {
            "DO NOTHING".to_string()
        } else {
            format!("DO UPDATE SET {}", assignments.join(", "))
        };

        let sql = format!(
            "WITH ups AS (INSERT INTO {} ({}) VALUES ({}) ON CONFLICT ({}) {} RETURNING *) \
             SELECT row_to_json(ups) AS row FROM ups",
            Self::quote_identifier(table),
            columns,
            placeholders,
            Self::quote_identifier(on_conflict),
            conflict_action
        );
        self.fetch_rows(&sql, params).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn bind_param<'q>(
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
            } else if let Some(u) = n.as_u64() {
                // Postgres doesn't have u64; cast down if safe
                q.bind(u as i64)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        Value::Array(_) | Value::Object(_) => q.bind(v.clone()), // JSONB
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    #[test]
    fn quotes_identifiers() {
        assert_eq!(PostgresStore::quote_identifier("todo_items"), "\"todo_items\"");
        assert_eq!(
            PostgresStore::quote_identifier("we\"ird"),
            "\"we\"\"ird\""
        );
    }

    #[test]
    fn where_clause_numbers_params_and_handles_nulls() {
        let filters = vec![
            ("id".to_string(), json!("abc")),
            ("user_id".to_string(), Value::Null),
            ("status".to_string(), json!("pending")),
        ];
        let mut params = Vec::new();
        let sql = PostgresStore::where_clause(&filters, &mut params);
        assert_eq!(
            sql,
            " WHERE \"id\" = $1 AND \"user_id\" IS NULL AND \"status\" = $2"
        );
        assert_eq!(params, vec![json!("abc"), json!("pending")]);
    }

    #[test]
    fn insert_clause_aligns_columns_and_placeholders() {
        let mut row = Map::new();
        row.insert("title".to_string(), json!("buy milk"));
        row.insert("user_id".to_string(), Value::Null);
        let mut params = Vec::new();
        let (columns, placeholders) = PostgresStore::insert_clause(&row, &mut params);
        assert_eq!(columns, "\"title\", \"user_id\"");
        assert_eq!(placeholders, "$1, $2");
        assert_eq!(params.len(), 2);
    }
}
