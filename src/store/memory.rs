//! In-process table store.
//!
//! Backs the integration tests and serves as the fallback store when no
//! DATABASE_URL is configured. Matches the Postgres implementation's
//! contract, including store-side id generation and upsert conflict
//! handling.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EqFilter, Row, StoreError, TableStore};

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Vec<Row>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A null filter value matches stored nulls and missing columns,
    /// mirroring the IS NULL rendering of the Postgres store.
    fn matches(row: &Row, filters: &[EqFilter]) -> bool {
        filters.iter().all(|(column, value)| {
            let stored = row.get(column).unwrap_or(&Value::Null);
            stored == value
        })
    }

    fn ensure_id(row: &mut Row) {
        let missing = row.get("id").map_or(true, Value::is_null);
        if missing {
            row.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
        }
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn select(&self, table: &str, filters: &[EqFilter]) -> Result<Vec<Row>, StoreError> {
        let tables = self.tables.read().await;
        let rows = tables.get(table).map(Vec::as_slice).unwrap_or_default();
        Ok(rows
            .iter()
            .filter(|row| Self::matches(row, filters))
            .cloned()
            .collect())
    }

    async fn insert(&self, table: &str, mut row: Row) -> Result<Vec<Row>, StoreError> {
        if row.is_empty() {
            return Err(StoreError::QueryError("cannot insert an empty row".to_string()));
        }
        Self::ensure_id(&mut row);
        let mut tables = self.tables.write().await;
        tables.entry(table.to_string()).or_default().push(row.clone());
        Ok(vec![row])
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
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_string()).or_default();
        let mut updated = Vec::new();
        for row in rows.iter_mut() {
            if Self::matches(row, filters) {
                for (column, value) in &changes {
                    row.insert(column.clone(), value.clone());
                }
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, filters: &[EqFilter]) -> Result<Vec<Row>, StoreError> {
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_string()).or_default();
        let mut removed = Vec::new();
        rows.retain(|row| {
            if Self::matches(row, filters) {
                removed.push(row.clone());
                false
            } else {
                true
            }
        });
        Ok(removed)
    }

    async fn upsert(
        &self,
        table: &str,
        mut row: Row,
        on_conflict: &str,
    ) -> Result<Vec<Row>, StoreError> {
        if row.is_empty() {
            return Err(StoreError::QueryError("cannot upsert an empty row".to_string()));
        }
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_string()).or_default();

        let conflict_value = row.get(on_conflict).cloned().unwrap_or(Value::Null);
        if !conflict_value.is_null() {
            for existing in rows.iter_mut() {
                if existing.get(on_conflict) == Some(&conflict_value) {
                    for (column, value) in &row {
                        existing.insert(column.clone(), value.clone());
                    }
                    return Ok(vec![existing.clone()]);
                }
            }
        }

        Self::ensure_id(&mut row);
        rows.push(row.clone());
        Ok(vec![row])
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
