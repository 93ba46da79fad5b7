use serde_json::Value;

use super::{EqFilter, Row, StoreError, TableStore};

/// Chainable equality-filter query against one table of a [`TableStore`].
///
/// ```ignore
/// let rows = TableQuery::new(store, "todo_items")
///     .eq("user_id", "u1")
///     .select()
///     .await?;
/// ```
pub struct TableQuery<'a> {
    store: &'a dyn TableStore,
    table: String,
    filters: Vec<EqFilter>,
}

impl<'a> TableQuery<'a> {
    pub fn new(store: &'a dyn TableStore, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
            filters: Vec::new(),
        }
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((column.into(), value.into()));
        self
    }

    pub async fn select(self) -> Result<Vec<Row>, StoreError> {
        self.store.select(&self.table, &self.filters).await
    }

    pub async fn insert(self, row: Row) -> Result<Vec<Row>, StoreError> {
        self.store.insert(&self.table, row).await
    }

    pub async fn update(self, changes: Row) -> Result<Vec<Row>, StoreError> {
        self.store.update(&self.table, changes, &self.filters).await
    }

    pub async fn delete(self) -> Result<Vec<Row>, StoreError> {
        self.store.delete(&self.table, &self.filters).await
    }

    pub async fn upsert(self, row: Row, on_conflict: &str) -> Result<Vec<Row>, StoreError> {
        self.store.upsert(&self.table, row, on_conflict).await
    }
}
