//! Table-store client: a small query-builder surface over any backend that
//! supports select/insert/update/delete/upsert with equality filters.

pub mod memory;
pub mod postgres;
pub mod query;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use query::TableQuery;

/// A stored row, as returned by the backend
pub type Row = Map<String, Value>;

/// Equality filter on a single column. A null value matches stored nulls.
pub type EqFilter = (String, Value);

/// Errors from the table store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Contract with the backing table store. Every operation returns the
/// affected row set; errors carry the backend failure.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Select rows matching all equality filters (all rows when empty)
    async fn select(&self, table: &str, filters: &[EqFilter]) -> Result<Vec<Row>, StoreError>;

    /// Insert one row, returning it as stored (id populated)
    async fn insert(&self, table: &str, row: Row) -> Result<Vec<Row>, StoreError>;

    /// Apply `changes` to all rows matching the filters, returning them
    async fn update(
        &self,
        table: &str,
        changes: Row,
        filters: &[EqFilter],
    ) -> Result<Vec<Row>, StoreError>;

    /// Delete all rows matching the filters, returning the removed rows
    async fn delete(&self, table: &str, filters: &[EqFilter]) -> Result<Vec<Row>, StoreError>;

    /// Insert-or-replace keyed on the `on_conflict` column
    async fn upsert(
        &self,
        table: &str,
        row: Row,
        on_conflict: &str,
    ) -> Result<Vec<Row>, StoreError>;

    /// Cheap liveness probe for the health endpoint
    async fn ping(&self) -> Result<(), StoreError>;
}
