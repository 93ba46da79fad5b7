//! Candidate todo payloads and the field normalization applied before any
//! write reaches the store.
//!
//! Neither payload type carries a `user_id` field: the stored identity comes
//! from token resolution alone, so a client-supplied value cannot survive
//! deserialization.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::store::Row;

/// Errors from candidate normalization
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("Invalid timestamp format for field '{field}': {value}")]
    InvalidTimestamp { field: String, value: String },
}

/// Client-submitted todo item for create and batch sync
#[derive(Debug, Clone, serde::Deserialize)]
pub struct TodoCandidate {
    pub id: Option<Uuid>,
    pub title: String,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<String>,
}

/// Partial todo item for PATCH; every field optional
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct TodoPatch {
    pub id: Option<Uuid>,
    pub title: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<String>,
}

impl TodoCandidate {
    /// Build the row to insert: absent optional fields are stored as nulls,
    /// `user_id` is the resolved identity or null, `id` is left for the
    /// store to generate.
    pub fn to_insert_row(&self, user_id: Option<&str>) -> Result<Row, NormalizeError> {
        let mut row = Map::new();
        row.insert("title".to_string(), Value::String(self.title.clone()));
        row.insert("priority".to_string(), opt_string(&self.priority));
        row.insert("status".to_string(), opt_string(&self.status));
        row.insert(
            "due_date".to_string(),
            match &self.due_date {
                Some(raw) => Value::String(normalize_due_date(raw)?),
                None => Value::Null,
            },
        );
        row.insert("user_id".to_string(), opt_str(user_id));
        Ok(row)
    }

    /// Row for upsert: the insert row plus the client-supplied `id` when
    /// present, so the store can match on the conflict key.
    pub fn to_upsert_row(&self, user_id: Option<&str>) -> Result<Row, NormalizeError> {
        let mut row = self.to_insert_row(user_id)?;
        if let Some(id) = &self.id {
            row.insert("id".to_string(), Value::String(id.to_string()));
        }
        Ok(row)
    }
}

impl TodoPatch {
    /// Build an update set from the non-absent fields only, with identifier
    /// and timestamp fields in their canonical string forms. An all-null
    /// patch yields an empty map; callers reject that before any write.
    pub fn to_update_set(&self) -> Result<Row, NormalizeError> {
        let mut changes = Map::new();
        if let Some(id) = &self.id {
            changes.insert("id".to_string(), Value::String(id.to_string()));
        }
        if let Some(title) = &self.title {
            changes.insert("title".to_string(), Value::String(title.clone()));
        }
        if let Some(priority) = &self.priority {
            changes.insert("priority".to_string(), Value::String(priority.clone()));
        }
        if let Some(status) = &self.status {
            changes.insert("status".to_string(), Value::String(status.clone()));
        }
        if let Some(raw) = &self.due_date {
            changes.insert(
                "due_date".to_string(),
                Value::String(normalize_due_date(raw)?),
            );
        }
        Ok(changes)
    }
}

/// Canonicalize a client-supplied timestamp to an RFC 3339 UTC string.
///
/// Accepts RFC 3339 with offset, a naive datetime (assumed UTC), or a bare
/// date (midnight UTC).
pub fn normalize_due_date(raw: &str) -> Result<String, NormalizeError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc).to_rfc3339());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc().to_rfc3339());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc().to_rfc3339());
        }
    }
    Err(NormalizeError::InvalidTimestamp {
        field: "due_date".to_string(),
        value: raw.to_string(),
    })
}

fn opt_string(value: &Option<String>) -> Value {
    match value {
        Some(s) => Value::String(s.clone()),
        None => Value::Null,
    }
}

fn opt_str(value: Option<&str>) -> Value {
    match value {
        Some(s) => Value::String(s.to_string()),
        None => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_offset_timestamps_to_utc() {
        let normalized = normalize_due_date("2025-03-01T10:00:00+02:00").unwrap();
        assert_eq!(normalized, "2025-03-01T08:00:00+00:00");
    }

    #[test]
    fn normalizes_naive_and_date_only_inputs() {
        assert_eq!(
            normalize_due_date("2025-03-01T10:00:00").unwrap(),
            "2025-03-01T10:00:00+00:00"
        );
        assert_eq!(
            normalize_due_date("2025-03-01").unwrap(),
            "2025-03-01T00:00:00+00:00"
        );
    }

    #[test]
    fn rejects_garbage_timestamps() {
        assert!(normalize_due_date("next tuesday").is_err());
        assert!(normalize_due_date("2025-13-40").is_err());
    }

    #[test]
    fn insert_row_attaches_identity_and_nulls() {
        let candidate = TodoCandidate {
            id: Some(Uuid::new_v4()),
            title: "buy milk".to_string(),
            priority: None,
            status: None,
            due_date: None,
        };
        let row = candidate.to_insert_row(Some("u1")).unwrap();
        assert_eq!(row["title"], "buy milk");
        assert_eq!(row["user_id"], "u1");
        assert_eq!(row["status"], Value::Null);
        // id is store-generated on plain inserts, even when the client sent one
        assert!(!row.contains_key("id"));
    }

    #[test]
    fn insert_row_without_identity_stores_null_user() {
        let candidate = TodoCandidate {
            id: None,
            title: "buy milk".to_string(),
            priority: Some("high".to_string()),
            status: None,
            due_date: None,
        };
        let row = candidate.to_insert_row(None).unwrap();
        assert_eq!(row["user_id"], Value::Null);
        assert_eq!(row["priority"], "high");
    }

    #[test]
    fn upsert_row_keeps_client_id() {
        let id = Uuid::new_v4();
        let candidate = TodoCandidate {
            id: Some(id),
            title: "sync me".to_string(),
            priority: None,
            status: None,
            due_date: None,
        };
        let row = candidate.to_upsert_row(None).unwrap();
        assert_eq!(row["id"], id.to_string());
    }

    #[test]
    fn update_set_skips_absent_fields() {
        let patch = TodoPatch {
            status: Some("completed".to_string()),
            ..Default::default()
        };
        let changes = patch.to_update_set().unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes["status"], "completed");
    }

    #[test]
    fn update_set_canonicalizes_id_and_timestamp() {
        let id = Uuid::new_v4();
        let patch = TodoPatch {
            id: Some(id),
            due_date: Some("2025-03-01".to_string()),
            ..Default::default()
        };
        let changes = patch.to_update_set().unwrap();
        assert_eq!(changes["id"], id.to_string());
        assert_eq!(changes["due_date"], "2025-03-01T00:00:00+00:00");
    }

    #[test]
    fn empty_patch_yields_empty_update_set() {
        let changes = TodoPatch::default().to_update_set().unwrap();
        assert!(changes.is_empty());
    }
}
