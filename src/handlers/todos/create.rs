use axum::{extract::State, http::HeaderMap, Json};
use serde_json::{json, Value};

use crate::auth;
use crate::error::ApiError;
use crate::models::TodoCandidate;
use crate::state::AppState;
use crate::store::TableQuery;

use super::TODO_TABLE;

/// POST /todos - Create a todo item, attaching the caller identity per the
/// scoping toggle
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(candidate): Json<TodoCandidate>,
) -> Result<Json<Value>, ApiError> {
    let identity = auth::resolve_identity(&headers, &state.config)?;

    let row = candidate.to_insert_row(identity.as_deref())?;
    tracing::debug!(title = %candidate.title, user_id = ?identity, "Creating todo item");

    let inserted = TableQuery::new(state.store.as_ref(), TODO_TABLE)
        .insert(row)
        .await?;

    // A store that accepts the insert but returns no row rejected it on a
    // constraint, not on an execution failure
    match inserted.into_iter().next() {
        Some(todo) => Ok(Json(json!({ "todo": todo }))),
        None => {
            tracing::error!("Store returned no row for insert");
            Err(ApiError::bad_request(
                "Create failed, the item violates a constraint",
            ))
        }
    }
}
