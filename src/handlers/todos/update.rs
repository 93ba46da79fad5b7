use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth;
use crate::error::ApiError;
use crate::models::TodoPatch;
use crate::state::AppState;
use crate::store::TableQuery;

use super::TODO_TABLE;

/// PATCH /todos/:id - Partially update a todo item; only non-absent fields
/// are written
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(patch): Json<TodoPatch>,
) -> Result<Json<Value>, ApiError> {
    let identity = auth::resolve_identity(&headers, &state.config)?;

    let changes = patch.to_update_set()?;
    if changes.is_empty() {
        return Err(ApiError::bad_request("No content to update"));
    }

    let mut query = TableQuery::new(state.store.as_ref(), TODO_TABLE).eq("id", id.to_string());
    if let Some(user_id) = &identity {
        query = query.eq("user_id", user_id.as_str());
    }

    let rows = query.update(changes).await?;
    match rows.into_iter().next() {
        Some(todo) => {
            tracing::debug!(%id, user_id = ?identity, "Updated todo item");
            Ok(Json(json!({ "todo": todo })))
        }
        None => Err(ApiError::not_found("Todo item not found")),
    }
}
