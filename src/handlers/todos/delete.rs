use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::TableQuery;

use super::TODO_TABLE;

/// DELETE /todos/:id - Remove a todo item
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let identity = auth::resolve_identity(&headers, &state.config)?;

    let mut query = TableQuery::new(state.store.as_ref(), TODO_TABLE).eq("id", id.to_string());
    if let Some(user_id) = &identity {
        query = query.eq("user_id", user_id.as_str());
    }

    let rows = query.delete().await?;
    match rows.into_iter().next() {
        Some(deleted) => {
            tracing::debug!(%id, user_id = ?identity, "Deleted todo item");
            Ok(Json(json!({ "status": "success", "deleted": deleted })))
        }
        None => Err(ApiError::not_found("Todo item not found")),
    }
}
