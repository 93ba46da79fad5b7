use axum::{extract::State, http::HeaderMap, Json};
use serde_json::{json, Value};

use crate::auth;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::TableQuery;

use super::TODO_TABLE;

/// GET /todos - List todo items, filtered by caller identity when scoped
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let identity = auth::resolve_identity(&headers, &state.config)?;

    let mut query = TableQuery::new(state.store.as_ref(), TODO_TABLE);
    if let Some(user_id) = &identity {
        query = query.eq("user_id", user_id.as_str());
    }

    let rows = query.select().await?;
    tracing::debug!(count = rows.len(), user_id = ?identity, "Fetched todo items");

    Ok(Json(json!({ "todos": rows })))
}
