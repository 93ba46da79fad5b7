use axum::{extract::State, http::HeaderMap, Json};
use serde_json::{json, Value};

use crate::auth;
use crate::error::ApiError;
use crate::models::TodoCandidate;
use crate::state::AppState;
use crate::store::TableQuery;

use super::TODO_TABLE;

/// POST /todos/batch - Upsert an ordered sequence of todo items keyed on id.
///
/// The batch aborts on the first store error; items processed before the
/// failure stay written.
pub async fn batch(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(todos): Json<Vec<TodoCandidate>>,
) -> Result<Json<Value>, ApiError> {
    let identity = auth::resolve_identity(&headers, &state.config)?;

    let mut synced = 0usize;
    for candidate in &todos {
        let row = candidate.to_upsert_row(identity.as_deref())?;
        TableQuery::new(state.store.as_ref(), TODO_TABLE)
            .upsert(row, "id")
            .await
            .map_err(|e| {
                tracing::error!(error = %e, synced, "Batch sync aborted");
                ApiError::internal_server_error("Batch sync failed")
            })?;
        synced += 1;
    }

    tracing::info!(synced, "Batch sync completed");
    Ok(Json(json!({ "status": "success", "synced": synced })))
}
