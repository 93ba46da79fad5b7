pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod state;
pub mod store;

use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the application router. Exposed so integration tests can drive the
/// service in-process.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Todo API
        .merge(todo_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn todo_routes() -> Router<AppState> {
    use handlers::todos;

    Router::new()
        .route("/todos", get(todos::list).post(todos::create))
        .route("/todos/batch", post(todos::batch))
        .route("/todos/:id", patch(todos::update).delete(todos::delete))
}
