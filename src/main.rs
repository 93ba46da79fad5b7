use std::sync::Arc;

use todo_api::config::AppConfig;
use todo_api::state::AppState;
use todo_api::store::{MemoryStore, PostgresStore, TableStore};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, ALLOW_ALL_USERS, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();
    tracing::info!(
        "Starting Todo API in {:?} mode (allow_all_users={})",
        config.environment,
        config.allow_all_users
    );

    let store: Arc<dyn TableStore> = match config.database_url.as_deref() {
        Some(url) => {
            let store = PostgresStore::connect(url)
                .await
                .unwrap_or_else(|e| panic!("failed to connect to store: {}", e));
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store (data is not persisted)");
            Arc::new(MemoryStore::new())
        }
    };

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let app = todo_api::app(AppState::new(config, store));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Todo API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
