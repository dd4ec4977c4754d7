use std::sync::Arc;

use axum::{Router, middleware};

use crate::{
    config::{AppConfig, DatabaseConfig},
    db::connection,
    middleware::{catch_panic_layer, json_error_middleware},
    routes::router,
    services::permission_service::PermissionPolicy,
    state::AppState,
};

/// In-memory SQLite URL; the pool is pinned to one connection so every query
/// sees the same database.
pub const IN_MEMORY_SQLITE_URL: &str = "sqlite::memory:";

/// State over a fresh in-memory SQLite database with the schema synced.
pub async fn sqlite_state() -> anyhow::Result<Arc<AppState>> {
    let mut cfg = AppConfig::default();
    let database = DatabaseConfig::new(IN_MEMORY_SQLITE_URL);
    let db = connection::connect(&database).await?;
    cfg.database = Some(database);
    Ok(AppState::new(cfg, db, PermissionPolicy::default()))
}

/// The full application router with the same layers `main` installs.
pub fn app(state: Arc<AppState>) -> Router {
    router(state)
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
}
