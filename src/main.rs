use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use shopping_lists::{
    config::AppConfig,
    db::connection,
    logging::init_tracing,
    middleware::{catch_panic_layer, json_error_middleware},
    routes::router,
    services::permission_service::PermissionPolicy,
    state::AppState,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!("server failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env()?;
    init_tracing(&cfg.logging.rust_log);

    let database = cfg
        .database
        .clone()
        .context("database config missing; set APP_DATABASE__URL")?;
    let db = connection::connect(&database).await?;

    let state = AppState::new(cfg, db, PermissionPolicy::default());

    let app = Router::new()
        .merge(router(Arc::clone(&state)))
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", state.config.general.host, state.config.general.port)
        .parse()
        .context("invalid host/port")?;
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
