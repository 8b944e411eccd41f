mod api_doc;
mod config;
mod error;
mod handlers;
mod models;
mod routes;
mod state;
mod store;
#[cfg(test)]
mod test_util;

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::routing::{get, patch, post};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_doc::ApiDoc;
use config::Config;
use handlers::{create_handler, delete_handler, get_handler, health_handler, update_handler};
use state::AppState;
use store::RecordStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    tracing::info!("record-service starting");

    let config = Config::from_env()?;
    config.log_startup();

    let store = RecordStore::from_config(&config).await?;

    let addr = format!("{}:{}", config.service_host, config.service_port);
    let state = AppState {
        store,
        config: Arc::new(config),
    };

    let app = Router::new()
        .route(routes::HEALTH, get(health_handler))
        .route(routes::RECORDS, post(create_handler))
        .route(routes::RECORD_ITEM, get(get_handler).delete(delete_handler))
        .route(routes::RECORD_UPDATE, patch(update_handler))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("record-service listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
