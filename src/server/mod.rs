pub mod handlers;
pub mod lifecycle;
mod types;

pub use handlers::{AppState, PLACEHOLDER_ANSWER};
pub use types::*;

use crate::{
    Result, callback::CallbackDispatcher, config::Config, llm::InferenceGateway, task::TaskRunner,
};
use axum::{Router, routing::post};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Builds the HTTP router serving the skill endpoint at `path`.
pub fn router(state: AppState, path: &str) -> Router {
    Router::new()
        .route(path, post(handlers::skill))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    // Backend client is created once and shared read-only
    let gateway = Arc::new(InferenceGateway::from_config(&config.llm));
    let dispatcher = Arc::new(CallbackDispatcher::new(&config.callback)?);
    let runner = TaskRunner::new(gateway, dispatcher, &config.tasks);

    let app = router(AppState::new(runner), &config.server.path);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}{}", addr, config.server.path);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
