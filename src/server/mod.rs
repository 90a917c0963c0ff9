pub mod handlers;
pub mod types;

pub use handlers::AppState;

use crate::{
    Result,
    config::Config,
    logging::{EventSink, TracingSink},
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Builds the application router around an injected log sink.
pub fn router(log: Arc<dyn EventSink>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", post(handlers::decode_batch))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(log))
}

pub async fn run(config: Config) -> Result<()> {
    let log = Arc::new(TracingSink::new(config.server.logs.name.clone()));
    let app = router(log, config.server.max_body_bytes);

    // Start server
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
