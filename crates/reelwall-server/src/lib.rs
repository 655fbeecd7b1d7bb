pub mod errors;
pub mod handlers;
pub mod state;

pub use errors::{AppError, AppResult};
pub use state::AppState;

use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;

/// `/search` and `/runtime`. The upstream key stays inside `state.source`.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/search", get(handlers::search_handler))
        .route("/runtime", get(handlers::runtime_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until ctrl-c
pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        addr = %listener.local_addr()?,
        source = state.source.source_name(),
        "Reelwall proxy listening"
    );

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Reelwall proxy stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
