//! HTTP transport for the JSON-RPC server.
//!
//! Each POST to `/mcp` carries one JSON-RPC message and is handled exactly
//! like a line on the stdio transport. A request is answered with its
//! response as `application/json`; a notification gets `202 Accepted` and an
//! empty body.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::{MenuError, Result};
use crate::server::Server;

/// Path of the JSON-RPC endpoint.
pub const MCP_PATH: &str = "/mcp";

/// Builds the router serving `server` at [`MCP_PATH`].
pub fn build_router(server: Arc<Server>) -> Router {
    Router::new()
        .route(MCP_PATH, post(handle_message))
        .layer(TraceLayer::new_for_http())
        .with_state(server)
}

async fn handle_message(State(server): State<Arc<Server>>, body: String) -> Response {
    match server.handle_line(&body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Serves `server` over HTTP on `addr` until Ctrl+C.
pub async fn serve(server: Server, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| MenuError::config(format!("Cannot listen on {addr}: {e}")))?;

    info!("{} listening on http://{addr}{MCP_PATH}", server.name());

    axum::serve(listener, build_router(Arc::new(server)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| MenuError::internal(format!("Server error: {e}")))?;

    info!("HTTP server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl+C, serving until killed: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
