//! Axum HTTP server setup and routing

use std::net::SocketAddr;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::*;
use crate::state::PoolState;

pub fn create_router(state: PoolState) -> Router {
    // Permissive CORS so browser-based tooling can hit the mock too
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Node API surface the client uses
        .route("/v2/accounts/:principal", get(get_account))
        .route("/v2/transactions", post(broadcast_transaction))
        .route(
            "/v2/contracts/call-read/:address/:contract/:function",
            post(call_read_only),
        )
        // Shared state
        .with_state(state)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Bind an ephemeral local port and serve in a background task
///
/// Returns the bound address; integration tests point the client's core API
/// URL at it.
pub async fn spawn_server(state: PoolState) -> anyhow::Result<SocketAddr> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            log::error!("Mock node server error: {}", e);
        }
    });

    Ok(addr)
}

/// Serve on a fixed host/port until shutdown (standalone binary)
pub async fn run_server(state: PoolState, host: String, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    log::info!("🚀 Stacks node mock listening on http://{}", addr);
    log::info!("📡 Savings-pool simulation ready (interest rate 5%, min deposit 1 STX)");

    axum::serve(listener, app).await?;

    Ok(())
}
