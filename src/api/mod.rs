//! # API Module
//!
//! HTTP transport for the Proof of Invention MCP server.
//!
//! ## Available Endpoints
//!
//! - `GET /api/health` - Liveness check
//! - `POST /api/rpc` - JSON-RPC endpoint forwarding MCP requests to the handler

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub mod health;
pub mod rpc;

/// Builds the full HTTP application with all routes nested under `/api`.
pub fn create_router(state: AppState) -> Router {
    let api_router = Router::new()
        .route("/health", get(health::health_handler))
        .route("/rpc", post(rpc::rpc_handler));

    Router::new()
        .nest("/api", api_router)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
