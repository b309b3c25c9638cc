use axum::{extract::State, response::IntoResponse, Json};

use crate::{mcp::schema::TOOL_NAME, AppState};

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "tool": TOOL_NAME,
        "open_uploads": state.poi_client.open_streams()
    }))
}
