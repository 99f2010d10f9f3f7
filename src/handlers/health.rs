use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - Service identity
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "dadz-api",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "jokes": "GET /jokes?page=&limit= (public), POST /jokes (Bearer api key)",
            "random": "GET /random-joke (public)",
            "health": "GET /health (public)",
        }
    }))
}

/// GET /health - Liveness including the storage backend
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let now = chrono::Utc::now();

    match state.provider.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "storage": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "storage": e.to_string()
            })),
        ),
    }
}
