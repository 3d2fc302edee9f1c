use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::revalidation::known_tables;
use crate::state::SharedState;

/// GET / - service description
pub async fn root(State(state): State<SharedState>) -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Revalidate API",
            "version": version,
            "description": "Storefront page-cache revalidation (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "webhook": "POST /api/revalidate (shared secret)",
                "path": "POST /api/revalidate/path (shared secret)",
                "batch": "POST /api/revalidate/batch (shared secret)",
            },
            "tables": known_tables(),
            "locales": state.locales,
        }
    }))
}

/// GET /health - liveness plus the active invalidation backend
pub async fn health(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
            "invalidator": state.dispatcher.backend(),
            "secret_configured": state.secret.is_configured(),
        }
    }))
}
