// handlers/manual.rs - operator-triggered revalidation
//
// These skip the path set builder: the operator names the paths, or falls
// back to the curated common list.

use axum::{body::Bytes, extract::State, Json};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use super::parse_body;
use crate::error::{ApiError, ApiResult};
use crate::revalidation::{BatchReport, PathSet};
use crate::state::SharedState;

#[derive(Debug, Default, Deserialize)]
pub struct PathRequest {
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub secret: Option<String>,
    /// Operator-selected paths; the common list when absent or empty.
    #[serde(default)]
    pub paths: Option<Vec<String>>,
}

/// POST /api/revalidate/path - revalidate one literal path
pub async fn path_post(State(state): State<SharedState>, body: Bytes) -> ApiResult<Json<Value>> {
    let request: PathRequest = parse_body(&body)?;
    state.authorize(request.secret.as_deref())?;

    let path = request
        .path
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing path"))?;
    require_absolute(path)?;

    state.dispatcher.invalidate(path).await?;
    tracing::info!(path, "Manually revalidated path");

    Ok(Json(json!({
        "success": true,
        "path": path,
        "date": Utc::now(),
    })))
}

/// POST /api/revalidate/batch - revalidate a list of paths concurrently
pub async fn batch_post(State(state): State<SharedState>, body: Bytes) -> ApiResult<Json<BatchReport>> {
    let request: BatchRequest = parse_body(&body)?;
    state.authorize(request.secret.as_deref())?;

    let paths = match request.paths.filter(|p| !p.is_empty()) {
        Some(selected) => {
            let mut set = PathSet::new();
            for path in selected.iter().map(|p| p.trim()) {
                require_absolute(path)?;
                set.push(path);
            }
            set
        }
        None => state.common_paths.clone(),
    };

    let summary = state.dispatcher.dispatch_concurrent(paths.as_slice()).await;
    let report = BatchReport::from(summary);
    tracing::info!(
        succeeded = report.succeeded,
        failed = report.failed,
        "Processed manual revalidation batch"
    );

    Ok(Json(report))
}

fn require_absolute(path: &str) -> ApiResult<()> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(ApiError::bad_request(format!("Path must start with '/': {}", path)))
    }
}
