// handlers/webhook.rs - POST /api/revalidate
//
// Called by the database trigger on every insert/update/delete of a storefront
// table. Builds the path set for the changed row and marks each path stale.

use axum::{body::Bytes, extract::State, Json};
use serde::Deserialize;
use serde_json::Value;

use super::parse_body;
use crate::error::{ApiError, ApiResult};
use crate::revalidation::{ChangeEvent, RevalidationReport};
use crate::state::SharedState;

#[derive(Debug, Default, Deserialize)]
pub struct WebhookRequest {
    #[serde(default)]
    pub secret: Option<String>,
    /// Kept raw so a malformed event is only reported after the secret check.
    #[serde(default)]
    pub payload: Option<Value>,
}

/// POST /api/revalidate - revalidate every page showing the changed row
///
/// Per-path failures are listed in the report but still answer 200: the
/// trigger has no finer-grained way to retry.
pub async fn webhook_post(State(state): State<SharedState>, body: Bytes) -> ApiResult<Json<RevalidationReport>> {
    let request: WebhookRequest = parse_body(&body)?;
    state.authorize(request.secret.as_deref())?;

    let payload = request
        .payload
        .filter(|p| !p.is_null())
        .ok_or_else(|| ApiError::bad_request("Missing payload"))?;
    let event: ChangeEvent =
        serde_json::from_value(payload).map_err(|e| ApiError::bad_request(format!("Invalid payload: {}", e)))?;

    let paths = event.paths(&state.locales);
    let dispatcher = state.dispatcher.clone();

    // A panicking backend must not take the connection down with it
    let summary = tokio::spawn(async move { dispatcher.dispatch(&paths).await })
        .await
        .map_err(|e| {
            tracing::error!(table = %event.table, "Revalidation task failed: {}", e);
            ApiError::internal_server_error(format!("Revalidation failed: {}", e))
        })?;

    let report = RevalidationReport::new(&event, summary);
    tracing::info!(
        table = %report.table,
        operation = ?report.operation,
        paths = report.revalidated.len(),
        failed = report.failed.len(),
        "Processed revalidation webhook"
    );

    Ok(Json(report))
}
