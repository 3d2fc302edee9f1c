use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Why a single path could not be marked stale.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidationError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Upstream request failed: {0}")]
    Transport(String),

    #[error("Upstream rejected revalidation ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Marks one previously rendered page stale so the next request regenerates it.
///
/// Implementations must be idempotent: invalidating a fresh page is a no-op.
#[async_trait]
pub trait PathInvalidator: Send + Sync {
    /// Short backend name for logs and health output
    fn name(&self) -> &'static str;

    async fn invalidate(&self, path: &str) -> Result<(), InvalidationError>;
}

/// Forwards each path to the rendering host's revalidation endpoint as
/// `{ "secret": ..., "path": ... }`.
pub struct HttpInvalidator {
    client: reqwest::Client,
    endpoint: Url,
    secret: Option<String>,
}

impl HttpInvalidator {
    pub fn new(endpoint: Url, secret: Option<String>, timeout: Duration) -> Result<Self, InvalidationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InvalidationError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            secret,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl PathInvalidator for HttpInvalidator {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn invalidate(&self, path: &str) -> Result<(), InvalidationError> {
        if !path.starts_with('/') {
            return Err(InvalidationError::InvalidPath(path.to_string()));
        }

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&json!({
                "secret": self.secret,
                "path": path,
            }))
            .send()
            .await
            .map_err(|e| InvalidationError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(InvalidationError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

/// Used when no upstream is configured: records the request in the log only.
#[derive(Debug, Default)]
pub struct LogInvalidator;

#[async_trait]
impl PathInvalidator for LogInvalidator {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn invalidate(&self, path: &str) -> Result<(), InvalidationError> {
        if !path.starts_with('/') {
            return Err(InvalidationError::InvalidPath(path.to_string()));
        }
        tracing::info!(path, "Marked path stale (no upstream configured)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    type Received = Arc<Mutex<Vec<Value>>>;

    async fn fake_upstream(received: Received) -> Url {
        async fn handler(State(received): State<Received>, Json(body): Json<Value>) -> StatusCode {
            let reject = body["path"] == "/reject";
            received.lock().unwrap().push(body);
            if reject {
                StatusCode::UNAUTHORIZED
            } else {
                StatusCode::OK
            }
        }

        let app = Router::new()
            .route("/api/revalidate", post(handler))
            .with_state(received);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Url::parse(&format!("http://{}/api/revalidate", addr)).unwrap()
    }

    #[tokio::test]
    async fn http_invalidator_posts_secret_and_path() {
        let received: Received = Arc::default();
        let endpoint = fake_upstream(received.clone()).await;
        let invalidator =
            HttpInvalidator::new(endpoint, Some("s3cret".to_string()), Duration::from_secs(5)).unwrap();

        invalidator.invalidate("/products/oil").await.unwrap();

        let bodies = received.lock().unwrap().clone();
        assert_eq!(bodies, vec![json!({ "secret": "s3cret", "path": "/products/oil" })]);
    }

    #[tokio::test]
    async fn http_invalidator_reports_rejection_status() {
        let received: Received = Arc::default();
        let endpoint = fake_upstream(received).await;
        let invalidator = HttpInvalidator::new(endpoint, None, Duration::from_secs(5)).unwrap();

        let err = invalidator.invalidate("/reject").await.unwrap_err();
        assert!(matches!(err, InvalidationError::Rejected { status: 401, .. }), "{:?}", err);
    }

    #[tokio::test]
    async fn http_invalidator_reports_transport_failure() {
        let port = portpicker::pick_unused_port().unwrap();
        let endpoint = Url::parse(&format!("http://127.0.0.1:{}/api/revalidate", port)).unwrap();
        let invalidator = HttpInvalidator::new(endpoint, None, Duration::from_secs(2)).unwrap();

        let err = invalidator.invalidate("/").await.unwrap_err();
        assert!(matches!(err, InvalidationError::Transport(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn relative_paths_are_refused_before_any_request() {
        assert_eq!(
            LogInvalidator.invalidate("products").await,
            Err(InvalidationError::InvalidPath("products".to_string()))
        );
    }
}
