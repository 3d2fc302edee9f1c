use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::handlers;
use crate::state::{AppState, SharedState};

/// Full application router with global middleware.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = routes(Arc::new(state)).layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

/// Routes without middleware.
pub fn routes(state: SharedState) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Shared-secret protected
        .merge(revalidate_routes())
        .with_state(state)
}

fn revalidate_routes() -> Router<SharedState> {
    Router::new()
        .route("/api/revalidate", post(handlers::webhook_post))
        .route("/api/revalidate/path", post(handlers::path_post))
        .route("/api/revalidate/batch", post(handlers::batch_post))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::revalidation::{Dispatcher, InvalidationError, Locales, PathInvalidator, SharedSecret};
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::sync::Mutex;
    use tower::ServiceExt;

    const SECRET: &str = "test-secret";

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
        panic_on: Option<&'static str>,
    }

    #[async_trait]
    impl PathInvalidator for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        async fn invalidate(&self, path: &str) -> Result<(), InvalidationError> {
            if self.panic_on == Some(path) {
                panic!("backend exploded");
            }
            self.calls.lock().unwrap().push(path.to_string());
            if path == "/fr" || path == "/broken" {
                return Err(InvalidationError::Rejected {
                    status: 500,
                    body: "upstream down".to_string(),
                });
            }
            Ok(())
        }
    }

    fn router(recorder: Arc<Recorder>) -> Router {
        let state = AppState::new(
            SharedSecret::new(Some(SECRET)),
            Locales::default(),
            &["/".to_string(), "/products".to_string()],
            Dispatcher::new(recorder),
        );
        app(state, &AppConfig::development())
    }

    async fn post_json(router: Router, uri: &str, body: String) -> (StatusCode, Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn webhook_revalidates_every_path_for_the_event() {
        let recorder = Arc::new(Recorder::default());
        let body = json!({
            "secret": SECRET,
            "payload": { "table": "products", "operation": "UPDATE", "record": { "slug": "cbd-oil-500mg" } }
        });

        let (status, value) = post_json(router(recorder.clone()), "/api/revalidate", body.to_string()).await;

        assert_eq!(status, StatusCode::OK, "{}", value);
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["table"], json!("products"));
        assert_eq!(value["operation"], json!("UPDATE"));
        assert_eq!(value["revalidated"].as_array().unwrap().len(), 15);
        assert_eq!(value["revalidated"][5], json!("/products/cbd-oil-500mg"));
        // "/fr" is rejected by the recorder but the report still succeeds
        assert_eq!(value["failed"], json!(["/fr"]));
        assert_eq!(recorder.calls.lock().unwrap().len(), 15);
    }

    #[tokio::test]
    async fn webhook_rejects_wrong_secret() {
        let recorder = Arc::new(Recorder::default());
        let body = json!({ "secret": "nope", "payload": { "table": "products" } });

        let (status, value) = post_json(router(recorder.clone()), "/api/revalidate", body.to_string()).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(value["success"], json!(false));
        assert!(recorder.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn webhook_rejects_missing_secret_and_empty_body() {
        let (status, _) = post_json(
            router(Arc::default()),
            "/api/revalidate",
            json!({ "payload": { "table": "products" } }).to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, value) = post_json(router(Arc::default()), "/api/revalidate", String::new()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(value["success"], json!(false));
    }

    #[tokio::test]
    async fn webhook_requires_payload() {
        let (status, value) = post_json(
            router(Arc::default()),
            "/api/revalidate",
            json!({ "secret": SECRET }).to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["message"], json!("Missing payload"));
    }

    #[tokio::test]
    async fn webhook_rejects_payload_without_table() {
        let (status, value) = post_json(
            router(Arc::default()),
            "/api/revalidate",
            json!({ "secret": SECRET, "payload": { "record": { "slug": "x" } } }).to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["success"], json!(false));
    }

    #[tokio::test]
    async fn webhook_rejects_malformed_json() {
        let (status, _) = post_json(router(Arc::default()), "/api/revalidate", "{not json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn webhook_accepts_trigger_type_alongside_operation() {
        let body = json!({
            "secret": SECRET,
            "payload": {
                "table": "products",
                "type": "UPDATE",
                "operation": "UPDATE",
                "schema": "public",
                "record": { "slug": "oil" }
            }
        });

        let (status, value) = post_json(router(Arc::default()), "/api/revalidate", body.to_string()).await;

        assert_eq!(status, StatusCode::OK, "{}", value);
        assert_eq!(value["operation"], json!("UPDATE"));
        assert_eq!(value["revalidated"][5], json!("/products/oil"));
    }

    #[tokio::test]
    async fn webhook_unknown_table_touches_homepages_only() {
        let recorder = Arc::new(Recorder::default());
        let body = json!({ "secret": SECRET, "payload": { "table": "translations" } });

        let (status, value) = post_json(router(recorder), "/api/revalidate", body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["revalidated"], json!(["/", "/en", "/nl", "/de", "/fr"]));
    }

    #[tokio::test]
    async fn webhook_reports_backend_panic_as_internal_error() {
        let recorder = Arc::new(Recorder {
            panic_on: Some("/"),
            ..Default::default()
        });
        let body = json!({ "secret": SECRET, "payload": { "table": "orders" } });

        let (status, value) = post_json(router(recorder), "/api/revalidate", body.to_string()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(value["success"], json!(false));
        assert!(value["message"].as_str().unwrap().starts_with("Revalidation failed"));
    }

    #[tokio::test]
    async fn manual_path_revalidates_literal_path() {
        let recorder = Arc::new(Recorder::default());
        let body = json!({ "secret": SECRET, "path": "/about" });

        let (status, value) = post_json(router(recorder.clone()), "/api/revalidate/path", body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["path"], json!("/about"));
        assert_eq!(*recorder.calls.lock().unwrap(), vec!["/about".to_string()]);
    }

    #[tokio::test]
    async fn manual_path_surfaces_upstream_failure() {
        let body = json!({ "secret": SECRET, "path": "/broken" });
        let (status, value) = post_json(router(Arc::default()), "/api/revalidate/path", body.to_string()).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(value["success"], json!(false));
    }

    #[tokio::test]
    async fn manual_path_validates_input() {
        for body in [
            json!({ "secret": SECRET }),
            json!({ "secret": SECRET, "path": "about" }),
            json!({ "secret": SECRET, "path": "  " }),
        ] {
            let (status, _) = post_json(router(Arc::default()), "/api/revalidate/path", body.to_string()).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        }

        let body = json!({ "secret": "wrong", "path": "/" });
        let (status, _) = post_json(router(Arc::default()), "/api/revalidate/path", body.to_string()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn batch_defaults_to_common_paths() {
        let recorder = Arc::new(Recorder::default());
        let body = json!({ "secret": SECRET });

        let (status, value) = post_json(router(recorder.clone()), "/api/revalidate/batch", body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        // "/" and "/products" across four locales, "/fr" rejected
        assert_eq!(value["succeeded"], json!(9));
        assert_eq!(value["failed"], json!(1));
        assert_eq!(value["results"].as_array().unwrap().len(), 10);
        assert_eq!(recorder.calls.lock().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn batch_uses_operator_selected_paths() {
        let recorder = Arc::new(Recorder::default());
        let body = json!({ "secret": SECRET, "paths": ["/a", "/broken", "/a"] });

        let (status, value) = post_json(router(recorder), "/api/revalidate/batch", body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["succeeded"], json!(1));
        assert_eq!(value["failed"], json!(1));
        assert_eq!(value["results"][1]["path"], json!("/broken"));
    }

    #[tokio::test]
    async fn batch_rejects_relative_paths() {
        let body = json!({ "secret": SECRET, "paths": ["/ok", "nope"] });
        let (status, _) = post_json(router(Arc::default()), "/api/revalidate/batch", body.to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn health_reports_backend() {
        let response = router(Arc::default())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["data"]["invalidator"], json!("recorder"));
        assert_eq!(value["data"]["secret_configured"], json!(true));
    }
}
