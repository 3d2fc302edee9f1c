// handlers/mod.rs - HTTP handlers
//
// system:  GET /, GET /health (public)
// webhook: POST /api/revalidate (database trigger)
// manual:  POST /api/revalidate/path, POST /api/revalidate/batch (operator)

pub mod manual;
pub mod system;
pub mod webhook;

pub use manual::{batch_post, path_post};
pub use system::{health, root};
pub use webhook::webhook_post;

use serde::de::DeserializeOwned;

use crate::error::{ApiError, ApiResult};

/// Decode a JSON request body. An empty body reads as `{}` so a request
/// without credentials fails the secret check rather than parsing.
pub(crate) fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> ApiResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {}", e)))
}
