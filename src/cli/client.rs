use anyhow::Context;
use reqwest::StatusCode;
use serde_json::{json, Value};
use url::Url;

/// Thin HTTP client for the revalidate API endpoints.
pub struct RevalidateClient {
    http: reqwest::Client,
    base_url: Url,
    secret: Option<String>,
}

impl RevalidateClient {
    pub fn new(server: &str, secret: Option<String>) -> anyhow::Result<Self> {
        let mut base_url = Url::parse(server).with_context(|| format!("invalid server URL '{}'", server))?;
        // Endpoints are joined relative to the base, so keep any path prefix as a directory
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            secret,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn webhook(&self, payload: Value) -> anyhow::Result<Value> {
        self.post("api/revalidate", json!({ "secret": self.secret, "payload": payload }))
            .await
    }

    pub async fn path(&self, path: &str) -> anyhow::Result<Value> {
        self.post("api/revalidate/path", json!({ "secret": self.secret, "path": path }))
            .await
    }

    /// Revalidate `paths`, or the server's common list when empty.
    pub async fn batch(&self, paths: &[String]) -> anyhow::Result<Value> {
        let mut body = json!({ "secret": self.secret });
        if !paths.is_empty() {
            body["paths"] = json!(paths);
        }
        self.post("api/revalidate/batch", body).await
    }

    /// Resolve an endpoint such as `api/revalidate` against the server base URL.
    pub fn endpoint(&self, endpoint: &str) -> anyhow::Result<Url> {
        self.base_url
            .join(endpoint.trim_start_matches('/'))
            .with_context(|| format!("invalid endpoint '{}'", endpoint))
    }

    pub async fn get(&self, endpoint: &str) -> anyhow::Result<Value> {
        let url = self.endpoint(endpoint)?;
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;
        Self::read(response).await
    }

    async fn post(&self, endpoint: &str, body: Value) -> anyhow::Result<Value> {
        let url = self.endpoint(endpoint)?;
        let response = self
            .http
            .post(url.clone())
            .json(&body)
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;
        Self::read(response).await
    }

    async fn read(response: reqwest::Response) -> anyhow::Result<Value> {
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if status == StatusCode::OK {
            return Ok(body);
        }

        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("no message")
            .to_string();
        anyhow::bail!("server returned {}: {}", status, message)
    }
}
