use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;

use super::invalidator::{InvalidationError, PathInvalidator};
use super::paths::PathSet;

/// Result of invalidating one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevalidationOutcome {
    pub path: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RevalidationOutcome {
    pub fn succeeded(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            success: true,
            error: None,
        }
    }

    pub fn failed(path: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Per-path outcomes in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DispatchSummary {
    pub outcomes: Vec<RevalidationOutcome>,
}

impl DispatchSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn failed_paths(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter(|o| !o.success)
            .map(|o| o.path.clone())
            .collect()
    }

    pub fn attempted_paths(&self) -> Vec<String> {
        self.outcomes.iter().map(|o| o.path.clone()).collect()
    }
}

/// Runs the invalidation primitive over a batch of paths. A failing path is
/// recorded and the batch carries on.
#[derive(Clone)]
pub struct Dispatcher {
    invalidator: Arc<dyn PathInvalidator>,
}

impl Dispatcher {
    pub fn new(invalidator: Arc<dyn PathInvalidator>) -> Self {
        Self { invalidator }
    }

    pub fn backend(&self) -> &'static str {
        self.invalidator.name()
    }

    /// Invalidate each path in order, one at a time.
    pub async fn dispatch(&self, paths: &PathSet) -> DispatchSummary {
        let mut outcomes = Vec::with_capacity(paths.len());
        for path in paths {
            outcomes.push(self.invalidate_one(path).await);
        }
        DispatchSummary { outcomes }
    }

    /// Invalidate every path with all calls in flight at once.
    pub async fn dispatch_concurrent(&self, paths: &[String]) -> DispatchSummary {
        let outcomes = join_all(paths.iter().map(|path| self.invalidate_one(path))).await;
        DispatchSummary { outcomes }
    }

    pub async fn invalidate(&self, path: &str) -> Result<(), InvalidationError> {
        self.invalidator.invalidate(path).await
    }

    /// Invalidate a single path, capturing any failure in the outcome.
    pub async fn invalidate_one(&self, path: &str) -> RevalidationOutcome {
        match self.invalidate(path).await {
            Ok(()) => {
                tracing::debug!(path, backend = self.backend(), "Revalidated path");
                RevalidationOutcome::succeeded(path)
            }
            Err(e) => {
                tracing::warn!(path, backend = self.backend(), "Failed to revalidate path: {}", e);
                RevalidationOutcome::failed(path, e.to_string())
            }
        }
    }
}
