use chrono::{DateTime, Utc};
use serde::Serialize;

use super::dispatcher::{DispatchSummary, RevalidationOutcome};
use super::event::ChangeEvent;

/// Webhook response: every path attempted for one change event.
#[derive(Debug, Clone, Serialize)]
pub struct RevalidationReport {
    /// The request was accepted and processed; per-path failures do not flip it.
    pub success: bool,
    pub revalidated: Vec<String>,
    pub failed: Vec<String>,
    pub results: Vec<RevalidationOutcome>,
    pub table: String,
    pub operation: Option<String>,
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
}

impl RevalidationReport {
    pub fn new(event: &ChangeEvent, summary: DispatchSummary) -> Self {
        Self {
            success: true,
            revalidated: summary.attempted_paths(),
            failed: summary.failed_paths(),
            results: summary.outcomes,
            table: event.table.clone(),
            operation: event.operation().map(str::to_string),
            timestamp: Utc::now(),
        }
    }
}

/// Manual batch response with counts for the operator.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub success: bool,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<RevalidationOutcome>,
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
}

impl From<DispatchSummary> for BatchReport {
    fn from(summary: DispatchSummary) -> Self {
        Self {
            success: true,
            succeeded: summary.succeeded(),
            failed: summary.failed(),
            results: summary.outcomes,
            timestamp: Utc::now(),
        }
    }
}
