use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::paths::{build_paths, Locales, PathSet};

/// One insert/update/delete notification from the storefront database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    /// Database trigger event type (`INSERT`/`UPDATE`/`DELETE`).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<ChangeRecord>,
    /// Row as it was before the change; the only row present on deletes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_record: Option<ChangeRecord>,
}

/// The changed row. Only `slug` is interpreted, everything else rides along.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ChangeEvent {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            operation: None,
            kind: None,
            record: None,
            old_record: None,
        }
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.record = Some(ChangeRecord {
            slug: Some(slug.into()),
            fields: Map::new(),
        });
        self
    }

    /// Explicit operation, else the trigger's event type.
    pub fn operation(&self) -> Option<&str> {
        self.operation.as_deref().or(self.kind.as_deref())
    }

    /// Slug of the new row, falling back to the old row for deletes.
    pub fn slug(&self) -> Option<&str> {
        record_slug(&self.record).or_else(|| record_slug(&self.old_record))
    }

    pub fn paths(&self, locales: &Locales) -> PathSet {
        build_paths(&self.table, self.slug(), locales)
    }
}

fn record_slug(record: &Option<ChangeRecord>) -> Option<&str> {
    record
        .as_ref()
        .and_then(|r| r.slug.as_deref())
        .filter(|s| !s.trim().is_empty())
}
