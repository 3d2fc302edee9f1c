// Change event → path set → per-path invalidation → report

pub mod dispatcher;
pub mod event;
pub mod invalidator;
pub mod paths;
pub mod report;
pub mod secret;

pub use dispatcher::{DispatchSummary, Dispatcher, RevalidationOutcome};
pub use event::{ChangeEvent, ChangeRecord};
pub use invalidator::{HttpInvalidator, InvalidationError, LogInvalidator, PathInvalidator};
pub use paths::{build_paths, known_tables, localize, Locales, PathSet, TableRoutes};
pub use report::{BatchReport, RevalidationReport};
pub use secret::SharedSecret;
