use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::revalidation::{
    localize, Dispatcher, HttpInvalidator, InvalidationError, Locales, LogInvalidator, PathInvalidator, PathSet,
    SharedSecret,
};

/// Everything a request needs, built once at startup and never mutated.
pub struct AppState {
    pub secret: SharedSecret,
    pub locales: Locales,
    /// Curated operator list, already expanded across locales.
    pub common_paths: PathSet,
    pub dispatcher: Dispatcher,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(secret: SharedSecret, locales: Locales, common_paths: &[String], dispatcher: Dispatcher) -> Self {
        let absolute = common_paths.iter().filter(|p| {
            let ok = p.starts_with('/');
            if !ok {
                tracing::warn!("Skipping common path '{}': must start with '/'", p);
            }
            ok
        });
        let common_paths = localize(absolute, &locales);

        Self {
            secret,
            locales,
            common_paths,
            dispatcher,
        }
    }

    /// Build state from configuration, choosing the HTTP invalidator when an
    /// upstream is configured and the log-only one otherwise.
    pub fn from_config(config: &AppConfig) -> Result<Self, InvalidationError> {
        let revalidate = &config.revalidate;

        let invalidator: Arc<dyn PathInvalidator> = match &revalidate.upstream_url {
            Some(url) => {
                tracing::info!("Forwarding invalidations to {}", url);
                Arc::new(HttpInvalidator::new(
                    url.clone(),
                    config.upstream_secret().map(str::to_string),
                    Duration::from_secs(revalidate.upstream_timeout_secs),
                )?)
            }
            None => {
                tracing::warn!("REVALIDATE_UPSTREAM_URL not set, invalidations will only be logged");
                Arc::new(LogInvalidator)
            }
        };

        let secret = SharedSecret::new(revalidate.secret.as_deref());
        if !secret.is_configured() {
            tracing::warn!("REVALIDATION_SECRET not set, every revalidation request will be rejected");
        }

        Ok(Self::new(
            secret,
            revalidate.locales.clone(),
            &revalidate.common_paths,
            Dispatcher::new(invalidator),
        ))
    }

    /// Reject the request unless `candidate` matches the shared secret.
    pub fn authorize(&self, candidate: Option<&str>) -> Result<(), ApiError> {
        if self.secret.verify(candidate) {
            Ok(())
        } else {
            tracing::warn!("Rejected revalidation request with missing or invalid secret");
            Err(ApiError::unauthorized("Invalid secret"))
        }
    }
}
