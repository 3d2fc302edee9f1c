use serde::Serialize;
use std::env;
use url::Url;

use crate::revalidation::Locales;

#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub revalidate: RevalidateConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize)]
pub struct RevalidateConfig {
    /// Shared secret expected on every inbound request. `None` rejects everything.
    #[serde(skip_serializing)]
    pub secret: Option<String>,
    pub locales: Locales,
    pub common_paths: Vec<String>,
    /// Rendering host endpoint that marks a single path stale.
    pub upstream_url: Option<Url>,
    #[serde(skip_serializing)]
    pub upstream_secret: Option<String>,
    pub upstream_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {var}: {message}")]
    InvalidValue { var: &'static str, message: String },
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match var("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(var)
    }

    fn with_overrides<F>(mut self, var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(v) = var("REVALIDATE_API_HOST") {
            self.server.host = v;
        }
        if let Some(port) = var("REVALIDATE_API_PORT")
            .or_else(|| var("PORT"))
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }

        // Revalidation overrides
        if let Some(v) = var("REVALIDATION_SECRET") {
            self.revalidate.secret = non_empty(v);
        }
        if let Some(v) = var("REVALIDATE_LOCALES") {
            let locales = Locales::parse(&v);
            if locales.as_slice().is_empty() {
                tracing::warn!("REVALIDATE_LOCALES '{}' has no valid locale codes, keeping defaults", v);
            } else {
                self.revalidate.locales = locales;
            }
        }
        if let Some(v) = var("REVALIDATE_COMMON_PATHS") {
            self.revalidate.common_paths = split_list(&v);
        }
        if let Some(v) = var("REVALIDATE_UPSTREAM_URL") {
            self.revalidate.upstream_url = match non_empty(v) {
                Some(raw) => Some(Url::parse(&raw).map_err(|e| ConfigError::InvalidValue {
                    var: "REVALIDATE_UPSTREAM_URL",
                    message: e.to_string(),
                })?),
                None => None,
            };
        }
        if let Some(v) = var("REVALIDATE_UPSTREAM_SECRET") {
            self.revalidate.upstream_secret = non_empty(v);
        }
        if let Some(v) = var("REVALIDATE_UPSTREAM_TIMEOUT_SECS") {
            match v.parse::<u64>() {
                Ok(secs) if secs > 0 => self.revalidate.upstream_timeout_secs = secs,
                _ => tracing::warn!(
                    "REVALIDATE_UPSTREAM_TIMEOUT_SECS '{}' must be a positive integer, keeping {}",
                    v,
                    self.revalidate.upstream_timeout_secs
                ),
            }
        }

        // API overrides
        if let Some(v) = var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Some(v) = var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Some(v) = var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Some(v) = var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = split_list(&v);
        }

        Ok(self)
    }

    /// Secret presented to the upstream rendering host, defaulting to the inbound one.
    pub fn upstream_secret(&self) -> Option<&str> {
        self.revalidate
            .upstream_secret
            .as_deref()
            .or(self.revalidate.secret.as_deref())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            revalidate: RevalidateConfig::defaults(10),
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            revalidate: RevalidateConfig::defaults(10),
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 256 * 1024,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            revalidate: RevalidateConfig::defaults(5),
            api: ApiConfig {
                enable_request_logging: false,
                max_request_size_bytes: 256 * 1024,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }
}

impl RevalidateConfig {
    fn defaults(upstream_timeout_secs: u64) -> Self {
        Self {
            secret: None,
            locales: Locales::default(),
            common_paths: ["/", "/products", "/categories", "/blog"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
            upstream_url: None,
            upstream_secret: None,
            upstream_timeout_secs,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
