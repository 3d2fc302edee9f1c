pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod revalidation;
pub mod state;

/// Install the fmt subscriber, honouring `RUST_LOG` and falling back to `default_directive`.
pub fn init_tracing(default_directive: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
