use std::net::SocketAddr;
use std::sync::{mpsc, OnceLock};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use revalidate_api::app::app;
use revalidate_api::config::AppConfig;
use revalidate_api::revalidation::Locales;
use revalidate_api::state::AppState;

pub const SECRET: &str = "integration-secret";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub base_url: String,
}

impl TestServer {
    /// Serve the router in-process on its own runtime thread, so it lives as long as
    /// the test binary and goes away with it.
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let addr = SocketAddr::from(([127, 0, 0, 1], port));

        // No upstream: the server falls back to the log-only invalidator
        let mut config = AppConfig::development();
        config.revalidate.secret = Some(SECRET.to_string());
        config.revalidate.locales = Locales::default();
        config.revalidate.upstream_url = None;
        let state = AppState::from_config(&config).context("failed to build app state")?;
        let router = app(state, &config);

        let (ready_tx, ready_rx) = mpsc::channel::<std::io::Result<()>>();
        std::thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };
            runtime.block_on(async move {
                let listener = match tokio::net::TcpListener::bind(addr).await {
                    Ok(listener) => listener,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));
                if let Err(e) = axum::serve(listener, router).await {
                    eprintln!("test server stopped: {}", e);
                }
            });
        });

        ready_rx
            .recv_timeout(Duration::from_secs(10))
            .context("test server thread did not report readiness")?
            .with_context(|| format!("failed to bind test server on {}", addr))?;

        Ok(Self {
            base_url: format!("http://{}", addr),
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to start in-process server"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

#[allow(dead_code)]
pub async fn post(path: &str, body: serde_json::Value) -> Result<(StatusCode, serde_json::Value)> {
    let server = ensure_server().await?;
    let res = reqwest::Client::new()
        .post(format!("{}{}", server.base_url, path))
        .json(&body)
        .send()
        .await?;
    let status = res.status();
    let payload = res.json::<serde_json::Value>().await?;
    Ok((status, payload))
}
