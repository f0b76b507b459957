#![allow(dead_code)]

use std::collections::HashMap;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use reqwest::StatusCode;
use tower::ServiceExt;

use jobboard_web::config::AppConfig;
use jobboard_web::{build_router, AppState};

pub const ANON_KEY: &str = "test-anon-key";

/// Server binary running on a free port, killed on drop
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    /// Spawn with the given backend settings; `None` leaves the variable unset
    pub async fn spawn(backend_url: Option<&str>, anon_key: Option<&str>) -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_jobboard-web"));
        cmd.env("JOBBOARD_PORT", port.to_string())
            .env("RUST_LOG", "warn")
            .env_remove("SUPABASE_URL")
            .env_remove("SUPABASE_ANON_KEY")
            .env_remove("SITE_CONFIG_PATH")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(url) = backend_url {
            cmd.env("SUPABASE_URL", url);
        }
        if let Some(key) = anon_key {
            cmd.env("SUPABASE_ANON_KEY", key);
        }

        let child = cmd.spawn().context("failed to spawn server binary")?;
        let server = Self { port, base_url, child };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
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

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// In-process application state built from explicit variables only
pub fn state_with(vars: &[(&str, &str)]) -> AppState {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    AppState::new(config_with(&vars)).expect("state")
}

pub fn config_with(vars: &HashMap<String, String>) -> AppConfig {
    AppConfig::from_lookup(|key| vars.get(key).cloned()).expect("config")
}

/// Backend-configured state with a custom image size cap
pub fn state_with_image_cap(backend_url: &str, image_max_bytes: u64) -> AppState {
    let vars: HashMap<String, String> = [("SUPABASE_URL", backend_url), ("SUPABASE_ANON_KEY", ANON_KEY)]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let mut config = config_with(&vars);
    config.site.image_max_bytes = image_max_bytes;
    AppState::new(config).expect("state")
}

pub fn state_for_backend(backend_url: &str) -> AppState {
    state_with(&[("SUPABASE_URL", backend_url), ("SUPABASE_ANON_KEY", ANON_KEY)])
}

pub async fn get(state: AppState, uri: &str) -> Response {
    build_router(state)
        .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
        .await
        .expect("router is infallible")
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}
