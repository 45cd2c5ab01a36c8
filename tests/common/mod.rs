use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Fresh database file per spawned server
        let db_path = std::env::temp_dir().join(format!("tunevault-test-{}.db", port));
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", db_path.display(), suffix));
        }

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_tunevault"));
        cmd.env("TUNEVAULT_PORT", port.to_string())
            .env("DATABASE_URL", format!("sqlite:{}", db_path.display()))
            .env("JWT_SECRET", "integration-test-secret")
            .env("TOKEN_EXPIRY_MINS", "30")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            port,
            base_url,
            child,
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
                if resp.status() == StatusCode::OK
                    || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// POST /register with a derived email; returns the raw response.
#[allow(dead_code)]
pub async fn register(
    client: &reqwest::Client,
    base_url: &str,
    username: &str,
    password: &str,
) -> Result<reqwest::Response> {
    let res = client
        .post(format!("{}/register", base_url))
        .json(&json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": password,
        }))
        .send()
        .await?;
    Ok(res)
}

/// Register (tolerating an already-taken username) and log in.
#[allow(dead_code)]
pub async fn token_for(
    client: &reqwest::Client,
    base_url: &str,
    username: &str,
    password: &str,
) -> Result<String> {
    let _ = register(client, base_url, username, password).await?;

    let res = client
        .post(format!("{}/login", base_url))
        .form(&[("username", username), ("password", password)])
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::OK,
        "login for {} failed: {}",
        username,
        res.status()
    );

    let body = res.json::<Value>().await?;
    let token = body["access_token"]
        .as_str()
        .context("missing access_token")?
        .to_string();
    Ok(token)
}

/// Token for the auto-promoted "admin" account.
#[allow(dead_code)]
pub async fn admin_token(client: &reqwest::Client, base_url: &str) -> Result<String> {
    token_for(client, base_url, "admin", "admin-pass-123").await
}
