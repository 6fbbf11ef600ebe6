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
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/tasktrack-api");
        // Redirect the child's stdout/stderr to null rather than inheriting the
        // test process's handles: an inherited handle keeps cargo's output pipe
        // open after the tests finish (the server child is never reaped), so the
        // `cargo test` run would hang waiting for EOF even though all tests pass.
        cmd.env("TASKTRACK_API_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // Inherit environment so the server can see DATABASE_URL from .env
        // (loaded by the server itself)
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
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
                // Consider server ready on any health response, even degraded
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

/// True when /health reports a reachable, migrated database. Tests that
/// need persistence skip themselves when this is false.
pub async fn db_available(server: &TestServer) -> bool {
    let client = reqwest::Client::new();
    match client
        .get(format!("{}/health", server.base_url))
        .send()
        .await
    {
        Ok(resp) => resp.status() == StatusCode::OK,
        Err(_) => false,
    }
}

#[allow(dead_code)]
pub struct TestAccount {
    pub email: String,
    pub username: String,
    pub password: String,
    pub access: String,
    pub refresh: String,
}

/// Register a fresh account with unique credentials and return its tokens
#[allow(dead_code)]
pub async fn register_account(client: &reqwest::Client, base_url: &str) -> Result<TestAccount> {
    let tag = uuid::Uuid::new_v4().simple().to_string();
    let email = format!("user-{}@example.com", &tag[..12]);
    let username = format!("user-{}", &tag[..12]);
    let password = "test-password-123".to_string();

    let res = client
        .post(format!("{}/auth/register", base_url))
        .json(&json!({
            "email": email,
            "username": username,
            "password": password,
            "password2": password,
        }))
        .send()
        .await?;

    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "registration failed with status {}",
        res.status()
    );

    let body: Value = res.json().await?;
    let access = body["data"]["tokens"]["access"]
        .as_str()
        .context("missing access token in registration response")?
        .to_string();
    let refresh = body["data"]["tokens"]["refresh"]
        .as_str()
        .context("missing refresh token in registration response")?
        .to_string();

    Ok(TestAccount {
        email,
        username,
        password,
        access,
        refresh,
    })
}
