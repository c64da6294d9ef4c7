//! Test server management.
//!
//! Spawns and manages chatd instances for integration testing.

use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::sleep;

/// A test server instance. The process is killed on drop.
pub struct TestServer {
    child: Child,
    port: u16,
    _config_dir: TempDir,
}

impl TestServer {
    /// Spawn a server listening on `127.0.0.1:port` with default limits.
    pub async fn spawn(port: u16) -> anyhow::Result<Self> {
        Self::spawn_with_limits(port, "").await
    }

    /// Spawn a server with extra `[limits]` entries.
    pub async fn spawn_with_limits(port: u16, limits: &str) -> anyhow::Result<Self> {
        let config_dir = tempfile::tempdir()?;
        let config_path = config_dir.path().join("config.toml");
        let config_content = format!(
            r#"
[server]
name = "test.chatd"
metrics_port = 0

[listen]
address = "127.0.0.1:{port}"

[limits]
{limits}
"#
        );
        std::fs::write(&config_path, config_content)?;

        let child = Command::new(env!("CARGO_BIN_EXE_chatd"))
            .arg(&config_path)
            .env("RUST_LOG", "warn")
            .stdout(Stdio::null())
            .spawn()?;

        let server = Self {
            child,
            port,
            _config_dir: config_dir,
        };

        server.wait_until_ready().await?;
        Ok(server)
    }

    /// Wait until the server is accepting connections.
    async fn wait_until_ready(&self) -> anyhow::Result<()> {
        for _ in 0..50 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("Server failed to start within 5 seconds")
    }

    /// Get the server address.
    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    /// Connect a new, unregistered client.
    pub async fn connect(&self) -> anyhow::Result<super::client::TestClient> {
        super::client::TestClient::connect(&self.address()).await
    }

    /// Connect a client and register `nick`.
    pub async fn connect_as(&self, nick: &str) -> anyhow::Result<super::client::TestClient> {
        let mut client = self.connect().await?;
        client.register(nick).await?;
        Ok(client)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
