//! Test chat client.
//!
//! Sends raw lines and asserts on the lines the server sends back.

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::{TcpSocket, TcpStream};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

/// A test chat client.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
}

impl TestClient {
    /// Connect to a test server.
    pub async fn connect(address: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;
        let (read_half, write_half) = stream.into_split();

        Ok(Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
        })
    }

    /// Connect with a small kernel receive buffer, for a client that stops
    /// reading and should back up quickly.
    #[allow(dead_code)]
    pub async fn connect_with_recv_buffer(address: &str, size: u32) -> anyhow::Result<Self> {
        let addr: std::net::SocketAddr = address.parse()?;
        let socket = TcpSocket::new_v4()?;
        socket.set_recv_buffer_size(size)?;
        let stream = socket.connect(addr).await?;
        let (read_half, write_half) = stream.into_split();

        Ok(Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
        })
    }

    /// Send one line; a `\n` terminator is appended.
    pub async fn send_line(&mut self, line: &str) -> anyhow::Result<()> {
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');
        self.send_raw(&buf).await
    }

    /// Send bytes exactly as given.
    pub async fn send_raw(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.writer.write_all(bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Receive a single line.
    pub async fn recv(&mut self) -> anyhow::Result<String> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive a line with a timeout. A closed connection is an error.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<String> {
        let mut line = String::new();
        let read = timeout(dur, self.reader.read_line(&mut line)).await??;
        if read == 0 {
            anyhow::bail!("connection closed");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Send `line` and return the first line received afterwards.
    pub async fn request(&mut self, line: &str) -> anyhow::Result<String> {
        self.send_line(line).await?;
        self.recv().await
    }

    /// Assert nothing arrives within `dur`.
    pub async fn expect_silence(&mut self, dur: Duration) {
        if let Ok(line) = self.recv_timeout(dur).await {
            panic!("expected no traffic, received {line:?}");
        }
    }

    /// Register `nick` and consume the confirmation.
    pub async fn register(&mut self, nick: &str) -> anyhow::Result<()> {
        let reply = self.request(&format!("/NICK {nick}")).await?;
        if reply != format!("Registered nickname {nick}") {
            anyhow::bail!("Registration failed: {reply:?}");
        }
        Ok(())
    }

    /// Close both halves of the connection.
    pub async fn disconnect(mut self) -> anyhow::Result<()> {
        self.writer.shutdown().await?;
        Ok(())
    }
}
