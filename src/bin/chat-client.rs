//! chat-client - minimal interactive client for chatd.
//!
//! Usage: `chat-client [host] [port]` (defaults `localhost` `3333`).
//! Lines typed on stdin go to the server verbatim; every server line is
//! printed followed by a `>` prompt.

use anyhow::Context;
use chat_proto::{Line, LineCodec};
use futures_util::{SinkExt, StreamExt};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio_util::codec::{FramedRead, FramedWrite};

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 3333;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = match args.next() {
        Some(port) => port
            .parse::<u16>()
            .with_context(|| format!("invalid port {port:?}"))?,
        None => DEFAULT_PORT,
    };

    let stream = TcpStream::connect((host.as_str(), port))
        .await
        .with_context(|| format!("failed to connect to {host}:{port}"))?;
    let (read_half, write_half) = stream.into_split();
    let mut server = FramedRead::new(read_half, LineCodec::new());
    let mut sink = FramedWrite::new(write_half, LineCodec::new());

    // Forward stdin until it closes; the server decides when we're done.
    tokio::spawn(async move {
        let mut stdin = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = stdin.next_line().await {
            if sink.send(line).await.is_err() {
                break;
            }
        }
    });

    prompt()?;
    while let Some(item) = server.next().await {
        match item.context("connection error")? {
            Line::Text(text) => println!("{text}"),
            Line::InvalidUtf8 { lossy } => println!("{lossy}"),
            Line::TooLong { limit } => println!("(server line over {limit} bytes skipped)"),
        }
        prompt()?;
    }

    println!();
    Ok(())
}

fn prompt() -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(b">")?;
    stdout.flush()
}
