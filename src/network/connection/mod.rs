//! Connection - handles an individual client connection.
//!
//! Each Connection runs in its own Tokio task:
//!
//! ```text
//!   socket read half ──► FramedRead<LineCodec> ──► parse ──► dispatch
//!                                                              │
//!        other sessions ──► SessionHandle::deliver ──┐         │ reply
//!                                                    ▼         ▼
//!   socket write half ◄── writer task ◄──────── outbound queue (sendq)
//! ```
//!
//! The task selects over the next decoded line and the writer task. EOF, a
//! read error or a writer failure all end in the same teardown.

mod writer;

use crate::config::LimitsConfig;
use crate::error::HandlerError;
use crate::handlers::{Context, dispatch, teardown};
use crate::state::{Registry, Session, SessionHandle, SessionId};
use chat_proto::{Command, Line, LineCodec, Reply};
use futures_util::StreamExt;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, instrument, warn};
use writer::WriterExit;

/// A client connection handler.
pub struct Connection {
    id: SessionId,
    stream: TcpStream,
    addr: SocketAddr,
    registry: Arc<Registry>,
    limits: LimitsConfig,
}

impl Connection {
    pub fn new(
        id: SessionId,
        stream: TcpStream,
        addr: SocketAddr,
        registry: Arc<Registry>,
        limits: LimitsConfig,
    ) -> Self {
        Self {
            id,
            stream,
            addr,
            registry,
            limits,
        }
    }

    /// Run the connection until the client goes away.
    ///
    /// Returns an error only for a failed socket read; the session has been
    /// torn down either way.
    #[instrument(skip(self), fields(session = %self.id, addr = %self.addr), name = "connection")]
    pub async fn run(self) -> anyhow::Result<()> {
        let Connection {
            id,
            stream,
            addr,
            registry,
            limits,
        } = self;

        let (read_half, write_half) = stream.into_split();
        let mut lines = FramedRead::new(read_half, LineCodec::with_max_len(limits.max_line_length));
        let sink = FramedWrite::new(write_half, LineCodec::with_max_len(limits.max_line_length));

        let (tx, rx) = mpsc::channel(limits.sendq);
        let handle = SessionHandle::new(id, tx);
        let mut writer = tokio::spawn(writer::run(sink, rx, limits.write_timeout()));

        registry.insert(handle.clone());
        crate::metrics::session_opened();
        let mut session = Session::new(handle, addr);

        let mut writer_exit = None;
        let result = loop {
            tokio::select! {
                item = lines.next() => match item {
                    Some(Ok(line)) => {
                        if let Err(e) = handle_line(&mut session, &registry, line).await {
                            debug!(error = %e, "Own queue closed");
                            break Ok(());
                        }
                    }
                    Some(Err(e)) => break Err(e),
                    None => {
                        debug!("Client closed the connection");
                        break Ok(());
                    }
                },
                exit = &mut writer => {
                    writer_exit = Some(exit);
                    break Ok(());
                }
            }
        };

        teardown(&mut session, &registry);
        drop(session);

        match writer_exit {
            Some(Ok(exit)) => log_writer_exit(&exit),
            Some(Err(e)) => warn!(error = %e, "Writer task panicked"),
            // Give queued replies a chance to reach a half-closed client.
            None => match tokio::time::timeout(limits.write_timeout(), &mut writer).await {
                Ok(Ok(exit)) => log_writer_exit(&exit),
                Ok(Err(e)) => warn!(error = %e, "Writer task panicked"),
                Err(_) => writer.abort(),
            },
        }

        result?;
        Ok(())
    }
}

/// Parse and dispatch one decoded line. Only a fatal error is returned.
async fn handle_line(session: &mut Session, registry: &Registry, line: Line) -> Result<(), HandlerError> {
    let command = match line {
        Line::Text(text) => Command::parse(text.trim()),
        Line::TooLong { limit } => {
            crate::metrics::record_command_error("INVALID", "line_too_long");
            return session.handle().send(&Reply::LineTooLong(limit)).await;
        }
        Line::InvalidUtf8 { lossy } => Command::Malformed(lossy),
    };

    let label = command.name();
    debug!(command = label, "Command received");

    let mut ctx = Context::new(session, registry);
    match dispatch(&mut ctx, command).await {
        Ok(()) => Ok(()),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            crate::metrics::record_command_error(label, e.error_code());
            debug!(command = label, error = %e, "Command rejected");
            match e.to_reply() {
                Some(reply) => ctx.reply(reply).await,
                None => Ok(()),
            }
        }
    }
}

fn log_writer_exit(exit: &WriterExit) {
    match exit {
        WriterExit::QueueClosed => {}
        WriterExit::Failed(e) => debug!(error = %e, "Write failed"),
        WriterExit::TimedOut => warn!("Write timed out - dropping client"),
    }
}
