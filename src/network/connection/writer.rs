//! Outbound half of a connection.
//!
//! One writer task per session drains the session's queue into the socket.
//! It is the only code that touches the write half, so lines queued by
//! different tasks always reach the client whole and in queue order.

use chat_proto::{LineCodec, ProtocolError};
use futures_util::SinkExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWrite;
use tokio::sync::mpsc;
use tokio_util::codec::FramedWrite;

/// Lines written per flush at most.
const MAX_BATCH: usize = 64;

/// Why a writer task stopped.
#[derive(Debug)]
pub(super) enum WriterExit {
    /// Every sender is gone; the session is finished.
    QueueClosed,
    /// The socket rejected a write.
    Failed(ProtocolError),
    /// A write did not complete within the configured timeout.
    TimedOut,
}

/// Drain `rx` into `sink` until the queue closes or a write fails.
pub(super) async fn run<W>(
    mut sink: FramedWrite<W, LineCodec>,
    mut rx: mpsc::Receiver<Arc<str>>,
    write_timeout: Duration,
) -> WriterExit
where
    W: AsyncWrite + Unpin,
{
    while let Some(first) = rx.recv().await {
        let mut written = 1;
        let write = async {
            sink.feed(first).await?;
            while written < MAX_BATCH {
                let Ok(line) = rx.try_recv() else { break };
                sink.feed(line).await?;
                written += 1;
            }
            SinkExt::<Arc<str>>::flush(&mut sink).await
        };

        let result = tokio::time::timeout(write_timeout, write).await;
        match result {
            Ok(Ok(())) => crate::metrics::record_sent(written),
            Ok(Err(e)) => return WriterExit::Failed(e),
            Err(_) => return WriterExit::TimedOut,
        }
    }

    WriterExit::QueueClosed
}
