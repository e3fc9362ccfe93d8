//! JSON-lines bridge between a byte stream and the controller queues.
//!
//! Each input line is one tagged [`TaskEvent`]; each dispatched plan request
//! is written as one JSON line.

use std::io::BufRead;
use std::thread::{self, JoinHandle};

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use visit_core::PlanControl;

use crate::events::TaskEvent;

/// Forward decoded events from `reader` until EOF or the queue closes.
///
/// Blocking; must run outside the async runtime. Malformed lines are logged
/// and skipped. Returns the number of events forwarded.
pub fn read_events<R: BufRead>(reader: R, tx: mpsc::Sender<TaskEvent>) -> std::io::Result<usize> {
    let mut forwarded = 0;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event = match serde_json::from_str::<TaskEvent>(line) {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!("Ignoring malformed event {:?}: {}", line, err);
                continue;
            }
        };

        if tx.blocking_send(event).is_err() {
            tracing::debug!("Event queue closed, stopping reader");
            break;
        }
        forwarded += 1;
    }

    Ok(forwarded)
}

/// Run [`read_events`] on a dedicated OS thread.
///
/// A read blocked on an idle input cannot be cancelled, so callers should
/// not join the handle on shutdown; the thread ends with the process.
pub fn spawn_event_reader<R>(
    reader: R,
    tx: mpsc::Sender<TaskEvent>,
) -> std::io::Result<JoinHandle<std::io::Result<usize>>>
where
    R: BufRead + Send + 'static,
{
    thread::Builder::new()
        .name("event-reader".to_string())
        .spawn(move || read_events(reader, tx))
}

/// Write every plan request received on `rx` to `writer` as a JSON line.
pub async fn write_requests<W>(
    mut rx: mpsc::Receiver<PlanControl>,
    mut writer: W,
) -> anyhow::Result<usize>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;
    while let Some(request) = rx.recv().await {
        let mut line = serde_json::to_vec(&request)?;
        line.push(b'\n');
        writer.write_all(&line).await?;
        writer.flush().await?;
        written += 1;
    }
    Ok(written)
}
