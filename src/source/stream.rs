//! Stream-based data source.
//!
//! Receives topology snapshots as newline-delimited JSON from an async
//! byte stream, typically a TCP connection to the data provider.

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use topowatch_types::TopologySnapshot;

use super::SnapshotSource;

type ErrorSlot = Arc<Mutex<Option<String>>>;

fn set_error(slot: &ErrorSlot, error: Option<String>) {
    if let Ok(mut guard) = slot.lock() {
        *guard = error;
    }
}

/// A data source that receives topology snapshots from an async stream.
///
/// A background task reads newline-delimited JSON from the reader and
/// makes snapshots available via `poll()`. Lines that fail to parse are
/// skipped and reported through `error()`.
///
/// # Example with a byte stream
///
/// ```
/// use std::io::Cursor;
/// use topowatch::StreamSource;
///
/// # tokio_test::block_on(async {
/// let data = b"{\"nodes\":[]}\n";
/// let stream = Cursor::new(data.to_vec());
/// let source = StreamSource::spawn(stream, "example");
/// # });
/// ```
#[derive(Debug)]
pub struct StreamSource {
    receiver: mpsc::Receiver<TopologySnapshot>,
    description: String,
    shared_error: ErrorSlot,
    /// Copy of the shared error, refreshed on every poll.
    last_error: Option<String>,
}

impl StreamSource {
    /// Spawn a background task that reads from the given async reader.
    ///
    /// Each line is parsed as a complete `TopologySnapshot`.
    pub fn spawn<R>(reader: R, description: &str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(16);
        let shared_error: ErrorSlot = Arc::new(Mutex::new(None));
        let error_handle = shared_error.clone();
        let desc = description.to_string();

        tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        tracing::info!(source = %desc, "stream closed");
                        set_error(&error_handle, Some("Connection closed".to_string()));
                        break;
                    }
                    Ok(_) if line.trim().is_empty() => {}
                    Ok(_) => match serde_json::from_str::<TopologySnapshot>(line.trim()) {
                        Ok(snapshot) => {
                            set_error(&error_handle, None);
                            if tx.send(snapshot).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            tracing::warn!(source = %desc, error = %e, "skipping malformed snapshot");
                            set_error(&error_handle, Some(format!("Parse error: {}", e)));
                        }
                    },
                    Err(e) => {
                        tracing::warn!(source = %desc, error = %e, "stream read failed");
                        set_error(&error_handle, Some(format!("Read error: {}", e)));
                        break;
                    }
                }
            }
        });

        Self {
            receiver: rx,
            description: format!("stream: {}", description),
            shared_error,
            last_error: None,
        }
    }

    /// Create a StreamSource from a channel of raw JSON payloads.
    ///
    /// Each message is one complete snapshot; no line framing is applied.
    pub fn from_bytes_channel(mut rx: mpsc::Receiver<Vec<u8>>, description: &str) -> Self {
        let (tx, snapshot_rx) = mpsc::channel(16);
        let shared_error: ErrorSlot = Arc::new(Mutex::new(None));
        let error_handle = shared_error.clone();

        tokio::spawn(async move {
            while let Some(bytes) = rx.recv().await {
                match serde_json::from_slice::<TopologySnapshot>(&bytes) {
                    Ok(snapshot) => {
                        set_error(&error_handle, None);
                        if tx.send(snapshot).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        set_error(&error_handle, Some(format!("Parse error: {}", e)));
                    }
                }
            }
        });

        Self {
            receiver: snapshot_rx,
            description: format!("stream: {}", description),
            shared_error,
            last_error: None,
        }
    }

    fn sync_error(&mut self) {
        if let Ok(guard) = self.shared_error.lock() {
            self.last_error = guard.clone();
        }
    }
}

impl SnapshotSource for StreamSource {
    fn poll(&mut self) -> Option<TopologySnapshot> {
        let result = match self.receiver.try_recv() {
            Ok(snapshot) => Some(snapshot),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                if let Ok(mut guard) = self.shared_error.lock() {
                    guard.get_or_insert_with(|| "Stream disconnected".to_string());
                }
                None
            }
        };
        self.sync_error();
        result
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
