//! Channel-based data source.
//!
//! Receives topology snapshots via a tokio watch channel, for hosts that
//! embed the viewer and push snapshots in-process.

use tokio::sync::watch;
use topowatch_types::TopologySnapshot;

use super::SnapshotSource;

/// A data source that receives topology snapshots via a channel.
///
/// Only the latest snapshot matters, so a watch channel is used: a slow
/// viewer skips intermediate snapshots instead of queueing them.
///
/// # Example
///
/// ```
/// use topowatch::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("embedded");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<TopologySnapshot>,
    description: String,
    initial_returned: bool,
    last_error: Option<String>,
}

impl ChannelSource {
    /// Create a new channel source.
    pub fn new(receiver: watch::Receiver<TopologySnapshot>, source_description: &str) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
            initial_returned: false,
            last_error: None,
        }
    }

    /// Create a channel pair.
    ///
    /// Returns (sender, source); the sender pushes snapshots to the source.
    pub fn create(source_description: &str) -> (watch::Sender<TopologySnapshot>, Self) {
        let (tx, rx) = watch::channel(TopologySnapshot::default());
        (tx, Self::new(rx, source_description))
    }
}

impl SnapshotSource for ChannelSource {
    fn poll(&mut self) -> Option<TopologySnapshot> {
        if !self.initial_returned {
            self.initial_returned = true;
            self.receiver.mark_changed();
        }

        match self.receiver.has_changed() {
            Ok(true) => Some(self.receiver.borrow_and_update().clone()),
            Ok(false) => None,
            Err(_) => {
                self.last_error = Some("Sender dropped".to_string());
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_source_poll() {
        let (tx, mut source) = ChannelSource::create("test");

        // Initially returns the default (empty) snapshot
        let snapshot = source.poll().unwrap();
        assert!(snapshot.is_empty());

        assert!(source.poll().is_none());

        let snapshot = TopologySnapshot::builder()
            .adapter("a1", |f| f.connected().started())
            .build();
        tx.send(snapshot).unwrap();

        let snapshot = source.poll().unwrap();
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_channel_source_keeps_latest_only() {
        let (tx, mut source) = ChannelSource::create("test");
        let _ = source.poll();

        for id in ["a1", "a2", "a3"] {
            tx.send(TopologySnapshot::builder().adapter(id, |f| f).build())
                .unwrap();
        }

        let snapshot = source.poll().unwrap();
        assert!(snapshot.node("a3").is_some());
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_channel_source_sender_dropped() {
        let (tx, mut source) = ChannelSource::create("test");
        let _ = source.poll();
        drop(tx);

        assert!(source.poll().is_none());
        assert_eq!(source.error(), Some("Sender dropped"));
        assert_eq!(source.description(), "channel: test");
    }
}
