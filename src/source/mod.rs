//! Data source abstraction for receiving topology snapshots.
//!
//! The gateway's data provider hands over complete snapshots; each one
//! triggers a fresh resolution pass in the viewer. Sources differ only in
//! how snapshots arrive (file polling, a network stream, an in-process
//! channel).

mod channel;
mod file;
mod stream;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use stream::StreamSource;

use std::fmt::Debug;

use topowatch_types::TopologySnapshot;

/// Trait for receiving topology snapshots from various sources.
///
/// # Example
///
/// ```
/// use topowatch::{FileSource, SnapshotSource};
///
/// let mut source = FileSource::new("topology.json");
/// if let Some(snapshot) = source.poll() {
///     println!("Got {} nodes", snapshot.len());
/// }
/// ```
pub trait SnapshotSource: Send + Debug {
    /// Poll for the latest snapshot.
    ///
    /// Returns `Some(snapshot)` if new data is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<TopologySnapshot>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Returns the error from the last poll, if any.
    fn error(&self) -> Option<&str>;
}
