//! File-based data source.
//!
//! Polls a JSON file for topology snapshots.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use topowatch_types::TopologySnapshot;

use super::SnapshotSource;

/// A data source that reads topology snapshots from a JSON file.
///
/// The source tracks the file's modification time and only returns
/// new data when the file has been updated.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
        }
    }

    /// Returns the path being watched.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    fn read_file(&mut self) -> Option<TopologySnapshot> {
        let result = fs::read_to_string(&self.path)
            .map_err(|e| format!("Read error: {}", e))
            .and_then(|content| {
                serde_json::from_str(&content).map_err(|e| format!("Parse error: {}", e))
            });

        match result {
            Ok(snapshot) => {
                self.last_error = None;
                Some(snapshot)
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to load snapshot");
                self.last_error = Some(e);
                None
            }
        }
    }
}

impl SnapshotSource for FileSource {
    fn poll(&mut self) -> Option<TopologySnapshot> {
        let current_modified = self.modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,
            // File disappeared, keep the last good data
            (Some(_), None) => false,
            (Some(last), Some(current)) => current > last,
        };

        if !file_changed {
            return None;
        }

        let snapshot = self.read_file()?;
        self.last_modified = current_modified;
        tracing::debug!(path = %self.path.display(), nodes = snapshot.len(), "loaded snapshot");
        Some(snapshot)
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
    use std::io::{Seek, Write};
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{
            "nodes": [
                {"id": "a1", "type": "ADAPTER", "data": {"connection": "CONNECTED", "runtime": "STARTED"}},
                {"id": "g1", "type": "GROUP", "data": {"childrenNodeIds": ["a1"]}}
            ],
            "edges": [{"id": "e1", "source": "a1", "target": "g1"}]
        }"#
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/topology.json");
        assert_eq!(source.path(), Path::new("/tmp/topology.json"));
        assert_eq!(source.description(), "file: /tmp/topology.json");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_poll_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());

        let snapshot = source.poll().unwrap();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.node("g1").is_some());

        // Unchanged file yields nothing new
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_file_source_detects_changes() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());
        let _ = source.poll();

        std::thread::sleep(std::time::Duration::from_millis(10));
        file.as_file().set_len(0).unwrap();
        file.rewind().unwrap();
        writeln!(
            file,
            r#"{{"nodes": [{{"id": "b1", "type": "BRIDGE", "data": {{}}}}]}}"#
        )
        .unwrap();
        file.flush().unwrap();

        // May be flaky on filesystems with coarse mtime resolution
        if let Some(snapshot) = source.poll() {
            assert!(snapshot.node("b1").is_some());
        }
    }

    #[test]
    fn test_file_source_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/topology.json");

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Read error"));
    }

    #[test]
    fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let mut source = FileSource::new(file.path());

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Parse error"));
    }
}
