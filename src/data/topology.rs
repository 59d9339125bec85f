//! Resolved topology ready for display.
//!
//! Every refresh turns a raw [`TopologySnapshot`] into a fresh
//! [`TopologyData`]: node statuses, styled edges and diagnostics.

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use topowatch_types::{OperationalStatus, RuntimeStatus, TopologySnapshot};

use super::diagnostic::Diagnostic;
use super::render::{map_edges, RenderedEdge};
use super::resolve::{resolve, ResolvedGraph, ResolvedNode};

/// Node counts per status, for the header line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: usize,
    pub runtime_active: usize,
    pub runtime_error: usize,
    pub operational_active: usize,
    pub operational_error: usize,
}

/// One resolution pass over a snapshot.
#[derive(Debug, Clone)]
pub struct TopologyData {
    pub graph: ResolvedGraph,
    pub edges: Vec<RenderedEdge>,
    /// Provider timestamp of the snapshot (ms since epoch).
    pub timestamp_ms: u64,
    pub last_updated: Instant,
}

impl TopologyData {
    /// Load and resolve a topology from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse and resolve a topology from a JSON string.
    pub fn parse(content: &str) -> Result<Self> {
        let snapshot: TopologySnapshot =
            serde_json::from_str(content).context("invalid topology snapshot")?;
        Ok(Self::from_snapshot(&snapshot))
    }

    /// Resolve a snapshot.
    ///
    /// The snapshot is only read; the result owns everything it holds.
    pub fn from_snapshot(snapshot: &TopologySnapshot) -> Self {
        if !snapshot.version.is_compatible() {
            tracing::warn!(version = %snapshot.version, "snapshot schema version may be incompatible");
        }

        let graph = resolve(snapshot);
        let edges = map_edges(&snapshot.edges, &graph);

        tracing::debug!(
            nodes = graph.nodes.len(),
            edges = edges.len(),
            diagnostics = graph.diagnostics.len(),
            "resolved topology"
        );

        Self {
            graph,
            edges,
            timestamp_ms: snapshot.timestamp_ms,
            last_updated: Instant::now(),
        }
    }

    /// All resolved nodes, in snapshot order.
    pub fn nodes(&self) -> &[ResolvedNode] {
        &self.graph.nodes
    }

    /// Find a node by id.
    pub fn node(&self, id: &str) -> Option<&ResolvedNode> {
        self.graph.node(id)
    }

    /// Edges touching the given node, as source or target.
    pub fn incident_edges<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a RenderedEdge> {
        self.edges
            .iter()
            .filter(move |e| e.source == id || e.target == id)
    }

    /// Ids of the groups and combiners that list this node as a member.
    pub fn parents(&self, id: &str) -> Vec<&str> {
        self.graph
            .nodes
            .iter()
            .filter(|n| n.members.iter().any(|m| m == id))
            .map(|n| n.id.as_str())
            .collect()
    }

    /// Diagnostics, most severe first.
    pub fn diagnostics(&self) -> Vec<&Diagnostic> {
        let mut result: Vec<&Diagnostic> = self.graph.diagnostics.iter().collect();
        result.sort_by(|a, b| b.severity().cmp(&a.severity()));
        result
    }

    /// Per-status node counts.
    pub fn counts(&self) -> StatusCounts {
        self.graph
            .nodes
            .iter()
            .fold(StatusCounts::default(), |mut counts, node| {
                counts.total += 1;
                match node.status.runtime {
                    RuntimeStatus::Active => counts.runtime_active += 1,
                    RuntimeStatus::Error => counts.runtime_error += 1,
                    RuntimeStatus::Inactive => {}
                }
                match node.status.operational {
                    OperationalStatus::Active => counts.operational_active += 1,
                    OperationalStatus::Error => counts.operational_error += 1,
                    OperationalStatus::Inactive => {}
                }
                counts
            })
    }
}
