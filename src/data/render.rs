//! Edge rendering derived from resolved node statuses.
//!
//! Two channels, read independently: color follows runtime status,
//! animation follows operational status.

use serde::Serialize;
use topowatch_types::{Edge, OperationalStatus, RuntimeStatus, StatusModel};

use super::resolve::ResolvedGraph;

/// Semantic color of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorToken {
    Success,
    Error,
    Neutral,
}

impl ColorToken {
    /// Name shown alongside the color so it never carries meaning alone.
    pub fn name(&self) -> &'static str {
        match self {
            ColorToken::Success => "green",
            ColorToken::Error => "red",
            ColorToken::Neutral => "gray",
        }
    }
}

impl From<RuntimeStatus> for ColorToken {
    fn from(runtime: RuntimeStatus) -> Self {
        match runtime {
            RuntimeStatus::Error => ColorToken::Error,
            RuntimeStatus::Active => ColorToken::Success,
            RuntimeStatus::Inactive => ColorToken::Neutral,
        }
    }
}

/// Visual treatment of one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EdgeStyle {
    pub color: ColorToken,
    pub animated: bool,
}

impl EdgeStyle {
    /// Gray and static, used when the defining endpoint is unknown.
    pub const NEUTRAL: EdgeStyle = EdgeStyle {
        color: ColorToken::Neutral,
        animated: false,
    };

    /// Style for an edge whose defining endpoint has this status.
    pub fn from_status(status: &StatusModel) -> Self {
        Self {
            color: status.runtime.into(),
            animated: status.operational == OperationalStatus::Active,
        }
    }

    /// Text form of the style, e.g. `green, animated`.
    pub fn describe(&self) -> String {
        let motion = if self.animated { "animated" } else { "static" };
        format!("{}, {}", self.color.name(), motion)
    }
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// An edge ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    /// The endpoint that defines the style (`source` unless `statusFrom` is `target`).
    pub status_node: String,
    /// Status of `status_node`, if that node exists.
    pub status: Option<StatusModel>,
    pub style: EdgeStyle,
}

impl RenderedEdge {
    /// Runtime status of the defining endpoint.
    pub fn runtime(&self) -> Option<RuntimeStatus> {
        self.status.map(|s| s.runtime)
    }

    /// Operational status of the defining endpoint.
    pub fn operational(&self) -> Option<OperationalStatus> {
        self.status.map(|s| s.operational)
    }

    /// Accessible description combining both channels.
    pub fn describe(&self) -> String {
        match &self.status {
            Some(status) => format!(
                "{} -> {}: runtime {}, operational {} ({})",
                self.source,
                self.target,
                status.runtime,
                status.operational,
                self.style.describe()
            ),
            None => format!(
                "{} -> {}: no status ({})",
                self.source,
                self.target,
                self.style.describe()
            ),
        }
    }
}

/// Style a single edge against a resolved graph.
pub fn map_edge(edge: &Edge, graph: &ResolvedGraph) -> RenderedEdge {
    let status = graph.status(edge.status_node()).copied();
    if status.is_none() {
        tracing::trace!(edge = %edge.id, node = %edge.status_node(), "edge endpoint has no status");
    }
    RenderedEdge {
        id: edge.id.clone(),
        source: edge.source.clone(),
        target: edge.target.clone(),
        status_node: edge.status_node().to_string(),
        status,
        style: status
            .as_ref()
            .map(EdgeStyle::from_status)
            .unwrap_or(EdgeStyle::NEUTRAL),
    }
}

/// Style every edge, preserving input order.
pub fn map_edges(edges: &[Edge], graph: &ResolvedGraph) -> Vec<RenderedEdge> {
    edges.iter().map(|edge| map_edge(edge, graph)).collect()
}
