//! Snapshot - a point-in-time view of the gateway topology.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::{EntityFacts, EntityFactsBuilder, EntityKind, MappingFacts, NodeKind, SchemaVersion};

/// A point-in-time snapshot of the gateway topology.
///
/// This is the top-level type handed over by the data provider on every
/// refresh. Nodes and edges are plain lists; group membership and
/// combiner sources refer to other nodes by id.
///
/// # Example
///
/// ```rust
/// use topowatch_types::TopologySnapshot;
///
/// let snapshot = TopologySnapshot::builder()
///     .adapter("modbus", |f| f.connected().started().mappings(1))
///     .gateway("edge", |f| f.connected().started())
///     .edge("modbus", "edge")
///     .build();
///
/// assert_eq!(snapshot.len(), 2);
/// // Serialize with serde (requires "serde" feature)
/// // let json = serde_json::to_string(&snapshot)?;
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TopologySnapshot {
    /// Schema version for forward compatibility.
    #[cfg_attr(feature = "serde", serde(default))]
    pub version: SchemaVersion,

    /// Unix timestamp in milliseconds when this snapshot was taken.
    #[cfg_attr(feature = "serde", serde(default))]
    pub timestamp_ms: u64,

    #[cfg_attr(feature = "serde", serde(default))]
    pub nodes: Vec<Node>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub edges: Vec<Edge>,
}

impl TopologySnapshot {
    /// Create a new, empty snapshot with the current timestamp.
    #[cfg(feature = "std")]
    pub fn new() -> Self {
        Self::with_timestamp(current_timestamp_ms())
    }

    /// Create a new, empty snapshot with a specific timestamp.
    pub fn with_timestamp(timestamp_ms: u64) -> Self {
        Self {
            version: SchemaVersion::current(),
            timestamp_ms,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Create a builder for constructing snapshots.
    pub fn builder() -> TopologySnapshotBuilder {
        TopologySnapshotBuilder::new()
    }

    /// Check if the snapshot is empty (no nodes).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes in the snapshot.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Find the first node with the given id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

#[cfg(feature = "std")]
impl Default for TopologySnapshot {
    fn default() -> Self {
        Self::new()
    }
}

/// A graph vertex.
///
/// Deserialization is tolerant: a missing or mistyped payload yields
/// default facts, and an unrecognized `type` yields [`NodeData::Unknown`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "crate::wire::WireNode"))]
pub struct Node {
    pub id: String,

    /// Human-readable name, if different from the id.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub label: Option<String>,

    #[cfg_attr(feature = "serde", serde(flatten))]
    pub data: NodeData,
}

impl Node {
    /// Create a node with no label.
    pub fn new(id: impl Into<String>, data: NodeData) -> Self {
        Self {
            id: id.into(),
            label: None,
            data,
        }
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The node's kind.
    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    /// Label if present, otherwise the id.
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    /// Ids of the nodes this node's status is derived from.
    ///
    /// Group children for groups, source nodes for combiners and asset
    /// mappers, empty for entities.
    pub fn member_ids(&self) -> &[String] {
        match &self.data {
            NodeData::Group(group) => &group.children_node_ids,
            NodeData::Combiner(composite) | NodeData::AssetMapper(composite) => {
                &composite.source_node_ids
            }
            _ => &[],
        }
    }
}

/// Per-kind node payload.
///
/// Serialized as `{"type": "...", "data": {...}}` next to the node id.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum NodeData {
    Adapter(EntityFacts),
    Bridge(EntityFacts),
    Device(EntityFacts),
    TopicFilter(EntityFacts),
    ClientFilter(EntityFacts),
    Gateway(EntityFacts),
    Host(EntityFacts),
    /// Read from either `GROUP` or `CLUSTER`.
    Group(GroupData),
    Combiner(CompositeData),
    AssetMapper(CompositeData),
    Unknown(UnknownNode),
}

impl NodeData {
    /// Build an entity payload of the given kind.
    pub fn entity(kind: EntityKind, facts: EntityFacts) -> Self {
        match kind {
            EntityKind::Adapter => NodeData::Adapter(facts),
            EntityKind::Bridge => NodeData::Bridge(facts),
            EntityKind::Device => NodeData::Device(facts),
            EntityKind::TopicFilter => NodeData::TopicFilter(facts),
            EntityKind::ClientFilter => NodeData::ClientFilter(facts),
            EntityKind::Gateway => NodeData::Gateway(facts),
            EntityKind::Host => NodeData::Host(facts),
        }
    }

    /// The node kind of this payload.
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Adapter(_) => NodeKind::Adapter,
            NodeData::Bridge(_) => NodeKind::Bridge,
            NodeData::Device(_) => NodeKind::Device,
            NodeData::TopicFilter(_) => NodeKind::TopicFilter,
            NodeData::ClientFilter(_) => NodeKind::ClientFilter,
            NodeData::Gateway(_) => NodeKind::Gateway,
            NodeData::Host(_) => NodeKind::Host,
            NodeData::Group(_) => NodeKind::Group,
            NodeData::Combiner(_) => NodeKind::Combiner,
            NodeData::AssetMapper(_) => NodeKind::AssetMapper,
            NodeData::Unknown(_) => NodeKind::Unknown,
        }
    }

    /// The entity kind and facts, for classified (non-composite) nodes.
    pub fn as_entity(&self) -> Option<(EntityKind, &EntityFacts)> {
        match self {
            NodeData::Adapter(f) => Some((EntityKind::Adapter, f)),
            NodeData::Bridge(f) => Some((EntityKind::Bridge, f)),
            NodeData::Device(f) => Some((EntityKind::Device, f)),
            NodeData::TopicFilter(f) => Some((EntityKind::TopicFilter, f)),
            NodeData::ClientFilter(f) => Some((EntityKind::ClientFilter, f)),
            NodeData::Gateway(f) => Some((EntityKind::Gateway, f)),
            NodeData::Host(f) => Some((EntityKind::Host, f)),
            NodeData::Group(_)
            | NodeData::Combiner(_)
            | NodeData::AssetMapper(_)
            | NodeData::Unknown(_) => None,
        }
    }
}

/// Payload of a group/cluster node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct GroupData {
    pub children_node_ids: Vec<String>,
}

/// Payload of a node whose type was not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct UnknownNode {
    /// The `type` as it appeared on the wire, if it was a string.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub type_name: Option<String>,
}

/// Payload of a combiner or asset mapper node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct CompositeData {
    /// Nodes whose data this entity combines.
    pub source_node_ids: Vec<String>,
    /// The entity's own combining mappings.
    pub mappings: MappingFacts,
}

/// Which endpoint of an edge defines its rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EdgeEndpoint {
    #[default]
    Source,
    Target,
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub status_from: EdgeEndpoint,
}

impl Edge {
    /// Create an edge styled by its source node, with id `source->target`.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("{}->{}", source, target),
            source,
            target,
            status_from: EdgeEndpoint::Source,
        }
    }

    /// Style this edge from its target node instead.
    pub fn from_target(mut self) -> Self {
        self.status_from = EdgeEndpoint::Target;
        self
    }

    /// Id of the node whose status defines this edge's rendering.
    pub fn status_node(&self) -> &str {
        match self.status_from {
            EdgeEndpoint::Source => &self.source,
            EdgeEndpoint::Target => &self.target,
        }
    }
}

/// Builder for constructing `TopologySnapshot` instances.
#[derive(Debug)]
pub struct TopologySnapshotBuilder {
    timestamp_ms: Option<u64>,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl TopologySnapshotBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            timestamp_ms: None,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Set a specific timestamp (milliseconds since Unix epoch).
    pub fn timestamp_ms(mut self, ts: u64) -> Self {
        self.timestamp_ms = Some(ts);
        self
    }

    /// Add an entity node with facts built using a closure.
    pub fn entity<F>(mut self, kind: EntityKind, id: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(EntityFactsBuilder) -> EntityFactsBuilder,
    {
        let facts = f(EntityFactsBuilder::new()).build();
        self.nodes.push(Node::new(id, NodeData::entity(kind, facts)));
        self
    }

    /// Add a protocol adapter.
    pub fn adapter<F>(self, id: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(EntityFactsBuilder) -> EntityFactsBuilder,
    {
        self.entity(EntityKind::Adapter, id, f)
    }

    /// Add a bridge.
    pub fn bridge<F>(self, id: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(EntityFactsBuilder) -> EntityFactsBuilder,
    {
        self.entity(EntityKind::Bridge, id, f)
    }

    /// Add a device.
    pub fn device<F>(self, id: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(EntityFactsBuilder) -> EntityFactsBuilder,
    {
        self.entity(EntityKind::Device, id, f)
    }

    /// Add the edge gateway node.
    pub fn gateway<F>(self, id: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(EntityFactsBuilder) -> EntityFactsBuilder,
    {
        self.entity(EntityKind::Gateway, id, f)
    }

    /// Add a group whose children are the given node ids.
    pub fn group<I, S>(mut self, id: impl Into<String>, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let data = GroupData {
            children_node_ids: children.into_iter().map(Into::into).collect(),
        };
        self.nodes.push(Node::new(id, NodeData::Group(data)));
        self
    }

    /// Add a combiner over the given source node ids.
    pub fn combiner<I, S>(mut self, id: impl Into<String>, sources: I, mappings: MappingFacts) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let data = CompositeData {
            source_node_ids: sources.into_iter().map(Into::into).collect(),
            mappings,
        };
        self.nodes.push(Node::new(id, NodeData::Combiner(data)));
        self
    }

    /// Add a pre-built node.
    pub fn node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Add an edge styled by its source node.
    pub fn edge(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.edges.push(Edge::new(source, target));
        self
    }

    /// Add a pre-built edge.
    pub fn edge_with(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    /// Build the snapshot.
    #[cfg(feature = "std")]
    pub fn build(self) -> TopologySnapshot {
        TopologySnapshot {
            version: SchemaVersion::current(),
            timestamp_ms: self.timestamp_ms.unwrap_or_else(current_timestamp_ms),
            nodes: self.nodes,
            edges: self.edges,
        }
    }

    /// Build the snapshot with a specific timestamp (for no_std).
    #[cfg(not(feature = "std"))]
    pub fn build(self) -> TopologySnapshot {
        TopologySnapshot {
            version: SchemaVersion::current(),
            timestamp_ms: self.timestamp_ms.unwrap_or(0),
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}

impl Default for TopologySnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Get current timestamp in milliseconds since Unix epoch.
#[cfg(feature = "std")]
fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConnectionState, RuntimeState};

    #[test]
    fn test_snapshot_builder() {
        let snapshot = TopologySnapshot::builder()
            .timestamp_ms(1703160000000)
            .adapter("a1", |f| f.connected().started().mappings(1))
            .bridge("b1", |f| f.connection(ConnectionState::Error))
            .group("g1", ["a1", "b1"])
            .combiner("c1", ["a1"], MappingFacts::enabled(2))
            .edge("g1", "edge")
            .build();

        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot.timestamp_ms, 1703160000000);
        assert_eq!(snapshot.node("g1").unwrap().member_ids(), ["a1", "b1"]);
        assert_eq!(snapshot.node("c1").unwrap().member_ids(), ["a1"]);
        assert!(snapshot.node("a1").unwrap().member_ids().is_empty());
        assert_eq!(snapshot.edges[0].id, "g1->edge");
    }

    #[test]
    fn test_snapshot_version() {
        let snapshot = TopologySnapshot::builder().build();
        assert!(snapshot.version.is_compatible());
        assert!(snapshot.is_empty());
    }

    #[test]
    fn edge_status_node_follows_endpoint() {
        let edge = Edge::new("device", "adapter");
        assert_eq!(edge.status_node(), "device");
        assert_eq!(edge.from_target().status_node(), "adapter");
    }

    #[test]
    fn node_display_name_prefers_label() {
        let node = Node::new("opcua-1", NodeData::Adapter(EntityFacts::new()));
        assert_eq!(node.display_name(), "opcua-1");
        assert_eq!(node.with_label("OPC UA").display_name(), "OPC UA");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_snapshot() {
        let json = r#"{
            "nodes": [
                {"id": "a1", "type": "ADAPTER", "data": {"connection": "CONNECTED", "runtime": "STARTED", "mappings": {"enabled": 2}}},
                {"id": "g1", "label": "Line 1", "type": "CLUSTER", "data": {"childrenNodeIds": ["a1", "ghost"]}},
                {"id": "c1", "type": "COMBINER", "data": {"sourceNodeIds": ["a1"]}}
            ],
            "edges": [
                {"id": "e1", "source": "g1", "target": "edge"},
                {"id": "e2", "source": "plc", "target": "a1", "statusFrom": "target"}
            ]
        }"#;

        let snapshot: TopologySnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.version, SchemaVersion::current());
        assert_eq!(snapshot.len(), 3);

        let adapter = snapshot.node("a1").unwrap();
        let (kind, facts) = adapter.data.as_entity().unwrap();
        assert_eq!(kind, EntityKind::Adapter);
        assert_eq!(facts.connection, Some(ConnectionState::Connected));
        assert_eq!(facts.mappings.enabled, 2);

        let group = snapshot.node("g1").unwrap();
        assert_eq!(group.kind(), NodeKind::Group);
        assert_eq!(group.display_name(), "Line 1");
        assert_eq!(group.member_ids(), ["a1", "ghost"]);

        let combiner = snapshot.node("c1").unwrap();
        assert_eq!(combiner.kind(), NodeKind::Combiner);
        assert_eq!(combiner.member_ids(), ["a1"]);

        assert_eq!(snapshot.edges[0].status_from, EdgeEndpoint::Source);
        assert_eq!(snapshot.edges[1].status_node(), "a1");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let snapshot = TopologySnapshot::builder()
            .timestamp_ms(1703160000000)
            .adapter("a1", |f| f.connected().started().mappings(1).message("fine"))
            .group("g1", ["a1"])
            .edge("g1", "edge")
            .build();

        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: TopologySnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(snapshot, parsed);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn malformed_nodes_do_not_reject_the_snapshot() {
        let json = r#"{
            "nodes": [
                {"id": "ok", "type": "ADAPTER", "data": {"connection": "CONNECTED", "runtime": "STARTED"}},
                {"id": "no-data", "type": "ADAPTER"},
                {"id": "null-data", "type": "BRIDGE", "data": null},
                {"id": "numeric", "type": "DEVICE", "data": {"connection": 7, "runtime": true}},
                {"id": "null-mappings", "type": "COMBINER", "data": {"sourceNodeIds": ["ok", 3], "mappings": null}},
                {"id": "bad-children", "type": "GROUP", "data": {"childrenNodeIds": "ok"}},
                {"id": "future", "type": "PIPELINE", "data": {"stages": 4}},
                {"id": "untyped"}
            ]
        }"#;

        let snapshot: TopologySnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.len(), 8);

        let (_, facts) = snapshot.node("ok").unwrap().data.as_entity().unwrap();
        assert_eq!(facts.connection, Some(ConnectionState::Connected));

        for id in ["no-data", "null-data"] {
            let (_, facts) = snapshot.node(id).unwrap().data.as_entity().unwrap();
            assert_eq!(facts, &EntityFacts::default());
        }

        let (kind, facts) = snapshot.node("numeric").unwrap().data.as_entity().unwrap();
        assert_eq!(kind, EntityKind::Device);
        assert_eq!(facts.connection, Some(ConnectionState::Unknown));
        assert_eq!(facts.runtime, Some(RuntimeState::Unknown));

        let combiner = snapshot.node("null-mappings").unwrap();
        assert_eq!(combiner.member_ids(), ["ok"]);
        assert!(matches!(
            &combiner.data,
            NodeData::Combiner(c) if c.mappings == MappingFacts::default()
        ));

        assert!(snapshot.node("bad-children").unwrap().member_ids().is_empty());

        let future = snapshot.node("future").unwrap();
        assert_eq!(future.kind(), NodeKind::Unknown);
        assert_eq!(
            future.data,
            NodeData::Unknown(UnknownNode {
                type_name: Some("PIPELINE".into())
            })
        );
        assert_eq!(
            snapshot.node("untyped").unwrap().data,
            NodeData::Unknown(UnknownNode::default())
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn unknown_nodes_keep_their_type_name() {
        let json = r#"{"nodes": [{"id": "p", "type": "PIPELINE"}]}"#;
        let snapshot: TopologySnapshot = serde_json::from_str(json).unwrap();

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains(r#""type":"UNKNOWN""#));
        let reparsed: TopologySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, reparsed);
    }
}
