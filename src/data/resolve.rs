//! Graph-wide status resolution.
//!
//! Leaves are classified from their own facts; groups and combiners are
//! aggregated over their members, deepest first. Nodes on a membership
//! cycle resolve to `Inactive`/`Inactive` and are reported as diagnostics.

use std::collections::HashMap;

use topowatch_types::{
    Node, NodeData, NodeKind, OperationalStatus, RuntimeStatus, StatusModel, StatusSource,
    TopologySnapshot,
};

use super::aggregate::{aggregate, aggregate_composite};
use super::classify::classify;
use super::diagnostic::Diagnostic;
use super::membership::Membership;

/// A node with its resolved status.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedNode {
    pub id: String,
    pub label: Option<String>,
    pub data: NodeData,
    pub status: StatusModel,
    /// Ids of existing members (group children or combiner sources).
    pub members: Vec<String>,
}

impl ResolvedNode {
    /// The node's kind.
    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    /// Label if present, otherwise the id.
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

/// The output of one resolution pass.
///
/// Owns all of its data, so it never aliases the snapshot it was built from.
#[derive(Debug, Clone, Default)]
pub struct ResolvedGraph {
    /// Nodes in snapshot order, each with a status.
    pub nodes: Vec<ResolvedNode>,
    pub diagnostics: Vec<Diagnostic>,
    index: HashMap<String, usize>,
}

impl ResolvedGraph {
    /// Find a node by id (first occurrence for duplicated ids).
    pub fn node(&self, id: &str) -> Option<&ResolvedNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Resolved status of a node.
    pub fn status(&self, id: &str) -> Option<&StatusModel> {
        self.node(id).map(|n| &n.status)
    }

    /// Returns true if any cycle was detected.
    pub fn has_cycles(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::CyclicMembership { .. }))
    }
}

/// Status of cyclic nodes and of composites with nothing to derive from.
const INACTIVE_DERIVED: StatusModel =
    StatusModel::derived(RuntimeStatus::Inactive, OperationalStatus::Inactive);

/// Resolve a status for every node in the snapshot.
pub fn resolve(snapshot: &TopologySnapshot) -> ResolvedGraph {
    let nodes = &snapshot.nodes;
    let membership = Membership::build(nodes);
    let mut diagnostics = Vec::new();
    let mut statuses: Vec<Option<StatusModel>> = vec![None; nodes.len()];

    for &i in membership.duplicates() {
        tracing::warn!(node = %nodes[i].id, "duplicate node id");
        diagnostics.push(Diagnostic::DuplicateNode {
            id: nodes[i].id.clone(),
        });
    }

    for (parent, member) in membership.missing() {
        tracing::debug!(parent = %nodes[*parent].id, member = %member, "skipping missing member");
        diagnostics.push(Diagnostic::MissingMember {
            parent: nodes[*parent].id.clone(),
            member: member.clone(),
        });
    }

    for cycle in membership.cycles() {
        let members: Vec<String> = cycle.iter().map(|&i| nodes[i].id.clone()).collect();
        tracing::warn!(members = ?members, "cyclic membership, resolving as inactive");
        for &i in &cycle {
            statuses[i] = Some(INACTIVE_DERIVED);
        }
        diagnostics.push(Diagnostic::CyclicMembership { members });
    }

    let malformed = nodes
        .iter()
        .filter(|n| n.data.as_entity().is_some_and(|(_, f)| f.is_malformed()));
    for node in malformed {
        tracing::debug!(node = %node.id, "unrecognized entity state");
        diagnostics.push(Diagnostic::UnrecognizedState {
            node: node.id.clone(),
        });
    }

    for node in nodes {
        if let NodeData::Unknown(unknown) = &node.data {
            tracing::debug!(node = %node.id, type_name = ?unknown.type_name, "unrecognized node type");
            diagnostics.push(Diagnostic::UnrecognizedType {
                node: node.id.clone(),
                type_name: unknown.type_name.clone(),
            });
        }
    }

    for i in 0..nodes.len() {
        resolve_node(i, nodes, &membership, &mut statuses);
    }

    let resolved = nodes
        .iter()
        .zip(statuses)
        .enumerate()
        .map(|(i, (node, status))| ResolvedNode {
            id: node.id.clone(),
            label: node.label.clone(),
            data: node.data.clone(),
            status: status.unwrap_or_else(|| resolve_fallback(node)),
            members: membership
                .members(i)
                .iter()
                .map(|&m| nodes[m].id.clone())
                .collect(),
        })
        .collect();

    let index = nodes
        .iter()
        .enumerate()
        .filter_map(|(i, node)| {
            (membership.index_of(&node.id) == Some(i)).then(|| (node.id.clone(), i))
        })
        .collect();

    ResolvedGraph {
        nodes: resolved,
        diagnostics,
        index,
    }
}

/// Post-order resolution with memoization.
///
/// Cyclic nodes are pre-filled before this runs, so the walk only ever
/// descends through acyclic membership and always terminates.
fn resolve_node(
    i: usize,
    nodes: &[Node],
    membership: &Membership,
    statuses: &mut [Option<StatusModel>],
) -> StatusModel {
    if let Some(status) = statuses[i] {
        return status;
    }

    let status = match &nodes[i].data {
        NodeData::Group(_) => {
            let children: Vec<StatusModel> = membership
                .members(i)
                .iter()
                .map(|&m| resolve_node(m, nodes, membership, statuses))
                .collect();
            aggregate(&children)
        }
        NodeData::Combiner(composite) | NodeData::AssetMapper(composite) => {
            let sources: Vec<StatusModel> = membership
                .members(i)
                .iter()
                .map(|&m| resolve_node(m, nodes, membership, statuses))
                .collect();
            aggregate_composite(&sources, &composite.mappings)
        }
        data => match data.as_entity() {
            Some((kind, facts)) => classify(kind, facts),
            None => resolve_fallback(&nodes[i]),
        },
    };

    statuses[i] = Some(status);
    status
}

fn resolve_fallback(node: &Node) -> StatusModel {
    match &node.data {
        NodeData::Unknown(_) => StatusModel::inactive(StatusSource::Unknown),
        data => match data.as_entity() {
            Some((kind, _)) => StatusModel::inactive(kind.into()),
            None => INACTIVE_DERIVED,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topowatch_types::{
        ConnectionState, MappingFacts, OperationalStatus as Op, RuntimeStatus as Rt, UnknownNode,
    };

    #[test]
    fn every_node_gets_a_status() {
        let snapshot = TopologySnapshot::builder()
            .adapter("a1", |f| f.connected().started().mappings(1))
            .bridge("b1", |f| f)
            .group("g1", ["a1", "b1"])
            .gateway("edge", |f| f.connected().started())
            .build();
        let graph = resolve(&snapshot);

        assert_eq!(graph.nodes.len(), 4);
        assert!(graph.diagnostics.is_empty());
        for node in &snapshot.nodes {
            assert!(graph.status(&node.id).is_some(), "{} unresolved", node.id);
        }
    }

    #[test]
    fn leaves_are_classified_groups_are_derived() {
        let snapshot = TopologySnapshot::builder()
            .adapter("a1", |f| f.connected().started().mappings(1))
            .group("g1", ["a1"])
            .build();
        let graph = resolve(&snapshot);

        assert_eq!(graph.status("a1").unwrap().source, StatusSource::Adapter);
        assert_eq!(
            graph.status("g1"),
            Some(&StatusModel::derived(Rt::Active, Op::Active))
        );
    }

    #[test]
    fn group_of_two_adapters_one_erroring() {
        let snapshot = TopologySnapshot::builder()
            .adapter("adapter1", |f| f.connected().started().mappings(1))
            .adapter("adapter2", |f| {
                f.connection(ConnectionState::Error).started().mappings(1)
            })
            .group("group", ["adapter1", "adapter2"])
            .build();
        let graph = resolve(&snapshot);

        let group = graph.status("group").unwrap();
        assert_eq!(group.runtime, Rt::Error);
        assert_eq!(group.operational, Op::Active);
    }

    #[test]
    fn error_propagates_through_nested_groups() {
        let snapshot = TopologySnapshot::builder()
            .group("g1", ["g2", "ok"])
            .adapter("ok", |f| f.connected().started().mappings(1))
            .group("g2", ["g3"])
            .group("g3", ["broken"])
            .adapter("broken", |f| f.connection(ConnectionState::Error))
            .build();
        let graph = resolve(&snapshot);

        assert_eq!(graph.status("g3").unwrap().runtime, Rt::Error);
        assert_eq!(graph.status("g2").unwrap().runtime, Rt::Error);
        assert_eq!(graph.status("g1").unwrap().runtime, Rt::Error);
        assert_eq!(graph.status("g1").unwrap().operational, Op::Active);
    }

    #[test]
    fn missing_children_are_skipped() {
        let snapshot = TopologySnapshot::builder()
            .adapter("a1", |f| f.connected().started())
            .group("g1", ["a1", "ghost"])
            .build();
        let graph = resolve(&snapshot);

        assert_eq!(
            graph.status("g1"),
            Some(&StatusModel::derived(Rt::Active, Op::Inactive))
        );
        assert_eq!(graph.node("g1").unwrap().members, vec!["a1"]);
        assert_eq!(
            graph.diagnostics,
            vec![Diagnostic::MissingMember {
                parent: "g1".into(),
                member: "ghost".into(),
            }]
        );
    }

    #[test]
    fn empty_group_is_inactive() {
        let snapshot = TopologySnapshot::builder().group("g1", Vec::<String>::new()).build();
        let graph = resolve(&snapshot);
        assert_eq!(
            graph.status("g1"),
            Some(&StatusModel::derived(Rt::Inactive, Op::Inactive))
        );
    }

    #[test]
    fn cyclic_groups_resolve_inactive_and_are_reported() {
        let snapshot = TopologySnapshot::builder()
            .adapter("a1", |f| f.connection(ConnectionState::Error))
            .group("g1", ["g2", "a1"])
            .group("g2", ["g1"])
            .group("outer", ["g1", "a2"])
            .adapter("a2", |f| f.connected().started().mappings(1))
            .build();
        let graph = resolve(&snapshot);

        let inactive = StatusModel::derived(Rt::Inactive, Op::Inactive);
        assert_eq!(graph.status("g1"), Some(&inactive));
        assert_eq!(graph.status("g2"), Some(&inactive));
        // The parent aggregates over the safe default, not the error behind it.
        assert_eq!(
            graph.status("outer"),
            Some(&StatusModel::derived(Rt::Active, Op::Active))
        );
        assert!(graph.has_cycles());
        assert!(graph.diagnostics.contains(&Diagnostic::CyclicMembership {
            members: vec!["g1".into(), "g2".into()],
        }));
    }

    #[test]
    fn self_referencing_group_does_not_recurse() {
        let snapshot = TopologySnapshot::builder().group("g1", ["g1"]).build();
        let graph = resolve(&snapshot);
        assert_eq!(
            graph.status("g1"),
            Some(&StatusModel::derived(Rt::Inactive, Op::Inactive))
        );
        assert!(graph.has_cycles());
    }

    #[test]
    fn combiner_is_derived_from_sources_and_own_mappings() {
        let snapshot = TopologySnapshot::builder()
            .adapter("a1", |f| f.connected().started().mappings(1))
            .bridge("b1", |f| f.disconnected())
            .combiner("c1", ["a1", "b1"], MappingFacts::enabled(1))
            .combiner("c2", ["a1"], MappingFacts::default())
            .build();
        let graph = resolve(&snapshot);

        assert_eq!(
            graph.status("c1"),
            Some(&StatusModel::derived(Rt::Active, Op::Active))
        );
        assert_eq!(
            graph.status("c2"),
            Some(&StatusModel::derived(Rt::Active, Op::Inactive))
        );
    }

    #[test]
    fn duplicate_ids_are_reported_and_first_wins() {
        let snapshot = TopologySnapshot::builder()
            .adapter("a1", |f| f.connected().started().mappings(1))
            .adapter("a1", |f| f.connection(ConnectionState::Error))
            .group("g1", ["a1"])
            .build();
        let graph = resolve(&snapshot);

        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.status("a1").unwrap().runtime, Rt::Active);
        assert_eq!(graph.nodes[1].status.runtime, Rt::Error);
        assert_eq!(graph.status("g1").unwrap().runtime, Rt::Active);
        assert!(graph
            .diagnostics
            .contains(&Diagnostic::DuplicateNode { id: "a1".into() }));
    }

    #[test]
    fn malformed_facts_are_inactive_and_noted() {
        let snapshot = TopologySnapshot::builder()
            .adapter("a1", |f| f.connection(ConnectionState::Unknown).started())
            .build();
        let graph = resolve(&snapshot);

        assert_eq!(
            graph.status("a1"),
            Some(&StatusModel::inactive(StatusSource::Adapter))
        );
        assert_eq!(
            graph.diagnostics,
            vec![Diagnostic::UnrecognizedState { node: "a1".into() }]
        );
    }

    #[test]
    fn unknown_node_types_resolve_inactive() {
        let mut snapshot = TopologySnapshot::builder()
            .adapter("a1", |f| f.connected().started().mappings(1))
            .group("g1", ["a1", "p1"])
            .build();
        snapshot.nodes.push(Node::new(
            "p1",
            NodeData::Unknown(UnknownNode {
                type_name: Some("PIPELINE".into()),
            }),
        ));
        let graph = resolve(&snapshot);

        assert_eq!(
            graph.status("p1"),
            Some(&StatusModel::inactive(StatusSource::Unknown))
        );
        assert_eq!(
            graph.status("g1"),
            Some(&StatusModel::derived(Rt::Active, Op::Active))
        );
        assert_eq!(
            graph.diagnostics,
            vec![Diagnostic::UnrecognizedType {
                node: "p1".into(),
                type_name: Some("PIPELINE".into()),
            }]
        );
    }

    #[test]
    fn resolution_is_repeatable() {
        let snapshot = TopologySnapshot::builder()
            .adapter("a1", |f| f.connected().started().mappings(1))
            .group("g1", ["a1", "g2"])
            .group("g2", ["g1"])
            .build();
        let first = resolve(&snapshot);
        let second = resolve(&snapshot);

        assert_eq!(first.nodes, second.nodes);
        assert_eq!(first.diagnostics, second.diagnostics);
    }
}
