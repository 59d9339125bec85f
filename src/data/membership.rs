//! Membership adjacency over a node arena.
//!
//! Group children and combiner sources are flat id lists on the wire.
//! [`Membership`] resolves them once into index lists so the resolver can
//! walk the graph without string lookups, and finds every node that sits
//! on a membership cycle.

use std::collections::HashMap;

use topowatch_types::Node;

/// Index-based view of "node -> nodes its status is derived from".
#[derive(Debug, Clone)]
pub struct Membership {
    /// id -> index of the first node carrying that id.
    index: HashMap<String, usize>,
    /// node index -> member node indices (existing members only).
    members: Vec<Vec<usize>>,
    /// Indices of nodes whose id was already taken by an earlier node.
    duplicates: Vec<usize>,
    /// (parent index, member id) for members that name no node.
    missing: Vec<(usize, String)>,
}

impl Membership {
    /// Build the adjacency for a node list.
    pub fn build(nodes: &[Node]) -> Self {
        let mut index: HashMap<String, usize> = HashMap::with_capacity(nodes.len());
        let mut duplicates = Vec::new();

        for (i, node) in nodes.iter().enumerate() {
            if index.contains_key(&node.id) {
                duplicates.push(i);
            } else {
                index.insert(node.id.clone(), i);
            }
        }

        let mut missing = Vec::new();
        let members = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                node.member_ids()
                    .iter()
                    .filter_map(|id| match index.get(id) {
                        Some(&member) => Some(member),
                        None => {
                            missing.push((i, id.clone()));
                            None
                        }
                    })
                    .collect()
            })
            .collect();

        Self {
            index,
            members,
            duplicates,
            missing,
        }
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the arena has no nodes.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Index of the node that owns `id`.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Existing members of the node at `node`.
    pub fn members(&self, node: usize) -> &[usize] {
        &self.members[node]
    }

    /// Nodes whose id was shadowed by an earlier node.
    pub fn duplicates(&self) -> &[usize] {
        &self.duplicates
    }

    /// Member references that name no node.
    pub fn missing(&self) -> &[(usize, String)] {
        &self.missing
    }

    /// Every membership cycle, as groups of node indices.
    ///
    /// A cycle is a strongly connected component with more than one node,
    /// or a single node that lists itself. Each component is returned in
    /// ascending index order, and components are ordered by their first
    /// index, so the result does not depend on traversal order.
    pub fn cycles(&self) -> Vec<Vec<usize>> {
        let mut tarjan = Tarjan::new(&self.members);
        for node in 0..self.len() {
            if tarjan.order[node].is_none() {
                tarjan.visit(node);
            }
        }

        let mut cycles: Vec<Vec<usize>> = tarjan
            .components
            .into_iter()
            .filter(|component| match component.as_slice() {
                [single] => self.members[*single].contains(single),
                _ => true,
            })
            .map(|mut component| {
                component.sort_unstable();
                component
            })
            .collect();
        cycles.sort_unstable_by_key(|component| component[0]);
        cycles
    }
}

/// Tarjan's strongly connected components over the member adjacency.
struct Tarjan<'g> {
    adjacency: &'g [Vec<usize>],
    /// Discovery order, `None` until visited.
    order: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    next: usize,
    components: Vec<Vec<usize>>,
}

impl<'g> Tarjan<'g> {
    fn new(adjacency: &'g [Vec<usize>]) -> Self {
        let n = adjacency.len();
        Self {
            adjacency,
            order: vec![None; n],
            lowlink: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::new(),
            next: 0,
            components: Vec::new(),
        }
    }

    fn visit(&mut self, v: usize) {
        self.order[v] = Some(self.next);
        self.lowlink[v] = self.next;
        self.next += 1;
        self.stack.push(v);
        self.on_stack[v] = true;

        let adjacency = self.adjacency;
        for &w in &adjacency[v] {
            match self.order[w] {
                None => {
                    self.visit(w);
                    self.lowlink[v] = self.lowlink[v].min(self.lowlink[w]);
                }
                Some(order) if self.on_stack[w] => {
                    self.lowlink[v] = self.lowlink[v].min(order);
                }
                Some(_) => {}
            }
        }

        if Some(self.lowlink[v]) == self.order[v] {
            let mut component = Vec::new();
            while let Some(w) = self.stack.pop() {
                self.on_stack[w] = false;
                component.push(w);
                if w == v {
                    break;
                }
            }
            self.components.push(component);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topowatch_types::TopologySnapshot;

    fn ids(snapshot: &TopologySnapshot, cycle: &[usize]) -> Vec<String> {
        cycle.iter().map(|&i| snapshot.nodes[i].id.clone()).collect()
    }

    #[test]
    fn tree_has_no_cycles() {
        let snapshot = TopologySnapshot::builder()
            .adapter("a1", |f| f)
            .adapter("a2", |f| f)
            .group("g2", ["a1"])
            .group("g1", ["g2", "a2"])
            .build();
        let membership = Membership::build(&snapshot.nodes);

        assert!(membership.cycles().is_empty());
        assert_eq!(membership.members(3), &[2, 1]);
        assert_eq!(membership.index_of("g2"), Some(2));
    }

    #[test]
    fn two_group_cycle_is_found() {
        let snapshot = TopologySnapshot::builder()
            .group("g1", ["g2"])
            .group("g2", ["g1"])
            .build();
        let membership = Membership::build(&snapshot.nodes);

        let cycles = membership.cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(ids(&snapshot, &cycles[0]), vec!["g1", "g2"]);
    }

    #[test]
    fn self_membership_is_a_cycle() {
        let snapshot = TopologySnapshot::builder()
            .adapter("a1", |f| f)
            .group("g1", ["g1", "a1"])
            .build();
        let membership = Membership::build(&snapshot.nodes);

        let cycles = membership.cycles();
        assert_eq!(cycles, vec![vec![1]]);
    }

    #[test]
    fn cross_edges_into_a_cycle_are_included() {
        // g1 <-> g2 and g1 -> g3 -> g2 -> g1: all three share one component,
        // whichever order the walk takes.
        let snapshot = TopologySnapshot::builder()
            .group("g1", ["g2", "g3"])
            .group("g2", ["g1"])
            .group("g3", ["g2"])
            .build();
        let membership = Membership::build(&snapshot.nodes);

        let cycles = membership.cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(ids(&snapshot, &cycles[0]), vec!["g1", "g2", "g3"]);
    }

    #[test]
    fn parent_of_cycle_is_not_itself_cyclic() {
        let snapshot = TopologySnapshot::builder()
            .group("outer", ["g1"])
            .group("g1", ["g2"])
            .group("g2", ["g1"])
            .build();
        let membership = Membership::build(&snapshot.nodes);

        let cycles = membership.cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(ids(&snapshot, &cycles[0]), vec!["g1", "g2"]);
    }

    #[test]
    fn missing_members_are_skipped_and_recorded() {
        let snapshot = TopologySnapshot::builder()
            .adapter("a1", |f| f)
            .group("g1", ["a1", "ghost"])
            .build();
        let membership = Membership::build(&snapshot.nodes);

        assert_eq!(membership.members(1), &[0]);
        assert_eq!(membership.missing(), &[(1, "ghost".to_string())]);
    }

    #[test]
    fn duplicate_ids_resolve_to_first_node() {
        let snapshot = TopologySnapshot::builder()
            .adapter("a1", |f| f.connected())
            .adapter("a1", |f| f.disconnected())
            .group("g1", ["a1"])
            .build();
        let membership = Membership::build(&snapshot.nodes);

        assert_eq!(membership.index_of("a1"), Some(0));
        assert_eq!(membership.duplicates(), &[1]);
        assert_eq!(membership.members(2), &[0]);
    }

    #[test]
    fn combiner_sources_participate() {
        let snapshot = TopologySnapshot::builder()
            .group("g1", ["c1"])
            .combiner("c1", ["g1"], Default::default())
            .build();
        let membership = Membership::build(&snapshot.nodes);

        assert_eq!(membership.cycles(), vec![vec![0, 1]]);
    }
}
