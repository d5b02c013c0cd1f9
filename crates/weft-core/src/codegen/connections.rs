//! Port-level view of a graph
//!
//! The generator only asks two questions of a graph: what feeds a value
//! port, and where does a flow port lead. Both the baseline graph and the
//! graph a caller hands in are reduced to this view so they compare directly.

use std::collections::{HashMap, HashSet};

use crate::graph::{EdgeKind, Graph, GraphError, Handle, NodeData, WireEdge, WireNode, ids};

/// The output a value port reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub node: String,
    pub handle: Handle,
}

#[derive(Debug, Default)]
pub struct Connections {
    data: HashMap<(String, Handle), Source>,
    flow: HashMap<(String, Handle), String>,
}

impl Connections {
    /// Records an edge. A later edge into the same port replaces the earlier
    /// one, matching an editor that rewires a handle by appending.
    fn insert(&mut self, edge: &WireEdge) {
        match edge.edge_kind() {
            EdgeKind::Data => {
                self.data.insert(
                    (edge.target.clone(), edge.target_handle.clone()),
                    Source {
                        node: edge.source.clone(),
                        handle: edge.source_handle.clone(),
                    },
                );
            }
            EdgeKind::Flow => {
                self.flow.insert(
                    (edge.source.clone(), edge.source_handle.clone()),
                    edge.target.clone(),
                );
            }
            EdgeKind::Reference => {}
        }
    }

    pub fn input(&self, target: &str, handle: &Handle) -> Option<&Source> {
        self.data.get(&(target.to_string(), handle.clone()))
    }

    pub fn flow(&self, source: &str, handle: &Handle) -> Option<&str> {
        self.flow
            .get(&(source.to_string(), handle.clone()))
            .map(String::as_str)
    }

    /// Highest argument index wired into `target`, counting `arg-<n>` or
    /// `nested-arg-<n>` ports.
    pub fn last_argument(&self, target: &str, nested: bool) -> Option<usize> {
        self.data
            .keys()
            .filter(|(node, _)| node == target)
            .filter_map(|(_, handle)| match (handle, nested) {
                (Handle::Arg(i), false) | (Handle::NestedArg(i), true) => Some(*i),
                _ => None,
            })
            .max()
    }
}

/// Typed nodes by key plus their connections.
#[derive(Debug, Default)]
pub struct GraphView {
    nodes: HashMap<String, NodeData>,
    pub conns: Connections,
}

impl GraphView {
    pub fn from_graph(graph: &Graph) -> Self {
        let wire = graph.to_wire();
        let nodes = graph
            .nodes()
            .map(|node| (node.key.clone(), node.data.clone()))
            .collect();
        let mut conns = Connections::default();
        for edge in &wire.edges {
            conns.insert(edge);
        }
        Self { nodes, conns }
    }

    /// Builds the view of a caller's graph, skipping what cannot be used.
    pub fn from_wire(nodes: &[WireNode], edges: &[WireEdge]) -> (Self, Vec<GraphError>) {
        let mut view = Self::default();
        let mut problems = Vec::new();
        let mut seen = HashSet::new();

        for node in nodes {
            if !seen.insert(node.id.as_str()) {
                problems.push(GraphError::DuplicateNode(node.id.clone()));
                continue;
            }
            match node.node_data() {
                Some(data) => {
                    view.nodes.insert(node.id.clone(), data);
                }
                None => problems.push(GraphError::UnknownKind {
                    id: node.id.clone(),
                    kind: node.kind.clone(),
                }),
            }
        }

        for edge in edges {
            let missing = [&edge.source, &edge.target]
                .into_iter()
                .find(|id| !seen.contains(id.as_str()));
            if let Some(node) = missing {
                problems.push(GraphError::DanglingEdge {
                    edge: edge.id.clone(),
                    node: node.clone(),
                });
                continue;
            }
            match view.nested_target(edge) {
                Some(redirected) => view.conns.insert(&redirected),
                None => view.conns.insert(edge),
            }
        }

        (view, problems)
    }

    /// An edge into `arg-<i>-nested-arg-<j>` feeds argument `j` of the call
    /// node written as argument `i` of the target.
    fn nested_target(&self, edge: &WireEdge) -> Option<WireEdge> {
        let (outer, inner) = edge.target_handle.nested_argument()?;
        let outer = match self.nodes.get(&edge.target) {
            Some(NodeData::Variable(_)) => Handle::NestedArg(outer),
            _ => Handle::Arg(outer),
        };
        let mut edge = edge.clone();
        edge.target = ids::nested("call", &edge.target, &outer);
        edge.target_handle = Handle::Arg(inner);
        Some(edge)
    }

    pub fn node(&self, key: &str) -> Option<&NodeData> {
        self.nodes.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }
}
