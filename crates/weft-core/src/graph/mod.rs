//! Flow graph storage
//!
//! Nodes and scopes live in arenas and are addressed by typed ids; every node
//! additionally carries the stable string key it is known by on the wire.

pub mod handle;
pub mod ids;
pub mod node;
pub mod wire;

use std::collections::{HashMap, HashSet};

use id_arena::{Arena, Id};
use serde::{Deserialize, Serialize};

pub use handle::{EdgeKind, Handle};
pub use node::{
    CallData, CallSummary, ControlData, ExportData, ImportData, ImportSpecifierData, LabelData,
    LiteralData, LiteralType, LogicData, NodeData, NodeKind, SpecifierKind, SwitchData,
    VariableData,
};
pub use wire::{FlowGraph, GraphError, WireEdge, WireNode, WireScope};

pub type NodeId = Id<Node>;
pub type ScopeId = Id<Scope>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub key: String,
    pub scope: Option<ScopeId>,
    pub data: NodeData,
    pub position: Position,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }
}

/// A nested region opened by a node's branch handle.
#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub key: String,
    pub owner: NodeId,
    pub handle: Handle,
    pub label: String,
    pub parent: Option<ScopeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub key: String,
    pub source: NodeId,
    pub source_handle: Handle,
    pub target: NodeId,
    pub target_handle: Handle,
    pub kind: EdgeKind,
}

#[derive(Debug, Default)]
pub struct Graph {
    nodes: Arena<Node>,
    scopes: Arena<Scope>,
    edges: Vec<Edge>,
    by_key: HashMap<String, NodeId>,
    written_ports: HashSet<(NodeId, Handle)>,
    used_flow_ports: HashSet<(NodeId, Handle)>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node, or returns the existing one when `key` is already taken.
    pub fn add_node(&mut self, key: String, scope: Option<ScopeId>, data: NodeData) -> NodeId {
        if let Some(&existing) = self.by_key.get(&key) {
            tracing::trace!(key = %key, "node key already present");
            return existing;
        }
        let id = self.nodes.alloc_with_id(|id| Node {
            id,
            key: key.clone(),
            scope,
            data,
            position: Position::default(),
        });
        self.by_key.insert(key, id);
        id
    }

    pub fn add_scope(
        &mut self,
        owner: NodeId,
        handle: Handle,
        label: &str,
        parent: Option<ScopeId>,
    ) -> ScopeId {
        let key = ids::scope(&self.nodes[owner].key, &handle);
        self.scopes.alloc_with_id(|id| Scope {
            id,
            key,
            owner,
            handle,
            label: label.to_string(),
            parent,
        })
    }

    /// Adds an edge unless it would break a port invariant: a data input
    /// accepts one writer and a flow output leads to one node. The first
    /// edge wins; later ones are dropped.
    pub fn connect(
        &mut self,
        source: NodeId,
        source_handle: Handle,
        target: NodeId,
        target_handle: Handle,
        kind: EdgeKind,
    ) -> bool {
        let accepted = match kind {
            EdgeKind::Data => self.written_ports.insert((target, target_handle.clone())),
            EdgeKind::Flow => self.used_flow_ports.insert((source, source_handle.clone())),
            EdgeKind::Reference => !self
                .edges
                .iter()
                .any(|e| e.kind == EdgeKind::Reference && e.source == source && e.target == target),
        };

        let source_key = &self.nodes[source].key;
        let target_key = &self.nodes[target].key;

        if !accepted {
            tracing::trace!(
                source = %source_key,
                target = %target_key,
                handle = %target_handle,
                "dropping edge into an occupied port"
            );
            return false;
        }

        let key = match kind {
            EdgeKind::Reference if source_key == ids::RUNTIME => ids::native_reference(target_key),
            EdgeKind::Reference => ids::reference(source_key, target_key),
            _ => ids::edge(source_key, &source_handle, target_key, &target_handle),
        };
        self.edges.push(Edge {
            key,
            source,
            source_handle,
            target,
            target_handle,
            kind,
        });
        true
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.by_key.get(key).map(|&id| &self.nodes[id])
    }

    pub fn id_of(&self, key: &str) -> Option<NodeId> {
        self.by_key.get(key).copied()
    }

    pub fn key(&self, id: NodeId) -> &str {
        &self.nodes[id].key
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().map(|(_, node)| node)
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id]
    }

    pub fn scopes(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter().map(|(_, scope)| scope)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 0
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes().filter(move |node| node.kind() == kind)
    }

    /// Target of the flow edge leaving `source` through `handle`.
    pub fn flow_target(&self, source: NodeId, handle: &Handle) -> Option<NodeId> {
        self.edges
            .iter()
            .find(|e| e.kind == EdgeKind::Flow && e.source == source && e.source_handle == *handle)
            .map(|e| e.target)
    }

    pub fn to_wire(&self) -> FlowGraph {
        let nodes = self
            .nodes()
            .map(|node| WireNode {
                id: node.key.clone(),
                kind: node.kind().to_string(),
                parent_scope_id: node.scope.map(|s| self.scopes[s].key.clone()),
                position: node.position,
                data: node.data.to_value(),
            })
            .collect();

        let edges = self
            .edges
            .iter()
            .map(|edge| WireEdge {
                id: edge.key.clone(),
                source: self.key(edge.source).to_string(),
                source_handle: edge.source_handle.clone(),
                target: self.key(edge.target).to_string(),
                target_handle: edge.target_handle.clone(),
                kind: Some(edge.kind),
            })
            .collect();

        let scopes = self
            .scopes()
            .map(|scope| WireScope {
                id: scope.key.clone(),
                owner: self.key(scope.owner).to_string(),
                handle: scope.handle.clone(),
                label: scope.label.clone(),
                parent_scope_id: scope.parent.map(|p| self.scopes[p].key.clone()),
            })
            .collect();

        FlowGraph {
            nodes,
            edges,
            scopes,
        }
    }
}
