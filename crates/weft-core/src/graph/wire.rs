//! JSON wire schema shared with graph editors

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::Position;
use super::handle::{EdgeKind, Handle};
use super::node::{NodeData, NodeKind};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowGraph {
    pub nodes: Vec<WireNode>,
    pub edges: Vec<WireEdge>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<WireScope>,
}

impl FlowGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&WireNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireNode {
    pub id: String,
    #[serde(alias = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_scope_id: Option<String>,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub data: Value,
}

impl WireNode {
    pub fn new(id: impl Into<String>, kind: NodeKind, data: Value) -> Self {
        Self {
            id: id.into(),
            kind: kind.to_string(),
            parent_scope_id: None,
            position: Position::default(),
            data,
        }
    }

    pub fn node_kind(&self) -> Option<NodeKind> {
        self.kind.parse().ok()
    }

    /// Typed payload, when the kind is recognized.
    pub fn node_data(&self) -> Option<NodeData> {
        self.node_kind()
            .map(|kind| NodeData::from_value(kind, &self.data))
    }

    pub fn label(&self) -> Option<&str> {
        self.data.get("label").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEdge {
    pub id: String,
    pub source: String,
    pub source_handle: Handle,
    pub target: String,
    pub target_handle: Handle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EdgeKind>,
}

impl WireEdge {
    pub fn new(
        source: impl Into<String>,
        source_handle: Handle,
        target: impl Into<String>,
        target_handle: Handle,
    ) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: super::ids::edge(&source, &source_handle, &target, &target_handle),
            source,
            source_handle,
            target,
            target_handle,
            kind: None,
        }
    }

    /// The explicit kind, or one inferred from the handles.
    pub fn edge_kind(&self) -> EdgeKind {
        self.kind
            .unwrap_or_else(|| EdgeKind::classify(&self.source_handle, &self.target_handle))
    }
}

/// A problem with a graph received over the wire.
///
/// Reported while loading; the offending node or edge is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("node `{id}` has unknown kind `{kind}`")]
    UnknownKind { id: String, kind: String },

    #[error("node id `{0}` appears more than once")]
    DuplicateNode(String),

    #[error("edge `{edge}` refers to missing node `{node}`")]
    DanglingEdge { edge: String, node: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireScope {
    pub id: String,
    pub owner: String,
    pub handle: Handle,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_scope_id: Option<String>,
}
