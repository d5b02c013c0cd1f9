use std::collections::HashMap;
use std::ops::Range;

use swc_common::Span;

use super::origin::OriginMap;
use crate::graph::{
    EdgeKind, Graph, Handle, LabelData, NodeData, NodeId, NodeKind, ScopeId, ids,
};
use crate::natives::Natives;
use crate::parser::SourceText;

/// Marks declarations reached through an `export` wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMark {
    Named,
    Default,
}

/// State restored when a nested scope closes.
pub struct Frame {
    scope: Option<ScopeId>,
    parent: Option<NodeId>,
    variables: HashMap<String, NodeId>,
}

/// Mutable state threaded through one parse.
pub struct ParseContext<'a> {
    source: &'a SourceText,
    natives: &'a Natives,
    pub graph: Graph,
    pub origins: OriginMap,
    variables: HashMap<String, NodeId>,
    scope: Option<ScopeId>,
    parent: Option<NodeId>,
    runtime: Option<NodeId>,
    pub exporting: Option<ExportMark>,
}

impl<'a> ParseContext<'a> {
    pub fn new(source: &'a SourceText, natives: &'a Natives) -> Self {
        Self {
            source,
            natives,
            graph: Graph::new(),
            origins: OriginMap::new(),
            variables: HashMap::new(),
            scope: None,
            parent: None,
            runtime: None,
            exporting: None,
        }
    }

    pub fn range(&self, span: Span) -> Range<usize> {
        self.source.range(span)
    }

    pub fn text(&self, span: Span) -> &'a str {
        self.source.slice(span)
    }

    pub fn text_range(&self, range: Range<usize>) -> &'a str {
        self.source.slice_range(range)
    }

    pub fn source(&self) -> &'a str {
        self.source.as_str()
    }

    /// Adds a node to the scope currently being parsed.
    pub fn add_node(&mut self, key: String, data: NodeData) -> NodeId {
        self.graph.add_node(key, self.scope, data)
    }

    pub fn connect(
        &mut self,
        source: NodeId,
        source_handle: Handle,
        target: NodeId,
        target_handle: Handle,
    ) -> bool {
        let kind = EdgeKind::classify(&source_handle, &target_handle);
        self.graph
            .connect(source, source_handle, target, target_handle, kind)
    }

    pub fn key(&self, id: NodeId) -> String {
        self.graph.key(id).to_string()
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.graph.node(id).kind()
    }

    pub fn current_scope(&self) -> Option<ScopeId> {
        self.scope
    }

    pub fn declare(&mut self, name: &str, id: NodeId) {
        self.variables.insert(name.to_string(), id);
    }

    pub fn declare_function(&mut self, name: &str, id: NodeId) {
        self.variables.insert(format!("decl:{name}"), id);
    }

    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.variables.get(name).copied()
    }

    pub fn is_native(&self, callee: &str) -> bool {
        self.natives.is_native(callee)
    }

    /// Adds the navigational edge from whatever defines `callee` to `node`:
    /// a function declared earlier, the import binding its root name, or the
    /// runtime for native globals.
    pub fn link_callee(&mut self, callee: &str, node: NodeId) {
        let definition = self.variables.get(&format!("decl:{callee}")).copied();
        let root = callee.split(['.', '(', '[']).next().unwrap_or(callee);
        let source = match definition {
            Some(decl) => decl,
            None => match self.lookup(root) {
                Some(import) if self.kind(import) == NodeKind::Import => {
                    let binding = Handle::Other(root.to_string());
                    self.graph
                        .connect(import, binding, node, Handle::RefTarget, EdgeKind::Reference);
                    self.link_scope_owner(import, root);
                    return;
                }
                _ if self.natives.is_native(callee) => self.runtime(),
                _ => return,
            },
        };
        self.graph.connect(
            source,
            Handle::RefSource,
            node,
            Handle::RefTarget,
            EdgeKind::Reference,
        );
    }

    /// Marks the node owning the current scope as depending on an imported
    /// binding used somewhere inside it.
    pub fn link_scope_owner(&mut self, import: NodeId, binding: &str) {
        let Some(owner) = self.parent.filter(|&owner| owner != import) else {
            return;
        };
        self.graph.connect(
            import,
            Handle::Other(binding.to_string()),
            owner,
            Handle::RefTarget,
            EdgeKind::Reference,
        );
    }

    /// The runtime node, created the first time something refers to it.
    fn runtime(&mut self) -> NodeId {
        if let Some(id) = self.runtime {
            return id;
        }
        let id = self.graph.add_node(
            ids::RUNTIME.to_string(),
            None,
            NodeData::NativeApi(LabelData {
                label: "JS Runtime".to_string(),
            }),
        );
        self.runtime = Some(id);
        id
    }

    /// Opens the scope `owner` reaches through `handle`.
    pub fn enter_scope(&mut self, owner: NodeId, handle: Handle, label: &str) -> Frame {
        let frame = Frame {
            scope: self.scope,
            parent: self.parent,
            variables: self.variables.clone(),
        };
        let scope = self.graph.add_scope(owner, handle, label, self.scope);
        self.scope = Some(scope);
        self.parent = Some(owner);
        frame
    }

    /// Closes a scope; names declared inside it go out of view.
    pub fn leave_scope(&mut self, frame: Frame) {
        self.scope = frame.scope;
        self.parent = frame.parent;
        self.variables = frame.variables;
    }

    pub fn snapshot_variables(&self) -> HashMap<String, NodeId> {
        self.variables.clone()
    }

    pub fn restore_variables(&mut self, variables: HashMap<String, NodeId>) {
        self.variables = variables;
    }

    pub fn finish(self) -> (Graph, OriginMap) {
        (self.graph, self.origins)
    }
}
