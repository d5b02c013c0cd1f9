//! Where each node's syntax lives in the source text
//!
//! Recorded while parsing and consumed by the generator, which splices
//! text at these offsets instead of reprinting the whole module.

use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

use crate::graph::Handle;

/// A statement that owns a node, located in its statement list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementSite {
    pub list: String,
    pub index: usize,
    pub range: Range<usize>,
}

/// How a value port's replacement text is printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortStyle {
    Value,
    /// `for` initializers, printed as a declaration with this keyword.
    Declaration(String),
}

/// The expression currently occupying a value-consuming port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSite {
    pub target: String,
    pub handle: Handle,
    pub range: Range<usize>,
    pub style: PortStyle,
}

/// Argument list of a call, for appending arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Offset of the closing parenthesis.
    pub close: usize,
    pub argc: usize,
    pub trailing_comma: bool,
    /// Arguments are exposed as `nested-arg-<n>` on a variable node.
    pub nested: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitKind {
    Literal,
    Call,
    Logic,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitSite {
    /// End of the binding name, where a missing `= value` would go.
    pub name_end: usize,
    pub init: Option<(Range<usize>, InitKind)>,
}

/// The body a branch handle leads into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodySite {
    Block {
        open: usize,
        close: usize,
        first: Option<usize>,
    },
    /// A lone statement without braces.
    Single {
        range: Range<usize>,
        anchor: usize,
    },
    MissingElse {
        insert_at: usize,
        anchor: usize,
    },
    Case {
        colon_end: usize,
        anchor: usize,
        last: Option<Range<usize>>,
        break_at: Option<usize>,
    },
}

#[derive(Debug, Default)]
pub struct OriginMap {
    statements: HashMap<String, StatementSite>,
    expressions: HashMap<String, Range<usize>>,
    ports: Vec<PortSite>,
    port_index: HashMap<(String, Handle), usize>,
    calls: BTreeMap<String, CallSite>,
    returns: BTreeMap<String, usize>,
    initializers: Vec<(String, InitSite)>,
    bodies: HashMap<(String, Handle), BodySite>,
}

impl OriginMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_statement(&mut self, key: &str, site: StatementSite) {
        self.statements.entry(key.to_string()).or_insert(site);
    }

    pub fn record_expression(&mut self, key: &str, range: Range<usize>) {
        self.expressions.entry(key.to_string()).or_insert(range);
    }

    pub fn record_port(&mut self, target: &str, handle: Handle, range: Range<usize>, style: PortStyle) {
        let slot = (target.to_string(), handle.clone());
        if self.port_index.contains_key(&slot) {
            return;
        }
        self.port_index.insert(slot, self.ports.len());
        self.ports.push(PortSite {
            target: target.to_string(),
            handle,
            range,
            style,
        });
    }

    pub fn record_call(&mut self, key: &str, site: CallSite) {
        self.calls.entry(key.to_string()).or_insert(site);
    }

    pub fn record_bare_return(&mut self, key: &str, insert_at: usize) {
        self.returns.insert(key.to_string(), insert_at);
    }

    pub fn record_initializer(&mut self, key: &str, site: InitSite) {
        self.initializers.push((key.to_string(), site));
    }

    pub fn record_body(&mut self, owner: &str, handle: Handle, site: BodySite) {
        self.bodies.insert((owner.to_string(), handle), site);
    }

    pub fn statement(&self, key: &str) -> Option<&StatementSite> {
        self.statements.get(key)
    }

    pub fn expression(&self, key: &str) -> Option<Range<usize>> {
        self.expressions.get(key).cloned()
    }

    pub fn port(&self, target: &str, handle: &Handle) -> Option<&PortSite> {
        self.port_index
            .get(&(target.to_string(), handle.clone()))
            .map(|&i| &self.ports[i])
    }

    pub fn ports(&self) -> &[PortSite] {
        &self.ports
    }

    pub fn calls(&self) -> impl Iterator<Item = (&str, &CallSite)> {
        self.calls.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn bare_returns(&self) -> impl Iterator<Item = (&str, usize)> {
        self.returns.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn initializers(&self) -> &[(String, InitSite)] {
        &self.initializers
    }

    pub fn body(&self, owner: &str, handle: &Handle) -> Option<&BodySite> {
        self.bodies.get(&(owner.to_string(), handle.clone()))
    }

    pub fn statement_count(&self) -> usize {
        self.statements.len()
    }
}
