//! In-place rewrites driven by changed wires and values
//!
//! Every edit here replaces or extends text the parser recorded, so code the
//! graph does not describe is carried over untouched.

use std::collections::BTreeMap;

use tracing::debug;

use super::connections::GraphView;
use super::render::{Renderer, typed_value};
use super::splice::Edit;
use crate::flow::origin::{CallSite, InitKind, OriginMap};
use crate::graph::{Handle, NodeData};

pub struct Mutator<'a> {
    base: &'a GraphView,
    user: &'a GraphView,
    origins: &'a OriginMap,
    text: &'a str,
    before: Renderer<'a>,
    after: Renderer<'a>,
}

impl<'a> Mutator<'a> {
    pub fn new(base: &'a GraphView, user: &'a GraphView, origins: &'a OriginMap, text: &'a str) -> Self {
        Self {
            base,
            user,
            origins,
            text,
            before: Renderer::new(base, origins, text),
            after: Renderer::new(user, origins, text),
        }
    }

    pub fn plan(&self) -> Vec<Edit> {
        let mut edits = Vec::new();
        self.ports(&mut edits);
        self.arguments(&mut edits);
        self.returns(&mut edits);
        self.initializers(&mut edits);
        edits
    }

    /// Value ports whose wire now renders differently.
    fn ports(&self, edits: &mut Vec<Edit>) {
        for port in self.origins.ports() {
            if !self.user.contains(&port.target) {
                continue;
            }
            let Some(wired) = self.user.conns.input(&port.target, &port.handle) else {
                continue;
            };
            // An operator or call that still feeds the port keeps its text;
            // its own operand and argument ports carry any change.
            let original = self.base.conns.input(&port.target, &port.handle);
            if original == Some(wired)
                && same_shape(self.base.node(&wired.node), self.user.node(&wired.node))
            {
                continue;
            }

            let Some(text) = self.after.port(port) else {
                if original != Some(wired) {
                    debug!(target = %port.target, handle = %port.handle, source = %wired.node, "wired source has no expression form");
                }
                continue;
            };
            if self.before.port(port).as_deref() == Some(text.as_str()) {
                continue;
            }
            edits.push(Edit::replace(port.range.clone(), text));
        }
    }

    /// Arguments wired or typed past the end of a call's written argument
    /// list, and typed values for written arguments nothing feeds.
    fn arguments(&self, edits: &mut Vec<Edit>) {
        for (key, site) in self.origins.calls() {
            if !self.user.contains(key) {
                continue;
            }
            let handle = |i: usize| {
                if site.nested {
                    Handle::NestedArg(i)
                } else {
                    Handle::Arg(i)
                }
            };
            let values = match self.user.node(key) {
                Some(NodeData::Call(call)) => Some(&call.connected_values),
                _ => None,
            };
            if let Some(values) = values {
                self.typed_arguments(key, site, values, edits);
            }

            let wired = self.user.conns.last_argument(key, site.nested);
            let typed_last = values.and_then(|v| v.keys().next_back().copied());
            let Some(last) = wired.max(typed_last) else {
                continue;
            };
            if last < site.argc {
                continue;
            }

            let args: Vec<String> = (site.argc..=last)
                .map(|i| {
                    self.after
                        .input(key, &handle(i))
                        .or_else(|| values.and_then(|v| v.get(&i)).map(|v| typed_value(v)))
                        .unwrap_or_else(|| "undefined".to_string())
                })
                .collect();
            let lead = match (site.argc, site.trailing_comma) {
                (0, _) => "",
                (_, true) => " ",
                _ => ", ",
            };
            edits.push(Edit::insert(site.close, format!("{lead}{}", args.join(", "))));
        }
    }

    /// Written arguments with a typed value and no wire take the value.
    fn typed_arguments(
        &self,
        key: &str,
        site: &CallSite,
        values: &BTreeMap<usize, String>,
        edits: &mut Vec<Edit>,
    ) {
        for (&i, value) in values.range(..site.argc) {
            let handle = if site.nested {
                Handle::NestedArg(i)
            } else {
                Handle::Arg(i)
            };
            if self.user.conns.input(key, &handle).is_some() {
                continue;
            }
            let Some(port) = self.origins.port(key, &handle) else {
                continue;
            };
            let text = typed_value(value);
            if self.text.get(port.range.clone()) != Some(text.as_str()) {
                edits.push(Edit::replace(port.range.clone(), text));
            }
        }
    }

    fn returns(&self, edits: &mut Vec<Edit>) {
        for (key, at) in self.origins.bare_returns() {
            if !self.user.contains(key) {
                continue;
            }
            if let Some(value) = self.after.input(key, &Handle::Arg(0)) {
                edits.push(Edit::insert(at, format!(" {value}")));
            }
        }
    }

    /// Edited `value` fields on variables declared with a literal or nothing,
    /// and values wired into declarations that have no initializer.
    fn initializers(&self, edits: &mut Vec<Edit>) {
        for (key, site) in self.origins.initializers() {
            let (Some(NodeData::Variable(old)), Some(NodeData::Variable(new))) =
                (self.base.node(key), self.user.node(key))
            else {
                continue;
            };
            if site.init.is_none() {
                if let Some(wired) = self.after.input(key, &Handle::RefTarget) {
                    edits.push(Edit::insert(site.name_end, format!(" = {wired}")));
                    continue;
                }
            }
            let value = new.value.trim();
            if value.is_empty() || value == old.value.trim() {
                continue;
            }
            match &site.init {
                None => edits.push(Edit::insert(site.name_end, format!(" = {value}"))),
                Some((range, InitKind::Literal)) => edits.push(Edit::replace(range.clone(), value)),
                Some(_) => {
                    debug!(variable = %key, "initializer is not a literal; value change ignored");
                }
            }
        }
    }
}

/// Whether a composite source kept its operator or call shape.
fn same_shape(before: Option<&NodeData>, after: Option<&NodeData>) -> bool {
    match (before, after) {
        (Some(NodeData::Logic(a)), Some(NodeData::Logic(b))) => a.op == b.op && a.prefix == b.prefix,
        (Some(NodeData::Call(_)), Some(NodeData::Call(_))) => true,
        _ => false,
    }
}
