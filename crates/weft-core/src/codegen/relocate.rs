//! Moving statements into branch bodies
//!
//! For every branch handle of a baseline container, the caller's graph may
//! lead somewhere the source does not: a sibling statement in the same list.
//! That statement, and any `flow-next` chain the caller added after it, is
//! appended to the body and removed from its old place.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use tracing::debug;

use super::connections::GraphView;
use super::splice::{Edit, placement, removal_range};
use crate::flow::origin::OriginMap;
use crate::graph::{Graph, Handle, NodeData, ids};

/// Branch handles of a container node, in source order.
pub fn branch_handles(data: &NodeData) -> Vec<Handle> {
    match data {
        NodeData::If(_) => vec![Handle::FlowTrue, Handle::FlowFalse],
        NodeData::While(_) | NodeData::For(_) => vec![Handle::FlowBody],
        NodeData::Switch(switch) => (0..switch.cases.len()).map(Handle::Case).collect(),
        NodeData::TryCatch(_) => vec![Handle::FlowTry, Handle::FlowCatch, Handle::FlowFinally],
        NodeData::Call(call) if call.is_declaration => vec![Handle::Body],
        _ => Vec::new(),
    }
}

pub struct Relocator<'a> {
    baseline: &'a Graph,
    base: &'a GraphView,
    user: &'a GraphView,
    origins: &'a OriginMap,
    text: &'a str,
    unit: &'a str,
    /// Moved statement key to the container that took it.
    claimed_by: HashMap<String, String>,
}

impl<'a> Relocator<'a> {
    pub fn new(
        baseline: &'a Graph,
        base: &'a GraphView,
        user: &'a GraphView,
        origins: &'a OriginMap,
        text: &'a str,
        unit: &'a str,
    ) -> Self {
        Self {
            baseline,
            base,
            user,
            origins,
            text,
            unit,
            claimed_by: HashMap::new(),
        }
    }

    pub fn plan(mut self) -> Vec<Edit> {
        let mut edits = Vec::new();
        let mut removals = Vec::new();
        for node in self.baseline.nodes() {
            for handle in branch_handles(&node.data) {
                let moved = self.claim(&node.key, &handle);
                if moved.is_empty() {
                    continue;
                }
                let Some(site) = self.origins.body(&node.key, &handle) else {
                    continue;
                };
                debug!(container = %node.key, handle = %handle, count = moved.len(), "relocating statements");

                let mut items = Vec::with_capacity(moved.len());
                for key in &moved {
                    if let Some(stmt) = self.origins.statement(key) {
                        removals.push(removal_range(self.text, stmt.range.clone()));
                        items.push(stmt.range.clone());
                    }
                }
                edits.push(placement(self.text, site, self.unit, items));
            }
        }
        edits.extend(merge(removals).into_iter().map(Edit::delete));
        edits
    }

    /// Statements the caller's graph adds to `container`'s `handle` body.
    fn claim(&mut self, container: &str, handle: &Handle) -> Vec<String> {
        let mut moved = Vec::new();
        if self.origins.body(container, handle).is_none() {
            return moved;
        }
        let Some(home) = self.origins.statement(container) else {
            return moved;
        };
        let body_list = ids::child_list(&ids::child_path(&home.list, home.index), handle);

        let mut visited = HashSet::new();
        let mut cursor = self.user.conns.flow(container, handle).map(str::to_string);
        while let Some(key) = cursor.take() {
            if !visited.insert(key.clone()) {
                break;
            }
            let Some(site) = self.origins.statement(&key) else {
                break;
            };
            let next = self.user.conns.flow(&key, &Handle::FlowNext);

            if site.list == body_list {
                cursor = next.map(str::to_string);
                continue;
            }
            if site.list != home.list {
                debug!(container, target = %key, "flow target is not a sibling; leaving it in place");
                break;
            }
            if let Some(owner) = self.claimed_by.get(&key) {
                debug!(container, target = %key, owner = %owner, "statement already moved");
                break;
            }
            if self.encloses(&key, container) {
                debug!(container, target = %key, "move would nest a statement inside itself");
                break;
            }

            self.claimed_by.insert(key.clone(), container.to_string());
            moved.push(key.clone());

            // Only links the caller added extend the run; the source's own
            // `flow-next` leads to whatever followed the statement before.
            let original = self.base.conns.flow(&key, &Handle::FlowNext);
            cursor = match next {
                Some(next) if Some(next) != original => Some(next.to_string()),
                _ => None,
            };
        }
        moved
    }

    /// Whether `outer` is `inner` or has taken it, directly or transitively.
    fn encloses(&self, outer: &str, inner: &str) -> bool {
        let mut current = inner;
        loop {
            if current == outer {
                return true;
            }
            match self.claimed_by.get(current) {
                Some(owner) => current = owner,
                None => return false,
            }
        }
    }
}

/// Joins overlapping removals. A statement at the end of the file takes the
/// newline before it, which the statement above may also have claimed.
fn merge(mut ranges: Vec<Range<usize>>) -> Vec<Range<usize>> {
    ranges.sort_by_key(|r| r.start);
    let mut merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start < last.end => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }
    merged
}
