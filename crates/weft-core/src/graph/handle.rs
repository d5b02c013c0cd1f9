//! Port names and edge classification

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A named port on a node.
///
/// The vocabulary is closed; anything else survives as [`Handle::Other`] and
/// is treated as inert by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Handle {
    Output,
    Result,
    Arg(usize),
    NestedArg(usize),
    Condition,
    Discriminant,
    Init,
    Test,
    Update,
    InputA,
    InputB,
    FlowIn,
    FlowNext,
    FlowTrue,
    FlowFalse,
    FlowBody,
    Case(usize),
    FlowTry,
    FlowCatch,
    FlowFinally,
    Body,
    RefSource,
    RefTarget,
    Other(String),
}

impl Handle {
    /// Control-sequencing ports.
    pub fn is_flow(&self) -> bool {
        matches!(
            self,
            Handle::FlowIn
                | Handle::FlowNext
                | Handle::FlowTrue
                | Handle::FlowFalse
                | Handle::FlowBody
                | Handle::Case(_)
                | Handle::FlowTry
                | Handle::FlowCatch
                | Handle::FlowFinally
                | Handle::Body
        )
    }

    /// Flow ports that lead into a nested scope rather than to the next sibling.
    pub fn is_branch(&self) -> bool {
        self.is_flow() && !matches!(self, Handle::FlowIn | Handle::FlowNext)
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Handle::RefSource)
    }

    /// `(i, j)` for `arg-<i>-nested-arg-<j>`: argument `j` of the call
    /// written as argument `i`.
    pub fn nested_argument(&self) -> Option<(usize, usize)> {
        let Handle::Other(name) = self else {
            return None;
        };
        let (outer, inner) = name.strip_prefix("arg-")?.split_once("-nested-arg-")?;
        Some((outer.parse().ok()?, inner.parse().ok()?))
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handle::Output => f.write_str("output"),
            Handle::Result => f.write_str("result"),
            Handle::Arg(i) => write!(f, "arg-{i}"),
            Handle::NestedArg(i) => write!(f, "nested-arg-{i}"),
            Handle::Condition => f.write_str("condition"),
            Handle::Discriminant => f.write_str("discriminant"),
            Handle::Init => f.write_str("init"),
            Handle::Test => f.write_str("test"),
            Handle::Update => f.write_str("update"),
            Handle::InputA => f.write_str("input-a"),
            Handle::InputB => f.write_str("input-b"),
            Handle::FlowIn => f.write_str("flow-in"),
            Handle::FlowNext => f.write_str("flow-next"),
            Handle::FlowTrue => f.write_str("flow-true"),
            Handle::FlowFalse => f.write_str("flow-false"),
            Handle::FlowBody => f.write_str("flow-body"),
            Handle::Case(i) => write!(f, "case-{i}"),
            Handle::FlowTry => f.write_str("flow-try"),
            Handle::FlowCatch => f.write_str("flow-catch"),
            Handle::FlowFinally => f.write_str("flow-finally"),
            Handle::Body => f.write_str("body"),
            Handle::RefSource => f.write_str("ref-source"),
            Handle::RefTarget => f.write_str("ref-target"),
            Handle::Other(name) => f.write_str(name),
        }
    }
}

fn indexed(s: &str, prefix: &str) -> Option<usize> {
    s.strip_prefix(prefix)?.parse().ok()
}

impl FromStr for Handle {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let handle = match s {
            "output" => Handle::Output,
            "result" => Handle::Result,
            "condition" => Handle::Condition,
            "discriminant" => Handle::Discriminant,
            "init" => Handle::Init,
            "test" => Handle::Test,
            "update" => Handle::Update,
            "input-a" => Handle::InputA,
            "input-b" => Handle::InputB,
            "flow-in" => Handle::FlowIn,
            "flow-next" => Handle::FlowNext,
            "flow-true" => Handle::FlowTrue,
            "flow-false" => Handle::FlowFalse,
            "flow-body" => Handle::FlowBody,
            "flow-try" => Handle::FlowTry,
            "flow-catch" => Handle::FlowCatch,
            "flow-finally" => Handle::FlowFinally,
            "body" => Handle::Body,
            "ref-source" => Handle::RefSource,
            "ref-target" => Handle::RefTarget,
            other => {
                if let Some(i) = indexed(other, "arg-") {
                    Handle::Arg(i)
                } else if let Some(i) = indexed(other, "nested-arg-") {
                    Handle::NestedArg(i)
                } else if let Some(i) = indexed(other, "case-") {
                    Handle::Case(i)
                } else {
                    Handle::Other(other.to_string())
                }
            }
        };
        Ok(handle)
    }
}

impl From<&str> for Handle {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(handle) => handle,
            Err(never) => match never {},
        }
    }
}

impl Serialize for Handle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Handle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Handle::from(s.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Flow,
    Data,
    Reference,
}

impl EdgeKind {
    /// Infers the kind of an edge that arrived without one.
    pub fn classify(source_handle: &Handle, target_handle: &Handle) -> Self {
        if source_handle.is_reference() {
            EdgeKind::Reference
        } else if source_handle.is_flow() || *target_handle == Handle::FlowIn {
            EdgeKind::Flow
        } else {
            EdgeKind::Data
        }
    }
}
