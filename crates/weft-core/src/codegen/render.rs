//! Expression text implied by graph connections

use super::connections::{GraphView, Source};
use crate::flow::origin::{OriginMap, PortSite, PortStyle};
use crate::graph::{
    CallData, Handle, ImportData, LiteralData, LiteralType, LogicData, NodeData, VariableData,
};

const MAX_DEPTH: usize = 32;

/// Binding power of something that never needs parentheses.
const ATOM: u8 = 20;
const UNARY: u8 = 15;
const POSTFIX: u8 = 16;
const ASSIGN: u8 = 2;

/// Binding power of a binary operator. Unknown operators bind loosest.
fn precedence(op: &str) -> u8 {
    match op {
        "**" => 14,
        "*" | "/" | "%" => 13,
        "+" | "-" => 12,
        "<<" | ">>" | ">>>" => 11,
        "<" | "<=" | ">" | ">=" | "in" | "instanceof" => 10,
        "==" | "!=" | "===" | "!==" => 9,
        "&" => 8,
        "^" => 7,
        "|" => 6,
        "&&" => 5,
        "||" | "??" => 4,
        _ => 1,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Rendered text plus how tightly it binds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    precedence: u8,
    op: Option<String>,
}

impl Rendered {
    fn atom(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            precedence: ATOM,
            op: None,
        }
    }

    fn needs_parens(&self, parent: &str, side: Side) -> bool {
        let parent_prec = precedence(parent);
        let mixes_nullish = match self.op.as_deref() {
            Some("??") => matches!(parent, "&&" | "||"),
            Some("&&" | "||") => parent == "??",
            _ => false,
        };
        if mixes_nullish || self.precedence < parent_prec {
            return true;
        }
        if self.precedence == parent_prec {
            // `**` groups to the right, everything else to the left.
            return match side {
                Side::Left => parent == "**",
                Side::Right => parent != "**",
            };
        }
        false
    }

    fn operand(self, parent: &str, side: Side) -> String {
        if self.needs_parens(parent, side) {
            format!("({})", self.text)
        } else {
            self.text
        }
    }
}

/// Renders what a graph wires into value ports, falling back to the
/// original source text where the graph says nothing.
pub struct Renderer<'a> {
    view: &'a GraphView,
    origins: &'a OriginMap,
    text: &'a str,
}

impl<'a> Renderer<'a> {
    pub fn new(view: &'a GraphView, origins: &'a OriginMap, text: &'a str) -> Self {
        Self { view, origins, text }
    }

    /// Text for a recorded port, printed in the port's style.
    pub fn port(&self, port: &PortSite) -> Option<String> {
        let source = self.view.conns.input(&port.target, &port.handle)?;
        if let PortStyle::Declaration(keyword) = &port.style {
            if let Some(NodeData::Variable(var)) = self.view.node(&source.node) {
                return declaration(keyword, var);
            }
        }
        let rendered = self.source(source, 0)?;

        // The replacement lands inside the operator that owns the port.
        let Some(NodeData::Logic(parent)) = self.view.node(&port.target) else {
            return Some(rendered.text);
        };
        let op = parent.op.as_str();
        Some(match &port.handle {
            Handle::InputA if matches!(op, "++" | "--") => {
                if rendered.precedence < POSTFIX {
                    format!("({})", rendered.text)
                } else {
                    rendered.text
                }
            }
            Handle::InputA => rendered.operand(op, Side::Left),
            Handle::InputB => rendered.operand(op, Side::Right),
            _ => rendered.text,
        })
    }

    /// Text for whatever feeds `handle` on `target`.
    pub fn input(&self, target: &str, handle: &Handle) -> Option<String> {
        let source = self.view.conns.input(target, handle)?;
        self.source(source, 0).map(|r| r.text)
    }

    fn input_at(&self, target: &str, handle: &Handle, depth: usize) -> Option<Rendered> {
        let source = self.view.conns.input(target, handle)?;
        self.source(source, depth + 1)
    }

    pub fn source(&self, source: &Source, depth: usize) -> Option<Rendered> {
        if depth > MAX_DEPTH {
            return None;
        }
        match self.view.node(&source.node)? {
            NodeData::Variable(var) if !var.label.is_empty() => Some(Rendered::atom(&var.label)),
            NodeData::Literal(lit) => Some(literal(lit)),
            NodeData::Logic(logic) => Some(self.logic(&source.node, logic, depth)),
            NodeData::Call(call) => self.call(&source.node, call, depth),
            NodeData::Import(import) => {
                import_binding(import, &source.handle).map(|name| Rendered::atom(name))
            }
            _ => None,
        }
    }

    fn logic(&self, key: &str, data: &LogicData, depth: usize) -> Rendered {
        let op = data.op.as_str();
        if matches!(op, "++" | "--") {
            let arg = self.operand(key, &Handle::InputA, depth);
            let arg = if arg.precedence < POSTFIX {
                format!("({})", arg.text)
            } else {
                arg.text
            };
            return Rendered {
                text: if data.prefix {
                    format!("{op}{arg}")
                } else {
                    format!("{arg}{op}")
                },
                precedence: if data.prefix { UNARY } else { POSTFIX },
                op: None,
            };
        }

        let left = self.operand(key, &Handle::InputA, depth);
        let right = self.operand(key, &Handle::InputB, depth);
        Rendered {
            text: format!(
                "{} {op} {}",
                left.operand(op, Side::Left),
                right.operand(op, Side::Right)
            ),
            precedence: precedence(op),
            op: Some(op.to_string()),
        }
    }

    /// A logic operand: its wire, else the operand as originally written.
    fn operand(&self, key: &str, handle: &Handle, depth: usize) -> Rendered {
        if let Some(rendered) = self.input_at(key, handle, depth) {
            return rendered;
        }
        match self.origins.port(key, handle).and_then(|site| self.text.get(site.range.clone())) {
            Some(text) => Rendered {
                text: text.to_string(),
                precedence: if is_simple(text) { ATOM } else { 0 },
                op: None,
            },
            None => Rendered::atom("undefined"),
        }
    }

    fn call(&self, key: &str, data: &CallData, depth: usize) -> Option<Rendered> {
        if data.is_return || data.is_declaration {
            return None;
        }
        let precedence = if data.operator.is_some() { ASSIGN } else { ATOM };
        if let Some(text) = self.origins.expression(key).and_then(|range| self.text.get(range)) {
            return Some(Rendered {
                text: text.to_string(),
                precedence,
                op: None,
            });
        }

        let arg = |i: usize| {
            self.input_at(key, &Handle::Arg(i), depth)
                .map(|r| r.text)
                .or_else(|| data.connected_values.get(&i).map(|v| typed_value(v)))
                .or_else(|| data.args.get(i).cloned())
                .unwrap_or_else(|| "undefined".to_string())
        };
        if let (Some(op), Some(target)) = (&data.operator, data.label.strip_prefix("Set: ")) {
            return Some(Rendered {
                text: format!("{target} {op} {}", arg(0)),
                precedence,
                op: None,
            });
        }

        let wired = self
            .view
            .conns
            .last_argument(key, false)
            .map_or(0, |last| last + 1);
        let typed = data.connected_values.keys().next_back().map_or(0, |last| last + 1);
        let count = data.args.len().max(wired).max(typed);
        let args: Vec<String> = (0..count).map(arg).collect();
        Some(Rendered::atom(format!("{}({})", data.label, args.join(", "))))
    }
}

/// `let i = 0` style text for a declaration-shaped port.
fn declaration(keyword: &str, var: &VariableData) -> Option<String> {
    if var.label.is_empty() {
        return None;
    }
    let init = if !var.value.is_empty() {
        Some(var.value.clone())
    } else if let Some(expression) = &var.expression {
        Some(expression.clone())
    } else {
        var.nested_call_summary
            .as_ref()
            .map(|call| format!("{}({})", call.name, call.args.join(", ")))
    };
    Some(match init {
        Some(init) => format!("{keyword} {} = {init}", var.label),
        None => format!("{keyword} {}", var.label),
    })
}

fn import_binding(import: &ImportData, handle: &Handle) -> Option<String> {
    match handle {
        Handle::Other(name) => Some(name.clone()),
        _ if import.specifiers.len() == 1 => Some(import.specifiers[0].local.clone()),
        _ => None,
    }
}

/// Source text for a literal node.
pub fn literal(lit: &LiteralData) -> Rendered {
    let value = lit.value.trim();
    match lit.resolved_type() {
        LiteralType::String => Rendered::atom(quote(&lit.value)),
        LiteralType::Number if value.starts_with('-') => Rendered {
            text: value.to_string(),
            precedence: UNARY,
            op: None,
        },
        LiteralType::Number if value.is_empty() => Rendered::atom("0"),
        LiteralType::Null if value.is_empty() => Rendered::atom("null"),
        _ => Rendered::atom(value),
    }
}

/// A value typed into a text box, read as a number or boolean when it
/// looks like one and as a string otherwise.
pub fn typed_value(value: &str) -> String {
    let lit = LiteralData {
        label: String::new(),
        value: value.to_string(),
        literal_type: None,
    };
    literal(&lit).text
}

/// Single-quoted JavaScript string literal.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn is_simple(text: &str) -> bool {
    let text = text.trim();
    (text.starts_with('(') && text.ends_with(')'))
        || (!text.is_empty()
            && text
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, '_' | '$' | '.')))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{LogicData, NodeKind, WireEdge, WireNode};

    fn logic(id: &str, op: &str) -> WireNode {
        let data = NodeData::Logic(LogicData {
            label: op.into(),
            op: op.into(),
            prefix: false,
        });
        WireNode::new(id, NodeKind::Logic, data.to_value())
    }

    fn var(id: &str, name: &str) -> WireNode {
        let data = NodeData::Variable(VariableData {
            label: name.into(),
            ..Default::default()
        });
        WireNode::new(id, NodeKind::Variable, data.to_value())
    }

    fn render(nodes: Vec<WireNode>, edges: Vec<WireEdge>, root: &str) -> String {
        let (view, _) = GraphView::from_wire(&nodes, &edges);
        let origins = OriginMap::new();
        let renderer = Renderer::new(&view, &origins, "");
        let source = Source {
            node: root.into(),
            handle: Handle::Result,
        };
        renderer.source(&source, 0).unwrap().text
    }

    #[test]
    fn lower_precedence_operand_is_parenthesized() {
        let nodes = vec![logic("mul", "*"), logic("add", "+"), var("a", "a"), var("b", "b"), var("c", "c")];
        let edges = vec![
            WireEdge::new("add", Handle::Result, "mul", Handle::InputA),
            WireEdge::new("c", Handle::Output, "mul", Handle::InputB),
            WireEdge::new("a", Handle::Output, "add", Handle::InputA),
            WireEdge::new("b", Handle::Output, "add", Handle::InputB),
        ];

        assert_eq!(render(nodes, edges, "mul"), "(a + b) * c");
    }

    #[test]
    fn left_associative_right_operand_keeps_grouping() {
        let nodes = vec![logic("outer", "-"), logic("inner", "-"), var("a", "a"), var("b", "b"), var("c", "c")];
        let edges = vec![
            WireEdge::new("a", Handle::Output, "outer", Handle::InputA),
            WireEdge::new("inner", Handle::Result, "outer", Handle::InputB),
            WireEdge::new("b", Handle::Output, "inner", Handle::InputA),
            WireEdge::new("c", Handle::Output, "inner", Handle::InputB),
        ];

        assert_eq!(render(nodes, edges, "outer"), "a - (b - c)");
    }

    #[test]
    fn nullish_never_mixes_bare_with_logical_operators() {
        let nodes = vec![logic("or", "||"), logic("nullish", "??"), var("a", "a"), var("b", "b"), var("c", "c")];
        let edges = vec![
            WireEdge::new("nullish", Handle::Result, "or", Handle::InputA),
            WireEdge::new("c", Handle::Output, "or", Handle::InputB),
            WireEdge::new("a", Handle::Output, "nullish", Handle::InputA),
            WireEdge::new("b", Handle::Output, "nullish", Handle::InputB),
        ];

        assert_eq!(render(nodes, edges, "or"), "(a ?? b) || c");
    }

    #[test]
    fn port_inside_operator_keeps_grouping() {
        let nodes = vec![logic("mul", "*"), logic("add", "+"), var("a", "a"), var("b", "b")];
        let edges = vec![
            WireEdge::new("add", Handle::Result, "mul", Handle::InputA),
            WireEdge::new("a", Handle::Output, "add", Handle::InputA),
            WireEdge::new("b", Handle::Output, "add", Handle::InputB),
        ];
        let (view, _) = GraphView::from_wire(&nodes, &edges);
        let origins = OriginMap::new();
        let port = PortSite {
            target: "mul".into(),
            handle: Handle::InputA,
            range: 0..1,
            style: PortStyle::Value,
        };

        let renderer = Renderer::new(&view, &origins, "x * y");
        assert_eq!(renderer.port(&port).as_deref(), Some("(a + b)"));
    }

    #[test]
    fn missing_operand_becomes_undefined() {
        let nodes = vec![logic("eq", "==="), var("a", "a")];
        let edges = vec![WireEdge::new("a", Handle::Output, "eq", Handle::InputA)];

        assert_eq!(render(nodes, edges, "eq"), "a === undefined");
    }

    #[test]
    fn literals_render_as_source() {
        let text = |value: &str, t: Option<LiteralType>| {
            literal(&LiteralData {
                label: String::new(),
                value: value.into(),
                literal_type: t,
            })
            .text
        };

        assert_eq!(text("42", None), "42");
        assert_eq!(text("true", None), "true");
        assert_eq!(text("it's", None), "'it\\'s'");
        assert_eq!(text("42", Some(LiteralType::String)), "'42'");
    }

    #[test]
    fn typed_argument_values_fill_unwired_slots() {
        let data = NodeData::Call(CallData {
            label: "log".into(),
            args: vec!["x".into()],
            connected_values: [(0, "5".to_string()), (1, "hi".to_string())].into(),
            ..Default::default()
        });
        let nodes = vec![WireNode::new("c", NodeKind::FunctionCall, data.to_value()), var("a", "a")];
        let edges = vec![WireEdge::new("a", Handle::Output, "c", Handle::Arg(1))];

        assert_eq!(render(nodes.clone(), Vec::new(), "c"), "log(5, 'hi')");
        assert_eq!(render(nodes, edges, "c"), "log(5, a)");
    }

    #[test]
    fn declaration_port_prints_keyword_and_value() {
        let data = VariableData {
            label: "i".into(),
            value: "0".into(),
            ..Default::default()
        };
        assert_eq!(declaration("let", &data).as_deref(), Some("let i = 0"));
    }
}
