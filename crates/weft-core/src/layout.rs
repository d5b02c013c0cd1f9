//! Automatic node placement
//!
//! Each scope is laid out on its own, left to right: function declarations
//! in a column of their own, everything else ranked by the longest path of
//! flow and data edges leading to it. Positions never affect generation.

use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::config::LayoutConfig;
use crate::graph::{EdgeKind, Graph, NodeData, NodeId, Position, ScopeId, ids};

const MARGIN: f64 = 50.0;
const DEFINITION_SPACING: f64 = 400.0;
const RUNTIME_POSITION: Position = Position { x: 500.0, y: -200.0 };

/// Width and height a node is drawn with.
pub fn size(data: &NodeData) -> (f64, f64) {
    match data {
        NodeData::Logic(_) => (50.0, 50.0),
        NodeData::Literal(_) => (180.0, 60.0),
        NodeData::Variable(var) => {
            let computed = var.expression.is_some() || var.nested_call_summary.is_some();
            (320.0, if computed { 180.0 } else { 120.0 })
        }
        NodeData::Call(call) => (350.0, 100.0 + 40.0 * call.args.len() as f64),
        NodeData::If(_) | NodeData::For(_) | NodeData::While(_) => (250.0, 250.0),
        _ => (350.0, 150.0),
    }
}

fn is_definition(data: &NodeData) -> bool {
    matches!(data, NodeData::Call(call) if call.is_declaration)
}

pub fn apply(graph: &mut Graph, config: &LayoutConfig) {
    let mut scopes: BTreeMap<Option<ScopeId>, Vec<NodeId>> = BTreeMap::new();
    for node in graph.nodes() {
        if node.key == ids::RUNTIME {
            continue;
        }
        scopes.entry(node.scope).or_default().push(node.id);
    }

    let mut placed: Vec<(NodeId, Position)> = Vec::with_capacity(graph.node_count());
    for members in scopes.values() {
        let (definitions, flow): (Vec<NodeId>, Vec<NodeId>) = members
            .iter()
            .partition(|&&id| is_definition(&graph.node(id).data));

        for (i, id) in definitions.into_iter().enumerate() {
            let position = Position {
                x: config.definitions_x,
                y: i as f64 * DEFINITION_SPACING,
            };
            placed.push((id, position));
        }
        placed.extend(rank_positions(graph, &flow, config));
    }

    if let Some(runtime) = graph.id_of(ids::RUNTIME) {
        placed.push((runtime, RUNTIME_POSITION));
    }
    for (id, position) in placed {
        graph.node_mut(id).position = position;
    }
}

/// Columns by longest path, nodes stacked top to bottom in creation order.
fn rank_positions(graph: &Graph, members: &[NodeId], config: &LayoutConfig) -> Vec<(NodeId, Position)> {
    let ranks = longest_path(graph, members);

    let mut columns: BTreeMap<usize, Vec<NodeId>> = BTreeMap::new();
    for &id in members {
        columns.entry(ranks.get(&id).copied().unwrap_or(0)).or_default().push(id);
    }

    let mut positions = Vec::with_capacity(members.len());
    let mut x = MARGIN;
    for column in columns.values() {
        let mut y = MARGIN;
        let mut width: f64 = 0.0;
        for &id in column {
            let (w, h) = size(&graph.node(id).data);
            positions.push((id, Position { x, y }));
            y += h + config.node_sep;
            width = width.max(w);
        }
        x += width + config.rank_sep;
    }
    positions
}

/// Rank of every member: the length of the longest edge path reaching it
/// from inside the same scope. Members on a cycle keep the rank they had
/// when the cycle was reached.
fn longest_path(graph: &Graph, members: &[NodeId]) -> HashMap<NodeId, usize> {
    let mut rank: HashMap<NodeId, usize> = members.iter().map(|&id| (id, 0)).collect();
    let mut in_degree: HashMap<NodeId, usize> = rank.clone();
    let mut successors: HashMap<NodeId, Vec<NodeId>> = HashMap::new();

    for edge in graph.edges() {
        if edge.kind == EdgeKind::Reference || edge.source == edge.target {
            continue;
        }
        if !rank.contains_key(&edge.source) || !rank.contains_key(&edge.target) {
            continue;
        }
        successors.entry(edge.source).or_default().push(edge.target);
        if let Some(degree) = in_degree.get_mut(&edge.target) {
            *degree += 1;
        }
    }

    let mut queue: VecDeque<NodeId> = members
        .iter()
        .copied()
        .filter(|id| in_degree.get(id) == Some(&0))
        .collect();
    while let Some(id) = queue.pop_front() {
        let next_rank = rank.get(&id).copied().unwrap_or(0) + 1;
        for &succ in successors.get(&id).map(Vec::as_slice).unwrap_or_default() {
            if let Some(r) = rank.get_mut(&succ) {
                *r = (*r).max(next_rank);
            }
            if let Some(degree) = in_degree.get_mut(&succ) {
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(succ);
                }
            }
        }
    }
    rank
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::build_graph;
    use crate::graph::Handle;
    use crate::natives::Natives;
    use crate::parser::Parser;

    fn laid_out(code: &str) -> Graph {
        let parsed = Parser::new().parse(code).unwrap();
        let (mut graph, _) = build_graph(&parsed, &Natives::new());
        apply(&mut graph, &LayoutConfig::default());
        graph
    }

    fn position(graph: &Graph, key: &str) -> Position {
        graph.get(key).unwrap().position
    }

    #[test]
    fn chained_statements_advance_left_to_right() {
        let g = laid_out("a();\nb();\nc();");

        let a = position(&g, "call-exec-0");
        let b = position(&g, "call-exec-1");
        let c = position(&g, "call-exec-2");
        assert_eq!(a, Position { x: 50.0, y: 50.0 });
        assert_eq!(b.x, 50.0 + 350.0 + 100.0);
        assert!(c.x > b.x);
        assert_eq!(a.y, b.y);
    }

    #[test]
    fn declarations_go_to_their_own_column() {
        let g = laid_out("function f() {}\nfunction g() {}\nf();");

        assert_eq!(position(&g, "func-f-0"), Position { x: -600.0, y: 0.0 });
        assert_eq!(position(&g, "func-g-1"), Position { x: -600.0, y: 400.0 });
        assert_eq!(position(&g, "call-exec-2").x, 50.0);
    }

    #[test]
    fn runtime_is_pinned() {
        let g = laid_out("console.log(1);");
        assert_eq!(position(&g, ids::RUNTIME), Position { x: 500.0, y: -200.0 });
    }

    #[test]
    fn operands_rank_before_their_consumer() {
        let g = laid_out("let a = 1;\nif (a > 2) {}");

        let var = position(&g, "var-a-0");
        let logic = position(&g, "logic-if-1.condition");
        let branch = position(&g, "if-1");
        assert!(var.x < logic.x);
        assert!(logic.x < branch.x);
    }

    #[test]
    fn cycles_do_not_hang() {
        let mut g = Graph::new();
        let a = g.add_node("a".into(), None, NodeData::Call(Default::default()));
        let b = g.add_node("b".into(), None, NodeData::Call(Default::default()));
        g.connect(a, Handle::FlowNext, b, Handle::FlowIn, EdgeKind::Flow);
        g.connect(b, Handle::FlowNext, a, Handle::FlowIn, EdgeKind::Flow);

        apply(&mut g, &LayoutConfig::default());

        assert_eq!(g.node(a).position, Position { x: 50.0, y: 50.0 });
        assert_eq!(g.node(b).position, Position { x: 50.0, y: 210.0 });
    }
}
