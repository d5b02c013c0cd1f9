use swc_ecma_ast::{BinExpr, BinaryOp};

use super::Outcome;
use super::value::connect_value;
use crate::flow::context::ParseContext;
use crate::graph::{Handle, LogicData, NodeData, NodeId, ids};

/// One node per binary/logical expression, operands on `input-a`/`input-b`.
pub fn build(ctx: &mut ParseContext<'_>, bin: &BinExpr, key: String) -> NodeId {
    let op = operator(bin.op);
    let id = ctx.add_node(
        key.clone(),
        NodeData::Logic(LogicData {
            label: op.to_string(),
            op: op.to_string(),
            prefix: false,
        }),
    );
    let range = ctx.range(bin.span);
    ctx.origins.record_expression(&key, range);

    connect_value(ctx, &bin.left, id, Handle::InputA);
    connect_value(ctx, &bin.right, id, Handle::InputB);
    id
}

/// A bare expression statement such as `ready && start();`.
pub fn handle(ctx: &mut ParseContext<'_>, bin: &BinExpr, path: &str) -> Option<Outcome> {
    let id = build(ctx, bin, ids::statement("logic", path));
    Some(Outcome::chained(id))
}

pub fn operator(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::EqEq => "==",
        BinaryOp::NotEq => "!=",
        BinaryOp::EqEqEq => "===",
        BinaryOp::NotEqEq => "!==",
        BinaryOp::Lt => "<",
        BinaryOp::LtEq => "<=",
        BinaryOp::Gt => ">",
        BinaryOp::GtEq => ">=",
        BinaryOp::LShift => "<<",
        BinaryOp::RShift => ">>",
        BinaryOp::ZeroFillRShift => ">>>",
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Mod => "%",
        BinaryOp::BitOr => "|",
        BinaryOp::BitXor => "^",
        BinaryOp::BitAnd => "&",
        BinaryOp::LogicalOr => "||",
        BinaryOp::LogicalAnd => "&&",
        BinaryOp::In => "in",
        BinaryOp::InstanceOf => "instanceof",
        BinaryOp::Exp => "**",
        BinaryOp::NullishCoalescing => "??",
    }
}

#[cfg(test)]
mod tests {
    use crate::flow::build_graph;
    use crate::graph::{Graph, Handle, NodeData};
    use crate::natives::Natives;
    use crate::parser::Parser;

    fn graph(code: &str) -> Graph {
        let parsed = Parser::new().parse(code).unwrap();
        build_graph(&parsed, &Natives::new()).0
    }

    #[test]
    fn nested_operands_build_a_tree() {
        let g = graph("let a = 1;\nif (a > 1 && a < 9) {}");

        let root = g.get("logic-if-1.condition").unwrap();
        match &root.data {
            NodeData::Logic(data) => assert_eq!(data.op, "&&"),
            other => panic!("expected logic, got {other:?}"),
        }
        assert!(g.get("logic-logic-if-1.condition.input-a").is_some());
        assert!(g.get("logic-logic-if-1.condition.input-b").is_some());
    }

    #[test]
    fn logic_result_flows_into_consumer() {
        let g = graph("let a = 1;\nif (a > 1) {}");

        let logic = g.id_of("logic-if-1.condition").unwrap();
        let branch = g.id_of("if-1").unwrap();
        assert!(g.edges().iter().any(|e| e.source == logic
            && e.source_handle == Handle::Result
            && e.target == branch
            && e.target_handle == Handle::Condition));
    }

    #[test]
    fn statement_level_logic_joins_the_chain() {
        let g = graph("ready && start();\nfoo();");

        let logic = g.id_of("logic-0").unwrap();
        let foo = g.id_of("call-exec-1").unwrap();
        assert!(g.edges().iter().any(|e| e.source == logic
            && e.source_handle == Handle::FlowNext
            && e.target == foo
            && e.target_handle == Handle::FlowIn));
    }
}
