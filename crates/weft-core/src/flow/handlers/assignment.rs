use swc_common::Spanned;
use swc_ecma_ast::AssignExpr;

use super::value::connect_value;
use super::{Outcome, arg_name};
use crate::flow::context::ParseContext;
use crate::graph::{CallData, Handle, NodeData, NodeId, ids};

/// `target op= value` as a call-like "Set" node with the value on `arg-0`.
pub fn build(ctx: &mut ParseContext<'_>, assign: &AssignExpr, key: String) -> NodeId {
    let target = ctx.text(assign.left.span());
    let left_end = ctx.range(assign.left.span()).end;
    let right_start = ctx.range(assign.right.span()).start;
    let operator = ctx.text_range(left_end..right_start).trim().to_string();

    let id = ctx.add_node(
        key.clone(),
        NodeData::Call(CallData {
            label: format!("Set: {target}"),
            args: vec![arg_name(ctx, &assign.right)],
            is_standalone: true,
            operator: Some(operator),
            ..Default::default()
        }),
    );
    let range = ctx.range(assign.span);
    ctx.origins.record_expression(&key, range);

    connect_value(ctx, &assign.right, id, Handle::Arg(0));
    id
}

pub fn handle(ctx: &mut ParseContext<'_>, assign: &AssignExpr, path: &str) -> Option<Outcome> {
    let id = build(ctx, assign, ids::statement("assignment", path));
    Some(Outcome::chained(id))
}
