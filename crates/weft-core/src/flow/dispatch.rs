//! Statement-list traversal
//!
//! Both the program body and every nested block go through [`dispatch`], so a
//! statement produces the same node and key wherever it appears.

use swc_common::{Span, Spanned};
use swc_ecma_ast::{Module, Stmt};
use tracing::debug;

use super::construct::Construct;
use super::context::ParseContext;
use super::handlers::{
    Outcome, Preseed, assignment, call, conditional, export, function, import, logic, loops,
    return_stmt, switch, try_catch, variable,
};
use super::origin::StatementSite;
use crate::graph::{Handle, NodeId, ids};

/// Walks the top-level statements, chaining flow nodes in source order.
pub fn parse_program(ctx: &mut ParseContext<'_>, module: &Module) {
    let mut prev: Option<(NodeId, Handle)> = None;
    for (index, item) in module.body.iter().enumerate() {
        let construct = Construct::of_item(item);
        if let Some(node) = dispatch(ctx, construct, item.span(), "", index, prev.clone()) {
            prev = Some((node, Handle::FlowNext));
        }
    }
}

/// Runs the handler for one statement and links it after `prev`.
///
/// Returns the node when it joined the flow chain.
pub fn dispatch(
    ctx: &mut ParseContext<'_>,
    construct: Construct<'_>,
    span: Span,
    list: &str,
    index: usize,
    prev: Option<(NodeId, Handle)>,
) -> Option<NodeId> {
    let path = ids::child_path(list, index);
    let outcome: Option<Outcome> = match construct {
        Construct::Variable(var) => variable::handle(ctx, var, &path),
        Construct::Function(func) => function::handle(ctx, func, &path),
        Construct::Import(decl) => import::handle(ctx, decl, &path),
        Construct::Export(form) => export::handle(ctx, form, &path),
        Construct::Assignment(assign) => assignment::handle(ctx, assign, &path),
        Construct::Call { call, awaited } => call::handle(ctx, call, awaited, &path),
        Construct::Logic(bin) => logic::handle(ctx, bin, &path),
        Construct::If(stmt) => conditional::handle(ctx, stmt, &path),
        Construct::While(stmt) => loops::handle_while(ctx, stmt, &path),
        Construct::For(stmt) => loops::handle_for(ctx, stmt, &path),
        Construct::Switch(stmt) => switch::handle(ctx, stmt, &path),
        Construct::Try(stmt) => try_catch::handle(ctx, stmt, &path),
        Construct::Return(stmt) => return_stmt::handle(ctx, stmt, &path),
        Construct::Unsupported(what) => {
            debug!(path = %path, construct = what, "skipping unsupported statement");
            None
        }
    };
    let outcome = outcome?;

    let key = ctx.key(outcome.node);
    let range = ctx.range(span);
    ctx.origins.record_statement(
        &key,
        StatementSite {
            list: list.to_string(),
            index,
            range,
        },
    );

    if !outcome.chains {
        return None;
    }
    if let Some((source, handle)) = prev {
        ctx.connect(source, handle, outcome.node, Handle::FlowIn);
    }
    Some(outcome.node)
}

/// Parses `stmts` as the scope `entry` opens through `handle`.
///
/// The first chained statement hangs off `entry`'s `handle`; later ones chain
/// through `flow-next`. `preseed` nodes are created in the scope first and
/// bound by name.
pub fn process_block(
    ctx: &mut ParseContext<'_>,
    stmts: &[Stmt],
    entry: NodeId,
    handle: Handle,
    label: &str,
    list: &str,
    preseed: Vec<Preseed>,
) {
    let frame = ctx.enter_scope(entry, handle.clone(), label);
    for seed in preseed {
        let id = ctx.add_node(seed.key, seed.data);
        ctx.declare(&seed.name, id);
    }

    let mut prev = Some((entry, handle));
    for (index, stmt) in stmts.iter().enumerate() {
        let construct = Construct::of_stmt(stmt);
        if let Some(node) = dispatch(ctx, construct, stmt.span(), list, index, prev.clone()) {
            prev = Some((node, Handle::FlowNext));
        }
    }

    ctx.leave_scope(frame);
}
