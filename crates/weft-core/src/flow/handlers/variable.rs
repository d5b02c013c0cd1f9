use swc_common::Spanned;
use swc_ecma_ast::{Expr, Pat, VarDecl, VarDeclKind, VarDeclarator};

use super::value::connect_value;
use super::{Outcome, arg_name, call, callee_label, flatten, unwrap_value};
use crate::flow::context::{ExportMark, ParseContext};
use crate::flow::origin::{InitKind, InitSite, PortStyle};
use crate::graph::{CallSummary, Handle, NodeData, NodeId, VariableData, ids};

pub fn keyword(kind: VarDeclKind) -> &'static str {
    match kind {
        VarDeclKind::Var => "var",
        VarDeclKind::Let => "let",
        VarDeclKind::Const => "const",
    }
}

/// One node per declarator. Only plain identifier bindings are mirrored.
pub fn handle(ctx: &mut ParseContext<'_>, var: &VarDecl, path: &str) -> Option<Outcome> {
    let mark = ctx.exporting.take();
    let kw = keyword(var.kind);

    let mut first = None;
    for (i, declarator) in var.decls.iter().enumerate() {
        if let Some(id) = declare(ctx, declarator, kw, mark, path, i) {
            first.get_or_insert(id);
        }
    }
    first.map(Outcome::detached)
}

fn declare(
    ctx: &mut ParseContext<'_>,
    declarator: &VarDeclarator,
    kw: &str,
    mark: Option<ExportMark>,
    path: &str,
    index: usize,
) -> Option<NodeId> {
    let Pat::Ident(binding) = &declarator.name else {
        return None;
    };
    let name = binding.id.sym.to_string();
    let key = ids::variable(&name, path, index);
    let mut name_end = ctx.range(binding.id.span).end;
    if let Some(ann) = &binding.type_ann {
        name_end = name_end.max(ctx.range(ann.span).end);
    }

    let mut data = VariableData {
        label: name.clone(),
        declaration_kind: Some(kw.to_string()),
        is_exported: mark.is_some(),
        is_default_export: mark == Some(ExportMark::Default),
        ..Default::default()
    };
    let init_kind = declarator.init.as_deref().map(|init| match unwrap_value(init) {
        Expr::Lit(_) => InitKind::Literal,
        Expr::Call(_) => InitKind::Call,
        Expr::Bin(_) => InitKind::Logic,
        _ => InitKind::Other,
    });
    if let Some(init) = declarator.init.as_deref() {
        match unwrap_value(init) {
            Expr::Lit(lit) => data.value = ctx.text(lit.span()).to_string(),
            Expr::Call(call_expr) => {
                data.nested_call_summary = Some(CallSummary {
                    name: callee_label(ctx, &call_expr.callee),
                    args: call_expr.args.iter().map(|a| arg_name(ctx, &a.expr)).collect(),
                });
            }
            other => data.expression = Some(flatten(ctx.text(other.span()))),
        }
    }

    let id = ctx.add_node(key.clone(), NodeData::Variable(data));
    let init_site = declarator
        .init
        .as_deref()
        .zip(init_kind)
        .map(|(init, kind)| (ctx.range(init.span()), kind));
    ctx.origins.record_initializer(
        &key,
        InitSite {
            name_end,
            init: init_site,
        },
    );

    if let Some(init) = declarator.init.as_deref() {
        match unwrap_value(init) {
            Expr::Call(call_expr) => {
                // A value wired into ref-target replaces the whole call.
                let range = ctx.range(init.span());
                ctx.origins
                    .record_port(&key, Handle::RefTarget, range, PortStyle::Value);
                let callee = callee_label(ctx, &call_expr.callee);
                ctx.link_callee(&callee, id);
                if let Some(site) = call::call_site(ctx, call_expr, true) {
                    ctx.origins.record_call(&key, site);
                }
                for (j, arg) in call_expr.args.iter().enumerate() {
                    if arg.spread.is_none() {
                        connect_value(ctx, &arg.expr, id, Handle::NestedArg(j));
                    }
                }
            }
            Expr::Bin(_) | Expr::Ident(_) => connect_value(ctx, init, id, Handle::RefTarget),
            _ => {
                // Nothing is wired here, but a caller may wire a value in.
                let range = ctx.range(init.span());
                ctx.origins
                    .record_port(&key, Handle::RefTarget, range, PortStyle::Value);
            }
        }
    }

    // Declared after the initializer so `let x = x + 1` reads the outer binding.
    ctx.declare(&name, id);
    Some(id)
}
