use swc_common::Spanned;
use swc_ecma_ast::{FnDecl, Function};

use super::{Outcome, Preseed, binding_name, block_site};
use crate::flow::context::{ExportMark, ParseContext};
use crate::flow::dispatch::process_block;
use crate::graph::{CallData, Handle, NodeData, ids};

pub fn handle(ctx: &mut ParseContext<'_>, decl: &FnDecl, path: &str) -> Option<Outcome> {
    let name = decl.ident.sym.to_string();
    Some(build(ctx, &name, &decl.function, path))
}

/// Declaration node plus a `body` scope seeded with one node per parameter.
pub fn build(ctx: &mut ParseContext<'_>, name: &str, function: &Function, path: &str) -> Outcome {
    let mark = ctx.exporting.take();
    let key = ids::function(name, path);
    let params: Vec<String> = function
        .params
        .iter()
        .map(|param| binding_name(&param.pat).unwrap_or_else(|| ctx.text(param.pat.span()).to_string()))
        .collect();

    let id = ctx.add_node(
        key.clone(),
        NodeData::Call(CallData {
            label: name.to_string(),
            args: params,
            is_declaration: true,
            is_async: function.is_async,
            is_exported: mark.is_some(),
            is_default_export: mark == Some(ExportMark::Default),
            ..Default::default()
        }),
    );
    // Registered before the body so recursive calls resolve.
    ctx.declare_function(name, id);

    if let Some(body) = &function.body {
        let site = block_site(ctx, body);
        ctx.origins.record_body(&key, Handle::Body, site);
        let preseed = function
            .params
            .iter()
            .filter_map(|param| binding_name(&param.pat))
            .map(|param| Preseed::parameter(&param, &key))
            .collect();
        process_block(
            ctx,
            &body.stmts,
            id,
            Handle::Body,
            &format!("{name}()"),
            &ids::child_list(path, &Handle::Body),
            preseed,
        );
    }

    Outcome::detached(id)
}
