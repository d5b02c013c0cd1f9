use swc_ecma_ast::{ImportDecl, ImportSpecifier};

use super::{Outcome, export_name, unquote};
use crate::flow::context::ParseContext;
use crate::graph::{ImportData, ImportSpecifierData, NodeData, SpecifierKind, ids};

/// One node per import; each local binding becomes a named output on it.
pub fn handle(ctx: &mut ParseContext<'_>, decl: &ImportDecl, path: &str) -> Option<Outcome> {
    let source = unquote(ctx.text(decl.src.span));
    let specifiers: Vec<ImportSpecifierData> = decl
        .specifiers
        .iter()
        .map(|spec| match spec {
            ImportSpecifier::Named(named) => ImportSpecifierData {
                local: named.local.sym.to_string(),
                imported: named.imported.as_ref().map(|name| export_name(ctx, name)),
                kind: SpecifierKind::Named,
            },
            ImportSpecifier::Default(default) => ImportSpecifierData {
                local: default.local.sym.to_string(),
                imported: None,
                kind: SpecifierKind::Default,
            },
            ImportSpecifier::Namespace(namespace) => ImportSpecifierData {
                local: namespace.local.sym.to_string(),
                imported: None,
                kind: SpecifierKind::Namespace,
            },
        })
        .collect();

    let locals: Vec<String> = specifiers.iter().map(|s| s.local.clone()).collect();
    let id = ctx.add_node(
        ids::statement("import", path),
        NodeData::Import(ImportData {
            label: source.clone(),
            source,
            specifiers,
        }),
    );
    for local in &locals {
        ctx.declare(local, id);
    }

    Some(Outcome::detached(id))
}
