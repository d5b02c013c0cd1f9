//! `export` forms
//!
//! Exported declarations run their usual handler with an export mark so the
//! resulting node carries `isExported`/`isDefaultExport`. The remaining forms
//! (default expressions, specifier lists, re-exports) get an `export` node.

use swc_ecma_ast::{Decl, DefaultDecl, ExportSpecifier, NamedExport};

use super::value::{connect_identifier, connect_value};
use super::{Outcome, export_name, function, unquote, variable};
use crate::flow::construct::ExportForm;
use crate::flow::context::{ExportMark, ParseContext};
use crate::graph::{ExportData, Handle, NodeData, NodeId, ids};

pub fn handle(ctx: &mut ParseContext<'_>, form: ExportForm<'_>, path: &str) -> Option<Outcome> {
    match form {
        ExportForm::Declaration(Decl::Var(var)) => {
            with_mark(ctx, ExportMark::Named, |ctx| variable::handle(ctx, var, path))
        }
        ExportForm::Declaration(Decl::Fn(func)) => {
            with_mark(ctx, ExportMark::Named, |ctx| function::handle(ctx, func, path))
        }
        ExportForm::Declaration(_) => Some(export_node(ctx, path, "declaration", None, Vec::new())),
        ExportForm::DefaultDeclaration(DefaultDecl::Fn(func)) => {
            let name = func
                .ident
                .as_ref()
                .map(|ident| ident.sym.to_string())
                .unwrap_or_else(|| "default".to_string());
            with_mark(ctx, ExportMark::Default, |ctx| {
                Some(function::build(ctx, &name, &func.function, path))
            })
        }
        ExportForm::DefaultDeclaration(_) => {
            Some(export_node(ctx, path, "default", None, Vec::new()))
        }
        ExportForm::DefaultExpression(expr) => {
            let outcome = export_node(ctx, path, "default", None, Vec::new());
            connect_value(ctx, expr, outcome.node, Handle::Arg(0));
            Some(outcome)
        }
        ExportForm::Named(named) => Some(named_export(ctx, named, path)),
        ExportForm::All(all) => {
            let source = unquote(ctx.text(all.src.span));
            Some(export_node(ctx, path, "all", Some(source), Vec::new()))
        }
    }
}

fn named_export(ctx: &mut ParseContext<'_>, named: &NamedExport, path: &str) -> Outcome {
    let mut locals = Vec::new();
    let mut specifiers = Vec::new();
    for spec in &named.specifiers {
        match spec {
            ExportSpecifier::Named(spec) => {
                let orig = export_name(ctx, &spec.orig);
                let label = match &spec.exported {
                    Some(exported) => format!("{orig} as {}", export_name(ctx, exported)),
                    None => orig.clone(),
                };
                locals.push(orig);
                specifiers.push(label);
            }
            ExportSpecifier::Default(spec) => specifiers.push(spec.exported.sym.to_string()),
            ExportSpecifier::Namespace(spec) => {
                specifiers.push(format!("* as {}", export_name(ctx, &spec.name)));
            }
        }
    }

    let source = named.src.as_ref().map(|src| unquote(ctx.text(src.span)));
    let is_reexport = source.is_some();
    let outcome = export_node(ctx, path, "named", source, specifiers);
    if !is_reexport {
        for (i, local) in locals.iter().enumerate() {
            connect_identifier(ctx, local, outcome.node, Handle::Arg(i));
        }
    }
    outcome
}

fn export_node(
    ctx: &mut ParseContext<'_>,
    path: &str,
    export_type: &str,
    source: Option<String>,
    specifiers: Vec<String>,
) -> Outcome {
    let id: NodeId = ctx.add_node(
        ids::statement("export", path),
        NodeData::Export(ExportData {
            label: format!("Export ({export_type})"),
            export_type: export_type.to_string(),
            source,
            specifiers,
        }),
    );
    Outcome::detached(id)
}

/// Runs a declaration handler with the export mark set for it to take.
fn with_mark<'a, R>(
    ctx: &mut ParseContext<'a>,
    mark: ExportMark,
    f: impl FnOnce(&mut ParseContext<'a>) -> R,
) -> R {
    ctx.exporting = Some(mark);
    let result = f(ctx);
    ctx.exporting = None;
    result
}
