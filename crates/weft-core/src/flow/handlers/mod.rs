//! Per-construct handlers
//!
//! Each handler creates the node(s) for one construct, records where its
//! syntax lives, and recurses into nested syntax through the shared value
//! resolver or [`process_block`](super::dispatch::process_block).

pub mod assignment;
pub mod call;
pub mod conditional;
pub mod export;
pub mod function;
pub mod import;
pub mod logic;
pub mod loops;
pub mod return_stmt;
pub mod switch;
pub mod try_catch;
pub mod value;
pub mod variable;

use swc_common::Spanned;
use swc_ecma_ast::{BlockStmt, Callee, Expr, MemberProp, ModuleExportName, Pat, Stmt};

use super::context::ParseContext;
use super::origin::BodySite;
use crate::graph::{NodeData, NodeId, VariableData, ids};

/// What a handler produced for a statement.
#[derive(Debug, Clone, Copy)]
pub struct Outcome {
    pub node: NodeId,
    /// Whether the node joins the `flow-next` chain of its statement list.
    pub chains: bool,
}

impl Outcome {
    pub fn chained(node: NodeId) -> Self {
        Self { node, chains: true }
    }

    pub fn detached(node: NodeId) -> Self {
        Self {
            node,
            chains: false,
        }
    }
}

/// A node created inside a scope before its statements, such as a parameter.
#[derive(Debug, Clone)]
pub struct Preseed {
    pub name: String,
    pub key: String,
    pub data: NodeData,
}

impl Preseed {
    pub fn parameter(name: &str, owner_key: &str) -> Self {
        Self {
            name: name.to_string(),
            key: ids::parameter(name, owner_key),
            data: NodeData::Variable(VariableData {
                label: name.to_string(),
                is_parameter: true,
                ..Default::default()
            }),
        }
    }
}

/// Display label of a callee: `obj.prop` chains or a bare identifier.
pub fn callee_label(ctx: &ParseContext<'_>, callee: &Callee) -> String {
    match callee {
        Callee::Expr(expr) => expr_label(ctx, expr),
        Callee::Super(_) => "super".to_string(),
        Callee::Import(_) => "import".to_string(),
    }
}

pub fn expr_label(ctx: &ParseContext<'_>, expr: &Expr) -> String {
    match expr {
        Expr::Ident(ident) => ident.sym.to_string(),
        Expr::This(_) => "this".to_string(),
        Expr::Member(member) => match &member.prop {
            MemberProp::Ident(prop) => format!("{}.{}", expr_label(ctx, &member.obj), prop.sym),
            _ => ctx.text(member.span).to_string(),
        },
        other => ctx.text(other.span()).to_string(),
    }
}

/// Short name of an argument: identifiers by name, everything else as written.
pub fn arg_name(ctx: &ParseContext<'_>, expr: &Expr) -> String {
    match expr {
        Expr::Ident(ident) => ident.sym.to_string(),
        other => flatten(ctx.text(other.span())),
    }
}

pub fn binding_name(pat: &Pat) -> Option<String> {
    match pat {
        Pat::Ident(binding) => Some(binding.id.sym.to_string()),
        Pat::Assign(assign) => binding_name(&assign.left),
        Pat::Rest(rest) => binding_name(&rest.arg),
        _ => None,
    }
}

pub fn export_name(ctx: &ParseContext<'_>, name: &ModuleExportName) -> String {
    match name {
        ModuleExportName::Ident(ident) => ident.sym.to_string(),
        other => unquote(ctx.text(other.span())),
    }
}

/// Strips parentheses and `await` around a value.
pub fn unwrap_value(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unwrap_value(&paren.expr),
        Expr::Await(await_expr) => unwrap_value(&await_expr.arg),
        other => other,
    }
}

/// The statements a body runs: a block's contents or the lone statement.
pub fn block_statements(stmt: &Stmt) -> &[Stmt] {
    match stmt {
        Stmt::Block(block) => &block.stmts,
        other => std::slice::from_ref(other),
    }
}

pub fn block_site(ctx: &ParseContext<'_>, block: &BlockStmt) -> BodySite {
    let range = ctx.range(block.span);
    BodySite::Block {
        open: range.start,
        close: range.end.saturating_sub(1),
        first: block.stmts.first().map(|s| ctx.range(s.span()).start),
    }
}

pub fn body_site(ctx: &ParseContext<'_>, stmt: &Stmt, anchor: usize) -> BodySite {
    match stmt {
        Stmt::Block(block) => block_site(ctx, block),
        other => BodySite::Single {
            range: ctx.range(other.span()),
            anchor,
        },
    }
}

/// Collapses whitespace runs so multi-line expressions fit a label.
pub fn flatten(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Contents of a quoted string literal with the common escapes resolved.
pub fn unquote(raw: &str) -> String {
    let inner = raw
        .strip_prefix(['\'', '"', '`'])
        .and_then(|s| s.strip_suffix(['\'', '"', '`']))
        .unwrap_or(raw);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(q @ ('\\' | '\'' | '"' | '`')) => out.push(q),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unquote_resolves_simple_escapes() {
        assert_eq!(unquote("'Hello'"), "Hello");
        assert_eq!(unquote(r#""say \"hi\"""#), "say \"hi\"");
        assert_eq!(unquote(r"'it\'s'"), "it's");
        assert_eq!(unquote(r"'A'"), r"A");
    }

    #[test]
    fn flatten_collapses_whitespace() {
        assert_eq!(flatten("a &&\n    b"), "a && b");
    }
}
