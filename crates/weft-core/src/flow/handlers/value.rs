//! Resolution of value-producing expressions into data edges
//!
//! Used for call arguments, conditions, operands, discriminants and
//! initializers alike, so every value port is wired the same way.

use swc_common::Spanned;
use swc_ecma_ast::{Expr, Ident, Lit};
use swc_ecma_visit::{Visit, VisitWith};

use super::{call, logic, unquote};
use crate::flow::context::ParseContext;
use crate::flow::origin::PortStyle;
use crate::graph::{Handle, LiteralData, LiteralType, NodeData, NodeId, NodeKind, ids};

/// Wires `expr` into `consumer`'s `handle` and records the port's extent.
pub fn connect_value(ctx: &mut ParseContext<'_>, expr: &Expr, consumer: NodeId, handle: Handle) {
    let consumer_key = ctx.key(consumer);
    let range = ctx.range(expr.span());
    ctx.origins
        .record_port(&consumer_key, handle.clone(), range, PortStyle::Value);
    resolve(ctx, expr, consumer, &consumer_key, handle);
}

fn resolve(
    ctx: &mut ParseContext<'_>,
    expr: &Expr,
    consumer: NodeId,
    consumer_key: &str,
    handle: Handle,
) {
    match expr {
        Expr::Paren(paren) => resolve(ctx, &paren.expr, consumer, consumer_key, handle),
        Expr::Await(await_expr) => resolve(ctx, &await_expr.arg, consumer, consumer_key, handle),
        Expr::Ident(ident) => {
            connect_identifier(ctx, &ident.sym, consumer, handle);
        }
        Expr::Lit(lit) => {
            if let Some(data) = literal_data(ctx, lit) {
                let key = ids::nested("literal", consumer_key, &handle);
                let range = ctx.range(lit.span());
                let id = ctx.add_node(key.clone(), NodeData::Literal(data));
                ctx.origins.record_expression(&key, range);
                ctx.connect(id, Handle::Output, consumer, handle);
            }
        }
        Expr::Bin(bin) => {
            let key = ids::nested("logic", consumer_key, &handle);
            let id = logic::build(ctx, bin, key);
            ctx.connect(id, Handle::Result, consumer, handle);
        }
        Expr::Call(call_expr) => {
            let key = ids::nested("call", consumer_key, &handle);
            let id = call::build(ctx, call_expr, key, call::CallFlags::default());
            ctx.connect(id, Handle::Result, consumer, handle);
        }
        Expr::Tpl(tpl) => {
            let mut names = Identifiers::default();
            tpl.visit_with(&mut names);
            for name in names.0 {
                connect_identifier(ctx, &name, consumer, handle.clone());
            }
        }
        _ => {}
    }
}

/// Identifiers read inside template interpolations, in source order.
#[derive(Default)]
struct Identifiers(Vec<String>);

impl Visit for Identifiers {
    fn visit_ident(&mut self, ident: &Ident) {
        self.0.push(ident.sym.to_string());
    }
}

/// Data edge from the variable, parameter or import bound to `name`.
pub fn connect_identifier(
    ctx: &mut ParseContext<'_>,
    name: &str,
    consumer: NodeId,
    handle: Handle,
) -> bool {
    let Some(source) = ctx.lookup(name) else {
        return false;
    };
    let source_handle = match ctx.kind(source) {
        NodeKind::Import => {
            ctx.link_scope_owner(source, name);
            Handle::Other(name.to_string())
        }
        _ => Handle::Output,
    };
    ctx.connect(source, source_handle, consumer, handle)
}

pub fn literal_data(ctx: &ParseContext<'_>, lit: &Lit) -> Option<LiteralData> {
    let data = match lit {
        Lit::Str(s) => LiteralData::new(unquote(ctx.text(s.span)), LiteralType::String),
        Lit::Num(n) => LiteralData::new(ctx.text(n.span), LiteralType::Number),
        Lit::Bool(b) => LiteralData::new(b.value.to_string(), LiteralType::Boolean),
        Lit::Null(_) => LiteralData::new("null", LiteralType::Null),
        _ => return None,
    };
    Some(data)
}
