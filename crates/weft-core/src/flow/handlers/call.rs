use swc_ecma_ast::CallExpr;

use super::value::connect_value;
use super::{Outcome, arg_name, callee_label};
use crate::flow::context::ParseContext;
use crate::flow::origin::CallSite;
use crate::graph::{CallData, Handle, NodeData, NodeId, ids};

#[derive(Debug, Default, Clone, Copy)]
pub struct CallFlags {
    /// The call is a statement of its own.
    pub standalone: bool,
    pub awaited: bool,
}

pub fn build(ctx: &mut ParseContext<'_>, call: &CallExpr, key: String, flags: CallFlags) -> NodeId {
    let label = callee_label(ctx, &call.callee);
    let args = call.args.iter().map(|arg| arg_name(ctx, &arg.expr)).collect();

    let id = ctx.add_node(
        key.clone(),
        NodeData::Call(CallData {
            label: label.clone(),
            args,
            is_standalone: flags.standalone,
            is_await: flags.awaited,
            ..Default::default()
        }),
    );
    let range = ctx.range(call.span);
    ctx.origins.record_expression(&key, range);
    if let Some(site) = call_site(ctx, call, false) {
        ctx.origins.record_call(&key, site);
    }

    ctx.link_callee(&label, id);
    for (i, arg) in call.args.iter().enumerate() {
        if arg.spread.is_none() {
            connect_value(ctx, &arg.expr, id, Handle::Arg(i));
        }
    }
    id
}

/// Where new arguments of `call` would be inserted, if its text ends in `)`.
pub fn call_site(ctx: &ParseContext<'_>, call: &CallExpr, nested: bool) -> Option<CallSite> {
    let range = ctx.range(call.span);
    let close = range.end.checked_sub(1)?;
    if ctx.text_range(close..range.end) != ")" {
        return None;
    }

    let argc = call.args.len();
    let before = ctx.text_range(range.start..close).trim_end();
    Some(CallSite {
        close,
        argc,
        trailing_comma: argc > 0 && before.ends_with(','),
        nested,
    })
}

pub fn handle(
    ctx: &mut ParseContext<'_>,
    call: &CallExpr,
    awaited: bool,
    path: &str,
) -> Option<Outcome> {
    let flags = CallFlags {
        standalone: true,
        awaited,
    };
    let id = build(ctx, call, ids::statement("call-exec", path), flags);
    Some(Outcome::chained(id))
}

#[cfg(test)]
mod tests {
    use crate::flow::build_graph;
    use crate::graph::{EdgeKind, Graph, Handle, NodeData, NodeKind};
    use crate::natives::Natives;
    use crate::parser::Parser;

    fn parse(code: &str) -> (Graph, crate::flow::origin::OriginMap) {
        let parsed = Parser::new().parse(code).unwrap();
        build_graph(&parsed, &Natives::new())
    }

    #[test]
    fn member_callee_becomes_dotted_label() {
        let (g, _) = parse("console.log('hi');");

        match &g.get("call-exec-0").unwrap().data {
            NodeData::Call(data) => {
                assert_eq!(data.label, "console.log");
                assert_eq!(data.args, vec!["'hi'"]);
                assert!(data.is_standalone);
            }
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn native_callee_links_to_runtime() {
        let (g, _) = parse("console.log(1);\nMath.max(1, 2);");

        assert_eq!(g.nodes_of_kind(NodeKind::NativeApi).count(), 1);
        let refs = g.edges().iter().filter(|e| e.kind == EdgeKind::Reference).count();
        assert_eq!(refs, 2);
    }

    #[test]
    fn declared_function_is_referenced_by_callers() {
        let (g, _) = parse("function greet() {}\ngreet();");

        let decl = g.id_of("func-greet-0").unwrap();
        let call = g.id_of("call-exec-1").unwrap();
        assert!(g.edges().iter().any(|e| e.source == decl
            && e.target == call
            && e.source_handle == Handle::RefSource
            && e.kind == EdgeKind::Reference));
    }

    #[test]
    fn unknown_callee_has_no_reference() {
        let (g, _) = parse("mystery(1);");
        assert!(!g.edges().iter().any(|e| e.kind == EdgeKind::Reference));
    }

    #[test]
    fn consecutive_calls_are_chained() {
        let (g, _) = parse("a();\nb();");

        let a = g.id_of("call-exec-0").unwrap();
        let b = g.id_of("call-exec-1").unwrap();
        assert!(g.edges().iter().any(|e| e.source == a
            && e.source_handle == Handle::FlowNext
            && e.target == b
            && e.target_handle == Handle::FlowIn));
    }

    #[test]
    fn awaited_call_is_flagged() {
        let (g, _) = parse("async function f() {\n    await load();\n}");

        let call = g.get("call-exec-0:body:0").unwrap();
        match &call.data {
            NodeData::Call(data) => assert!(data.is_await),
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn call_site_tracks_argument_list() {
        let (_, origins) = parse("foo(1, 2,);\nbar();");

        let sites: Vec<_> = origins.calls().collect();
        let foo = sites.iter().find(|(k, _)| *k == "call-exec-0").unwrap().1;
        assert_eq!(foo.argc, 2);
        assert!(foo.trailing_comma);
        assert_eq!(foo.close, 9);

        let bar = sites.iter().find(|(k, _)| *k == "call-exec-1").unwrap().1;
        assert_eq!(bar.argc, 0);
        assert!(!bar.trailing_comma);
    }
}
