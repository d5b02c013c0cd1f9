use swc_ecma_ast::ReturnStmt;

use super::value::connect_value;
use super::{Outcome, arg_name};
use crate::flow::context::ParseContext;
use crate::graph::{CallData, Handle, NodeData, ids};

const KEYWORD_LEN: usize = "return".len();

pub fn handle(ctx: &mut ParseContext<'_>, stmt: &ReturnStmt, path: &str) -> Option<Outcome> {
    let key = ids::statement("return", path);
    let args = stmt.arg.iter().map(|arg| arg_name(ctx, arg)).collect();
    let id = ctx.add_node(
        key.clone(),
        NodeData::Call(CallData {
            label: "Return".to_string(),
            args,
            is_return: true,
            is_standalone: true,
            ..Default::default()
        }),
    );

    match &stmt.arg {
        Some(arg) => connect_value(ctx, arg, id, Handle::Arg(0)),
        None => {
            let start = ctx.range(stmt.span).start;
            ctx.origins.record_bare_return(&key, start + KEYWORD_LEN);
        }
    }
    Some(Outcome::chained(id))
}

#[cfg(test)]
mod tests {
    use crate::flow::build_graph;
    use crate::graph::{Handle, NodeData};
    use crate::natives::Natives;
    use crate::parser::Parser;

    #[test]
    fn return_value_feeds_arg_zero() {
        let parsed = Parser::new()
            .parse("function f(x) {\n    return x;\n}")
            .unwrap();
        let (g, _) = build_graph(&parsed, &Natives::new());

        let ret = g.get("return-0:body:0").unwrap();
        match &ret.data {
            NodeData::Call(data) => {
                assert_eq!(data.label, "Return");
                assert!(data.is_return);
            }
            other => panic!("expected call-like node, got {other:?}"),
        }
        let param = g.id_of("param-x-func-f-0").unwrap();
        let ret = g.id_of("return-0:body:0").unwrap();
        assert!(g.edges().iter().any(|e| e.source == param
            && e.target == ret
            && e.target_handle == Handle::Arg(0)));
    }

    #[test]
    fn bare_return_records_insertion_point() {
        let parsed = Parser::new()
            .parse("function f() {\n    return;\n}")
            .unwrap();
        let (_, origins) = build_graph(&parsed, &Natives::new());

        let returns: Vec<_> = origins.bare_returns().collect();
        assert_eq!(returns, vec![("return-0:body:0", 25)]);
    }
}
