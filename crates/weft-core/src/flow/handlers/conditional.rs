use swc_common::Spanned;
use swc_ecma_ast::IfStmt;

use super::value::connect_value;
use super::{Outcome, block_statements, body_site, flatten};
use crate::flow::context::ParseContext;
use crate::flow::dispatch::process_block;
use crate::flow::origin::BodySite;
use crate::graph::{ControlData, Handle, NodeData, ids};

pub fn handle(ctx: &mut ParseContext<'_>, stmt: &IfStmt, path: &str) -> Option<Outcome> {
    let key = ids::statement("if", path);
    let id = ctx.add_node(
        key.clone(),
        NodeData::If(ControlData {
            label: "If".to_string(),
            condition: Some(flatten(ctx.text(stmt.test.span()))),
        }),
    );
    connect_value(ctx, &stmt.test, id, Handle::Condition);

    let range = ctx.range(stmt.span);
    let site = body_site(ctx, &stmt.cons, range.start);
    ctx.origins.record_body(&key, Handle::FlowTrue, site);
    process_block(
        ctx,
        block_statements(&stmt.cons),
        id,
        Handle::FlowTrue,
        "Then",
        &ids::child_list(path, &Handle::FlowTrue),
        Vec::new(),
    );

    match &stmt.alt {
        Some(alt) => {
            let site = body_site(ctx, alt, range.start);
            ctx.origins.record_body(&key, Handle::FlowFalse, site);
            process_block(
                ctx,
                block_statements(alt),
                id,
                Handle::FlowFalse,
                "Else",
                &ids::child_list(path, &Handle::FlowFalse),
                Vec::new(),
            );
        }
        None => {
            let site = BodySite::MissingElse {
                insert_at: range.end,
                anchor: range.start,
            };
            ctx.origins.record_body(&key, Handle::FlowFalse, site);
        }
    }

    Some(Outcome::chained(id))
}

#[cfg(test)]
mod tests {
    use crate::flow::build_graph;
    use crate::flow::origin::{BodySite, OriginMap};
    use crate::graph::{Graph, Handle, NodeData};
    use crate::natives::Natives;
    use crate::parser::Parser;

    fn parse(code: &str) -> (Graph, OriginMap) {
        let parsed = Parser::new().parse(code).unwrap();
        build_graph(&parsed, &Natives::new())
    }

    #[test]
    fn branches_become_nested_scopes() {
        let (g, _) = parse("let ok = true;\nif (ok) {\n    a();\n} else {\n    b();\n}");

        let branch = g.id_of("if-1").unwrap();
        let then = g.get("call-exec-1:flow-true:0").unwrap();
        let other = g.get("call-exec-1:flow-false:0").unwrap();

        assert_eq!(g.scope(then.scope.unwrap()).handle, Handle::FlowTrue);
        assert_eq!(g.scope(other.scope.unwrap()).handle, Handle::FlowFalse);
        assert_eq!(g.flow_target(branch, &Handle::FlowTrue), g.id_of("call-exec-1:flow-true:0"));
        assert_eq!(g.flow_target(branch, &Handle::FlowFalse), g.id_of("call-exec-1:flow-false:0"));

        let ok = g.id_of("var-ok-0").unwrap();
        assert!(g.edges().iter().any(|e| e.source == ok
            && e.target == branch
            && e.target_handle == Handle::Condition));
    }

    #[test]
    fn condition_text_is_kept() {
        let (g, _) = parse("if (a > 1) {}");
        match &g.get("if-0").unwrap().data {
            NodeData::If(data) => assert_eq!(data.condition.as_deref(), Some("a > 1")),
            other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn missing_else_is_recorded() {
        let (_, origins) = parse("if (x) {\n}\n");

        let site = origins.body("if-0", &Handle::FlowFalse).unwrap();
        assert_eq!(
            site,
            &BodySite::MissingElse {
                insert_at: 10,
                anchor: 0
            }
        );
    }

    #[test]
    fn unbraced_body_is_a_single_statement() {
        let (g, origins) = parse("if (x) go();");

        assert!(g.get("call-exec-0:flow-true:0").is_some());
        assert!(matches!(
            origins.body("if-0", &Handle::FlowTrue),
            Some(BodySite::Single { .. })
        ));
    }
}
