use swc_ecma_ast::{BlockStmt, TryStmt};

use super::{Outcome, Preseed, binding_name, block_site};
use crate::flow::context::ParseContext;
use crate::flow::dispatch::process_block;
use crate::graph::{ControlData, Handle, NodeData, NodeId, ids};

pub fn handle(ctx: &mut ParseContext<'_>, stmt: &TryStmt, path: &str) -> Option<Outcome> {
    let key = ids::statement("try", path);
    let id = ctx.add_node(
        key.clone(),
        NodeData::TryCatch(ControlData {
            label: "Try / Catch".to_string(),
            condition: None,
        }),
    );

    clause(ctx, &stmt.block, id, path, Handle::FlowTry, "Try", Vec::new());
    if let Some(handler) = &stmt.handler {
        let preseed = handler
            .param
            .as_ref()
            .and_then(binding_name)
            .map(|name| vec![Preseed::parameter(&name, &key)])
            .unwrap_or_default();
        clause(ctx, &handler.body, id, path, Handle::FlowCatch, "Catch", preseed);
    }
    if let Some(finalizer) = &stmt.finalizer {
        clause(ctx, finalizer, id, path, Handle::FlowFinally, "Finally", Vec::new());
    }

    Some(Outcome::chained(id))
}

fn clause(
    ctx: &mut ParseContext<'_>,
    block: &BlockStmt,
    id: NodeId,
    path: &str,
    handle: Handle,
    label: &str,
    preseed: Vec<Preseed>,
) {
    let key = ctx.key(id);
    let site = block_site(ctx, block);
    ctx.origins.record_body(&key, handle.clone(), site);
    let list = ids::child_list(path, &handle);
    process_block(ctx, &block.stmts, id, handle, label, &list, preseed);
}

#[cfg(test)]
mod tests {
    use crate::flow::build_graph;
    use crate::graph::{Graph, Handle, NodeData};
    use crate::natives::Natives;
    use crate::parser::Parser;

    fn graph(code: &str) -> Graph {
        let parsed = Parser::new().parse(code).unwrap();
        build_graph(&parsed, &Natives::new()).0
    }

    #[test]
    fn clauses_become_separate_scopes() {
        let g = graph("try {\n    risky();\n} catch (err) {\n    report(err);\n} finally {\n    done();\n}");

        let node = g.id_of("try-0").unwrap();
        assert_eq!(g.flow_target(node, &Handle::FlowTry), g.id_of("call-exec-0:flow-try:0"));
        assert_eq!(g.flow_target(node, &Handle::FlowCatch), g.id_of("call-exec-0:flow-catch:0"));
        assert_eq!(g.flow_target(node, &Handle::FlowFinally), g.id_of("call-exec-0:flow-finally:0"));
    }

    #[test]
    fn catch_parameter_is_preseeded() {
        let g = graph("try {\n    risky();\n} catch (err) {\n    report(err);\n}");

        let param = g.get("param-err-try-0").unwrap();
        match &param.data {
            NodeData::Variable(data) => assert!(data.is_parameter),
            other => panic!("expected variable, got {other:?}"),
        }
        let param = g.id_of("param-err-try-0").unwrap();
        let report = g.id_of("call-exec-0:flow-catch:0").unwrap();
        assert!(g.edges().iter().any(|e| e.source == param
            && e.target == report
            && e.target_handle == Handle::Arg(0)));
    }
}
