//! `while` and `for` loops

use swc_common::Spanned;
use swc_ecma_ast::{Expr, ForStmt, Stmt, UpdateExpr, UpdateOp, VarDeclOrExpr, WhileStmt};

use super::value::connect_value;
use super::{Outcome, assignment, block_statements, body_site, flatten, variable};
use crate::flow::context::ParseContext;
use crate::flow::dispatch::process_block;
use crate::flow::origin::PortStyle;
use crate::graph::{ControlData, Handle, LogicData, NodeData, NodeId, ids};

pub fn handle_while(ctx: &mut ParseContext<'_>, stmt: &WhileStmt, path: &str) -> Option<Outcome> {
    let key = ids::statement("while", path);
    let id = ctx.add_node(
        key.clone(),
        NodeData::While(ControlData {
            label: "While".to_string(),
            condition: Some(flatten(ctx.text(stmt.test.span()))),
        }),
    );
    connect_value(ctx, &stmt.test, id, Handle::Condition);

    let start = ctx.range(stmt.span).start;
    body(ctx, &stmt.body, id, &key, path, start);
    Some(Outcome::chained(id))
}

pub fn handle_for(ctx: &mut ParseContext<'_>, stmt: &ForStmt, path: &str) -> Option<Outcome> {
    let key = ids::statement("for", path);
    let condition = stmt.test.as_ref().map(|test| flatten(ctx.text(test.span())));
    let id = ctx.add_node(
        key.clone(),
        NodeData::For(ControlData {
            label: "For".to_string(),
            condition,
        }),
    );

    // `let i` in the header is visible to the body only.
    let outer = ctx.snapshot_variables();

    if let Some(init) = &stmt.init {
        init_port(ctx, init, id, &key, path);
    }
    if let Some(test) = &stmt.test {
        connect_value(ctx, test, id, Handle::Test);
    }
    if let Some(update) = &stmt.update {
        update_port(ctx, update, id, &key);
    }

    let start = ctx.range(stmt.span).start;
    body(ctx, &stmt.body, id, &key, path, start);

    ctx.restore_variables(outer);
    Some(Outcome::chained(id))
}

fn init_port(ctx: &mut ParseContext<'_>, init: &VarDeclOrExpr, id: NodeId, key: &str, path: &str) {
    let init_path = format!("{path}:init");
    match init {
        VarDeclOrExpr::VarDecl(decl) => {
            let range = ctx.range(decl.span);
            let style = PortStyle::Declaration(variable::keyword(decl.kind).to_string());
            ctx.origins.record_port(key, Handle::Init, range, style);
            if let Some(outcome) = variable::handle(ctx, decl, &init_path) {
                ctx.connect(outcome.node, Handle::Output, id, Handle::Init);
            }
        }
        VarDeclOrExpr::Expr(expr) => match &**expr {
            Expr::Assign(assign) => {
                let range = ctx.range(assign.span);
                ctx.origins
                    .record_port(key, Handle::Init, range, PortStyle::Value);
                let set = assignment::build(ctx, assign, ids::statement("assignment", &init_path));
                ctx.connect(set, Handle::Result, id, Handle::Init);
            }
            other => connect_value(ctx, other, id, Handle::Init),
        },
    }
}

fn update_port(ctx: &mut ParseContext<'_>, update: &Expr, id: NodeId, key: &str) {
    let range = ctx.range(update.span());
    ctx.origins
        .record_port(key, Handle::Update, range, PortStyle::Value);

    let node = match update {
        Expr::Update(expr) => Some(step(ctx, expr, ids::update(key))),
        Expr::Assign(assign) => Some(assignment::build(ctx, assign, ids::update(key))),
        _ => None,
    };
    if let Some(node) = node {
        ctx.connect(node, Handle::Result, id, Handle::Update);
    }
}

/// `i++` and friends, mirrored as a unary logic node.
fn step(ctx: &mut ParseContext<'_>, expr: &UpdateExpr, key: String) -> NodeId {
    let op = match expr.op {
        UpdateOp::PlusPlus => "++",
        UpdateOp::MinusMinus => "--",
    };
    let id = ctx.add_node(
        key.clone(),
        NodeData::Logic(LogicData {
            label: ctx.text(expr.span).to_string(),
            op: op.to_string(),
            prefix: expr.prefix,
        }),
    );
    let range = ctx.range(expr.span);
    ctx.origins.record_expression(&key, range);
    connect_value(ctx, &expr.arg, id, Handle::InputA);
    id
}

fn body(ctx: &mut ParseContext<'_>, stmt: &Stmt, id: NodeId, key: &str, path: &str, anchor: usize) {
    let site = body_site(ctx, stmt, anchor);
    ctx.origins.record_body(key, Handle::FlowBody, site);
    process_block(
        ctx,
        block_statements(stmt),
        id,
        Handle::FlowBody,
        "Loop Body",
        &ids::child_list(path, &Handle::FlowBody),
        Vec::new(),
    );
}

#[cfg(test)]
mod tests {
    use crate::flow::build_graph;
    use crate::flow::origin::{OriginMap, PortStyle};
    use crate::graph::{EdgeKind, Graph, Handle, NodeData};
    use crate::natives::Natives;
    use crate::parser::Parser;

    fn parse(code: &str) -> (Graph, OriginMap) {
        let parsed = Parser::new().parse(code).unwrap();
        build_graph(&parsed, &Natives::new())
    }

    fn data_inputs(g: &Graph, key: &str) -> Vec<Handle> {
        let id = g.id_of(key).unwrap();
        g.edges()
            .iter()
            .filter(|e| e.target == id && e.kind == EdgeKind::Data)
            .map(|e| e.target_handle.clone())
            .collect()
    }

    #[test]
    fn for_header_is_wired() {
        let (g, origins) = parse("for (let i = 0; i < 10; i++) {}");

        let inputs = data_inputs(&g, "for-0");
        assert!(inputs.contains(&Handle::Init));
        assert!(inputs.contains(&Handle::Test));
        assert!(inputs.contains(&Handle::Update));

        assert!(g.get("var-i-0:init").is_some());
        match &g.get("update-for-0").unwrap().data {
            NodeData::Logic(data) => {
                assert_eq!(data.op, "++");
                assert!(!data.prefix);
            }
            other => panic!("expected logic, got {other:?}"),
        }
        assert_eq!(
            origins.port("for-0", &Handle::Init).map(|p| p.style.clone()),
            Some(PortStyle::Declaration("let".into()))
        );
    }

    #[test]
    fn loop_variable_is_scoped_to_the_loop() {
        let (g, _) = parse("for (let i = 0; i < 3; i++) {\n    log(i);\n}\nlog(i);");

        let inner = g.id_of("call-exec-0:flow-body:0").unwrap();
        let outer = g.id_of("call-exec-1").unwrap();
        assert!(g.edges().iter().any(|e| e.target == inner && e.kind == EdgeKind::Data));
        assert!(!g.edges().iter().any(|e| e.target == outer && e.kind == EdgeKind::Data));
    }

    #[test]
    fn while_body_is_a_scope() {
        let (g, _) = parse("let n = 3;\nwhile (n > 0) {\n    n = n - 1;\n}");

        let lp = g.id_of("while-1").unwrap();
        assert_eq!(
            g.flow_target(lp, &Handle::FlowBody),
            g.id_of("assignment-1:flow-body:0")
        );
        assert_eq!(data_inputs(&g, "while-1"), vec![Handle::Condition]);
    }
}
