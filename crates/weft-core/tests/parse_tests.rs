//! Integration tests for source to graph conversion
//!
//! One minimal snippet per supported construct, plus the fixtures under
//! tests/fixtures/.

use std::fs;
use std::path::Path;

use weft_core::graph::{EdgeKind, Handle, NodeKind};
use weft_core::{FlowGraph, parse};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn read_fixture(name: &str) -> String {
    let path = Path::new(FIXTURES_DIR).join(name);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

fn count_kind(graph: &FlowGraph, kind: NodeKind) -> usize {
    graph
        .nodes
        .iter()
        .filter(|n| n.node_kind() == Some(kind))
        .count()
}

fn has_edge(graph: &FlowGraph, source: &str, handle: Handle, target: &str) -> bool {
    graph
        .edges
        .iter()
        .any(|e| e.source == source && e.source_handle == handle && e.target == target)
}

fn data_inputs<'a>(graph: &'a FlowGraph, target: &'a str) -> Vec<&'a Handle> {
    graph
        .edges
        .iter()
        .filter(|e| e.target == target && e.edge_kind() == EdgeKind::Data)
        .map(|e| &e.target_handle)
        .collect()
}

#[test]
fn if_statement_has_condition_and_both_branches() {
    let graph = parse("let a = 1;\nif (a) {\n    x();\n} else {\n    y();\n}");

    assert_eq!(count_kind(&graph, NodeKind::If), 1);
    assert!(has_edge(&graph, "if-1", Handle::FlowTrue, "call-exec-1:flow-true:0"));
    assert!(has_edge(&graph, "if-1", Handle::FlowFalse, "call-exec-1:flow-false:0"));
    assert_eq!(data_inputs(&graph, "if-1"), vec![&Handle::Condition]);
}

#[test]
fn switch_has_discriminant_and_one_flow_per_case() {
    let graph = parse("let k = 1;\nswitch (k) {\n    case 1:\n        a();\n        break;\n    default:\n        b();\n}");

    assert_eq!(count_kind(&graph, NodeKind::Switch), 1);
    assert!(has_edge(&graph, "switch-1", Handle::Case(0), "call-exec-1:case-0:0"));
    assert!(has_edge(&graph, "switch-1", Handle::Case(1), "call-exec-1:case-1:0"));
    assert_eq!(data_inputs(&graph, "switch-1"), vec![&Handle::Discriminant]);

    let node = graph.node("switch-1").unwrap();
    assert_eq!(node.data["cases"], serde_json::json!(["case 1", "default"]));
}

#[test]
fn while_loop_has_condition_and_body() {
    let graph = parse("let n = 3;\nwhile (n > 0) {\n    n -= 1;\n}");

    assert_eq!(count_kind(&graph, NodeKind::While), 1);
    assert!(has_edge(&graph, "while-1", Handle::FlowBody, "assignment-1:flow-body:0"));
    assert_eq!(data_inputs(&graph, "while-1"), vec![&Handle::Condition]);
    assert!(graph.node("logic-while-1.condition").is_some());
}

#[test]
fn for_loop_wires_its_header() {
    let graph = parse("for (let i = 0; i < 3; i++) {\n    f(i);\n}");

    assert_eq!(count_kind(&graph, NodeKind::For), 1);
    let mut inputs = data_inputs(&graph, "for-0");
    inputs.sort_by_key(|h| h.to_string());
    assert_eq!(inputs, vec![&Handle::Init, &Handle::Test, &Handle::Update]);
    assert!(has_edge(&graph, "for-0", Handle::FlowBody, "call-exec-0:flow-body:0"));

    // The loop variable feeds the call inside the body.
    assert!(has_edge(&graph, "var-i-0:init", Handle::Output, "call-exec-0:flow-body:0"));
}

#[test]
fn try_catch_has_three_clauses() {
    let graph = parse("try {\n    a();\n} catch (e) {\n    b(e);\n} finally {\n    c();\n}");

    assert_eq!(count_kind(&graph, NodeKind::TryCatch), 1);
    assert!(has_edge(&graph, "try-0", Handle::FlowTry, "call-exec-0:flow-try:0"));
    assert!(has_edge(&graph, "try-0", Handle::FlowCatch, "call-exec-0:flow-catch:0"));
    assert!(has_edge(&graph, "try-0", Handle::FlowFinally, "call-exec-0:flow-finally:0"));
    assert!(has_edge(&graph, "param-e-try-0", Handle::Output, "call-exec-0:flow-catch:0"));
}

#[test]
fn function_declaration_opens_a_body() {
    let graph = parse("function f(x) {\n    return x;\n}\nf(1);");

    let func = graph.node("func-f-0").unwrap();
    assert_eq!(func.node_kind(), Some(NodeKind::FunctionCall));
    assert_eq!(func.data["isDeclaration"], true);
    assert!(has_edge(&graph, "func-f-0", Handle::Body, "return-0:body:0"));
    assert!(has_edge(&graph, "param-x-func-f-0", Handle::Output, "return-0:body:0"));

    let reference = graph
        .edges
        .iter()
        .find(|e| e.edge_kind() == EdgeKind::Reference)
        .unwrap();
    assert_eq!(reference.source, "func-f-0");
    assert_eq!(reference.target, "call-exec-1");
}

#[test]
fn import_lists_its_specifiers() {
    let graph = parse("import a, { b as c } from 'm';\nc();");

    let import = graph.node("import-0").unwrap();
    assert_eq!(import.node_kind(), Some(NodeKind::Import));
    assert_eq!(import.data["source"], "m");
    assert_eq!(import.data["specifiers"].as_array().unwrap().len(), 2);
}

#[test]
fn export_forms() {
    let graph = parse("export const v = 1;\nexport { v as w };\nexport * from './x';");

    assert_eq!(graph.node("var-v-0").unwrap().data["isExported"], true);
    assert_eq!(graph.node("export-1").unwrap().node_kind(), Some(NodeKind::Export));
    assert_eq!(graph.node("export-2").unwrap().data["source"], "./x");
    assert!(has_edge(&graph, "var-v-0", Handle::Output, "export-1"));
}

#[test]
fn assignment_becomes_a_set_call() {
    let graph = parse("let a;\na = 5;");

    let node = graph.node("assignment-1").unwrap();
    assert_eq!(node.label(), Some("Set: a"));
    assert!(has_edge(&graph, "literal-assignment-1.arg-0", Handle::Output, "assignment-1"));
}

#[test]
fn statements_chain_in_source_order() {
    let graph = parse("a();\nb = 1;\nif (c) {}\nd();\nb && d();\ne();");

    assert!(has_edge(&graph, "call-exec-0", Handle::FlowNext, "assignment-1"));
    assert!(has_edge(&graph, "assignment-1", Handle::FlowNext, "if-2"));
    assert!(has_edge(&graph, "if-2", Handle::FlowNext, "call-exec-3"));
    assert!(has_edge(&graph, "call-exec-3", Handle::FlowNext, "logic-4"));
    assert!(has_edge(&graph, "logic-4", Handle::FlowNext, "call-exec-5"));
}

#[test]
fn byte_order_mark_does_not_shift_labels() {
    let graph = parse("\u{feff}console.log('hi');\nlet s = 'ü';\nfoo(s, \"é\");");

    let log = graph.node("call-exec-0").unwrap();
    assert_eq!(log.data["args"], serde_json::json!(["'hi'"]));
    assert_eq!(graph.node("var-s-1").unwrap().data["value"], "'ü'");
    assert_eq!(graph.node("call-exec-2").unwrap().data["args"], serde_json::json!(["s", "\"é\""]));
}

#[test]
fn garbage_input_yields_an_empty_graph() {
    let graph = parse("{{{ not valid");
    assert!(graph.nodes.is_empty());
    assert!(graph.edges.is_empty());
}

#[test]
fn fixture_covers_every_container_kind() {
    let graph = parse(&read_fixture("control_flow.js"));

    for kind in [
        NodeKind::Import,
        NodeKind::Variable,
        NodeKind::FunctionCall,
        NodeKind::For,
        NodeKind::While,
        NodeKind::If,
        NodeKind::Switch,
        NodeKind::TryCatch,
        NodeKind::Export,
        NodeKind::NativeApi,
    ] {
        assert!(count_kind(&graph, kind) > 0, "no {kind} node in control_flow.js");
    }
}

#[test]
fn every_edge_references_existing_nodes() {
    for fixture in ["control_flow.js", "modules.js", "untouched.js"] {
        let graph = parse(&read_fixture(fixture));
        for edge in &graph.edges {
            assert!(graph.node(&edge.source).is_some(), "{fixture}: dangling {}", edge.id);
            assert!(graph.node(&edge.target).is_some(), "{fixture}: dangling {}", edge.id);
        }
    }
}

#[test]
fn parsing_is_deterministic() {
    let source = read_fixture("modules.js");
    assert_eq!(parse(&source), parse(&source));
}
