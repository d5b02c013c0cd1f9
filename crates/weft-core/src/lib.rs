//! weft-core - keeps JavaScript source and flow graphs in sync
//!
//! [`parse`] turns a module into a graph of typed nodes, data and flow edges,
//! and nested scopes. [`generate`] takes the source back together with an
//! edited graph and returns the source rewritten to match it. Both are
//! fail-soft: bad input yields an empty graph or the source unchanged.

pub mod codegen;
pub mod config;
pub mod flow;
pub mod graph;
pub mod layout;
pub mod natives;
pub mod parser;

use tracing::{debug, warn};

use crate::codegen::Generator;
use crate::config::{Config, GenerateConfig, LayoutConfig};
use crate::flow::build_graph;
use crate::graph::Graph;
use crate::natives::Natives;
use crate::parser::Parser;

pub use crate::graph::{FlowGraph, WireEdge, WireNode};
pub use crate::parser::ParseError;

/// Parse and generate with one set of options.
#[derive(Debug, Clone)]
pub struct Engine {
    parser: Parser,
    natives: Natives,
    generate: GenerateConfig,
    layout: LayoutConfig,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        Self {
            parser: Parser::from_config(&config.parser),
            natives: Natives::with_extra(config.natives.extra.iter().cloned()),
            generate: config.generate.clone(),
            layout: config.layout.clone(),
        }
    }

    /// Replaces the parser, e.g. one chosen by file extension.
    pub fn with_parser(mut self, parser: Parser) -> Self {
        self.parser = parser;
        self
    }

    fn graph(&self, source: &str) -> Result<Graph, ParseError> {
        let parsed = self.parser.parse(source)?;
        let (graph, origins) = build_graph(&parsed, &self.natives);
        debug!(
            nodes = graph.node_count(),
            edges = graph.edges().len(),
            statements = origins.statement_count(),
            "built graph"
        );
        Ok(graph)
    }

    /// Like [`Engine::parse`], but reports why the source was rejected.
    #[tracing::instrument(skip_all, fields(len = source.len()))]
    pub fn try_parse(&self, source: &str) -> Result<FlowGraph, ParseError> {
        self.graph(source).map(|graph| graph.to_wire())
    }

    /// The graph for `source`, or an empty one when it does not parse.
    pub fn parse(&self, source: &str) -> FlowGraph {
        self.try_parse(source).unwrap_or_else(|error| {
            warn!(%error, "source does not parse; returning an empty graph");
            FlowGraph::default()
        })
    }

    /// [`Engine::parse`] with node positions filled in.
    #[tracing::instrument(skip_all, fields(len = source.len()))]
    pub fn parse_with_layout(&self, source: &str) -> FlowGraph {
        match self.graph(source) {
            Ok(mut graph) => {
                layout::apply(&mut graph, &self.layout);
                graph.to_wire()
            }
            Err(error) => {
                warn!(%error, "source does not parse; returning an empty graph");
                FlowGraph::default()
            }
        }
    }

    /// `source` rewritten to match `nodes` and `edges`.
    #[tracing::instrument(skip_all, fields(len = source.len(), nodes = nodes.len(), edges = edges.len()))]
    pub fn generate(&self, source: &str, nodes: &[WireNode], edges: &[WireEdge]) -> String {
        Generator::new(&self.parser, &self.natives, &self.generate).generate(source, nodes, edges)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses with default options.
pub fn parse(source: &str) -> FlowGraph {
    Engine::new().parse(source)
}

/// Generates with default options.
pub fn generate(source: &str, nodes: &[WireNode], edges: &[WireEdge]) -> String {
    Engine::new().generate(source, nodes, edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_parses_to_an_empty_graph() {
        let graph = parse("{{{ not valid");
        assert!(graph.nodes.is_empty());
        assert!(graph.edges.is_empty());
        assert!(Engine::new().try_parse("{{{ not valid").is_err());
    }

    #[test]
    fn extra_natives_come_from_config() {
        let mut config = Config::default();
        config.natives.extra.push("lodash".into());

        let graph = Engine::with_config(&config).parse("lodash.map(xs);");
        assert!(graph.node(graph::ids::RUNTIME).is_some());
        assert!(parse("lodash.map(xs);").node(graph::ids::RUNTIME).is_none());
    }

    #[test]
    fn layout_fills_positions() {
        let graph = Engine::new().parse_with_layout("a();\nb();");
        let b = graph.node("call-exec-1").unwrap();
        assert!(b.position.x > 0.0);
    }

    #[test]
    fn typescript_parser_can_be_swapped_in() {
        let source = "let n: number = 1;";
        assert!(parse(source).nodes.is_empty());

        let engine = Engine::new().with_parser(Parser::for_file("main.ts"));
        assert!(engine.parse(source).node("var-n-0").is_some());
    }
}
