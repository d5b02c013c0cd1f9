//! Graph to source
//!
//! Generation never reprints the module. The source is parsed again to get
//! the baseline graph and the location of every node's text; the caller's
//! graph is compared with that baseline and each difference becomes an edit
//! spliced into the original text. Code the graph does not model survives
//! byte for byte.

pub mod connections;
pub mod mutate;
pub mod relocate;
pub mod render;
pub mod splice;

use tracing::{debug, warn};

use crate::config::GenerateConfig;
use crate::flow::build_graph;
use crate::graph::{WireEdge, WireNode};
use crate::natives::Natives;
use crate::parser::Parser;

use self::connections::GraphView;
use self::mutate::Mutator;
use self::relocate::Relocator;
use self::splice::Splice;

pub struct Generator<'a> {
    parser: &'a Parser,
    natives: &'a Natives,
    indent: String,
}

impl<'a> Generator<'a> {
    pub fn new(parser: &'a Parser, natives: &'a Natives, config: &GenerateConfig) -> Self {
        Self {
            parser,
            natives,
            indent: config.indent_unit(),
        }
    }

    /// Rewrites `source` so it matches `nodes` and `edges`.
    ///
    /// Unparseable source is returned unchanged, as is anything the graph
    /// does not touch.
    pub fn generate(&self, source: &str, nodes: &[WireNode], edges: &[WireEdge]) -> String {
        let parsed = match self.parser.parse(source) {
            Ok(parsed) => parsed,
            Err(error) => {
                warn!(%error, "source does not parse; returning it unchanged");
                return source.to_string();
            }
        };
        let (baseline, origins) = build_graph(&parsed, self.natives);
        let base = GraphView::from_graph(&baseline);
        let (user, problems) = GraphView::from_wire(nodes, edges);
        for problem in &problems {
            debug!(%problem, "ignoring part of the supplied graph");
        }

        let text = parsed.source.as_str();
        let mut splice = Splice::new(text);
        for edit in Relocator::new(&baseline, &base, &user, &origins, text, &self.indent).plan() {
            splice.push(edit);
        }
        for edit in Mutator::new(&base, &user, &origins, text).plan() {
            splice.push(edit);
        }

        debug!(edits = splice.len(), "splicing generated edits");
        match splice.apply() {
            Some(output) => format!("{}{}", parsed.source.bom(), output),
            None => {
                warn!("an edit splits a character; returning the source unchanged");
                source.to_string()
            }
        }
    }
}
