//! Source to graph
//!
//! [`build_graph`] walks a parsed module and produces the graph together with
//! the [`OriginMap`](origin::OriginMap) the generator splices against.

pub mod construct;
pub mod context;
pub mod dispatch;
pub mod handlers;
pub mod origin;

use crate::graph::Graph;
use crate::natives::Natives;
use crate::parser::ParsedSource;

use self::context::ParseContext;
use self::origin::OriginMap;

pub fn build_graph(parsed: &ParsedSource, natives: &Natives) -> (Graph, OriginMap) {
    let mut ctx = ParseContext::new(&parsed.source, natives);
    dispatch::parse_program(&mut ctx, &parsed.module);
    ctx.finish()
}
