//! Generate command - rewrites a source file to match an edited graph

use crate::commands::{engine_for, load_config};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use weft_core::FlowGraph;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Source file the graph was parsed from
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Edited graph JSON, as printed by `weft parse`
    #[arg(long, value_name = "GRAPH")]
    pub graph: PathBuf,

    /// Overwrite SOURCE instead of printing the result
    #[arg(short, long)]
    pub write: bool,
}

impl GenerateArgs {
    pub fn run(&self) -> Result<()> {
        let output = self.generate()?;

        if !self.write {
            print!("{}", output);
            return Ok(());
        }

        let original = fs::read_to_string(&self.source)
            .with_context(|| format!("reading {}", self.source.display()))?;
        if output == original {
            println!("No changes to {}", self.source.display());
            return Ok(());
        }
        fs::write(&self.source, &output)
            .with_context(|| format!("writing {}", self.source.display()))?;
        println!(
            "{} Updated {}",
            "✓".green().bold(),
            self.source.display().to_string().cyan()
        );
        Ok(())
    }

    /// The regenerated source text.
    pub fn generate(&self) -> Result<String> {
        let source = fs::read_to_string(&self.source)
            .with_context(|| format!("reading {}", self.source.display()))?;
        let graph_text = fs::read_to_string(&self.graph)
            .with_context(|| format!("reading {}", self.graph.display()))?;
        let graph: FlowGraph = serde_json::from_str(&graph_text)
            .with_context(|| format!("{} is not a flow graph", self.graph.display()))?;

        let config = load_config(&self.source);
        let engine = engine_for(&config, &self.source);
        let output = engine.generate(&source, &graph.nodes, &graph.edges);
        info!(
            source = %self.source.display(),
            changed = output != source,
            "generated source"
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use weft_core::WireEdge;
    use weft_core::graph::Handle;

    const SOURCE: &str = "for (let i = 0; i < 10; i++) {}\nconsole.log(\"inside loop\");\n";

    fn setup(graph: &FlowGraph) -> (tempfile::TempDir, GenerateArgs) {
        let dir = tempdir().unwrap();
        let source = dir.path().join("main.js");
        let graph_path = dir.path().join("main.graph.json");
        fs::write(&source, SOURCE).unwrap();
        fs::write(&graph_path, serde_json::to_string(graph).unwrap()).unwrap();

        let args = GenerateArgs {
            source,
            graph: graph_path,
            write: false,
        };
        (dir, args)
    }

    fn moved_graph() -> FlowGraph {
        let mut graph = weft_core::parse(SOURCE);
        graph
            .edges
            .push(WireEdge::new("for-0", Handle::FlowBody, "call-exec-1", Handle::FlowIn));
        graph
    }

    #[test]
    fn generate_applies_the_graph() {
        let (_dir, args) = setup(&moved_graph());

        let output = args.generate().unwrap();

        assert_eq!(
            output,
            "for (let i = 0; i < 10; i++) {\n    console.log(\"inside loop\");\n}\n"
        );
    }

    #[test]
    fn write_updates_the_source_file() {
        let (_dir, mut args) = setup(&moved_graph());
        args.write = true;

        args.run().unwrap();

        let content = fs::read_to_string(&args.source).unwrap();
        assert_eq!(content.matches("inside loop").count(), 1);
        assert!(content.starts_with("for (let i = 0; i < 10; i++) {\n    console.log"));
    }

    #[test]
    fn unchanged_graph_leaves_file_alone() {
        let (_dir, mut args) = setup(&weft_core::parse(SOURCE));
        args.write = true;

        args.run().unwrap();

        assert_eq!(fs::read_to_string(&args.source).unwrap(), SOURCE);
    }

    #[test]
    fn invalid_graph_json_is_an_error() {
        let (_dir, args) = setup(&FlowGraph::default());
        fs::write(&args.graph, "not json").unwrap();

        let error = args.generate().unwrap_err();
        assert!(error.to_string().contains("is not a flow graph"));
    }
}
