//! JSON output for parsed graphs
//!
//! A single file prints its bare graph, the shape `weft generate --graph`
//! reads back. Several files print one document with a summary.

use serde::Serialize;
use std::io::{self, Write};
use weft_core::FlowGraph;

#[derive(Serialize)]
pub struct JsonOutput<'a> {
    pub version: &'static str,
    pub metadata: JsonMetadata,
    pub summary: JsonSummary,
    pub files: Vec<JsonFile<'a>>,
}

#[derive(Serialize)]
pub struct JsonMetadata {
    pub weft_version: &'static str,
    pub working_directory: String,
    pub parsed_path: String,
}

#[derive(Serialize)]
pub struct JsonSummary {
    pub total_files: usize,
    pub failed_files: usize,
    pub total_nodes: usize,
    pub total_edges: usize,
}

#[derive(Serialize)]
pub struct JsonFile<'a> {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph: Option<&'a FlowGraph>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of parsing one file.
pub struct FileGraph {
    pub file: String,
    pub result: Result<FlowGraph, String>,
}

pub struct JsonFormatter {
    parsed_path: String,
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(parsed_path: &str, pretty: bool) -> Self {
        Self {
            parsed_path: parsed_path.to_string(),
            pretty,
        }
    }

    pub fn format(&self, files: &[FileGraph]) -> String {
        let output = self.build_output(files);
        self.encode(&output)
    }

    pub fn format_graph(&self, graph: &FlowGraph) -> String {
        self.encode(graph)
    }

    pub fn write_to<W: Write>(&self, files: &[FileGraph], writer: &mut W) -> io::Result<()> {
        writeln!(writer, "{}", self.format(files))
    }

    fn encode<T: Serialize>(&self, value: &T) -> String {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        encoded.unwrap_or_else(|_| "{}".to_string())
    }

    fn build_output<'a>(&self, files: &'a [FileGraph]) -> JsonOutput<'a> {
        let working_directory = std::env::current_dir()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|_| ".".to_string());

        let graphs = files.iter().filter_map(|f| f.result.as_ref().ok());
        let summary = JsonSummary {
            total_files: files.len(),
            failed_files: files.iter().filter(|f| f.result.is_err()).count(),
            total_nodes: graphs.clone().map(|g| g.nodes.len()).sum(),
            total_edges: graphs.map(|g| g.edges.len()).sum(),
        };

        JsonOutput {
            version: "1.0",
            metadata: JsonMetadata {
                weft_version: env!("CARGO_PKG_VERSION"),
                working_directory,
                parsed_path: self.parsed_path.clone(),
            },
            summary,
            files: files
                .iter()
                .map(|f| JsonFile {
                    file: f.file.clone(),
                    graph: f.result.as_ref().ok(),
                    error: f.result.as_ref().err().cloned(),
                })
                .collect(),
        }
    }
}
