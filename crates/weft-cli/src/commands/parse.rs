//! Parse command - converts JavaScript files to flow-graph JSON

use crate::commands::{engine_for, load_config};
use crate::output::json::{FileGraph, JsonFormatter};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;
use weft_core::config::Config;

const SUPPORTED_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "mjs", "cjs", "mts", "cts"];

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Path to file or directory to parse
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Fill in node positions
    #[arg(long)]
    pub layout: bool,

    /// Pretty-print the JSON
    #[arg(long)]
    pub pretty: bool,

    /// Write one `<name>.graph.json` per file instead of printing
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
}

impl ParseArgs {
    pub fn run(&self) -> Result<()> {
        let config = load_config(&self.path);
        let files = discover_files(&self.path)?;

        if files.is_empty() {
            println!("No JavaScript/TypeScript files found.");
            return Ok(());
        }

        let graphs = self.parse_files(&config, &files);
        for failed in graphs.iter().filter_map(|g| g.result.as_ref().err().map(|e| (&g.file, e))) {
            eprintln!("{} {}: {}", "error:".red().bold(), failed.0, failed.1);
        }

        let formatter = JsonFormatter::new(&self.path.to_string_lossy(), self.pretty);
        match &self.out_dir {
            Some(out_dir) => self.write_graphs(&formatter, out_dir, &files, &graphs)?,
            None => match graphs.as_slice() {
                [single] if self.path.is_file() => match &single.result {
                    Ok(graph) => println!("{}", formatter.format_graph(graph)),
                    Err(error) => anyhow::bail!("{}: {}", single.file, error),
                },
                _ => formatter.write_to(&graphs, &mut io::stdout().lock())?,
            },
        }
        Ok(())
    }

    fn parse_files(&self, config: &Config, files: &[PathBuf]) -> Vec<FileGraph> {
        files
            .par_iter()
            .map(|file| {
                let name = file.to_string_lossy().to_string();
                let result = fs::read_to_string(file)
                    .map_err(|e| format!("failed to read: {}", e))
                    .and_then(|content| {
                        let engine = engine_for(config, file);
                        let graph = engine.try_parse(&content).map_err(|e| e.to_string())?;
                        Ok(if self.layout {
                            engine.parse_with_layout(&content)
                        } else {
                            graph
                        })
                    });
                FileGraph { file: name, result }
            })
            .collect()
    }

    fn write_graphs(
        &self,
        formatter: &JsonFormatter,
        out_dir: &Path,
        files: &[PathBuf],
        graphs: &[FileGraph],
    ) -> Result<()> {
        let mut written = 0;
        for (file, graph) in files.iter().zip(graphs) {
            let Ok(graph) = &graph.result else {
                continue;
            };
            let target = output_path(&self.path, out_dir, file);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            fs::write(&target, formatter.format_graph(graph))
                .with_context(|| format!("writing {}", target.display()))?;
            info!(file = %file.display(), graph = %target.display(), "wrote graph");
            written += 1;
        }

        println!(
            "{} Wrote {} graph{} to {}",
            "✓".green().bold(),
            written,
            if written == 1 { "" } else { "s" },
            out_dir.display().to_string().cyan()
        );
        Ok(())
    }
}

/// Where the graph for `file` goes: its path below `root`, mirrored under
/// `out_dir`, with a `.graph.json` extension.
fn output_path(root: &Path, out_dir: &Path, file: &Path) -> PathBuf {
    let relative = file
        .strip_prefix(root)
        .ok()
        .filter(|p| !p.as_os_str().is_empty())
        .or_else(|| file.file_name().map(Path::new))
        .unwrap_or(file);
    out_dir.join(relative).with_extension("graph.json")
}

fn discover_files(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    if path.is_file() {
        if is_supported_file(path) {
            return Ok(vec![path.to_path_buf()]);
        } else {
            return Ok(vec![]);
        }
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| is_supported_file(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();

    Ok(files)
}

fn is_supported_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.') || name == "node_modules")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;
    use weft_core::FlowGraph;

    fn args(path: &Path, out_dir: Option<PathBuf>) -> ParseArgs {
        ParseArgs {
            path: path.to_path_buf(),
            layout: false,
            pretty: false,
            out_dir,
        }
    }

    #[test]
    fn discover_files_finds_single_js_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.js");
        File::create(&file_path).unwrap();

        let files = discover_files(&file_path).unwrap();

        assert_eq!(files, vec![file_path]);
    }

    #[test]
    fn discover_files_ignores_unsupported_extensions() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("test.js")).unwrap();
        File::create(dir.path().join("readme.md")).unwrap();
        File::create(dir.path().join("graph.json")).unwrap();

        let files = discover_files(dir.path()).unwrap();

        assert_eq!(files.len(), 1);
    }

    #[test]
    fn discover_files_skips_hidden_and_node_modules() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".cache")).unwrap();
        fs::create_dir(dir.path().join("node_modules")).unwrap();
        File::create(dir.path().join(".cache/hidden.js")).unwrap();
        File::create(dir.path().join("node_modules/dep.js")).unwrap();
        File::create(dir.path().join("main.js")).unwrap();

        let files = discover_files(dir.path()).unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("main.js"));
    }

    #[test]
    fn discover_files_fails_for_missing_path() {
        let dir = tempdir().unwrap();
        assert!(discover_files(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn output_path_mirrors_the_tree() {
        let root = Path::new("project");
        let out = Path::new("graphs");

        assert_eq!(
            output_path(root, out, Path::new("project/src/app.js")),
            PathBuf::from("graphs/src/app.graph.json")
        );
        assert_eq!(
            output_path(Path::new("main.js"), out, Path::new("main.js")),
            PathBuf::from("graphs/main.graph.json")
        );
    }

    #[test]
    fn parse_files_reports_syntax_errors() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.js");
        let bad = dir.path().join("bad.js");
        fs::write(&good, "let a = 1;\nconsole.log(a);").unwrap();
        fs::write(&bad, "let = ;").unwrap();

        let graphs = args(dir.path(), None).parse_files(&Config::default(), &[good, bad]);

        assert!(graphs[0].result.as_ref().is_ok_and(|g| g.node("var-a-0").is_some()));
        assert!(graphs[1].result.is_err());
    }

    #[test]
    fn out_dir_receives_one_graph_per_file() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("lib")).unwrap();
        fs::write(src.join("main.js"), "run();").unwrap();
        fs::write(src.join("lib/util.js"), "let x = 1;").unwrap();
        let out = dir.path().join("graphs");

        args(&src, Some(out.clone())).run().unwrap();

        let text = fs::read_to_string(out.join("lib/util.graph.json")).unwrap();
        let graph: FlowGraph = serde_json::from_str(&text).unwrap();
        assert!(graph.node("var-x-0").is_some());
        assert!(out.join("main.graph.json").exists());
    }

    #[test]
    fn layout_flag_positions_nodes() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("main.js");
        fs::write(&file, "a();\nb();").unwrap();

        let mut parse = args(dir.path(), None);
        parse.layout = true;
        let graphs = parse.parse_files(&Config::default(), &[file]);

        let graph = graphs[0].result.as_ref().unwrap();
        assert!(graph.node("call-exec-1").unwrap().position.x > 0.0);
    }
}
