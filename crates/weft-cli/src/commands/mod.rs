//! CLI command implementations

pub mod generate;
pub mod init;
pub mod parse;

pub use generate::GenerateArgs;
pub use init::InitArgs;
pub use parse::ParseArgs;

use std::path::Path;

use clap::Subcommand;
use colored::Colorize;
use weft_core::Engine;
use weft_core::config::{Config, ParserConfig, load_config_or_default_with_warnings};
use weft_core::parser::Parser;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert JavaScript files to flow-graph JSON
    Parse(ParseArgs),

    /// Rewrite a source file to match an edited graph
    Generate(GenerateArgs),

    /// Initialize weft configuration in current directory
    Init(InitArgs),
}

/// Configuration for `path`, with unknown keys reported on stderr.
pub fn load_config(path: &Path) -> Config {
    let result = load_config_or_default_with_warnings(path);
    for warning in &result.warnings {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }
    result.config
}

/// Engine for one file. The file extension picks the syntax unless the
/// configuration sets one explicitly.
pub fn engine_for(config: &Config, file: &Path) -> Engine {
    let engine = Engine::with_config(config);
    if config.parser == ParserConfig::default() {
        engine.with_parser(Parser::for_file(&file.to_string_lossy()))
    } else {
        engine
    }
}
