//! weft CLI - command-line interface for the weft source/graph engine
//!
//! Converts JavaScript modules to flow-graph JSON and applies edited graphs
//! back to source.

mod commands;
mod logging;
mod output;

use clap::Parser;
use commands::Commands;
use logging::LogLevel;

#[derive(Parser, Debug)]
#[command(
    name = "weft",
    author,
    version,
    about = "Keep JavaScript source and flow graphs in sync",
    long_about = "weft turns JavaScript modules into flow graphs of typed nodes and edges,\n\
                  and rewrites the source to match a graph after it has been edited.\n\n\
                  Logging goes to stderr; configure it with --log-level or RUST_LOG."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set the log level
    #[arg(long, global = true, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

impl Cli {
    fn configure_colors(&self) {
        let no_color_env = std::env::var("NO_COLOR").is_ok();
        if self.no_color || no_color_env {
            colored::control::set_override(false);
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level, cli.log_json);
    cli.configure_colors();

    match cli.command {
        Commands::Parse(args) => args.run(),
        Commands::Generate(args) => args.run(),
        Commands::Init(args) => args.run(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_parse_command() {
        let cli = Cli::try_parse_from(["weft", "parse", "./src"]).unwrap();
        match cli.command {
            Commands::Parse(args) => {
                assert_eq!(args.path.to_str().unwrap(), "./src");
                assert!(!args.layout);
                assert!(args.out_dir.is_none());
            }
            _ => panic!("Expected Parse command"),
        }
    }

    #[test]
    fn cli_parses_parse_options() {
        let cli = Cli::try_parse_from([
            "weft", "parse", "main.js", "--layout", "--pretty", "--out-dir", "graphs",
        ])
        .unwrap();
        match cli.command {
            Commands::Parse(args) => {
                assert!(args.layout);
                assert!(args.pretty);
                assert_eq!(args.out_dir.unwrap().to_str().unwrap(), "graphs");
            }
            _ => panic!("Expected Parse command"),
        }
    }

    #[test]
    fn cli_parses_generate_command() {
        let cli =
            Cli::try_parse_from(["weft", "generate", "main.js", "--graph", "main.graph.json"])
                .unwrap();
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.source.to_str().unwrap(), "main.js");
                assert_eq!(args.graph.to_str().unwrap(), "main.graph.json");
                assert!(!args.write);
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn generate_requires_a_graph() {
        assert!(Cli::try_parse_from(["weft", "generate", "main.js"]).is_err());
    }

    #[test]
    fn cli_parses_init_with_force() {
        let cli = Cli::try_parse_from(["weft", "init", "--force"]).unwrap();
        match cli.command {
            Commands::Init(args) => assert!(args.force),
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "weft", "parse", "a.js", "--log-level", "debug", "--log-json", "--no-color",
        ])
        .unwrap();
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert!(cli.log_json);
        assert!(cli.no_color);
    }

    #[test]
    fn log_level_defaults_to_warn() {
        let cli = Cli::try_parse_from(["weft", "init"]).unwrap();
        assert_eq!(cli.log_level, LogLevel::Warn);
        assert!(!cli.log_json);
    }

    #[test]
    fn cli_version_is_set() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_version(), Some("0.1.0"));
    }

    #[test]
    fn cli_help_contains_commands() {
        let mut cmd = Cli::command();
        let help = cmd.render_help().to_string();
        assert!(help.contains("parse"));
        assert!(help.contains("generate"));
        assert!(help.contains("init"));
    }
}
