//! Init command - writes a default weft configuration

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::Path;
use weft_core::config::CONFIG_FILENAME;

const DEFAULT_CONFIG: &str = r#"# weft configuration file

[parser]
# Syntax extensions; when none is set the file extension decides
# typescript = false
# jsx = false
# decorators = false

[natives]
# Extra global roots treated like the built-in runtime APIs
# extra = ["$", "lodash"]

[generate]
# Spaces per nesting level for relocated statements (0 = tab)
indent = 4

[layout]
node_sep = 60.0
rank_sep = 100.0
definitions_x = -600.0
"#;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,
}

impl InitArgs {
    pub fn run(&self) -> Result<()> {
        let config_path = Path::new(CONFIG_FILENAME);

        if config_path.exists() && !self.force {
            anyhow::bail!(
                "Config file '{}' already exists. Use --force to overwrite.",
                CONFIG_FILENAME
            );
        }

        fs::write(config_path, DEFAULT_CONFIG)?;
        println!(
            "{} Created {} configuration file",
            "✓".green().bold(),
            CONFIG_FILENAME.cyan()
        );
        Ok(())
    }
}
