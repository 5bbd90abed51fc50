//! Implementation of the `init` command.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::output::{output, success, CommandOutput};
use crate::cli::types::InitArgs;
use crate::infrastructure::setup::{initialize, SetupPaths};

#[derive(Debug, Serialize)]
pub struct InitOutput {
    pub initialized_path: String,
    pub created: Vec<String>,
    pub skipped: Vec<String>,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![success(&format!(
            "Initialized ClickUp MCP server in {}",
            self.initialized_path
        ))];
        for path in &self.created {
            lines.push(format!("  created {path}"));
        }
        for path in &self.skipped {
            lines.push(format!("  kept    {path} (already exists)"));
        }
        lines.push(String::new());
        lines.push("Next: run `clickup-mcp-server config set` to add your OAuth credentials.".to_string());
        lines.join("\n")
    }
}

pub fn execute(args: &InitArgs, json_mode: bool) -> Result<()> {
    let target = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(&args.path)
    };

    let paths = SetupPaths::for_dir(&target);
    let report = initialize(&paths, args.force, args.port)?;

    let relative = |p: &PathBuf| {
        p.strip_prefix(&target)
            .unwrap_or(p.as_path())
            .display()
            .to_string()
    };

    output(
        &InitOutput {
            initialized_path: target.display().to_string(),
            created: report.created.iter().map(relative).collect(),
            skipped: report.skipped.iter().map(relative).collect(),
        },
        json_mode,
    );
    Ok(())
}
