//! ClickUp MCP server CLI entry point.

use clap::Parser;

use clickup_mcp::cli::{commands, handle_error, Cli, Commands};

#[tokio::main]
async fn main() {
    // Missing .env is fine; the environment may already be set
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Stdio(args) => commands::stdio::execute(args).await,
        Commands::Serve(args) => commands::serve::execute(args).await,
        Commands::Config(command) => commands::config::execute(command, cli.json),
        Commands::Init(args) => commands::init::execute(&args, cli.json),
    };

    if let Err(err) = result {
        handle_error(&err, cli.json);
    }
}
