use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "clickup-mcp-server")]
#[command(about = "MCP server and OAuth bridge for ClickUp", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the MCP server on stdin/stdout
    Stdio(StdioArgs),

    /// Run the HTTP server hosting the OAuth flow and API routes
    Serve(ServeArgs),

    /// Manage OAuth settings stored in .env
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Create the logs/ and public/ directories and default files
    Init(InitArgs),
}

#[derive(Args, Debug, Default)]
pub struct StdioArgs {
    /// Use the stored OAuth token of this user instead of CLICKUP_API_TOKEN
    #[arg(long, env = "CLICKUP_USER_ID")]
    pub user_id: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Set a value; prompts for every managed key when no key is given
    Set {
        /// Variable name, e.g. CLICKUP_CLIENT_ID
        key: Option<String>,

        /// Value; prompted for when omitted
        value: Option<String>,
    },

    /// Print one value
    Get {
        /// Variable name
        key: String,
    },

    /// Show all managed values (secrets masked)
    List,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite existing files
    #[arg(long, short)]
    pub force: bool,

    /// Port written into the generated .env and config file
    #[arg(long, default_value_t = 3000)]
    pub port: u16,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_port() {
        let cli = Cli::try_parse_from(["clickup-mcp-server", "serve", "--port", "4000"]).unwrap();
        match cli.command {
            Commands::Serve(args) => assert_eq!(args.port, Some(4000)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_config_set_without_key() {
        let cli = Cli::try_parse_from(["clickup-mcp-server", "config", "set"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigCommands::Set { key: None, value: None })
        ));
    }

    #[test]
    fn test_parse_stdio_user() {
        temp_env::with_var_unset("CLICKUP_USER_ID", || {
            let cli = Cli::try_parse_from(["clickup-mcp-server", "stdio", "--user-id", "77"])
                .unwrap();
            match cli.command {
                Commands::Stdio(args) => assert_eq!(args.user_id.as_deref(), Some("77")),
                other => panic!("unexpected command: {other:?}"),
            }
        });
    }
}
