//! Project initialization
//!
//! Creates the working-directory layout the HTTP server expects:
//! - `logs/` and `public/` directories
//! - a starter `.env`
//! - a commented `clickup-mcp.yaml`
//! - the landing page and the OAuth success page

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::config::CONFIG_FILE;

fn env_template(port: u16) -> String {
    format!(
        "# ClickUp MCP Server Configuration
# Required
CLICKUP_CLIENT_ID=
CLICKUP_CLIENT_SECRET=
CLICKUP_REDIRECT_URI=http://localhost:{port}/oauth/clickup/callback

# Optional
PORT={port}
LOG_LEVEL=info
# ENCRYPTION_KEY=
# CLICKUP_API_TOKEN=
"
    )
}

fn config_template(port: u16) -> String {
    format!(
        r#"# ClickUp MCP server configuration
# Every key can also be set with a CLICKUP_MCP_ prefixed environment
# variable, nested with double underscores:
#   export CLICKUP_MCP_SERVER__PORT=4000
#   export CLICKUP_MCP_RATE_LIMIT__REQUESTS_PER_MINUTE=50

server:
  host: "127.0.0.1"
  port: {port}
  public_dir: "public"
  enable_cors: true

logging:
  # trace, debug, info, warn, error
  level: "info"
  # json or pretty
  format: "pretty"
  log_dir: "logs"

security:
  # Encrypted OAuth tokens; remove to keep tokens in memory only
  token_file: ".clickup-tokens.json"
  state_ttl_secs: 600
  token_lifetime_days: 7

rate_limit:
  # Outbound ClickUp API requests per minute
  requests_per_minute: 100
  # Inbound requests per minute per team on /api routes
  inbound_per_minute: 60

retry:
  max_retries: 3
  initial_backoff_ms: 500
  max_backoff_ms: 8000
"#
    )
}

const OAUTH_SUCCESS_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>OAuth Success</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Arial, sans-serif;
            display: flex;
            justify-content: center;
            align-items: center;
            height: 100vh;
            margin: 0;
            background-color: #f5f5f5;
        }
        .container {
            text-align: center;
            padding: 2rem;
            background-color: white;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }
        h1 { color: #2ecc71; margin-bottom: 1rem; }
        p { color: #666; margin-bottom: 2rem; }
        button {
            background-color: #2ecc71;
            color: white;
            border: none;
            padding: 0.5rem 1rem;
            border-radius: 4px;
            cursor: pointer;
            font-size: 1rem;
        }
    </style>
</head>
<body>
    <div class="container">
        <h1>Authentication Successful!</h1>
        <p>You can now close this window and return to your assistant.</p>
        <button onclick="window.close()">Close Window</button>
    </div>
</body>
</html>
"#;

const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>ClickUp MCP Server</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Arial, sans-serif;
            max-width: 40rem;
            margin: 4rem auto;
            color: #333;
        }
        a.button {
            display: inline-block;
            background-color: #7b68ee;
            color: white;
            padding: 0.6rem 1.2rem;
            border-radius: 4px;
            text-decoration: none;
        }
    </style>
</head>
<body>
    <h1>ClickUp MCP Server</h1>
    <p>Connect your ClickUp workspace to authorize task and board management.</p>
    <p><a class="button" href="/oauth/clickup/authorize">Connect ClickUp</a></p>
    <p><a href="/api/health">Server health</a></p>
</body>
</html>
"#;

/// Setup paths, relative to a project root
#[derive(Debug, Clone)]
pub struct SetupPaths {
    pub root: PathBuf,
    pub logs_dir: PathBuf,
    pub public_dir: PathBuf,
    pub env_file: PathBuf,
    pub config_file: PathBuf,
    pub success_page: PathBuf,
    pub index_page: PathBuf,
}

impl SetupPaths {
    pub fn for_dir(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let public_dir = root.join("public");
        Self {
            logs_dir: root.join("logs"),
            env_file: root.join(".env"),
            config_file: root.join(CONFIG_FILE),
            success_page: public_dir.join("oauth-success.html"),
            index_page: public_dir.join("index.html"),
            public_dir,
            root,
        }
    }

    /// Setup paths for the current directory
    pub fn current() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(Self::for_dir(current_dir))
    }

    pub fn is_initialized(&self) -> bool {
        self.env_file.exists() && self.success_page.exists() && self.index_page.exists()
    }
}

/// Paths written by [`initialize`]
#[derive(Debug, Default)]
pub struct SetupReport {
    pub created: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Create directories and default files; existing files are kept unless `force`.
/// `port` is written into the generated `.env` and config file.
pub fn initialize(paths: &SetupPaths, force: bool, port: u16) -> Result<SetupReport> {
    let mut report = SetupReport::default();

    for dir in [&paths.logs_dir, &paths.public_dir] {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let files = [
        (&paths.env_file, env_template(port)),
        (&paths.config_file, config_template(port)),
        (&paths.success_page, OAUTH_SUCCESS_PAGE.to_string()),
        (&paths.index_page, INDEX_PAGE.to_string()),
    ];

    for (path, contents) in files {
        if write_if_absent(path, &contents, force)? {
            report.created.push(path.clone());
        } else {
            report.skipped.push(path.clone());
        }
    }

    Ok(report)
}

fn write_if_absent(path: &Path, contents: &str, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(true)
}
