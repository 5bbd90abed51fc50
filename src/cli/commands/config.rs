//! Implementation of the `config` command: edits `.env` in the working directory.

use anyhow::{bail, Context, Result};
use console::Term;
use serde::Serialize;
use std::path::Path;

use crate::cli::output::{mask, output, success, CommandOutput};
use crate::cli::types::ConfigCommands;
use crate::infrastructure::config::{EnvFile, MANAGED_KEYS};
use crate::infrastructure::setup::SetupPaths;

const SECRET_KEYS: [&str; 2] = ["CLICKUP_CLIENT_SECRET", "ENCRYPTION_KEY"];

fn is_secret(key: &str) -> bool {
    SECRET_KEYS.contains(&key)
}

#[derive(Debug, Serialize)]
pub struct SetOutput {
    pub updated: Vec<String>,
    pub path: String,
}

impl CommandOutput for SetOutput {
    fn to_human(&self) -> String {
        if self.updated.is_empty() {
            return "No changes".to_string();
        }
        self.updated
            .iter()
            .map(|key| success(&format!("Set {key}")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Serialize)]
pub struct GetOutput {
    pub key: String,
    pub value: Option<String>,
}

impl CommandOutput for GetOutput {
    fn to_human(&self) -> String {
        format!("{}={}", self.key, self.value.as_deref().unwrap_or_default())
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ListEntry {
    pub key: String,
    pub set: bool,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct ListOutput {
    pub path: String,
    pub entries: Vec<ListEntry>,
}

impl CommandOutput for ListOutput {
    fn to_human(&self) -> String {
        let mut lines = vec!["\nCurrent environment variables:".to_string()];
        for entry in &self.entries {
            let status = if entry.set { "✅" } else { "❌" };
            lines.push(format!("{status} {}={}", entry.key, entry.value));
        }
        lines.join("\n")
    }
}

pub fn execute(command: ConfigCommands, json_mode: bool) -> Result<()> {
    let paths = SetupPaths::current()?;
    let term = Term::stderr();

    match command {
        ConfigCommands::Set { key, value } => {
            let mut env = EnvFile::load(&paths.env_file)?;
            let updated = match (key, value) {
                (Some(key), Some(value)) => {
                    validate_key(&key)?;
                    env.set(&key, &value);
                    vec![key]
                }
                (Some(key), None) => {
                    validate_key(&key)?;
                    prompt_keys(&term, &mut env, &[key.as_str()])?
                }
                (None, _) => {
                    term.write_line("\n📝 Setting up environment variables...\n")?;
                    prompt_keys(&term, &mut env, &MANAGED_KEYS)?
                }
            };
            if !updated.is_empty() {
                env.save()?;
            }
            output(
                &SetOutput {
                    updated,
                    path: env.path().display().to_string(),
                },
                json_mode,
            );
        }
        ConfigCommands::Get { key } => {
            let env = EnvFile::load(&paths.env_file)?;
            output(
                &GetOutput {
                    value: env.get(&key).map(ToOwned::to_owned),
                    key,
                },
                json_mode,
            );
        }
        ConfigCommands::List => {
            output(&list(&paths.env_file)?, json_mode);
        }
    }

    Ok(())
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() || key.contains('=') || key.chars().any(char::is_whitespace) {
        bail!("Invalid variable name: {key:?}");
    }
    Ok(())
}

/// Prompt for each key; an empty answer keeps the current value
fn prompt_keys(term: &Term, env: &mut EnvFile, keys: &[&str]) -> Result<Vec<String>> {
    let mut updated = Vec::new();
    for &key in keys {
        let current = env.get(key).map(ToOwned::to_owned);
        let hint = match current {
            Some(ref v) if is_secret(key) => format!(" (current: {})", mask(v)),
            Some(ref v) => format!(" (current: {v})"),
            None => String::new(),
        };
        term.write_str(&format!("Enter value for {key}{hint}: "))?;

        let answer = if is_secret(key) {
            term.read_secure_line()
        } else {
            term.read_line()
        }
        .with_context(|| format!("Failed to read value for {key}"))?;

        if let Some(value) = resolve_answer(&answer) {
            env.set(key, &value);
            updated.push(key.to_string());
        }
    }
    Ok(updated)
}

fn resolve_answer(answer: &str) -> Option<String> {
    let answer = answer.trim();
    (!answer.is_empty()).then(|| answer.to_string())
}

/// Managed keys with their status; secrets masked
pub fn list(env_path: &Path) -> Result<ListOutput> {
    let env = EnvFile::load(env_path)?;
    let entries = MANAGED_KEYS
        .iter()
        .map(|&key| {
            let value = env.get(key).filter(|v| !v.is_empty());
            ListEntry {
                key: key.to_string(),
                set: value.is_some(),
                value: match value {
                    Some(v) if is_secret(key) => mask(v),
                    Some(v) => v.to_string(),
                    None => String::new(),
                },
            }
        })
        .collect();

    Ok(ListOutput {
        path: env_path.display().to_string(),
        entries,
    })
}
