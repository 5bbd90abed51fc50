use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Variables managed by `config set` / `config list`, in prompt order
pub const MANAGED_KEYS: [&str; 4] = [
    "CLICKUP_CLIENT_ID",
    "CLICKUP_CLIENT_SECRET",
    "ENCRYPTION_KEY",
    "CLICKUP_REDIRECT_URI",
];

/// A `.env` file loaded into memory.
///
/// Entry order is preserved on save; keys not present are appended.
#[derive(Debug, Clone)]
pub struct EnvFile {
    path: PathBuf,
    entries: Vec<(String, String)>,
}

impl EnvFile {
    /// Read `path`; a missing file yields an empty set
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut entries = Vec::new();

        if path.exists() {
            let iter = dotenvy::from_path_iter(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            for item in iter {
                let (key, value) =
                    item.with_context(|| format!("Failed to parse {}", path.display()))?;
                entries.push((key, value));
            }
        }

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn save(&self) -> Result<()> {
        let mut contents = String::new();
        for (key, value) in &self.entries {
            contents.push_str(key);
            contents.push('=');
            contents.push_str(&quote(value));
            contents.push('\n');
        }
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

fn quote(value: &str) -> String {
    let plain = !value.is_empty()
        && !value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '#' | '"' | '\'' | '\\' | '$'));
    if plain {
        value.to_string()
    } else if !value.contains('\'') {
        // single quotes: no escapes, no substitution
        format!("'{value}'")
    } else {
        let escaped = value
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('$', "\\$");
        format!("\"{escaped}\"")
    }
}
