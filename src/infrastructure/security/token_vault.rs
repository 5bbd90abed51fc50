use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::cipher::TokenCipher;
use crate::domain::error::SecurityError;
use crate::domain::models::TokenData;

/// Encrypted per-user token store.
///
/// Entries are held encrypted in memory. When a file path is set, the file
/// is the shared record between processes: a lookup miss re-reads it, and
/// every write starts from its current contents so entries stored by
/// another process are kept. Memory is updated only after the file write
/// succeeds.
pub struct TokenVault {
    cipher: TokenCipher,
    entries: RwLock<HashMap<String, String>>,
    path: Option<PathBuf>,
}

impl TokenVault {
    pub fn in_memory(cipher: TokenCipher) -> Self {
        Self {
            cipher,
            entries: RwLock::new(HashMap::new()),
            path: None,
        }
    }

    /// Open a file-backed vault, loading existing entries if the file exists
    pub async fn open(cipher: TokenCipher, path: PathBuf) -> Result<Self, SecurityError> {
        let entries = read_entries(&path).await?;
        info!(path = %path.display(), users = entries.len(), "token vault opened");

        Ok(Self {
            cipher,
            entries: RwLock::new(entries),
            path: Some(path),
        })
    }

    pub async fn store(&self, user_id: &str, token: &TokenData) -> Result<(), SecurityError> {
        let encrypted = self.cipher.encrypt_token(token)?;
        let mut entries = self.entries.write().await;

        let mut next = match &self.path {
            Some(path) => read_entries(path).await?,
            None => entries.clone(),
        };
        next.insert(user_id.to_string(), encrypted);
        self.persist(&next).await?;

        *entries = next;
        debug!(user_id, "token stored");
        Ok(())
    }

    pub async fn load(&self, user_id: &str) -> Result<Option<TokenData>, SecurityError> {
        if let Some(encrypted) = self.entries.read().await.get(user_id) {
            return self.cipher.decrypt_token(encrypted).map(Some);
        }

        let Some(path) = &self.path else {
            return Ok(None);
        };

        let mut entries = self.entries.write().await;
        *entries = read_entries(path).await?;
        entries
            .get(user_id)
            .map(|encrypted| self.cipher.decrypt_token(encrypted))
            .transpose()
    }

    async fn persist(&self, entries: &HashMap<String, String>) -> Result<(), SecurityError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write-then-rename so a crash never leaves a truncated file
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(entries)?).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

async fn read_entries(path: &Path) -> Result<HashMap<String, String>, SecurityError> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) if !contents.trim().is_empty() => Ok(serde_json::from_str(&contents)?),
        Ok(_) => Ok(HashMap::new()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
        Err(e) => Err(e.into()),
    }
}
