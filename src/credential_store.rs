//! Credential Store
//!
//! Persists the bearer token between runs as `session.json` in the data
//! directory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::GroceryResult;

const SESSION_FILE: &str = "session.json";

/// Stored credential structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCredential {
    pub token: String,
}

/// File-backed store for the session credential
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<dir>/session.json`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SESSION_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored credential; unreadable files count as signed out
    pub fn load(&self) -> Option<StoredCredential> {
        let content = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<StoredCredential>(&content) {
            Ok(credential) if !credential.token.is_empty() => Some(credential),
            Ok(_) => None,
            Err(e) => {
                log::warn!("Ignoring unreadable credential file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    pub fn save(&self, credential: &StoredCredential) -> GroceryResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(credential)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Remove the stored credential; a missing file is not an error
    pub fn clear(&self) -> GroceryResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
