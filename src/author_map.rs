// src/author_map.rs

use crate::error::{ExtractError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// One logical author in the alias file. The first email is canonical.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthorMapEntry {
    #[serde(rename = "Name", alias = "name")]
    pub name: String,
    #[serde(rename = "Bot", alias = "bot", default)]
    pub bot: bool,
    #[serde(rename = "Emails", alias = "emails", default)]
    pub emails: Vec<String>,
}

impl AuthorMapEntry {
    pub fn canonical_email(&self) -> &str {
        self.emails.first().map(|e| e.as_str()).unwrap_or("")
    }
}

/// Alias table collapsing several raw identities into one author
#[derive(Debug, Clone, Default)]
pub struct AuthorMap {
    entries: Vec<AuthorMapEntry>,
    by_email: HashMap<String, usize>,
}

impl AuthorMap {
    pub fn from_entries(entries: Vec<AuthorMapEntry>) -> std::result::Result<Self, String> {
        let mut by_email = HashMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(format!("entry {} has no name", idx + 1));
            }
            if entry.emails.iter().all(|e| e.trim().is_empty()) {
                return Err(format!("'{}' has no emails", entry.name));
            }
            for email in &entry.emails {
                let key = normalize_email(email);
                if key.is_empty() {
                    continue;
                }
                // Earlier entries keep an email listed twice
                by_email.entry(key).or_insert(idx);
            }
        }
        Ok(Self { entries, by_email })
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ExtractError::AuthorMapMissing {
                path: path.to_path_buf(),
            });
        }
        let text = fs::read_to_string(path)?;
        let entries: Vec<AuthorMapEntry> =
            serde_json::from_str(&text).map_err(|source| ExtractError::AuthorMapInvalid {
                path: path.to_path_buf(),
                source,
            })?;
        let map = Self::from_entries(entries).map_err(|reason| ExtractError::MalformedAuthorMap {
            path: path.to_path_buf(),
            reason,
        })?;
        debug!("Loaded {} author aliases from {}", map.len(), path.display());
        Ok(map)
    }

    pub fn lookup(&self, email: &str) -> Option<&AuthorMapEntry> {
        self.by_email
            .get(&normalize_email(email))
            .map(|&idx| &self.entries[idx])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
