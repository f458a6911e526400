// src/authors.rs

use crate::author_map::{normalize_email, AuthorMap};
use crate::model::{AuthorId, AuthorInfo};
use crate::tree_info::GitTreeInfo;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Result of resolving one signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub id: AuthorId,
    /// First time this identity was seen in the run
    pub is_new: bool,
}

/// One entry per normalized identity for the lifetime of a run.
/// Entries are updated in place and never replaced.
#[derive(Debug, Default)]
pub struct AuthorRegistry {
    aliases: AuthorMap,
    authors: Vec<AuthorInfo>,
    by_key: HashMap<String, AuthorId>,
}

impl AuthorRegistry {
    pub fn new(aliases: AuthorMap) -> Self {
        Self {
            aliases,
            ..Self::default()
        }
    }

    /// Drops every author and installs a new alias table
    pub fn reset(&mut self, aliases: AuthorMap) {
        self.aliases = aliases;
        self.authors.clear();
        self.by_key.clear();
    }

    /// Finds or registers the identity behind a signature and widens its
    /// commit date bounds.
    pub fn resolve(&mut self, name: &str, email: &str, when: DateTime<Utc>) -> Resolution {
        let (key, display_name, is_bot) = match self.aliases.lookup(email) {
            Some(entry) => (
                normalize_email(entry.canonical_email()),
                entry.name.clone(),
                entry.bot,
            ),
            None => {
                let normalized = normalize_email(email);
                let key = if normalized.is_empty() {
                    name.trim().to_lowercase()
                } else {
                    normalized
                };
                (key, name.trim().to_string(), looks_like_bot(name))
            }
        };

        if let Some(&id) = self.by_key.get(&key) {
            let author = &mut self.authors[id - 1];
            if when < author.earliest_commit_utc {
                author.earliest_commit_utc = when;
            }
            if when > author.latest_commit_utc {
                author.latest_commit_utc = when;
            }
            return Resolution { id, is_new: false };
        }

        let id = self.authors.len() + 1;
        self.authors.push(AuthorInfo {
            id,
            name: display_name,
            email: key.clone(),
            is_bot,
            num_commits: 0,
            lines_added: 0,
            lines_deleted: 0,
            files_added: 0,
            files_deleted: 0,
            files_modified: 0,
            earliest_commit_utc: when,
            latest_commit_utc: when,
        });
        self.by_key.insert(key, id);
        Resolution { id, is_new: true }
    }

    /// Adds one authored commit and its filtered totals to the author
    pub fn record_commit(&mut self, id: AuthorId, tree: &GitTreeInfo) {
        let Some(author) = self.get_mut(id) else {
            return;
        };
        let counts = tree.forwarded_counts();
        author.num_commits += 1;
        author.lines_added += tree.lines_added();
        author.lines_deleted += tree.lines_deleted();
        author.files_added += counts.added;
        author.files_deleted += counts.deleted;
        author.files_modified += counts.modified;
    }

    /// # Panics
    /// If `id` was not issued by this registry since the last reset.
    pub fn author(&self, id: AuthorId) -> &AuthorInfo {
        &self.authors[id - 1]
    }

    pub fn get(&self, id: AuthorId) -> Option<&AuthorInfo> {
        id.checked_sub(1).and_then(|idx| self.authors.get(idx))
    }

    fn get_mut(&mut self, id: AuthorId) -> Option<&mut AuthorInfo> {
        id.checked_sub(1).and_then(|idx| self.authors.get_mut(idx))
    }

    pub fn authors(&self) -> &[AuthorInfo] {
        &self.authors
    }

    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }
}

fn looks_like_bot(name: &str) -> bool {
    name.trim().to_lowercase().ends_with("[bot]")
}
