// src/model.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Uniquely identifies an author within one extraction run
pub type AuthorId = usize;

/// The classification of one file record relative to its prior known state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileState {
    Added,
    Deleted,
    Modified,
    Unmodified,
    Renamed,
    Copied,
    Conflicted,
    TypeChanged,
    Unreadable,
    Ignored,
    Untracked,
    /// Terminal snapshot of a file at HEAD
    Final,
}

impl FileState {
    pub const ALL: [FileState; 12] = [
        FileState::Added,
        FileState::Deleted,
        FileState::Modified,
        FileState::Unmodified,
        FileState::Renamed,
        FileState::Copied,
        FileState::Conflicted,
        FileState::TypeChanged,
        FileState::Unreadable,
        FileState::Ignored,
        FileState::Untracked,
        FileState::Final,
    ];

    fn bit(self) -> u16 {
        1 << (self as u16)
    }

    /// Folds the fine-grained state into the four rollup buckets.
    /// `Final` never appears in a diff and is reported as `None`.
    pub fn category(self) -> Option<ChangeCategory> {
        match self {
            FileState::Added | FileState::Copied => Some(ChangeCategory::Added),
            FileState::Deleted => Some(ChangeCategory::Deleted),
            FileState::Unmodified => Some(ChangeCategory::Unmodified),
            FileState::Final => None,
            _ => Some(ChangeCategory::Modified),
        }
    }
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Rollup bucket a file record counts towards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeCategory {
    Added,
    Deleted,
    Modified,
    Unmodified,
}

/// A set of states, used by sinks to choose which records they persist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileStateSet(u16);

impl FileStateSet {
    pub const fn empty() -> Self {
        FileStateSet(0)
    }

    pub fn all() -> Self {
        FileState::ALL.into_iter().collect()
    }

    /// Every state a per-commit file row is normally written for
    pub fn changes() -> Self {
        Self::all()
            .without(FileState::Final)
            .without(FileState::Ignored)
            .without(FileState::Untracked)
    }

    pub fn with(mut self, state: FileState) -> Self {
        self.insert(state);
        self
    }

    pub fn without(mut self, state: FileState) -> Self {
        self.0 &= !state.bit();
        self
    }

    pub fn insert(&mut self, state: FileState) {
        self.0 |= state.bit();
    }

    pub fn contains(&self, state: FileState) -> bool {
        self.0 & state.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<FileState> for FileStateSet {
    fn from_iter<I: IntoIterator<Item = FileState>>(iter: I) -> Self {
        let mut set = FileStateSet::empty();
        for state in iter {
            set.insert(state);
        }
        set
    }
}

/// One file's state as of one commit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryFileInfo {
    /// Content hash of the blob
    pub sha: String,
    pub path: String,
    /// Set only when the path changed (rename or copy)
    pub old_path: Option<String>,
    /// The commit this record belongs to
    pub commit: String,
    pub bytes: u64,
    pub lines: usize,
    pub lines_added: usize,
    pub lines_deleted: usize,
    pub state: FileState,
    pub created_at_utc: DateTime<Utc>,
}

impl RepositoryFileInfo {
    /// The final path component
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Extension including the leading dot, or an empty string
    pub fn extension(&self) -> &str {
        let name = self.name();
        match name.rfind('.') {
            Some(0) | None => "",
            Some(idx) => &name[idx..],
        }
    }

    /// A deletion record for this file. The content hash is kept so the same
    /// file can be followed over time.
    pub fn as_deleted(&self, commit: &str, when: DateTime<Utc>) -> RepositoryFileInfo {
        RepositoryFileInfo {
            old_path: None,
            commit: commit.to_string(),
            bytes: 0,
            lines: 0,
            lines_added: 0,
            lines_deleted: self.lines,
            state: FileState::Deleted,
            created_at_utc: when,
            ..self.clone()
        }
    }
}

impl fmt::Display for RepositoryFileInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} @ {} ({})",
            short_sha(&self.sha),
            self.path,
            short_sha(&self.commit),
            self.state
        )
    }
}

/// A logical author, possibly collapsed from several raw identities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorInfo {
    pub id: AuthorId,
    pub name: String,
    /// Canonical, lower-cased email
    pub email: String,
    pub is_bot: bool,
    pub num_commits: usize,
    pub lines_added: usize,
    pub lines_deleted: usize,
    pub files_added: usize,
    pub files_deleted: usize,
    pub files_modified: usize,
    pub earliest_commit_utc: DateTime<Utc>,
    pub latest_commit_utc: DateTime<Utc>,
}

impl fmt::Display for AuthorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {} commits from {} - {}",
            self.name,
            self.email,
            self.num_commits,
            self.earliest_commit_utc.format("%Y-%m-%d"),
            self.latest_commit_utc.format("%Y-%m-%d")
        )
    }
}

/// Summary of one commit, immutable once handed to observers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitInfo {
    pub sha: String,
    pub parent_sha: Option<String>,
    pub parent2_sha: Option<String>,
    /// First line of the message
    pub message: String,
    /// Registry state of the author after this commit was applied
    pub author: AuthorInfo,
    pub author_date_utc: DateTime<Utc>,
    pub committer: AuthorInfo,
    pub committer_date_utc: DateTime<Utc>,
    pub work_items: Vec<String>,
    pub total_files: usize,
    pub files_added: usize,
    pub files_deleted: usize,
    pub files_modified: usize,
    pub lines_added: usize,
    pub lines_deleted: usize,
    /// Line churn: added plus deleted
    pub total_lines: usize,
}

impl CommitInfo {
    pub fn is_merge(&self) -> bool {
        self.parent_sha.is_some() && self.parent2_sha.is_some()
    }

    pub fn net_lines(&self) -> i64 {
        self.lines_added as i64 - self.lines_deleted as i64
    }
}

impl fmt::Display for CommitInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} @ {}: {}",
            short_sha(&self.sha),
            self.author.name,
            self.author_date_utc.format("%Y-%m-%d %H:%M"),
            self.message
        )
    }
}

pub fn short_sha(sha: &str) -> &str {
    &sha[..sha.len().min(7)]
}
