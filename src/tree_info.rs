// src/tree_info.rs

use crate::model::{ChangeCategory, FileState, RepositoryFileInfo};
use std::collections::HashSet;

/// Per-category file counts for one commit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeCounts {
    pub added: usize,
    pub deleted: usize,
    pub modified: usize,
    pub unmodified: usize,
}

impl ChangeCounts {
    pub fn total(&self) -> usize {
        self.added + self.deleted + self.modified + self.unmodified
    }

    fn count(&mut self, state: FileState) {
        match state.category() {
            Some(ChangeCategory::Added) => self.added += 1,
            Some(ChangeCategory::Deleted) => self.deleted += 1,
            Some(ChangeCategory::Modified) => self.modified += 1,
            Some(ChangeCategory::Unmodified) => self.unmodified += 1,
            None => {}
        }
    }
}

/// A tree entry the walker left out of the final snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub path: String,
    pub kind: &'static str,
}

#[derive(Debug, Clone)]
struct Tracked {
    info: RepositoryFileInfo,
    /// Passed the file filter and is delivered to observers
    forwarded: bool,
}

#[derive(Debug, Default)]
struct PathSet {
    entries: Vec<Tracked>,
    paths: HashSet<String>,
}

impl PathSet {
    fn register(&mut self, info: RepositoryFileInfo, forwarded: bool) -> bool {
        // First registration for a path wins
        if !self.paths.insert(info.path.clone()) {
            return false;
        }
        self.entries.push(Tracked { info, forwarded });
        true
    }
}

/// Deduplicated file records for one commit, plus the HEAD snapshot when the
/// commit is the tip.
#[derive(Debug, Default)]
pub struct GitTreeInfo {
    changes: PathSet,
    snapshot: PathSet,
    skipped: Vec<SkippedEntry>,
}

impl GitTreeInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a change record. Returns `false` if the path was already seen
    /// in this commit, in which case nothing changes.
    pub fn register(&mut self, file: RepositoryFileInfo, forwarded: bool) -> bool {
        self.changes.register(file, forwarded)
    }

    /// Registers a `Final` snapshot record, deduplicated separately from changes.
    pub fn register_final(&mut self, file: RepositoryFileInfo, forwarded: bool) -> bool {
        self.snapshot.register(file, forwarded)
    }

    pub fn record_skipped(&mut self, path: String, kind: &'static str) {
        self.skipped.push(SkippedEntry { path, kind });
    }

    pub fn contains(&self, path: &str) -> bool {
        self.changes.paths.contains(path)
    }

    pub fn find(&self, path: &str) -> Option<&RepositoryFileInfo> {
        self.changes
            .entries
            .iter()
            .map(|t| &t.info)
            .find(|f| f.path == path)
    }

    /// Every change record seen in the diff, filtered or not
    pub fn total_file_count(&self) -> usize {
        self.changes.entries.len()
    }

    pub fn counts(&self) -> ChangeCounts {
        let mut counts = ChangeCounts::default();
        for tracked in &self.changes.entries {
            counts.count(tracked.info.state);
        }
        counts
    }

    /// Counts restricted to records that passed the filter
    pub fn forwarded_counts(&self) -> ChangeCounts {
        let mut counts = ChangeCounts::default();
        for tracked in self.changes.entries.iter().filter(|t| t.forwarded) {
            counts.count(tracked.info.state);
        }
        counts
    }

    pub fn lines_added(&self) -> usize {
        self.counted().map(|f| f.lines_added).sum()
    }

    pub fn lines_deleted(&self) -> usize {
        self.counted().map(|f| f.lines_deleted).sum()
    }

    // Unmodified records never add to line totals
    fn counted(&self) -> impl Iterator<Item = &RepositoryFileInfo> {
        self.changes
            .entries
            .iter()
            .filter(|t| t.forwarded && t.info.state != FileState::Unmodified)
            .map(|t| &t.info)
    }

    pub fn files(&self) -> impl Iterator<Item = &RepositoryFileInfo> {
        self.changes.entries.iter().map(|t| &t.info)
    }

    pub fn final_files(&self) -> impl Iterator<Item = &RepositoryFileInfo> {
        self.snapshot.entries.iter().map(|t| &t.info)
    }

    /// Records to deliver to observers: changes first, then the snapshot
    pub fn forwarded(&self) -> impl Iterator<Item = &RepositoryFileInfo> {
        self.changes
            .entries
            .iter()
            .chain(self.snapshot.entries.iter())
            .filter(|t| t.forwarded)
            .map(|t| &t.info)
    }

    pub fn skipped_entries(&self) -> &[SkippedEntry] {
        &self.skipped
    }
}
