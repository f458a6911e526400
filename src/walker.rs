// src/walker.rs

use crate::classifier::classify_change;
use crate::error::{ExtractError, Result};
use crate::filter::FileFilter;
use crate::model::{short_sha, FileState, RepositoryFileInfo};
use crate::tree_info::GitTreeInfo;
use chrono::{DateTime, TimeZone, Utc};
use git2::{
    Blob, Commit, Delta, Diff, DiffDelta, DiffFindOptions, DiffOptions, Oid, Patch, Repository,
    Tree,
};
use std::collections::{HashMap, HashSet, VecDeque};
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, warn};

// Raw git file modes
const MODE_TREE: i32 = 0o040000;
const MODE_BLOB: i32 = 0o100644;
const MODE_BLOB_GROUP_WRITABLE: i32 = 0o100664;
const MODE_BLOB_EXECUTABLE: i32 = 0o100755;
const MODE_LINK: i32 = 0o120000;
const MODE_COMMIT: i32 = 0o160000;

/// Computes per-commit file records, carrying just enough state between
/// commits to spot unchanged content and vanished paths.
///
/// Commits must be fed parents first; the caches assume it.
#[derive(Debug, Default)]
pub struct GitTreeWalker {
    /// path -> last record seen for that path
    last_known: HashMap<String, RepositoryFileInfo>,
    /// commit -> live records it registered
    trees: HashMap<Oid, Vec<RepositoryFileInfo>>,
    /// commit -> planned commits that still have to diff against it
    pending_children: HashMap<Oid, usize>,
    planned: bool,
}

impl GitTreeWalker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets everything learned by earlier runs
    pub fn clear(&mut self) {
        self.last_known.clear();
        self.trees.clear();
        self.pending_children.clear();
        self.planned = false;
    }

    /// Declares the commits about to be walked so cached parent records can
    /// be dropped as soon as their last first-parent child has been seen.
    /// Without a plan every commit's records stay cached for the whole run.
    pub fn plan(&mut self, repo: &Repository, commits: &[Oid]) -> Result<()> {
        self.pending_children.clear();
        for oid in commits {
            let commit = repo.find_commit(*oid)?;
            if let Ok(parent) = commit.parent_id(0) {
                *self.pending_children.entry(parent).or_insert(0) += 1;
            }
        }
        self.planned = true;
        Ok(())
    }

    /// Number of commits whose records are currently cached
    pub fn cached_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn walk_commit_tree(
        &mut self,
        repo: &Repository,
        commit: &Commit,
        is_head: bool,
        filter: &FileFilter,
    ) -> Result<GitTreeInfo> {
        let mut tree_info = GitTreeInfo::new();
        let sha = commit.id().to_string();
        let when = commit_time(commit);
        let tree = commit.tree()?;

        let parent = if commit.parent_count() > 0 {
            Some(commit.parent(0)?)
        } else {
            None
        };
        let parent_tree = parent.as_ref().map(|p| p.tree()).transpose()?;

        // 1. Diff against the first parent; the root commit diffs against nothing
        let mut diff_opts = DiffOptions::new();
        diff_opts.include_untracked(false);
        diff_opts.ignore_filemode(true);
        let mut diff =
            repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut diff_opts))?;

        let mut find_opts = DiffFindOptions::new();
        find_opts.renames(true);
        diff.find_similar(Some(&mut find_opts))?;

        let mut renamed_from = HashSet::new();
        let mut already_removed = HashSet::new();
        for idx in 0..diff.deltas().len() {
            let Some(delta) = diff.get_delta(idx) else {
                continue;
            };
            let file = self.describe_delta(repo, &diff, idx, &delta, &sha, when)?;
            if delta.status() == Delta::Deleted && file.state == FileState::Unmodified {
                already_removed.insert(file.path.clone());
            }
            if let Some(old) = &file.old_path {
                if file.state == FileState::Renamed {
                    renamed_from.insert(old.clone());
                }
            }
            let forwarded = filter.accepts(&file);
            tree_info.register(file, forwarded);
        }

        // 2. Paths the parent knew about that are gone from this tree
        if let Some(parent) = &parent {
            let parent_id = parent.id();
            self.detect_deletions(
                parent_id,
                &tree,
                &renamed_from,
                &sha,
                when,
                filter,
                &mut tree_info,
            );
            self.release_parent(parent_id);
        }

        self.remember(commit.id(), &tree_info, &already_removed);

        // 3. The tip also gets a full snapshot of its tree
        if is_head {
            self.walk_tree(repo, &tree, &sha, when, filter, &mut tree_info)?;
        }

        debug!(
            "Walked {}: {} files, {} forwarded",
            short_sha(&sha),
            tree_info.total_file_count(),
            tree_info.forwarded().count()
        );
        Ok(tree_info)
    }

    fn describe_delta(
        &self,
        repo: &Repository,
        diff: &Diff,
        idx: usize,
        delta: &DiffDelta,
        sha: &str,
        when: DateTime<Utc>,
    ) -> Result<RepositoryFileInfo> {
        let mut state = classify_change(delta.status());
        let new_file = delta.new_file();
        let old_file = delta.old_file();

        let new_path = path_string(new_file.path());
        let old_path = path_string(old_file.path());
        let path = if state == FileState::Deleted {
            old_path.clone().or(new_path)
        } else {
            new_path.or(old_path.clone())
        }
        .unwrap_or_default();
        let old_path = old_path.filter(|old| *old != path);

        let (mut lines_added, mut lines_deleted) = match Patch::from_diff(diff, idx)? {
            Some(patch) => {
                let (_, additions, deletions) = patch.line_stats()?;
                (additions, deletions)
            }
            None => (0, 0),
        };

        let (content_id, bytes, lines) = if state == FileState::Deleted {
            (old_file.id(), 0, 0)
        } else {
            let (bytes, lines) = measure_blob(repo, new_file.id(), new_file.mode().into(), &path)?;
            (new_file.id(), bytes, lines)
        };

        // Content already seen at this path, or a path already removed by an
        // earlier commit (e.g. branch work brought in again by a merge)
        let seen = match self.last_known.get(&path) {
            Some(known) => state != FileState::Deleted && known.sha == content_id.to_string(),
            None => state == FileState::Deleted,
        };
        if seen {
            state = FileState::Unmodified;
            lines_added = 0;
            lines_deleted = 0;
        }

        Ok(RepositoryFileInfo {
            sha: content_id.to_string(),
            path,
            old_path,
            commit: sha.to_string(),
            bytes,
            lines,
            lines_added,
            lines_deleted,
            state,
            created_at_utc: when,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn detect_deletions(
        &self,
        parent: Oid,
        tree: &Tree,
        renamed_from: &HashSet<String>,
        sha: &str,
        when: DateTime<Utc>,
        filter: &FileFilter,
        tree_info: &mut GitTreeInfo,
    ) {
        let Some(parent_files) = self.trees.get(&parent) else {
            return;
        };
        for known in parent_files {
            if tree_info.contains(&known.path)
                || renamed_from.contains(&known.path)
                || tree.get_path(Path::new(&known.path)).is_ok()
            {
                continue;
            }
            let deleted = known.as_deleted(sha, when);
            let forwarded = filter.accepts(&deleted);
            tree_info.register(deleted, forwarded);
        }
    }

    fn release_parent(&mut self, parent: Oid) {
        if !self.planned {
            return;
        }
        if let Some(remaining) = self.pending_children.get_mut(&parent) {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                self.pending_children.remove(&parent);
                self.trees.remove(&parent);
            }
        }
    }

    fn remember(
        &mut self,
        commit: Oid,
        tree_info: &GitTreeInfo,
        already_removed: &HashSet<String>,
    ) {
        let mut live = Vec::new();
        for file in tree_info.files() {
            if already_removed.contains(&file.path) {
                continue;
            }
            if let Some(old) = &file.old_path {
                if file.state == FileState::Renamed {
                    self.last_known.remove(old);
                }
            }
            if file.state == FileState::Deleted {
                self.last_known.remove(&file.path);
            } else {
                self.last_known.insert(file.path.clone(), file.clone());
                live.push(file.clone());
            }
        }
        if !self.planned || self.pending_children.contains_key(&commit) {
            self.trees.insert(commit, live);
        }
    }

    /// Breadth-first walk over the whole tree using an explicit queue.
    fn walk_tree(
        &self,
        repo: &Repository,
        root: &Tree,
        sha: &str,
        when: DateTime<Utc>,
        filter: &FileFilter,
        tree_info: &mut GitTreeInfo,
    ) -> Result<()> {
        let mut queue: VecDeque<(String, Tree)> = VecDeque::new();
        queue.push_back((String::new(), root.clone()));

        while let Some((prefix, tree)) = queue.pop_front() {
            for entry in tree.iter() {
                let Some(name) = entry.name() else {
                    warn!("Skipping tree entry with a non UTF-8 name under '{}'", prefix);
                    continue;
                };
                let path = format!("{}{}", prefix, name);

                match entry.filemode() {
                    MODE_TREE => {
                        let subtree = repo.find_tree(entry.id())?;
                        queue.push_back((format!("{}/", path), subtree));
                    }
                    MODE_BLOB | MODE_BLOB_GROUP_WRITABLE => {
                        let blob = repo.find_blob(entry.id())?;
                        let created_at_utc = self
                            .last_known
                            .get(&path)
                            .map_or(when, |known| known.created_at_utc);
                        let file = RepositoryFileInfo {
                            sha: entry.id().to_string(),
                            path,
                            old_path: None,
                            commit: sha.to_string(),
                            bytes: blob.size() as u64,
                            lines: count_lines(&blob),
                            lines_added: 0,
                            lines_deleted: 0,
                            state: FileState::Final,
                            created_at_utc,
                        };
                        let forwarded = filter.accepts(&file);
                        tree_info.register_final(file, forwarded);
                    }
                    mode => {
                        let kind = unsupported_kind(mode);
                        let skipped = ExtractError::UnsupportedTreeEntry {
                            path: path.clone(),
                            kind,
                        };
                        warn!("{}", skipped);
                        tree_info.record_skipped(path, kind);
                    }
                }
            }
        }
        Ok(())
    }
}

fn unsupported_kind(mode: i32) -> &'static str {
    match mode {
        MODE_LINK => "symbolic link",
        MODE_COMMIT => "git link",
        MODE_BLOB_EXECUTABLE => "executable file",
        _ => "tree entry",
    }
}

/// Size and line count of the blob behind a diff side. Non-blob modes
/// (links, submodules) measure as empty.
fn measure_blob(repo: &Repository, id: Oid, mode: u32, path: &str) -> Result<(u64, usize)> {
    if id.is_zero() {
        return Ok((0, 0));
    }
    match mode as i32 {
        MODE_BLOB | MODE_BLOB_GROUP_WRITABLE | MODE_BLOB_EXECUTABLE => {
            let blob = repo.find_blob(id)?;
            Ok((blob.size() as u64, count_lines(&blob)))
        }
        mode => {
            debug!("Not measuring {} at '{}'", unsupported_kind(mode), path);
            Ok((0, 0))
        }
    }
}

pub fn count_lines(blob: &Blob) -> usize {
    if blob.is_binary() {
        return 0;
    }
    blob.content().lines().count()
}

fn path_string(path: Option<&Path>) -> Option<String> {
    path.map(|p| p.to_string_lossy().replace('\\', "/"))
}

pub fn commit_time(commit: &Commit) -> DateTime<Utc> {
    to_utc(commit.time())
}

pub fn to_utc(time: git2::Time) -> DateTime<Utc> {
    Utc.timestamp_opt(time.seconds(), 0)
        .single()
        .unwrap_or_default()
}
