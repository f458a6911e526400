// src/extractor.rs

use crate::author_map::AuthorMap;
use crate::authors::AuthorRegistry;
use crate::error::{ExtractError, Result};
use crate::filter::FileFilter;
use crate::model::{AuthorId, AuthorInfo, CommitInfo};
use crate::observer::{GitObserver, ObserverSet};
use crate::options::ExtractionOptions;
use crate::repository;
use crate::tree_info::{GitTreeInfo, SkippedEntry};
use crate::walker::{to_utc, GitTreeWalker};
use crate::work_items::extract_work_items;
use git2::{Commit, Oid, Repository, Signature};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What a finished run produced
#[derive(Debug, Clone)]
pub struct ExtractionSummary {
    pub repository_root: PathBuf,
    pub commits_processed: usize,
    /// Every author in registration order, with final totals
    pub authors: Vec<AuthorInfo>,
    /// Number of `Final` snapshot records at HEAD
    pub final_files: usize,
    /// HEAD tree entries left out of the snapshot
    pub skipped_entries: Vec<SkippedEntry>,
}

/// Drives the tree walker over a repository's history and feeds observers.
///
/// Runs are strictly sequential. All per-run state is reset when a run
/// starts, so one extractor can be reused for several repositories.
pub struct GitDataExtractor<'a> {
    observers: ObserverSet<'a>,
    walker: GitTreeWalker,
    authors: AuthorRegistry,
}

impl Default for GitDataExtractor<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> GitDataExtractor<'a> {
    pub fn new() -> Self {
        Self {
            observers: ObserverSet::new(),
            walker: GitTreeWalker::new(),
            authors: AuthorRegistry::default(),
        }
    }

    pub fn with_observer(mut self, observer: &'a mut dyn GitObserver) -> Self {
        self.register(observer);
        self
    }

    pub fn register(&mut self, observer: &'a mut dyn GitObserver) {
        self.observers.push(observer);
    }

    pub fn extract_information(
        &mut self,
        options: &ExtractionOptions,
    ) -> Result<ExtractionSummary> {
        self.walker.clear();
        self.authors.reset(AuthorMap::default());

        if options.output_path.as_os_str().is_empty() {
            return Err(ExtractError::Configuration("an output path is required".to_string()));
        }
        let root = repository::find_repository_root(&options.repo_path)?;
        if let Some(map_path) = &options.author_map_path {
            self.authors.reset(AuthorMap::load(map_path)?);
        }

        let repo = repository::open_repository(&root)?;
        self.run(&repo, &root, options).map_err(|err| match err {
            ExtractError::Git(e) => repository::translate_git_error(e, &root),
            other => other,
        })
    }

    fn run(
        &mut self,
        repo: &Repository,
        root: &Path,
        options: &ExtractionOptions,
    ) -> Result<ExtractionSummary> {
        let filter = options.file_filter();

        // 1. Collect the commits, oldest first
        let commits = repository::collect_commits(repo, options.include_branch_details)?;
        let head = repository::head_commit_id(repo)?;
        self.walker.plan(repo, &commits)?;
        let total = commits.len();
        info!(
            "Analyzing {} commits in {} (branch details: {})",
            total,
            root.display(),
            options.include_branch_details
        );

        self.observers.beginning_iteration(
            total,
            &options.output_path,
            options.include_branch_details,
        )?;

        // 2. Walk each commit against its first parent
        let mut final_files = 0;
        let mut skipped_entries = Vec::new();
        for (i, oid) in commits.iter().enumerate() {
            let is_last = i + 1 == total;
            let sha = oid.to_string();
            self.observers.processing_commit(&sha, is_last)?;

            let commit = repo.find_commit(*oid)?;
            let is_head = head == Some(*oid);
            let (commit_info, tree_info) = self.process_commit(repo, &commit, is_head, &filter)?;

            for file in tree_info.forwarded() {
                self.observers.processing_file(file, &commit_info)?;
            }
            if is_head {
                final_files = tree_info.final_files().count();
                skipped_entries = tree_info.skipped_entries().to_vec();
            }
            self.observers.processed_commit(&commit_info)?;

            let done = i + 1;
            self.observers
                .update_progress(done as f64 / total as f64, done, total)?;
        }

        self.observers.completed_iteration(&options.output_path)?;
        info!(
            "Finished analyzing {} commits from {} authors",
            total,
            self.authors.len()
        );

        Ok(ExtractionSummary {
            repository_root: root.to_path_buf(),
            commits_processed: total,
            authors: self.authors.authors().to_vec(),
            final_files,
            skipped_entries,
        })
    }

    fn process_commit(
        &mut self,
        repo: &Repository,
        commit: &Commit,
        is_head: bool,
        filter: &FileFilter,
    ) -> Result<(CommitInfo, GitTreeInfo)> {
        let author_sig = commit.author();
        let committer_sig = commit.committer();
        let author_date_utc = to_utc(author_sig.when());
        let committer_date_utc = to_utc(committer_sig.when());

        let author_id = self.resolve_author(&author_sig)?;
        let committer_id = self.resolve_author(&committer_sig)?;

        let tree_info = self.walker.walk_commit_tree(repo, commit, is_head, filter)?;

        // Only the author is credited with the commit
        self.authors.record_commit(author_id, &tree_info);

        let counts = tree_info.forwarded_counts();
        let lines_added = tree_info.lines_added();
        let lines_deleted = tree_info.lines_deleted();
        let full_message = commit.message().unwrap_or("");

        let commit_info = CommitInfo {
            sha: commit.id().to_string(),
            parent_sha: parent_sha(commit, 0),
            parent2_sha: parent_sha(commit, 1),
            message: full_message.lines().next().unwrap_or("").trim().to_string(),
            author: self.authors.author(author_id).clone(),
            author_date_utc,
            committer: self.authors.author(committer_id).clone(),
            committer_date_utc,
            work_items: extract_work_items(full_message),
            total_files: tree_info.total_file_count(),
            files_added: counts.added,
            files_deleted: counts.deleted,
            files_modified: counts.modified,
            lines_added,
            lines_deleted,
            total_lines: lines_added + lines_deleted,
        };
        debug!("Processed {}", commit_info);

        Ok((commit_info, tree_info))
    }

    fn resolve_author(&mut self, signature: &Signature) -> Result<AuthorId> {
        let name = signature.name().unwrap_or("Unknown");
        let email = signature.email().unwrap_or("");
        let resolution = self.authors.resolve(name, email, to_utc(signature.when()));

        if resolution.is_new {
            let author = self.authors.author(resolution.id);
            debug!("New author {} <{}>", author.name, author.email);
            self.observers.new_author(author)?;
        }
        Ok(resolution.id)
    }
}

fn parent_sha(commit: &Commit, idx: usize) -> Option<String> {
    commit
        .parent_id(idx)
        .ok()
        .filter(|id: &Oid| !id.is_zero())
        .map(|id| id.to_string())
}
