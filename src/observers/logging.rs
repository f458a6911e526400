// src/observers/logging.rs

use crate::error::ObserverResult;
use crate::model::{short_sha, AuthorInfo, CommitInfo, RepositoryFileInfo};
use crate::observer::GitObserver;
use std::path::Path;
use tracing::{debug, info, trace};

/// Mirrors every lifecycle event into the tracing output
#[derive(Debug, Default)]
pub struct LoggingObserver {
    total_commits: usize,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GitObserver for LoggingObserver {
    fn on_beginning_iteration(
        &mut self,
        total_commits: usize,
        output_path: &Path,
        include_branch_details: bool,
    ) -> ObserverResult {
        self.total_commits = total_commits;
        info!(
            "Beginning iteration over {} commits, writing to {} (branch details: {})",
            total_commits,
            output_path.display(),
            include_branch_details
        );
        Ok(())
    }

    fn on_new_author(&mut self, author: &AuthorInfo) -> ObserverResult {
        info!("New author #{}: {} <{}>", author.id, author.name, author.email);
        Ok(())
    }

    fn on_processing_commit(&mut self, sha: &str, is_last: bool) -> ObserverResult {
        if is_last {
            debug!("Processing last commit {}", short_sha(sha));
        } else {
            debug!("Processing commit {}", short_sha(sha));
        }
        Ok(())
    }

    fn on_processing_file(
        &mut self,
        file: &RepositoryFileInfo,
        _commit: &CommitInfo,
    ) -> ObserverResult {
        trace!("  {}", file);
        Ok(())
    }

    fn on_processed_commit(&mut self, commit: &CommitInfo) -> ObserverResult {
        debug!(
            "Processed {}: {} files (+{} -{} lines)",
            commit, commit.total_files, commit.lines_added, commit.lines_deleted
        );
        Ok(())
    }

    fn update_progress(
        &mut self,
        percent: f64,
        commit_index: usize,
        total_commits: usize,
    ) -> ObserverResult {
        debug!(
            "Progress {:.1}% ({}/{})",
            percent * 100.0,
            commit_index,
            total_commits
        );
        Ok(())
    }

    fn on_completed_iteration(&mut self, output_path: &Path) -> ObserverResult {
        info!(
            "Completed iteration over {} commits, output in {}",
            self.total_commits,
            output_path.display()
        );
        Ok(())
    }
}
