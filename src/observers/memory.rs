// src/observers/memory.rs

use crate::error::ObserverResult;
use crate::model::{AuthorInfo, CommitInfo, RepositoryFileInfo};
use crate::observer::GitObserver;
use std::path::{Path, PathBuf};

/// Arguments of the `on_beginning_iteration` event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeginArgs {
    pub total_commits: usize,
    pub output_path: PathBuf,
    pub include_branch_details: bool,
}

/// One lifecycle event, in delivery order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Begin,
    NewAuthor(String),
    ProcessingCommit { sha: String, is_last: bool },
    ProcessingFile(String),
    ProcessedCommit(String),
    Progress(usize),
    Completed,
}

/// Keeps every event of a run in memory for later inspection
#[derive(Debug, Default)]
pub struct InMemoryCollector {
    pub begun: Option<BeginArgs>,
    pub new_authors: Vec<AuthorInfo>,
    /// Forwarded file records paired with the sha of their commit
    pub files: Vec<(RepositoryFileInfo, String)>,
    pub commits: Vec<CommitInfo>,
    /// `(percent, commit_index, total_commits)` for every tick
    pub progress: Vec<(f64, usize, usize)>,
    pub completed: bool,
    pub events: Vec<Event>,
}

impl InMemoryCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files recorded for one commit
    pub fn files_for(&self, sha: &str) -> impl Iterator<Item = &RepositoryFileInfo> {
        let sha = sha.to_string();
        self.files
            .iter()
            .filter(move |(_, commit)| *commit == sha)
            .map(|(file, _)| file)
    }

    pub fn commit(&self, sha: &str) -> Option<&CommitInfo> {
        self.commits.iter().find(|c| c.sha == sha)
    }
}

impl GitObserver for InMemoryCollector {
    fn on_beginning_iteration(
        &mut self,
        total_commits: usize,
        output_path: &Path,
        include_branch_details: bool,
    ) -> ObserverResult {
        self.begun = Some(BeginArgs {
            total_commits,
            output_path: output_path.to_path_buf(),
            include_branch_details,
        });
        self.events.push(Event::Begin);
        Ok(())
    }

    fn on_new_author(&mut self, author: &AuthorInfo) -> ObserverResult {
        self.new_authors.push(author.clone());
        self.events.push(Event::NewAuthor(author.email.clone()));
        Ok(())
    }

    fn on_processing_commit(&mut self, sha: &str, is_last: bool) -> ObserverResult {
        self.events.push(Event::ProcessingCommit {
            sha: sha.to_string(),
            is_last,
        });
        Ok(())
    }

    fn on_processing_file(
        &mut self,
        file: &RepositoryFileInfo,
        commit: &CommitInfo,
    ) -> ObserverResult {
        self.files.push((file.clone(), commit.sha.clone()));
        self.events.push(Event::ProcessingFile(file.path.clone()));
        Ok(())
    }

    fn on_processed_commit(&mut self, commit: &CommitInfo) -> ObserverResult {
        self.commits.push(commit.clone());
        self.events.push(Event::ProcessedCommit(commit.sha.clone()));
        Ok(())
    }

    fn update_progress(
        &mut self,
        percent: f64,
        commit_index: usize,
        total_commits: usize,
    ) -> ObserverResult {
        self.progress.push((percent, commit_index, total_commits));
        self.events.push(Event::Progress(commit_index));
        Ok(())
    }

    fn on_completed_iteration(&mut self, _output_path: &Path) -> ObserverResult {
        self.completed = true;
        self.events.push(Event::Completed);
        Ok(())
    }
}
