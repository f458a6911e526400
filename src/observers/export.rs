// src/observers/export.rs

use crate::error::{ObserverError, ObserverResult};
use crate::model::{AuthorId, AuthorInfo, CommitInfo, FileState, FileStateSet, RepositoryFileInfo};
use crate::observer::GitObserver;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

pub const COMMITS_FILE: &str = "commits.jsonl";
pub const FILE_COMMITS_FILE: &str = "file_commits.jsonl";
pub const FILES_FILE: &str = "files.jsonl";
pub const WORK_ITEMS_FILE: &str = "work_items.jsonl";
pub const AUTHORS_FILE: &str = "authors.json";

/// One file change joined with the commit it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileCommitRow {
    pub commit_sha: String,
    pub path: String,
    pub old_path: Option<String>,
    pub file_sha: String,
    pub state: FileState,
    pub bytes: u64,
    pub lines: usize,
    pub lines_added: usize,
    pub lines_deleted: usize,
    pub author_id: AuthorId,
    pub author_name: String,
    pub author_email: String,
    pub author_date_utc: DateTime<Utc>,
    pub committer_email: String,
    pub message: String,
    pub is_merge: bool,
}

impl FileCommitRow {
    pub fn new(file: &RepositoryFileInfo, commit: &CommitInfo) -> Self {
        Self {
            commit_sha: commit.sha.clone(),
            path: file.path.clone(),
            old_path: file.old_path.clone(),
            file_sha: file.sha.clone(),
            state: file.state,
            bytes: file.bytes,
            lines: file.lines,
            lines_added: file.lines_added,
            lines_deleted: file.lines_deleted,
            author_id: commit.author.id,
            author_name: commit.author.name.clone(),
            author_email: commit.author.email.clone(),
            author_date_utc: commit.author_date_utc,
            committer_email: commit.committer.email.clone(),
            message: commit.message.clone(),
            is_merge: commit.is_merge(),
        }
    }
}

/// A work item reference found in a commit message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItemRow {
    pub work_item: String,
    pub commit_sha: String,
    pub author_email: String,
    pub author_date_utc: DateTime<Utc>,
}

struct Writers {
    commits: BufWriter<File>,
    file_commits: BufWriter<File>,
    files: BufWriter<File>,
    work_items: BufWriter<File>,
}

impl Writers {
    fn open(dir: &Path) -> std::io::Result<Self> {
        fs::create_dir_all(dir)?;
        let open = |name: &str| File::create(dir.join(name)).map(BufWriter::new);
        Ok(Self {
            commits: open(COMMITS_FILE)?,
            file_commits: open(FILE_COMMITS_FILE)?,
            files: open(FILES_FILE)?,
            work_items: open(WORK_ITEMS_FILE)?,
        })
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.commits.flush()?;
        self.file_commits.flush()?;
        self.files.flush()?;
        self.work_items.flush()
    }
}

fn write_line<W: Write, T: Serialize>(writer: &mut W, row: &T) -> ObserverResult {
    serde_json::to_writer(&mut *writer, row)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Writes the run as flat datasets into the output directory.
///
/// Streamed datasets are JSON Lines. Files are opened when the iteration
/// begins and closed when it completes; `authors.json` is written last.
pub struct DatasetExporter {
    states: FileStateSet,
    writers: Option<Writers>,
    authors: BTreeMap<AuthorId, AuthorInfo>,
    rows_written: usize,
}

impl Default for DatasetExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetExporter {
    pub fn new() -> Self {
        Self::with_states(FileStateSet::changes())
    }

    /// Only file records in one of `states` go to `file_commits.jsonl`.
    /// `Final` records always go to `files.jsonl`.
    pub fn with_states(states: FileStateSet) -> Self {
        Self {
            states,
            writers: None,
            authors: BTreeMap::new(),
            rows_written: 0,
        }
    }

    fn writers(&mut self) -> Result<&mut Writers, ObserverError> {
        self.writers.as_mut().ok_or_else(|| {
            ObserverError::InvalidState(
                "dataset exporter received an event before the iteration began".to_string(),
            )
        })
    }

    fn remember(&mut self, author: &AuthorInfo) {
        self.authors.insert(author.id, author.clone());
    }
}

impl GitObserver for DatasetExporter {
    fn on_beginning_iteration(
        &mut self,
        _total_commits: usize,
        output_path: &Path,
        _include_branch_details: bool,
    ) -> ObserverResult {
        self.writers = Some(Writers::open(output_path)?);
        self.authors.clear();
        self.rows_written = 0;
        debug!("Opened datasets in {}", output_path.display());
        Ok(())
    }

    fn on_new_author(&mut self, author: &AuthorInfo) -> ObserverResult {
        self.remember(author);
        Ok(())
    }

    fn on_processing_file(
        &mut self,
        file: &RepositoryFileInfo,
        commit: &CommitInfo,
    ) -> ObserverResult {
        if file.state == FileState::Final {
            let writers = self.writers()?;
            return write_line(&mut writers.files, file);
        }
        if !self.states.contains(file.state) {
            return Ok(());
        }
        let row = FileCommitRow::new(file, commit);
        write_line(&mut self.writers()?.file_commits, &row)?;
        self.rows_written += 1;
        Ok(())
    }

    fn on_processed_commit(&mut self, commit: &CommitInfo) -> ObserverResult {
        // The author snapshot wins when author and committer are one identity
        self.remember(&commit.committer);
        self.remember(&commit.author);

        let writers = self.writers()?;
        write_line(&mut writers.commits, commit)?;
        for work_item in &commit.work_items {
            let row = WorkItemRow {
                work_item: work_item.clone(),
                commit_sha: commit.sha.clone(),
                author_email: commit.author.email.clone(),
                author_date_utc: commit.author_date_utc,
            };
            write_line(&mut writers.work_items, &row)?;
        }
        Ok(())
    }

    fn on_completed_iteration(&mut self, output_path: &Path) -> ObserverResult {
        let mut writers = self.writers.take().ok_or_else(|| {
            ObserverError::InvalidState("dataset exporter completed before it began".to_string())
        })?;
        writers.flush()?;
        drop(writers);

        let authors: Vec<&AuthorInfo> = self.authors.values().collect();
        let file = BufWriter::new(File::create(output_path.join(AUTHORS_FILE))?);
        serde_json::to_writer_pretty(file, &authors)?;

        info!(
            "Exported {} file changes and {} authors to {}",
            self.rows_written,
            authors.len(),
            output_path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{author, commit, file};
    use chrono::TimeZone;

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_every_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("export");
        let mut ada = author(1, "ada@example.com");
        let mut info = commit("c1", ada.clone(), Utc.timestamp_opt(10, 0).unwrap());
        info.work_items = vec!["#12".to_string(), "PROJ-7".to_string()];

        let mut exporter = DatasetExporter::new();
        exporter.on_beginning_iteration(1, &out, false).unwrap();
        exporter.on_new_author(&ada).unwrap();
        exporter.on_processing_file(&file("a.rs", FileState::Added), &info).unwrap();
        exporter.on_processing_file(&file("gen.rs", FileState::Untracked), &info).unwrap();
        exporter.on_processing_file(&file("a.rs", FileState::Final), &info).unwrap();

        ada.num_commits = 1;
        info.author = ada.clone();
        exporter.on_processed_commit(&info).unwrap();
        exporter.on_completed_iteration(&out).unwrap();

        let rows = read_lines(&out.join(FILE_COMMITS_FILE));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["path"], "a.rs");
        assert_eq!(rows[0]["author_email"], "ada@example.com");
        assert_eq!(rows[0]["state"], "Added");

        assert_eq!(read_lines(&out.join(FILES_FILE)).len(), 1);
        assert_eq!(read_lines(&out.join(COMMITS_FILE)).len(), 1);
        assert_eq!(read_lines(&out.join(WORK_ITEMS_FILE)).len(), 2);

        let authors: Vec<AuthorInfo> =
            serde_json::from_str(&std::fs::read_to_string(out.join(AUTHORS_FILE)).unwrap())
                .unwrap();
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0].num_commits, 1);
    }

    #[test]
    fn test_custom_state_filter() {
        let dir = tempfile::tempdir().unwrap();
        let info = commit("c1", author(1, "a@b.c"), Utc.timestamp_opt(0, 0).unwrap());
        let mut exporter =
            DatasetExporter::with_states(FileStateSet::empty().with(FileState::Deleted));
        exporter.on_beginning_iteration(1, dir.path(), false).unwrap();
        exporter.on_processing_file(&file("a.rs", FileState::Added), &info).unwrap();
        exporter.on_processing_file(&file("b.rs", FileState::Deleted), &info).unwrap();
        exporter.on_completed_iteration(dir.path()).unwrap();

        let rows = read_lines(&dir.path().join(FILE_COMMITS_FILE));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["path"], "b.rs");
    }

    #[test]
    fn test_events_before_begin_are_rejected() {
        let info = commit("c1", author(1, "a@b.c"), Utc.timestamp_opt(0, 0).unwrap());
        let mut exporter = DatasetExporter::new();
        let err = exporter.on_processed_commit(&info).unwrap_err();
        assert!(matches!(err, ObserverError::InvalidState(_)));
    }
}
