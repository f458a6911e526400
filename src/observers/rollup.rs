// src/observers/rollup.rs

use crate::error::ObserverResult;
use crate::model::{AuthorId, CommitInfo};
use crate::observer::GitObserver;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

/// Width of a rollup bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    Daily,
    /// ISO 8601 weeks, Monday first
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Period {
    /// Sortable key of the bucket holding `when`
    pub fn bucket(self, when: DateTime<Utc>) -> String {
        match self {
            Period::Daily => when.format("%Y-%m-%d").to_string(),
            Period::Weekly => {
                let week = when.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Period::Monthly => when.format("%Y-%m").to_string(),
            Period::Quarterly => format!("{}-Q{}", when.year(), (when.month() - 1) / 3 + 1),
            Period::Yearly => when.year().to_string(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Quarterly => "quarterly",
            Period::Yearly => "yearly",
        }
    }

    pub fn file_name(self) -> String {
        format!("author_{}_commits.json", self.name())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Totals for one author within one bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRollup {
    pub author_id: AuthorId,
    pub author_name: String,
    pub author_email: String,
    pub period: String,
    pub commits: usize,
    pub lines_added: usize,
    pub lines_deleted: usize,
    pub files_added: usize,
    pub files_deleted: usize,
    pub files_modified: usize,
    pub first_commit_utc: DateTime<Utc>,
    pub last_commit_utc: DateTime<Utc>,
}

impl PeriodRollup {
    fn start(commit: &CommitInfo, period: String) -> Self {
        Self {
            author_id: commit.author.id,
            author_name: commit.author.name.clone(),
            author_email: commit.author.email.clone(),
            period,
            commits: 0,
            lines_added: 0,
            lines_deleted: 0,
            files_added: 0,
            files_deleted: 0,
            files_modified: 0,
            first_commit_utc: commit.author_date_utc,
            last_commit_utc: commit.author_date_utc,
        }
    }

    fn add(&mut self, commit: &CommitInfo) {
        self.commits += 1;
        self.lines_added += commit.lines_added;
        self.lines_deleted += commit.lines_deleted;
        self.files_added += commit.files_added;
        self.files_deleted += commit.files_deleted;
        self.files_modified += commit.files_modified;
        self.first_commit_utc = self.first_commit_utc.min(commit.author_date_utc);
        self.last_commit_utc = self.last_commit_utc.max(commit.author_date_utc);
    }
}

/// Per-author commit totals bucketed by author date.
///
/// With branch details on, merge commits are skipped so work done on a
/// branch is not counted a second time when it lands.
#[derive(Debug)]
pub struct AuthorPeriodRollup {
    period: Period,
    persist: bool,
    skip_merges: bool,
    output_path: Option<PathBuf>,
    rollups: BTreeMap<(AuthorId, String), PeriodRollup>,
}

impl AuthorPeriodRollup {
    pub fn new(period: Period) -> Self {
        Self {
            period,
            persist: false,
            skip_merges: false,
            output_path: None,
            rollups: BTreeMap::new(),
        }
    }

    /// Write `author_<period>_commits.json` into the output directory on completion
    pub fn persisted(mut self) -> Self {
        self.persist = true;
        self
    }

    /// Rollups ordered by author id, then bucket
    pub fn rollups(&self) -> impl Iterator<Item = &PeriodRollup> {
        self.rollups.values()
    }

    pub fn get(&self, author_id: AuthorId, bucket: &str) -> Option<&PeriodRollup> {
        self.rollups.get(&(author_id, bucket.to_string()))
    }

    /// Where the rollup file goes for an output directory
    pub fn output_file(&self, output_path: &Path) -> PathBuf {
        output_path.join(self.period.file_name())
    }

    fn write(&self, output_path: &Path) -> ObserverResult {
        fs::create_dir_all(output_path)?;
        let path = self.output_file(output_path);
        let writer = BufWriter::new(File::create(&path)?);
        let rows: Vec<&PeriodRollup> = self.rollups.values().collect();
        serde_json::to_writer_pretty(writer, &rows)?;
        info!("Wrote {} {} rollups to {}", rows.len(), self.period, path.display());
        Ok(())
    }
}

impl GitObserver for AuthorPeriodRollup {
    fn on_beginning_iteration(
        &mut self,
        _total_commits: usize,
        output_path: &Path,
        include_branch_details: bool,
    ) -> ObserverResult {
        self.rollups.clear();
        self.skip_merges = include_branch_details;
        self.output_path = Some(output_path.to_path_buf());
        Ok(())
    }

    fn on_processed_commit(&mut self, commit: &CommitInfo) -> ObserverResult {
        if self.skip_merges && commit.is_merge() {
            return Ok(());
        }
        let bucket = self.period.bucket(commit.author_date_utc);
        self.rollups
            .entry((commit.author.id, bucket.clone()))
            .or_insert_with(|| PeriodRollup::start(commit, bucket))
            .add(commit);
        Ok(())
    }

    fn on_completed_iteration(&mut self, output_path: &Path) -> ObserverResult {
        if !self.persist {
            return Ok(());
        }
        let target = self.output_path.clone().unwrap_or_else(|| output_path.to_path_buf());
        self.write(&target)
    }
}
