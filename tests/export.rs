// tests/export.rs

mod common;

use common::{file, TestRepo, ADA, BOB};
use gitstract::observers::export::{
    AUTHORS_FILE, COMMITS_FILE, FILES_FILE, FILE_COMMITS_FILE, WORK_ITEMS_FILE,
};
use gitstract::observers::{
    AuthorPeriodRollup, DatasetExporter, FileCommitRow, Period, PeriodRollup,
};
use gitstract::{
    AuthorInfo, CommitInfo, ExtractionOptions, FileState, GitDataExtractor, RepositoryFileInfo,
};
use serde::de::DeserializeOwned;
use std::path::Path;

fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_datasets_written_end_to_end() {
    let mut repo = TestRepo::new();
    repo.commit(ADA, "Start PROJ-1", &[file("a.rs", "fn a() {}\n")]);
    repo.commit(
        BOB,
        "Add b, fixes #7",
        &[file("a.rs", "fn a() {}\n"), file("b.rs", "fn b() {}\n")],
    );
    repo.commit(ADA, "Remove a", &[file("b.rs", "fn b() {}\n")]);

    let out = repo.path().join("datasets");
    let mut exporter = DatasetExporter::new();
    let mut monthly = AuthorPeriodRollup::new(Period::Monthly).persisted();
    GitDataExtractor::new()
        .with_observer(&mut exporter)
        .with_observer(&mut monthly)
        .extract_information(&ExtractionOptions::new(repo.path(), &out))
        .unwrap();

    let commits: Vec<CommitInfo> = read_jsonl(&out.join(COMMITS_FILE));
    assert_eq!(commits.len(), 3);
    assert_eq!(commits[2].files_deleted, 1);

    let rows: Vec<FileCommitRow> = read_jsonl(&out.join(FILE_COMMITS_FILE));
    let states: Vec<(&str, FileState)> = rows.iter().map(|r| (r.path.as_str(), r.state)).collect();
    assert_eq!(
        states,
        vec![
            ("a.rs", FileState::Added),
            ("b.rs", FileState::Added),
            ("a.rs", FileState::Deleted),
        ]
    );
    assert_eq!(rows[1].author_email, "bob@example.com");
    assert_eq!(rows[1].message, "Add b, fixes #7");

    let finals: Vec<RepositoryFileInfo> = read_jsonl(&out.join(FILES_FILE));
    assert_eq!(finals.len(), 1);
    assert_eq!(finals[0].path, "b.rs");

    let work_items: Vec<serde_json::Value> = read_jsonl(&out.join(WORK_ITEMS_FILE));
    let ids: Vec<&str> = work_items.iter().filter_map(|w| w["work_item"].as_str()).collect();
    assert_eq!(ids, vec!["PROJ-1", "#7"]);

    let authors: Vec<AuthorInfo> =
        serde_json::from_str(&std::fs::read_to_string(out.join(AUTHORS_FILE)).unwrap()).unwrap();
    assert_eq!(authors.len(), 2);
    assert_eq!(authors[0].num_commits, 2);
    assert_eq!(authors[0].files_deleted, 1);

    // All three commits fall in September 2020
    let rollups: Vec<PeriodRollup> = serde_json::from_str(
        &std::fs::read_to_string(out.join("author_monthly_commits.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(rollups.len(), 2);
    assert_eq!(rollups[0].period, "2020-09");
    assert_eq!(rollups[0].commits, 2);
    assert_eq!(monthly.rollups().count(), 2);
}
