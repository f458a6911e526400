// tests/walker.rs

mod common;

use common::{file, TestRepo, ADA, BOB};
use gitstract::repository::collect_commits;
use gitstract::walker::GitTreeWalker;
use gitstract::FileFilter;

#[test]
fn test_linear_history_caches_one_parent() {
    let mut repo = TestRepo::new();
    for i in 0..5 {
        let content = "line\n".repeat(i + 1);
        repo.commit(ADA, &format!("commit {}", i), &[file("a.txt", &content)]);
    }

    let commits = collect_commits(&repo.repo, false).unwrap();
    let head = *commits.last().unwrap();
    let filter = FileFilter::new();
    let mut walker = GitTreeWalker::new();
    walker.plan(&repo.repo, &commits).unwrap();

    for oid in &commits {
        let commit = repo.repo.find_commit(*oid).unwrap();
        walker
            .walk_commit_tree(&repo.repo, &commit, *oid == head, &filter)
            .unwrap();
        assert!(walker.cached_trees() <= 1);
    }
    // nothing diffs against HEAD
    assert_eq!(walker.cached_trees(), 0);
}

#[test]
fn test_branch_point_is_kept_for_every_child() {
    let mut repo = TestRepo::new();
    let base = repo.commit(ADA, "base", &[file("a.txt", "a\n")]);
    let feature = repo.commit_on(
        "refs/heads/feature",
        &[base],
        BOB,
        "feature",
        &[file("a.txt", "a\n"), file("f.txt", "f\n")],
    );
    let main = repo.commit(ADA, "main", &[file("a.txt", "a\nb\n")]);
    let merge = repo.commit_on(
        "HEAD",
        &[main, feature],
        ADA,
        "merge",
        &[file("a.txt", "a\nb\n"), file("f.txt", "f\n")],
    );

    let commits = collect_commits(&repo.repo, true).unwrap();
    assert_eq!(commits.len(), 4);
    let filter = FileFilter::new();
    let mut walker = GitTreeWalker::new();
    walker.plan(&repo.repo, &commits).unwrap();

    let walk = |walker: &mut GitTreeWalker, oid| {
        let commit = repo.repo.find_commit(oid).unwrap();
        walker
            .walk_commit_tree(&repo.repo, &commit, oid == merge, &filter)
            .unwrap()
    };

    walk(&mut walker, base);
    assert_eq!(walker.cached_trees(), 1);
    // base is still needed by main after the feature commit
    walk(&mut walker, feature);
    assert_eq!(walker.cached_trees(), 1);
    walk(&mut walker, main);
    assert_eq!(walker.cached_trees(), 1);
    let merged = walk(&mut walker, merge);
    assert_eq!(walker.cached_trees(), 0);
    assert_eq!(merged.forwarded_counts().added, 0);
}

#[test]
fn test_unplanned_walker_keeps_every_commit() {
    let mut repo = TestRepo::new();
    repo.commit(ADA, "one", &[file("a.txt", "1\n")]);
    repo.commit(ADA, "two", &[file("a.txt", "2\n")]);

    let commits = collect_commits(&repo.repo, false).unwrap();
    let filter = FileFilter::new();
    let mut walker = GitTreeWalker::new();
    for oid in &commits {
        let commit = repo.repo.find_commit(*oid).unwrap();
        walker.walk_commit_tree(&repo.repo, &commit, false, &filter).unwrap();
    }
    assert_eq!(walker.cached_trees(), 2);

    walker.clear();
    assert_eq!(walker.cached_trees(), 0);
}
