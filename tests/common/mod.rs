// tests/common/mod.rs

#![allow(dead_code)]

use git2::{Index, IndexEntry, IndexTime, Oid, Repository, Signature, Time};
use std::path::Path;
use tempfile::TempDir;

pub const ADA: (&str, &str) = ("Ada Lovelace", "ada@example.com");
pub const BOB: (&str, &str) = ("Bob", "bob@example.com");

/// First commit time used by `TestRepo`; each commit is one hour later
pub const EPOCH: i64 = 1_600_000_000;

pub struct Entry<'a> {
    pub path: &'a str,
    pub content: &'a [u8],
    pub mode: u32,
}

pub fn file<'a>(path: &'a str, content: &'a str) -> Entry<'a> {
    Entry {
        path,
        content: content.as_bytes(),
        mode: 0o100644,
    }
}

pub fn executable<'a>(path: &'a str, content: &'a str) -> Entry<'a> {
    Entry {
        path,
        content: content.as_bytes(),
        mode: 0o100755,
    }
}

pub fn symlink<'a>(path: &'a str, target: &'a str) -> Entry<'a> {
    Entry {
        path,
        content: target.as_bytes(),
        mode: 0o120000,
    }
}

/// A throwaway repository whose commits are built straight into the object
/// database. Every commit is given its complete tree.
pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Repository,
    commits: i64,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        Self {
            dir,
            repo,
            commits: 0,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Commit time of the n-th commit made through this helper, 0-based
    pub fn time_of(n: i64) -> i64 {
        EPOCH + n * 3600
    }

    /// Commits on top of HEAD
    pub fn commit(&mut self, who: (&str, &str), message: &str, entries: &[Entry]) -> Oid {
        let parents = match self.repo.head() {
            Ok(head) => vec![head.peel_to_commit().unwrap().id()],
            Err(_) => Vec::new(),
        };
        self.commit_on("HEAD", &parents, who, message, entries)
    }

    /// Commits with explicit parents and moves `refname` to the new commit
    pub fn commit_on(
        &mut self,
        refname: &str,
        parents: &[Oid],
        who: (&str, &str),
        message: &str,
        entries: &[Entry],
    ) -> Oid {
        let tree_id = self.write_tree(entries);
        let tree = self.repo.find_tree(tree_id).unwrap();
        let sig = Signature::new(who.0, who.1, &Time::new(Self::time_of(self.commits), 0)).unwrap();
        self.commits += 1;

        let parent_commits: Vec<_> = parents
            .iter()
            .map(|id| self.repo.find_commit(*id).unwrap())
            .collect();
        let parent_refs: Vec<_> = parent_commits.iter().collect();
        self.repo
            .commit(Some(refname), &sig, &sig, message, &tree, &parent_refs)
            .unwrap()
    }

    fn write_tree(&self, entries: &[Entry]) -> Oid {
        let mut index = Index::new().unwrap();
        for entry in entries {
            let blob = self.repo.blob(entry.content).unwrap();
            let index_entry = IndexEntry {
                ctime: IndexTime::new(0, 0),
                mtime: IndexTime::new(0, 0),
                dev: 0,
                ino: 0,
                mode: entry.mode,
                uid: 0,
                gid: 0,
                file_size: entry.content.len() as u32,
                id: blob,
                flags: 0,
                flags_extended: 0,
                path: entry.path.as_bytes().to_vec(),
            };
            index.add(&index_entry).unwrap();
        }
        index.write_tree_to(&self.repo).unwrap()
    }
}
