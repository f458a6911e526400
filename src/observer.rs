// src/observer.rs

use crate::error::ObserverResult;
use crate::model::{AuthorInfo, CommitInfo, RepositoryFileInfo};
use std::path::Path;

/// A consumer of the extraction event stream.
///
/// Every callback has an empty default so observers only implement what they
/// need. An error from any callback aborts the run.
pub trait GitObserver {
    fn on_beginning_iteration(
        &mut self,
        _total_commits: usize,
        _output_path: &Path,
        _include_branch_details: bool,
    ) -> ObserverResult {
        Ok(())
    }

    fn on_new_author(&mut self, _author: &AuthorInfo) -> ObserverResult {
        Ok(())
    }

    fn on_processing_commit(&mut self, _sha: &str, _is_last: bool) -> ObserverResult {
        Ok(())
    }

    fn on_processing_file(
        &mut self,
        _file: &RepositoryFileInfo,
        _commit: &CommitInfo,
    ) -> ObserverResult {
        Ok(())
    }

    fn on_processed_commit(&mut self, _commit: &CommitInfo) -> ObserverResult {
        Ok(())
    }

    fn update_progress(
        &mut self,
        _percent: f64,
        _commit_index: usize,
        _total_commits: usize,
    ) -> ObserverResult {
        Ok(())
    }

    fn on_completed_iteration(&mut self, _output_path: &Path) -> ObserverResult {
        Ok(())
    }
}

/// Ordered fan-out over borrowed observers. Delivery follows registration
/// order and stops at the first error.
#[derive(Default)]
pub struct ObserverSet<'a> {
    observers: Vec<&'a mut dyn GitObserver>,
}

impl<'a> ObserverSet<'a> {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub fn push(&mut self, observer: &'a mut dyn GitObserver) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    fn each<F>(&mut self, mut f: F) -> ObserverResult
    where
        F: FnMut(&mut (dyn GitObserver + 'a)) -> ObserverResult,
    {
        for observer in self.observers.iter_mut() {
            f(&mut **observer)?;
        }
        Ok(())
    }

    pub fn beginning_iteration(
        &mut self,
        total_commits: usize,
        output_path: &Path,
        include_branch_details: bool,
    ) -> ObserverResult {
        self.each(|o| o.on_beginning_iteration(total_commits, output_path, include_branch_details))
    }

    pub fn new_author(&mut self, author: &AuthorInfo) -> ObserverResult {
        self.each(|o| o.on_new_author(author))
    }

    pub fn processing_commit(&mut self, sha: &str, is_last: bool) -> ObserverResult {
        self.each(|o| o.on_processing_commit(sha, is_last))
    }

    pub fn processing_file(
        &mut self,
        file: &RepositoryFileInfo,
        commit: &CommitInfo,
    ) -> ObserverResult {
        self.each(|o| o.on_processing_file(file, commit))
    }

    pub fn processed_commit(&mut self, commit: &CommitInfo) -> ObserverResult {
        self.each(|o| o.on_processed_commit(commit))
    }

    pub fn update_progress(
        &mut self,
        percent: f64,
        commit_index: usize,
        total_commits: usize,
    ) -> ObserverResult {
        self.each(|o| o.update_progress(percent, commit_index, total_commits))
    }

    pub fn completed_iteration(&mut self, output_path: &Path) -> ObserverResult {
        self.each(|o| o.on_completed_iteration(output_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ObserverError;

    #[derive(Default)]
    struct Counter {
        commits: Vec<String>,
    }

    impl GitObserver for Counter {
        fn on_processing_commit(&mut self, sha: &str, _is_last: bool) -> ObserverResult {
            self.commits.push(sha.to_string());
            Ok(())
        }
    }

    struct Failing;

    impl GitObserver for Failing {
        fn on_processing_commit(&mut self, _sha: &str, _is_last: bool) -> ObserverResult {
            Err(ObserverError::InvalidState("boom".to_string()))
        }
    }

    #[test]
    fn test_fan_out_reaches_every_observer_in_order() {
        let mut first = Counter::default();
        let mut second = Counter::default();
        {
            let mut set = ObserverSet::new();
            set.push(&mut first);
            set.push(&mut second);
            assert_eq!(set.len(), 2);
            set.processing_commit("abc", false).unwrap();
            set.processing_commit("def", true).unwrap();
        }
        assert_eq!(first.commits, vec!["abc", "def"]);
        assert_eq!(second.commits, vec!["abc", "def"]);
    }

    #[test]
    fn test_first_error_stops_delivery() {
        let mut before = Counter::default();
        let mut failing = Failing;
        let mut after = Counter::default();
        {
            let mut set = ObserverSet::new();
            set.push(&mut before);
            set.push(&mut failing);
            set.push(&mut after);
            assert!(set.processing_commit("abc", false).is_err());
        }
        assert_eq!(before.commits, vec!["abc"]);
        assert!(after.commits.is_empty());
    }
}
