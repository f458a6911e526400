// src/observers/progress.rs

use crate::error::ObserverResult;
use crate::observer::GitObserver;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Terminal progress bar over the commits of a run
#[derive(Default)]
pub struct ProgressObserver {
    bar: Option<ProgressBar>,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .map(|style| style.progress_chars("█▓▒░  "))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

impl GitObserver for ProgressObserver {
    fn on_beginning_iteration(
        &mut self,
        total_commits: usize,
        _output_path: &Path,
        _include_branch_details: bool,
    ) -> ObserverResult {
        let bar = ProgressBar::new(total_commits as u64);
        bar.set_style(bar_style());
        bar.set_message("Analyzing commits");
        self.bar = Some(bar);
        Ok(())
    }

    fn update_progress(
        &mut self,
        _percent: f64,
        commit_index: usize,
        _total_commits: usize,
    ) -> ObserverResult {
        if let Some(bar) = &self.bar {
            bar.set_position(commit_index as u64);
        }
        Ok(())
    }

    fn on_completed_iteration(&mut self, _output_path: &Path) -> ObserverResult {
        if let Some(bar) = self.bar.take() {
            bar.finish_with_message("Analysis complete");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_follows_progress() {
        let mut observer = ProgressObserver::new();
        observer.on_beginning_iteration(4, Path::new("out"), false).unwrap();
        observer.update_progress(0.5, 2, 4).unwrap();
        assert_eq!(observer.bar.as_ref().map(|b| b.position()), Some(2));

        observer.on_completed_iteration(Path::new("out")).unwrap();
        assert!(observer.bar.is_none());
    }
}
