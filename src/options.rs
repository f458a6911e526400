// src/options.rs

use crate::filter::{FileFilter, DEFAULT_CODE_EXTENSIONS};
use std::path::{Path, PathBuf};

/// Everything one extraction run needs to know
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionOptions {
    /// The repository, or any directory inside it
    pub repo_path: PathBuf,
    /// Where observers write their output
    pub output_path: PathBuf,
    pub author_map_path: Option<PathBuf>,
    /// Walk every reachable commit instead of the first-parent chain
    pub include_branch_details: bool,
    pub ignore_patterns: Vec<String>,
    /// Allow-list of extensions; empty accepts every file
    pub extensions: Vec<String>,
}

impl ExtractionOptions {
    pub fn new(repo_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
            output_path: output_path.into(),
            author_map_path: None,
            include_branch_details: false,
            ignore_patterns: Vec::new(),
            extensions: Vec::new(),
        }
    }

    pub fn with_author_map(mut self, path: impl AsRef<Path>) -> Self {
        self.author_map_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_branch_details(mut self, include: bool) -> Self {
        self.include_branch_details = include;
        self
    }

    pub fn with_ignore_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Allow-list of common source code extensions
    pub fn with_code_extensions(self) -> Self {
        self.with_extensions(DEFAULT_CODE_EXTENSIONS.iter().copied())
    }

    pub fn file_filter(&self) -> FileFilter {
        FileFilter::new()
            .with_extensions(&self.extensions)
            .with_ignore_patterns(&self.ignore_patterns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::file;
    use crate::model::FileState;

    #[test]
    fn test_defaults() {
        let options = ExtractionOptions::new("/repo", "/out");
        assert!(!options.include_branch_details);
        assert!(options.author_map_path.is_none());
        assert!(options.file_filter().accepts(&file("any.thing", FileState::Added)));
    }

    #[test]
    fn test_code_extensions() {
        let filter = ExtractionOptions::new("/repo", "/out")
            .with_code_extensions()
            .file_filter();
        assert!(filter.accepts(&file("src/lib.rs", FileState::Added)));
        assert!(filter.accepts(&file("web/app.TSX", FileState::Modified)));
        assert!(!filter.accepts(&file("docs/guide.md", FileState::Added)));
    }

    #[test]
    fn test_filter_built_from_options() {
        let options = ExtractionOptions::new("/repo", "/out")
            .with_extensions(["rs"])
            .with_ignore_patterns(["build.rs"]);
        let filter = options.file_filter();
        assert!(filter.accepts(&file("src/main.rs", FileState::Added)));
        assert!(!filter.accepts(&file("build.rs", FileState::Added)));
        assert!(!filter.accepts(&file("README.md", FileState::Added)));
    }
}
