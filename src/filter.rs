// src/filter.rs

use crate::model::RepositoryFileInfo;
use std::collections::HashSet;

/// Extensions treated as source code by `ExtractionOptions::with_code_extensions`
pub const DEFAULT_CODE_EXTENSIONS: &[&str] = &[
    "c", "cc", "cpp", "cs", "css", "cxx", "fs", "go", "h", "hpp", "html", "java", "js", "jsx",
    "kt", "m", "php", "ps1", "py", "rb", "rs", "scala", "scss", "sh", "sql", "swift", "ts",
    "tsx", "vb", "vue", "xaml",
];

/// Decides which file records reach observers and count towards
/// added/modified/deleted totals.
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    /// Lower-cased extensions without the dot. `None` accepts every file.
    extensions: Option<HashSet<String>>,
    ignore_patterns: Vec<String>,
}

impl FileFilter {
    /// Accepts everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to the given extensions (with or without the dot, any case).
    /// An empty list leaves the filter accepting every file.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: HashSet<String> = extensions
            .into_iter()
            .map(|e| normalize_extension(e.as_ref()))
            .filter(|e| !e.is_empty())
            .collect();
        self.extensions = if set.is_empty() { None } else { Some(set) };
        self
    }

    pub fn with_ignore_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignore_patterns = patterns
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        self
    }

    pub fn ignore_patterns(&self) -> &[String] {
        &self.ignore_patterns
    }

    /// Case-insensitive allow-list check on an extension such as `.rs` or `rs`.
    pub fn file_matches_filter(&self, extension: &str) -> bool {
        match &self.extensions {
            None => true,
            Some(allowed) => allowed.contains(&normalize_extension(extension)),
        }
    }

    pub fn accepts(&self, file: &RepositoryFileInfo) -> bool {
        self.file_matches_filter(file.extension())
            && !file_matches_ignore_pattern(file, &self.ignore_patterns)
    }
}

/// True when a pattern equals the file's extension or is a suffix of its path.
/// Both comparisons ignore case.
pub fn file_matches_ignore_pattern(file: &RepositoryFileInfo, patterns: &[String]) -> bool {
    let extension = normalize_extension(file.extension());
    let path = file.path.to_lowercase();

    patterns.iter().any(|pattern| {
        let pattern = pattern.trim().to_lowercase();
        if pattern.is_empty() {
            return false;
        }
        let as_extension = pattern.trim_start_matches('.');
        (!extension.is_empty() && as_extension == extension) || path.ends_with(&pattern)
    })
}

fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::file;
    use crate::model::FileState;

    fn patterns(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_filter_accepts_everything() {
        let filter = FileFilter::new();
        assert!(filter.file_matches_filter(".txt"));
        assert!(filter.file_matches_filter(""));
        assert!(filter.accepts(&file("Makefile", FileState::Added)));
    }

    #[test]
    fn test_allow_list_is_case_insensitive() {
        let filter = FileFilter::new().with_extensions([".RS", "cs"]);
        assert!(filter.file_matches_filter(".rs"));
        assert!(filter.file_matches_filter("RS"));
        assert!(filter.file_matches_filter(".Cs"));
        assert!(!filter.file_matches_filter(".md"));
        assert!(!filter.file_matches_filter(""));
    }

    #[test]
    fn test_empty_allow_list_accepts_everything() {
        let filter = FileFilter::new().with_extensions(Vec::<String>::new());
        assert!(filter.file_matches_filter(".anything"));
    }

    #[test]
    fn test_code_extensions_reject_docs() {
        let filter = FileFilter::new().with_extensions(DEFAULT_CODE_EXTENSIONS.iter().copied());
        assert!(filter.accepts(&file("src/main.rs", FileState::Added)));
        assert!(!filter.accepts(&file("README.md", FileState::Added)));
    }

    #[test]
    fn test_ignore_by_extension() {
        let f = file("data/output.JSON", FileState::Added);
        assert!(file_matches_ignore_pattern(&f, &patterns(&[".json"])));
        assert!(file_matches_ignore_pattern(&f, &patterns(&["json"])));
        assert!(!file_matches_ignore_pattern(&f, &patterns(&[".js"])));
    }

    #[test]
    fn test_ignore_by_path_suffix() {
        let f = file("web/package-lock.json", FileState::Modified);
        assert!(file_matches_ignore_pattern(&f, &patterns(&["package-lock.json"])));
        assert!(file_matches_ignore_pattern(&f, &patterns(&["web/package-lock.json"])));
        assert!(!file_matches_ignore_pattern(&f, &patterns(&["yarn.lock", "  "])));
    }

    #[test]
    fn test_accepts_combines_allow_list_and_ignores() {
        let filter = FileFilter::new()
            .with_extensions(["rs"])
            .with_ignore_patterns(["generated.rs", ""]);
        assert_eq!(filter.ignore_patterns(), &["generated.rs".to_string()]);
        assert!(filter.accepts(&file("src/lib.rs", FileState::Added)));
        assert!(!filter.accepts(&file("src/generated.rs", FileState::Added)));
        assert!(!filter.accepts(&file("notes.txt", FileState::Added)));
    }
}
