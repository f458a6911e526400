// src/lib.rs

//! Walks a git repository's history once, oldest commit first, and streams
//! per-commit, per-file and per-author records to pluggable observers.

pub mod author_map;
pub mod authors;
pub mod classifier;
pub mod error;
pub mod extractor;
pub mod filter;
pub mod model;
pub mod observer;
pub mod observers;
pub mod options;
pub mod repository;
pub mod tree_info;
pub mod walker;
pub mod work_items;

pub use error::{ExtractError, ObserverError, ObserverResult, Result};
pub use extractor::{ExtractionSummary, GitDataExtractor};
pub use filter::FileFilter;
pub use model::{AuthorId, AuthorInfo, CommitInfo, FileState, FileStateSet, RepositoryFileInfo};
pub use observer::GitObserver;
pub use options::ExtractionOptions;
