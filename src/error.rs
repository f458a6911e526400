// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop an extraction run.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// No `.git` marker between the given path and the filesystem root
    #[error("No git repository found at or above '{}'", path.display())]
    RepositoryNotFound { path: PathBuf },

    /// An author map path was given but nothing exists there
    #[error("Author map file '{}' does not exist", path.display())]
    AuthorMapMissing { path: PathBuf },

    /// The author map exists but is not valid JSON for the expected shape
    #[error("Author map file '{}' could not be parsed: {source}", path.display())]
    AuthorMapInvalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The author map parsed but one of its entries is unusable
    #[error("Author map file '{}' is malformed: {reason}", path.display())]
    MalformedAuthorMap { path: PathBuf, reason: String },

    /// Required options missing or contradictory
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// libgit2 refused to open the repository because of ownership checks
    #[error(
        "Access to the repository at '{}' was denied because it is owned by another user. \
         Mark it as safe with: git config --global --add safe.directory {}",
        path.display(),
        path.display()
    )]
    PermissionDenied { path: PathBuf },

    /// A tree entry the walker cannot represent. Logged, never returned.
    #[error("Unsupported {kind} at '{path}' skipped; some entries may be missing")]
    UnsupportedTreeEntry { path: String, kind: &'static str },

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Observer failed: {0}")]
    Observer(#[from] ObserverError),
}

/// Errors raised by an observer while handling an event.
#[derive(Error, Debug)]
pub enum ObserverError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The observer received an event it cannot handle in its current state
    #[error("{0}")]
    InvalidState(String),
}

pub type Result<T> = std::result::Result<T, ExtractError>;

pub type ObserverResult = std::result::Result<(), ObserverError>;
