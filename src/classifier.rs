// src/classifier.rs

use crate::model::FileState;
use git2::Delta;

/// Maps libgit2's change kind onto a `FileState`.
///
/// Never fails. Anything without a dedicated state lands on `Untracked`.
pub fn classify_change(kind: Delta) -> FileState {
    match kind {
        Delta::Added => FileState::Added,
        Delta::Deleted => FileState::Deleted,
        Delta::Modified => FileState::Modified,
        Delta::Renamed => FileState::Renamed,
        Delta::Copied => FileState::Copied,
        Delta::Typechange => FileState::TypeChanged,
        Delta::Conflicted => FileState::Conflicted,
        Delta::Unreadable => FileState::Unreadable,
        Delta::Ignored => FileState::Ignored,
        Delta::Unmodified => FileState::Unmodified,
        Delta::Untracked => FileState::Untracked,
    }
}
