// src/repository.rs

use crate::error::{ExtractError, Result};
use git2::{ErrorCode, Oid, Repository, Sort};
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// Walks upwards from `start` until a directory containing `.git` is found.
pub fn find_repository_root(start: &Path) -> Result<PathBuf> {
    let not_found = || ExtractError::RepositoryNotFound {
        path: start.to_path_buf(),
    };
    let mut current = start.canonicalize().map_err(|_| not_found())?;

    loop {
        // `.git` may be a directory or, for worktrees and submodules, a file
        if current.join(".git").exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(not_found());
        }
    }
}

/// Opens the repository at `root`, translating ownership refusals into an
/// actionable error.
pub fn open_repository(root: &Path) -> Result<Repository> {
    let repo = Repository::open(root).map_err(|e| translate_git_error(e, root))?;
    debug!("Opened git repository at {}", repo.path().display());
    Ok(repo)
}

pub fn translate_git_error(err: git2::Error, root: &Path) -> ExtractError {
    if err.code() == ErrorCode::Owner {
        return ExtractError::PermissionDenied {
            path: root.to_path_buf(),
        };
    }
    error!("Repository access failed at {}: {}", root.display(), err);
    ExtractError::Git(err)
}

/// Commits reachable from HEAD, oldest to newest in topological order.
///
/// Without branch details only the first-parent chain is walked. An unborn
/// HEAD yields no commits.
pub fn collect_commits(repo: &Repository, include_branch_details: bool) -> Result<Vec<Oid>> {
    let Some(head) = head_commit_id(repo)? else {
        warn!("Repository has no commits on HEAD");
        return Ok(Vec::new());
    };

    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;
    revwalk.push(head)?;

    if !include_branch_details {
        revwalk.simplify_first_parent()?;
    }

    let commits = revwalk.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(commits)
}

/// The commit HEAD points at, if any.
pub fn head_commit_id(repo: &Repository) -> Result<Option<Oid>> {
    if repo.is_empty()? {
        return Ok(None);
    }
    match repo.head() {
        Ok(head) => Ok(Some(head.peel_to_commit()?.id())),
        Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
