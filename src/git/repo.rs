//! Repository discovery shared by the git operations.

use std::path::{Path, PathBuf};

use git2::{ErrorCode, Repository, Tree};

use crate::error::GitError;

/// Open the working tree containing `path`.
///
/// Discovery walks up from `path` like the git CLI does. Bare repositories
/// have no working tree and are reported as [`GitError::NotARepository`].
pub fn open_repository(path: &Path) -> Result<Repository, GitError> {
    let repo = Repository::discover(path).map_err(|e| match e.code() {
        ErrorCode::NotFound => GitError::NotARepository,
        _ => GitError::OpenRepository(e),
    })?;

    if repo.is_bare() {
        return Err(GitError::NotARepository);
    }

    Ok(repo)
}

/// Root directory of the repository's working tree.
pub fn workdir(repo: &Repository) -> Result<PathBuf, GitError> {
    repo.workdir()
        .map(Path::to_path_buf)
        .ok_or(GitError::NotARepository)
}

/// Whether `path` is inside a git working tree.
pub fn is_inside_work_tree(path: &Path) -> bool {
    open_repository(path).is_ok()
}

/// Resolve the HEAD tree, distinguishing empty-repo errors from real failures.
///
/// Returns `Ok(None)` for repos with no commits (unborn branch / not found).
pub fn resolve_head_tree(repo: &Repository) -> Result<Option<Tree<'_>>, GitError> {
    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(GitError::DiffFailed(e)),
    };

    let tree = head_ref.peel_to_tree().map_err(GitError::DiffFailed)?;
    Ok(Some(tree))
}
