//! Creating a commit from the staged index.

use git2::{ErrorCode, Repository};

use crate::error::GitError;

/// Commit whatever is currently staged, like `git commit -m <message>`.
///
/// Unlike `git commit -a`, unstaged work stays untouched. Works on an unborn
/// branch (the result is a root commit). Returns the abbreviated hash.
pub fn commit_staged(repo: &Repository, message: &str) -> Result<String, GitError> {
    let mut index = repo.index().map_err(GitError::CommitFailed)?;
    let tree_id = index.write_tree().map_err(GitError::CommitFailed)?;
    let tree = repo.find_tree(tree_id).map_err(GitError::CommitFailed)?;

    // Get the signature from git config
    let sig = repo.signature().map_err(GitError::ConfigError)?;

    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit().map_err(GitError::CommitFailed)?),
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => None,
        Err(e) => return Err(GitError::CommitFailed(e)),
    };
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

    let oid = repo
        .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .map_err(GitError::CommitFailed)?;

    let commit = repo.find_commit(oid).map_err(GitError::CommitFailed)?;
    let short = commit
        .as_object()
        .short_id()
        .map_err(GitError::CommitFailed)?;

    Ok(short.as_str().unwrap_or_default().to_string())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn configured_repo(dir: &Path) -> Repository {
        let repo = Repository::init(dir).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@test.com").unwrap();
        repo
    }

    #[test]
    fn test_commit_staged_on_unborn_branch() {
        let dir = tempfile::tempdir().unwrap();
        let repo = configured_repo(dir.path());

        std::fs::write(dir.path().join("a.txt"), "a\n").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("a.txt")).unwrap();
        index.write().unwrap();

        let short = commit_staged(&repo, "feat: add a").unwrap();

        let head = repo.head().unwrap().peel_to_commit().unwrap();
        assert_eq!(head.message().unwrap(), "feat: add a");
        assert!(head.id().to_string().starts_with(&short));
        assert_eq!(head.parent_count(), 0);
    }

    #[test]
    fn test_commit_staged_leaves_unstaged_files_alone() {
        let dir = tempfile::tempdir().unwrap();
        let repo = configured_repo(dir.path());

        std::fs::write(dir.path().join("staged.txt"), "s\n").unwrap();
        std::fs::write(dir.path().join("unstaged.txt"), "u\n").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("staged.txt")).unwrap();
        index.write().unwrap();

        commit_staged(&repo, "chore: first").unwrap();

        let tree = repo.head().unwrap().peel_to_tree().unwrap();
        assert!(tree.get_name("staged.txt").is_some());
        assert!(tree.get_name("unstaged.txt").is_none());
    }

    #[test]
    fn test_commit_staged_links_parent() {
        let dir = tempfile::tempdir().unwrap();
        let repo = configured_repo(dir.path());

        for name in ["one.txt", "two.txt"] {
            std::fs::write(dir.path().join(name), name).unwrap();
            let mut index = repo.index().unwrap();
            index.add_path(Path::new(name)).unwrap();
            index.write().unwrap();
            commit_staged(&repo, name).unwrap();
        }

        let head = repo.head().unwrap().peel_to_commit().unwrap();
        assert_eq!(head.parent_count(), 1);
        assert_eq!(head.parent(0).unwrap().message().unwrap(), "one.txt");
    }
}
