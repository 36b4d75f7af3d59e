//! The repository queries the pipelines depend on.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use git2::Repository;

use crate::error::GitError;

use super::commit::commit_staged;
use super::commits::{CommitRecord, recent_commits, short_head_sha};
use super::diff::{staged_diff, staged_files};
use super::repo::{is_inside_work_tree, open_repository, workdir};

/// Version-control queries used by the artifact pipelines.
///
/// This abstraction allows mocking the repository in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepoInspector: Send + Sync {
    /// Whether the project root is inside a git working tree.
    async fn is_inside_repository(&self) -> bool;

    /// Staged diff text, `None` when nothing is staged.
    async fn staged_diff(&self) -> Result<Option<String>, GitError>;

    /// Paths of the staged files, relative to [`RepoInspector::workdir`].
    async fn staged_files(&self) -> Result<Vec<String>, GitError>;

    /// Root of the working tree, which may be an ancestor of the project root.
    async fn workdir(&self) -> Result<PathBuf, GitError>;

    /// Up to `limit` commits reachable from HEAD, newest first.
    async fn recent_commits(&self, limit: usize) -> Result<Vec<CommitRecord>, GitError>;

    /// Abbreviated HEAD hash, or a sentinel before the first commit.
    async fn short_head_sha(&self) -> Result<String, GitError>;

    /// Commit the staged index with `message`; returns the abbreviated hash.
    async fn commit(&self, message: &str) -> Result<String, GitError>;
}

/// [`RepoInspector`] backed by git2.
///
/// Every query opens the repository on a blocking worker thread, so
/// independent queries can run concurrently.
#[derive(Debug, Clone)]
pub struct GitInspector {
    root: PathBuf,
}

impl GitInspector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn with_repo<T, F>(&self, op: F) -> Result<T, GitError>
    where
        T: Send + 'static,
        F: FnOnce(&Repository) -> Result<T, GitError> + Send + 'static,
    {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || {
            let repo = open_repository(&root)?;
            op(&repo)
        })
        .await
        .map_err(|e| GitError::TaskFailed(e.to_string()))?
    }
}

#[async_trait]
impl RepoInspector for GitInspector {
    async fn is_inside_repository(&self) -> bool {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || is_inside_work_tree(&root))
            .await
            .unwrap_or(false)
    }

    async fn staged_diff(&self) -> Result<Option<String>, GitError> {
        self.with_repo(staged_diff).await
    }

    async fn staged_files(&self) -> Result<Vec<String>, GitError> {
        self.with_repo(staged_files).await
    }

    async fn workdir(&self) -> Result<PathBuf, GitError> {
        self.with_repo(workdir).await
    }

    async fn recent_commits(&self, limit: usize) -> Result<Vec<CommitRecord>, GitError> {
        self.with_repo(move |repo| recent_commits(repo, limit)).await
    }

    async fn short_head_sha(&self) -> Result<String, GitError> {
        self.with_repo(|repo| Ok(short_head_sha(repo))).await
    }

    async fn commit(&self, message: &str) -> Result<String, GitError> {
        let message = message.to_string();
        self.with_repo(move |repo| commit_staged(repo, &message)).await
    }
}
