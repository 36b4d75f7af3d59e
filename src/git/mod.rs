//! Git operations using git2-rs.

pub mod commit;
pub mod commits;
pub mod diff;
pub mod inspector;
pub mod repo;

pub use commit::commit_staged;
pub use commits::{CommitRecord, NEW_COMMIT_SENTINEL, recent_commits, short_head_sha};
pub use diff::{StagedChanges, staged_changes, staged_diff, staged_files};
pub use inspector::{GitInspector, RepoInspector};
pub use repo::{is_inside_work_tree, open_repository, workdir};

#[cfg(test)]
pub use inspector::MockRepoInspector;
