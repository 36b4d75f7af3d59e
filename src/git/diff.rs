//! Staged diff collection using git2.

use git2::{Diff, DiffFormat, Repository};
use tracing::warn;

use crate::error::GitError;

use super::repo::resolve_head_tree;

/// Changes recorded in the index relative to HEAD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedChanges {
    /// Unified diff text.
    pub diff_text: String,
    /// Paths of the staged files, sorted.
    pub files: Vec<String>,
}

/// Collect staged changes (index vs HEAD, or vs the empty tree before the
/// first commit).
///
/// Returns `Ok(None)` when nothing is staged.
pub fn staged_changes(repo: &Repository) -> Result<Option<StagedChanges>, GitError> {
    let head_tree = resolve_head_tree(repo)?;

    let diff = repo
        .diff_tree_to_index(head_tree.as_ref(), None, None)
        .map_err(GitError::DiffFailed)?;

    let files = collect_paths(&diff);
    if files.is_empty() {
        return Ok(None);
    }

    let diff_text = render_patch(&diff);

    Ok(Some(StagedChanges { diff_text, files }))
}

/// The staged diff text, or `None` when nothing is staged.
pub fn staged_diff(repo: &Repository) -> Result<Option<String>, GitError> {
    Ok(staged_changes(repo)?.map(|changes| changes.diff_text))
}

/// Paths of the staged files (empty when nothing is staged).
pub fn staged_files(repo: &Repository) -> Result<Vec<String>, GitError> {
    Ok(staged_changes(repo)?
        .map(|changes| changes.files)
        .unwrap_or_default())
}

fn collect_paths(diff: &Diff<'_>) -> Vec<String> {
    let mut files: Vec<String> = diff
        .deltas()
        .filter_map(|delta| {
            delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.to_string_lossy().replace('\\', "/"))
        })
        .filter(|p| !p.is_empty())
        .collect();

    files.sort();
    files.dedup();
    files
}

/// Render a diff as unified patch text.
fn render_patch(diff: &Diff<'_>) -> String {
    let mut text = String::new();

    if let Err(e) = diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let origin = line.origin();
        if origin == '+' || origin == '-' || origin == ' ' {
            text.push(origin);
        }
        text.push_str(&String::from_utf8_lossy(line.content()));
        true
    }) {
        warn!("Failed to render staged diff: {e}");
    }

    text
}
