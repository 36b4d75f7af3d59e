//! Commit history snapshots.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use git2::{Commit, ErrorCode, Repository, Sort};
use serde::Serialize;

use crate::error::GitError;

/// Placeholder reference used before the first commit exists.
pub const NEW_COMMIT_SENTINEL: &str = "new-commit";

/// A read-only snapshot of one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    pub short_hash: String,
    /// Author date, `YYYY-MM-DD` in the author's timezone.
    pub date: String,
    pub subject: String,
    pub author: String,
}

impl CommitRecord {
    /// Create a CommitRecord from a git2 Commit.
    pub fn from_git2_commit(commit: &Commit<'_>) -> Result<Self, GitError> {
        let short_hash = commit
            .as_object()
            .short_id()
            .map_err(GitError::RevwalkError)?
            .as_str()
            .unwrap_or_default()
            .to_string();

        let author = commit.author();
        let time = author.when();
        let date = format_date(time.seconds(), time.offset_minutes());

        Ok(Self {
            short_hash,
            date,
            subject: commit.summary().unwrap_or("").to_string(),
            author: author.name().unwrap_or("unknown").to_string(),
        })
    }
}

/// Fetch up to `limit` commits reachable from HEAD, newest first.
///
/// An empty repository yields an empty list.
pub fn recent_commits(repo: &Repository, limit: usize) -> Result<Vec<CommitRecord>, GitError> {
    match repo.head() {
        Ok(_) => {}
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(Vec::new());
        }
        Err(e) => return Err(GitError::RevwalkError(e)),
    }

    let mut revwalk = repo.revwalk().map_err(GitError::RevwalkError)?;
    revwalk.push_head().map_err(GitError::RevwalkError)?;
    revwalk
        .set_sorting(Sort::TIME)
        .map_err(GitError::RevwalkError)?;

    let mut commits = Vec::with_capacity(limit.min(64));

    for oid_result in revwalk.take(limit) {
        let oid = oid_result.map_err(GitError::RevwalkError)?;
        let commit = repo.find_commit(oid).map_err(GitError::RevwalkError)?;
        commits.push(CommitRecord::from_git2_commit(&commit)?);
    }

    Ok(commits)
}

/// Abbreviated HEAD hash, or [`NEW_COMMIT_SENTINEL`] when HEAD cannot be
/// resolved (typically before the first commit).
pub fn short_head_sha(repo: &Repository) -> String {
    repo.head()
        .and_then(|head| head.peel_to_commit())
        .and_then(|commit| commit.as_object().short_id())
        .ok()
        .and_then(|buf| buf.as_str().map(str::to_string))
        .unwrap_or_else(|| NEW_COMMIT_SENTINEL.to_string())
}

fn format_date(seconds: i64, offset_minutes: i32) -> String {
    let offset = FixedOffset::east_opt(offset_minutes * 60).unwrap_or_else(|| Utc.fix());

    DateTime::from_timestamp(seconds, 0)
        .map(|utc| utc.with_timezone(&offset).format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown date".to_string())
}
