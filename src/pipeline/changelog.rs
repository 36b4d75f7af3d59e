//! Changelog pipeline.

use async_trait::async_trait;

use crate::error::PipelineError;
use crate::git::CommitRecord;
use crate::prompt::{build_changelog_prompt, format_commit_history, normalize_instruction};

use super::{ArtifactKind, ArtifactPipeline, Delivery, PipelineContext, ensure_repository};

pub const CHANGELOG_FILE_NAME: &str = "CHANGELOG.md";

/// Number of commits summarized by default.
pub const DEFAULT_CHANGELOG_LIMIT: usize = 20;

/// Summarizes recent history into `CHANGELOG.md`.
#[derive(Debug, Clone)]
pub struct ChangelogPipeline {
    pub instruction: Option<String>,
    pub preview: bool,
    pub limit: usize,
}

impl Default for ChangelogPipeline {
    fn default() -> Self {
        Self {
            instruction: None,
            preview: false,
            limit: DEFAULT_CHANGELOG_LIMIT,
        }
    }
}

impl ChangelogPipeline {
    pub fn new(instruction: Option<String>, preview: bool) -> Self {
        Self {
            instruction,
            preview,
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

#[async_trait]
impl ArtifactPipeline for ChangelogPipeline {
    type Gathered = Vec<CommitRecord>;

    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Changelog
    }

    async fn gather(&self, ctx: &PipelineContext<'_>) -> Result<Vec<CommitRecord>, PipelineError> {
        ensure_repository(ctx.repo).await?;

        let commits = ctx.repo.recent_commits(self.limit).await?;
        if commits.is_empty() {
            return Err(PipelineError::NoCommits);
        }

        Ok(commits)
    }

    fn compose(&self, commits: &Vec<CommitRecord>) -> String {
        let history = format_commit_history(commits);
        build_changelog_prompt(&history, normalize_instruction(self.instruction.as_deref()))
    }

    fn delivery(&self, ctx: &PipelineContext<'_>) -> Delivery {
        if self.preview {
            Delivery::Preview
        } else {
            Delivery::File(ctx.root.join(CHANGELOG_FILE_NAME))
        }
    }
}
