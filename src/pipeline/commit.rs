//! Commit message pipeline.

use async_trait::async_trait;
use tracing::debug;

use crate::error::PipelineError;
use crate::prompt::{build_commit_prompt, normalize_instruction};

use super::{ArtifactKind, ArtifactPipeline, Delivery, PipelineContext, ensure_repository};

/// Generates a message for the staged changes, optionally committing them.
#[derive(Debug, Clone, Default)]
pub struct CommitMessagePipeline {
    pub instruction: Option<String>,
    /// Commit the staged index with the generated message.
    pub commit: bool,
}

/// Staged diff and the commit reference it will be described against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInput {
    pub diff: String,
    pub short_sha: String,
}

impl CommitMessagePipeline {
    pub fn new(instruction: Option<String>, commit: bool) -> Self {
        Self {
            instruction,
            commit,
        }
    }
}

#[async_trait]
impl ArtifactPipeline for CommitMessagePipeline {
    type Gathered = CommitInput;

    fn kind(&self) -> ArtifactKind {
        ArtifactKind::CommitMessage
    }

    async fn gather(&self, ctx: &PipelineContext<'_>) -> Result<CommitInput, PipelineError> {
        ensure_repository(ctx.repo).await?;

        let diff = ctx
            .repo
            .staged_diff()
            .await?
            .filter(|diff| !diff.trim().is_empty())
            .ok_or(PipelineError::NoStagedChanges)?;

        let short_sha = ctx.repo.short_head_sha().await?;
        debug!("Describing staged diff against {}", short_sha);

        Ok(CommitInput { diff, short_sha })
    }

    fn compose(&self, input: &CommitInput) -> String {
        build_commit_prompt(
            &input.diff,
            &input.short_sha,
            normalize_instruction(self.instruction.as_deref()),
        )
    }

    fn delivery(&self, _ctx: &PipelineContext<'_>) -> Delivery {
        if self.commit {
            Delivery::Commit
        } else {
            Delivery::Preview
        }
    }
}
