//! Artifact pipelines: gather, compose, generate, then persist or preview.
//!
//! Each artifact kind implements [`ArtifactPipeline`]; [`run`] owns the
//! shared control flow.

pub mod changelog;
pub mod commit;
pub mod output;
pub mod pull_request;
pub mod readme;
pub mod review;

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::{GitError, PipelineError};
use crate::git::RepoInspector;
use crate::llm::{GenerationOptions, ModelGateway};

pub use changelog::{ChangelogPipeline, DEFAULT_CHANGELOG_LIMIT};
pub use commit::{CommitInput, CommitMessagePipeline};
pub use output::{write_artifact, write_artifact_async};
pub use pull_request::{
    DEFAULT_PR_COMMIT_LIMIT, DEFAULT_PR_OUTPUT, PullRequestDraft, PullRequestInputs,
    PullRequestPipeline,
};
pub use readme::ReadmePipeline;
pub use review::{ReviewBatch, ReviewInput, ReviewPipeline, review_batch, review_staged};

/// The kinds of artifact the tool generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    CommitMessage,
    Readme,
    Changelog,
    PullRequest,
    CodeReview,
}

impl ArtifactKind {
    /// Sampling parameters used for this kind.
    pub fn generation(self) -> GenerationOptions {
        match self {
            Self::CommitMessage => GenerationOptions::new(0.5, 1024),
            Self::Readme => GenerationOptions::new(0.8, 8192),
            Self::Changelog => GenerationOptions::new(0.4, 4096),
            Self::PullRequest => GenerationOptions::new(0.5, 2048),
            Self::CodeReview => GenerationOptions::new(0.3, 4096),
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::CommitMessage => "commit message",
            Self::Readme => "README",
            Self::Changelog => "changelog",
            Self::PullRequest => "pull request",
            Self::CodeReview => "code review",
        };
        f.write_str(label)
    }
}

/// Where a generated artifact goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Returned to the caller only.
    Preview,
    /// Written to this path, replacing any existing file.
    File(PathBuf),
    /// Used as the message of a commit of the staged index.
    Commit,
}

/// Record of a persisted artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persisted {
    File(PathBuf),
    /// Short hash of the created commit.
    Commit(String),
}

/// A generated artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactResult {
    pub kind: ArtifactKind,
    pub text: String,
    pub persisted: Option<Persisted>,
}

impl ArtifactResult {
    pub fn is_persisted(&self) -> bool {
        self.persisted.is_some()
    }
}

/// Collaborators shared by all pipelines for one invocation.
#[derive(Clone, Copy)]
pub struct PipelineContext<'a> {
    /// Project root; relative artifact paths resolve against it.
    pub root: &'a Path,
    pub repo: &'a dyn RepoInspector,
    pub gateway: &'a dyn ModelGateway,
}

impl<'a> PipelineContext<'a> {
    pub fn new(root: &'a Path, repo: &'a dyn RepoInspector, gateway: &'a dyn ModelGateway) -> Self {
        Self {
            root,
            repo,
            gateway,
        }
    }

    /// Resolve `path` against the project root unless it is absolute.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

/// One artifact kind's steps. [`run`] calls them in order and handles
/// generation and delivery.
#[async_trait]
pub trait ArtifactPipeline: Send + Sync {
    /// Data collected before the prompt is built.
    type Gathered: Send + Sync;

    fn kind(&self) -> ArtifactKind;

    /// Collect external data. Failing here aborts before any model call.
    async fn gather(&self, ctx: &PipelineContext<'_>) -> Result<Self::Gathered, PipelineError>;

    fn compose(&self, gathered: &Self::Gathered) -> String;

    /// Post-process generated text before delivery.
    fn render(&self, generated: String) -> String {
        generated
    }

    fn delivery(&self, ctx: &PipelineContext<'_>) -> Delivery;
}

/// Run a pipeline end to end.
pub async fn run<P>(pipeline: &P, ctx: &PipelineContext<'_>) -> Result<ArtifactResult, PipelineError>
where
    P: ArtifactPipeline + ?Sized,
{
    let kind = pipeline.kind();

    let gathered = pipeline.gather(ctx).await?;
    let prompt = pipeline.compose(&gathered);
    debug!("{} prompt length: {} chars", kind, prompt.len());

    let generated = ctx.gateway.generate(&prompt, &kind.generation()).await?;
    let text = pipeline.render(generated);

    let persisted = match pipeline.delivery(ctx) {
        Delivery::Preview => None,
        Delivery::File(path) => {
            write_artifact_async(path.clone(), text.clone()).await?;
            info!("Wrote {} to {}", kind, path.display());
            Some(Persisted::File(path))
        }
        Delivery::Commit => {
            let short_id = ctx.repo.commit(&text).await?;
            info!("Created commit {}", short_id);
            Some(Persisted::Commit(short_id))
        }
    };

    Ok(ArtifactResult {
        kind,
        text,
        persisted,
    })
}

/// Fail with a "not a repository" error outside a git working tree.
pub(crate) async fn ensure_repository(repo: &dyn RepoInspector) -> Result<(), PipelineError> {
    if repo.is_inside_repository().await {
        Ok(())
    } else {
        Err(GitError::NotARepository.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_parameters_per_kind() {
        let commit = ArtifactKind::CommitMessage.generation();
        assert_eq!(commit.temperature, 0.5);
        assert_eq!(commit.max_output_tokens, Some(1024));

        let readme = ArtifactKind::Readme.generation();
        assert_eq!(readme.temperature, 0.8);
        assert_eq!(readme.max_output_tokens, Some(8192));

        assert_eq!(ArtifactKind::CodeReview.generation().temperature, 0.3);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ArtifactKind::PullRequest.to_string(), "pull request");
        assert_eq!(ArtifactKind::Readme.to_string(), "README");
    }

    #[test]
    fn test_artifact_result_is_persisted() {
        let preview = ArtifactResult {
            kind: ArtifactKind::Changelog,
            text: "x".to_string(),
            persisted: None,
        };
        assert!(!preview.is_persisted());
    }
}
