//! Pull request description pipeline.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::error::PipelineError;
use crate::git::CommitRecord;
use crate::prompt::{PullRequestInput, build_pull_request_prompt, normalize_instruction};

use super::{ArtifactKind, ArtifactPipeline, Delivery, PipelineContext, ensure_repository};

/// Template path written when no output is given, relative to the root.
pub const DEFAULT_PR_OUTPUT: &str = ".github/pull_request_template.md";

/// Commits of context included in the prompt.
pub const DEFAULT_PR_COMMIT_LIMIT: usize = 10;

const FALLBACK_TITLE: &str = "Update changes";

/// Drafts a pull request title and body from the staged changes.
#[derive(Debug, Clone)]
pub struct PullRequestPipeline {
    pub instruction: Option<String>,
    pub preview: bool,
    /// Output path; relative paths resolve against the project root.
    pub output: PathBuf,
}

impl Default for PullRequestPipeline {
    fn default() -> Self {
        Self {
            instruction: None,
            preview: false,
            output: PathBuf::from(DEFAULT_PR_OUTPUT),
        }
    }
}

impl PullRequestPipeline {
    pub fn new(instruction: Option<String>, preview: bool) -> Self {
        Self {
            instruction,
            preview,
            ..Self::default()
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }
}

/// Repository data for a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestInputs {
    pub diff: String,
    pub commits: Vec<CommitRecord>,
    pub files: Vec<String>,
}

/// Generated title and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestDraft {
    pub title: String,
    pub body: String,
}

impl PullRequestDraft {
    /// Split a response into title (first line) and body (the rest).
    pub fn parse(raw: &str) -> Self {
        let mut lines = raw.lines();

        let title = lines
            .next()
            .map(clean_title)
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| FALLBACK_TITLE.to_string());

        let body = lines.collect::<Vec<_>>().join("\n").trim().to_string();

        Self { title, body }
    }

    /// `title`, a blank line, then the body.
    pub fn to_markdown(&self) -> String {
        format!("{}\n\n{}\n", self.title, self.body)
    }
}

/// Strip heading markers and a `Title:` label the model sometimes adds.
fn clean_title(line: &str) -> String {
    let line = line.trim().trim_start_matches('#').trim();
    let line = line
        .strip_prefix("Title:")
        .or_else(|| line.strip_prefix("**Title:**"))
        .unwrap_or(line);
    line.trim().to_string()
}

#[async_trait]
impl ArtifactPipeline for PullRequestPipeline {
    type Gathered = PullRequestInputs;

    fn kind(&self) -> ArtifactKind {
        ArtifactKind::PullRequest
    }

    async fn gather(&self, ctx: &PipelineContext<'_>) -> Result<PullRequestInputs, PipelineError> {
        ensure_repository(ctx.repo).await?;

        let (diff, commits, files) = tokio::try_join!(
            ctx.repo.staged_diff(),
            ctx.repo.recent_commits(DEFAULT_PR_COMMIT_LIMIT),
            ctx.repo.staged_files(),
        )?;

        let diff = diff
            .filter(|diff| !diff.trim().is_empty())
            .ok_or(PipelineError::NoStagedChanges)?;

        debug!(
            "Pull request covers {} staged file(s), {} commit(s)",
            files.len(),
            commits.len()
        );

        Ok(PullRequestInputs {
            diff,
            commits,
            files,
        })
    }

    fn compose(&self, inputs: &PullRequestInputs) -> String {
        let input = PullRequestInput {
            diff: &inputs.diff,
            commits: &inputs.commits,
            files: &inputs.files,
        };
        build_pull_request_prompt(&input, normalize_instruction(self.instruction.as_deref()))
    }

    fn render(&self, generated: String) -> String {
        PullRequestDraft::parse(&generated).to_markdown()
    }

    fn delivery(&self, ctx: &PipelineContext<'_>) -> Delivery {
        if self.preview {
            Delivery::Preview
        } else {
            Delivery::File(ctx.resolve(&self.output))
        }
    }
}
