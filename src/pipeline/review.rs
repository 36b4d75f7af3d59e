//! Code review pipeline.
//!
//! Reviews are preview-only. A batch reviews several files and keeps going
//! when one of them fails.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{GatewayError, PipelineError};
use crate::prompt::{build_review_prompt, normalize_instruction};

use super::{
    ArtifactKind, ArtifactPipeline, ArtifactResult, Delivery, PipelineContext, ensure_repository,
    run,
};

/// Reviews a single file.
#[derive(Debug, Clone)]
pub struct ReviewPipeline {
    /// File to review; relative paths resolve against the project root.
    pub path: PathBuf,
    pub instruction: Option<String>,
}

/// A file's path as shown to the model, plus its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewInput {
    pub display_path: String,
    pub content: String,
}

impl ReviewPipeline {
    pub fn new(path: impl Into<PathBuf>, instruction: Option<String>) -> Self {
        Self {
            path: path.into(),
            instruction,
        }
    }
}

#[async_trait]
impl ArtifactPipeline for ReviewPipeline {
    type Gathered = ReviewInput;

    fn kind(&self) -> ArtifactKind {
        ArtifactKind::CodeReview
    }

    async fn gather(&self, ctx: &PipelineContext<'_>) -> Result<ReviewInput, PipelineError> {
        let path = ctx.resolve(&self.path);

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| PipelineError::ReadFailed {
                path: path.clone(),
                source,
            })?;

        if content.trim().is_empty() {
            return Err(PipelineError::EmptyFile(path));
        }

        Ok(ReviewInput {
            display_path: display_path(&self.path),
            content,
        })
    }

    fn compose(&self, input: &ReviewInput) -> String {
        build_review_prompt(
            &input.display_path,
            &input.content,
            normalize_instruction(self.instruction.as_deref()),
        )
    }

    fn delivery(&self, _ctx: &PipelineContext<'_>) -> Delivery {
        Delivery::Preview
    }
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Outcome of reviewing several files.
#[derive(Debug, Default)]
pub struct ReviewBatch {
    /// Successful reviews in input order.
    pub reviews: Vec<(String, ArtifactResult)>,
    /// Files whose review failed, in input order.
    pub failures: Vec<(String, PipelineError)>,
}

impl ReviewBatch {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reviews.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Review each file in turn. A failure is recorded and the batch continues.
///
/// # Errors
///
/// Aborts on environment failures that would fail every remaining file,
/// such as a missing API key.
pub async fn review_batch<I, P>(
    paths: I,
    instruction: Option<&str>,
    ctx: &PipelineContext<'_>,
) -> Result<ReviewBatch, PipelineError>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let mut batch = ReviewBatch::default();

    for path in paths {
        let pipeline = ReviewPipeline::new(path, instruction.map(str::to_string));
        let label = display_path(&pipeline.path);

        match run(&pipeline, ctx).await {
            Ok(result) => {
                debug!("Reviewed {}", label);
                batch.reviews.push((label, result));
            }
            Err(e) if aborts_batch(&e) => return Err(e),
            Err(e) => {
                warn!("Review of {} failed: {}", label, e);
                batch.failures.push((label, e));
            }
        }
    }

    Ok(batch)
}

fn aborts_batch(error: &PipelineError) -> bool {
    matches!(error, PipelineError::Gateway(GatewayError::MissingCredential))
}

/// Review every staged file.
///
/// Staged paths are relative to the working tree root, which may sit above
/// the project root.
pub async fn review_staged(
    instruction: Option<&str>,
    ctx: &PipelineContext<'_>,
) -> Result<ReviewBatch, PipelineError> {
    ensure_repository(ctx.repo).await?;

    let files = ctx.repo.staged_files().await?;
    if files.is_empty() {
        return Err(PipelineError::NoStagedChanges);
    }

    let workdir = ctx.repo.workdir().await?;
    let staged_ctx = PipelineContext::new(&workdir, ctx.repo, ctx.gateway);

    review_batch(files, instruction, &staged_ctx).await
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::git::MockRepoInspector;
    use crate::llm::MockModelGateway;

    fn echo_gateway() -> MockModelGateway {
        let mut gateway = MockModelGateway::new();
        gateway.expect_generate().returning(|prompt, options| {
            assert_eq!(options.temperature, 0.3);
            let file = prompt
                .lines()
                .next()
                .unwrap_or_default()
                .to_string();
            Ok(format!("Looks good: {file}"))
        });
        gateway
    }

    #[tokio::test]
    async fn test_single_review_is_preview_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.rs"), "fn a() {}\n").unwrap();
        let repo = MockRepoInspector::new();
        let gateway = echo_gateway();

        let ctx = PipelineContext::new(dir.path(), &repo, &gateway);
        let result = run(&ReviewPipeline::new("a.rs", None), &ctx).await.unwrap();

        assert_eq!(result.kind, ArtifactKind::CodeReview);
        assert!(result.text.contains("`a.rs`"));
        assert!(!result.is_persisted());
    }

    #[tokio::test]
    async fn test_empty_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("blank.rs"), "  \n\n").unwrap();
        let repo = MockRepoInspector::new();
        let mut gateway = MockModelGateway::new();
        gateway.expect_generate().times(0);

        let ctx = PipelineContext::new(dir.path(), &repo, &gateway);
        let result = run(&ReviewPipeline::new("blank.rs", None), &ctx).await;

        assert!(matches!(result, Err(PipelineError::EmptyFile(_))));
    }

    #[tokio::test]
    async fn test_batch_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("one.rs"), "fn one() {}\n").unwrap();
        fs::write(dir.path().join("three.rs"), "fn three() {}\n").unwrap();
        let repo = MockRepoInspector::new();
        let gateway = echo_gateway();

        let ctx = PipelineContext::new(dir.path(), &repo, &gateway);
        let batch = review_batch(["one.rs", "two.rs", "three.rs"], None, &ctx)
            .await
            .unwrap();

        assert_eq!(batch.len(), 3);
        assert_eq!(batch.reviews.len(), 2);
        assert_eq!(batch.reviews[0].0, "one.rs");
        assert_eq!(batch.reviews[1].0, "three.rs");
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].0, "two.rs");
        assert!(matches!(
            batch.failures[0].1,
            PipelineError::ReadFailed { .. }
        ));
        assert!(batch.has_failures());
    }

    #[tokio::test]
    async fn test_batch_isolates_model_failures() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.rs"), "fn a() {}\n").unwrap();
        fs::write(dir.path().join("b.rs"), "fn b() {}\n").unwrap();
        let repo = MockRepoInspector::new();
        let mut gateway = MockModelGateway::new();
        gateway.expect_generate().returning(|prompt, _| {
            if prompt.contains("`a.rs`") {
                Err(crate::error::GatewayError::EmptyResponse)
            } else {
                Ok("fine".to_string())
            }
        });

        let ctx = PipelineContext::new(dir.path(), &repo, &gateway);
        let batch = review_batch(["a.rs", "b.rs"], Some("be brief"), &ctx)
            .await
            .unwrap();

        assert_eq!(batch.reviews.len(), 1);
        assert_eq!(batch.reviews[0].0, "b.rs");
        assert!(matches!(batch.failures[0].1, PipelineError::Gateway(_)));
    }

    #[tokio::test]
    async fn test_review_staged_uses_staged_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/lib.rs"), "pub fn x() {}\n").unwrap();
        let mut repo = MockRepoInspector::new();
        repo.expect_is_inside_repository().returning(|| true);
        repo.expect_staged_files()
            .returning(|| Ok(vec!["src/lib.rs".to_string()]));
        let workdir = dir.path().to_path_buf();
        repo.expect_workdir().returning(move || Ok(workdir.clone()));
        let gateway = echo_gateway();

        let ctx = PipelineContext::new(dir.path(), &repo, &gateway);
        let batch = review_staged(None, &ctx).await.unwrap();

        assert_eq!(batch.reviews.len(), 1);
        assert_eq!(batch.reviews[0].0, "src/lib.rs");
        assert!(!batch.has_failures());
    }

    #[tokio::test]
    async fn test_review_staged_without_staged_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = MockRepoInspector::new();
        repo.expect_is_inside_repository().returning(|| true);
        repo.expect_staged_files().returning(|| Ok(Vec::new()));
        let gateway = MockModelGateway::new();

        let ctx = PipelineContext::new(dir.path(), &repo, &gateway);
        let result = review_staged(None, &ctx).await;

        assert!(matches!(result, Err(PipelineError::NoStagedChanges)));
    }

    #[tokio::test]
    async fn test_review_staged_resolves_against_workdir() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/a.rs"), "fn a() {}\n").unwrap();
        let mut repo = MockRepoInspector::new();
        repo.expect_is_inside_repository().returning(|| true);
        repo.expect_staged_files()
            .returning(|| Ok(vec!["sub/a.rs".to_string()]));
        let workdir = dir.path().to_path_buf();
        repo.expect_workdir().returning(move || Ok(workdir.clone()));
        let gateway = echo_gateway();

        let project_root = dir.path().join("sub");
        let ctx = PipelineContext::new(&project_root, &repo, &gateway);
        let batch = review_staged(None, &ctx).await.unwrap();

        assert!(!batch.has_failures());
        assert_eq!(batch.reviews.len(), 1);
        assert_eq!(batch.reviews[0].0, "sub/a.rs");
    }

    #[tokio::test]
    async fn test_missing_credential_aborts_batch() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.rs", "b.rs", "c.rs"] {
            fs::write(dir.path().join(name), "fn x() {}\n").unwrap();
        }
        let repo = MockRepoInspector::new();
        let gateway = crate::llm::UnconfiguredGateway;

        let ctx = PipelineContext::new(dir.path(), &repo, &gateway);
        let result = review_batch(["a.rs", "b.rs", "c.rs"], None, &ctx).await;

        assert!(matches!(
            result,
            Err(PipelineError::Gateway(GatewayError::MissingCredential))
        ));
    }

    #[tokio::test]
    async fn test_read_failure_before_missing_credential_still_aborts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.rs"), "fn b() {}\n").unwrap();
        let repo = MockRepoInspector::new();
        let gateway = crate::llm::UnconfiguredGateway;

        let ctx = PipelineContext::new(dir.path(), &repo, &gateway);
        let result = review_batch(["missing.rs", "b.rs"], None, &ctx).await;

        assert!(matches!(
            result,
            Err(PipelineError::Gateway(GatewayError::MissingCredential))
        ));
    }
}
