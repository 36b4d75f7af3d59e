//! README pipeline.

use async_trait::async_trait;
use tracing::debug;

use crate::error::PipelineError;
use crate::prompt::{build_project_overview, build_readme_prompt, normalize_instruction};
use crate::scan::{ProjectFileMap, ScanOptions, scan};

use super::{ArtifactKind, ArtifactPipeline, Delivery, PipelineContext};

pub const README_FILE_NAME: &str = "README.md";

/// Scans the project and writes (or previews) `README.md` at its root.
#[derive(Debug, Clone, Default)]
pub struct ReadmePipeline {
    pub instruction: Option<String>,
    pub preview: bool,
    pub scan_options: ScanOptions,
}

impl ReadmePipeline {
    pub fn new(instruction: Option<String>, preview: bool) -> Self {
        Self {
            instruction,
            preview,
            scan_options: ScanOptions::default(),
        }
    }
}

#[async_trait]
impl ArtifactPipeline for ReadmePipeline {
    type Gathered = ProjectFileMap;

    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Readme
    }

    async fn gather(&self, ctx: &PipelineContext<'_>) -> Result<ProjectFileMap, PipelineError> {
        let root = ctx.root.to_path_buf();
        let options = self.scan_options.clone();
        let files = tokio::task::spawn_blocking(move || scan(&root, &options))
            .await
            .map_err(|e| PipelineError::TaskFailed(e.to_string()))??;
        debug!("README overview covers {} file(s)", files.len());
        Ok(files)
    }

    fn compose(&self, files: &ProjectFileMap) -> String {
        let overview = build_project_overview(files);
        build_readme_prompt(&overview, normalize_instruction(self.instruction.as_deref()))
    }

    fn delivery(&self, ctx: &PipelineContext<'_>) -> Delivery {
        if self.preview {
            Delivery::Preview
        } else {
            Delivery::File(ctx.root.join(README_FILE_NAME))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::error::ScanError;
    use crate::git::MockRepoInspector;
    use crate::llm::MockModelGateway;
    use crate::pipeline::{Persisted, run};

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("main.rs"), "fn main() {}\n").unwrap();
        fs::write(dir.path().join(".gitignore"), "secret.txt\n").unwrap();
        fs::write(dir.path().join("secret.txt"), "hunter2").unwrap();
        dir
    }

    fn gateway_returning(text: &'static str) -> MockModelGateway {
        let mut gateway = MockModelGateway::new();
        gateway
            .expect_generate()
            .withf(|prompt, _| {
                prompt.contains("File: main.rs\nfn main() {}") && !prompt.contains("hunter2")
            })
            .times(1)
            .returning(move |_, _| Ok(text.to_string()));
        gateway
    }

    #[tokio::test]
    async fn test_readme_written_to_root() {
        let dir = project();
        let repo = MockRepoInspector::new();
        let gateway = gateway_returning("# Demo\n\nA demo project.");

        let ctx = PipelineContext::new(dir.path(), &repo, &gateway);
        let result = run(&ReadmePipeline::new(None, false), &ctx).await.unwrap();

        let path = dir.path().join(README_FILE_NAME);
        assert_eq!(result.persisted, Some(Persisted::File(path.clone())));
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "# Demo\n\nA demo project.\n"
        );
    }

    #[tokio::test]
    async fn test_preview_does_not_write() {
        let dir = project();
        let repo = MockRepoInspector::new();
        let gateway = gateway_returning("# Demo");

        let ctx = PipelineContext::new(dir.path(), &repo, &gateway);
        let result = run(&ReadmePipeline::new(None, true), &ctx).await.unwrap();

        assert_eq!(result.text, "# Demo");
        assert!(!result.is_persisted());
        assert!(!dir.path().join(README_FILE_NAME).exists());
    }

    #[tokio::test]
    async fn test_missing_root_fails_before_model_call() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        let repo = MockRepoInspector::new();
        let mut gateway = MockModelGateway::new();
        gateway.expect_generate().times(0);

        let ctx = PipelineContext::new(&missing, &repo, &gateway);
        let result = run(&ReadmePipeline::new(None, true), &ctx).await;

        assert!(matches!(
            result,
            Err(PipelineError::Scan(ScanError::RootUnreadable { .. }))
        ));
    }
}
