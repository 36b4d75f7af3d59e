//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::Path;
use std::sync::Mutex;

use aigen::error::GatewayError;
use aigen::llm::{GenerationOptions, ModelGateway};
use async_trait::async_trait;
use git2::{Oid, Repository, Signature};

/// Write `(relative path, content)` pairs under `root`, creating directories.
pub fn write_tree(root: &Path, files: &[(&str, &[u8])]) {
    for (relative, content) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directory");
        }
        std::fs::write(&path, content).expect("Failed to write test file");
    }
}

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        {
            let mut config = repo.config().expect("Failed to open repo config");
            config.set_str("user.name", "Test User").expect("Failed to set user.name");
            config
                .set_str("user.email", "test@example.com")
                .expect("Failed to set user.email");
        }
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Get the test signature for commits.
    fn signature(&self) -> Signature<'_> {
        Signature::now("Test User", "test@example.com").expect("Failed to create signature")
    }

    /// Write a file in the working tree.
    pub fn write(&self, relative: &str, content: &str) {
        write_tree(self.path(), &[(relative, content.as_bytes())]);
    }

    /// Write a file and add it to the index.
    pub fn stage(&self, relative: &str, content: &str) {
        self.write(relative, content);
        let mut index = self.repo.index().expect("Failed to get index");
        index
            .add_path(Path::new(relative))
            .expect("Failed to add file");
        index.write().expect("Failed to write index");
    }

    /// Stage `relative` with `content` and commit it. Returns the commit OID.
    pub fn commit_file(&self, relative: &str, content: &str, message: &str) -> Oid {
        self.stage(relative, content);
        self.commit_index(message)
    }

    /// Commit the current index on HEAD.
    pub fn commit_index(&self, message: &str) -> Oid {
        let sig = self.signature();

        let mut index = self.repo.index().expect("Failed to get index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        // Get parent commit if exists
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());

        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Subject of the HEAD commit.
    pub fn head_subject(&self) -> String {
        self.repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .map(|c| c.summary().unwrap_or_default().to_string())
            .expect("Failed to read HEAD commit")
    }
}

/// A gateway that returns a fixed response and records every prompt.
pub struct RecordingGateway {
    response: String,
    pub prompts: Mutex<Vec<String>>,
}

impl RecordingGateway {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().expect("prompt log poisoned").len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().expect("prompt log poisoned").last().cloned()
    }
}

#[async_trait]
impl ModelGateway for RecordingGateway {
    async fn generate(
        &self,
        prompt: &str,
        _options: &GenerationOptions,
    ) -> Result<String, GatewayError> {
        self.prompts
            .lock()
            .expect("prompt log poisoned")
            .push(prompt.to_string());
        Ok(self.response.clone())
    }
}
