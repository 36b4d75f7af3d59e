//! aigen - generate commit messages, READMEs, changelogs, pull request
//! descriptions and code reviews from a git repository with a language model.
//!
//! # Overview
//!
//! Every artifact follows the same flow: gather data from the project tree or
//! the repository, compose a prompt, call the model gateway, then either write
//! the result or return it for preview. The [`pipeline`] module owns that flow;
//! [`scan`] walks the project while honoring nested `.gitignore` files.

pub mod config;
pub mod error;
pub mod git;
pub mod llm;
pub mod persist;
pub mod pipeline;
pub mod prompt;
pub mod scan;

// Re-export commonly used types
pub use config::{ConfigStore, Settings};
pub use error::{ConfigError, GatewayError, GitError, PipelineError, ScanError};
pub use git::{CommitRecord, GitInspector, RepoInspector};
pub use llm::{GeminiClient, GenerationOptions, ModelGateway};
pub use pipeline::{ArtifactKind, ArtifactPipeline, ArtifactResult, Persisted, PipelineContext};
pub use scan::{ProjectFileMap, RuleSet, ScanOptions, scan};
