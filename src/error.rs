//! Error types for aigen modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from project tree scanning.
///
/// Only the root directory is fatal; everything below it degrades to a warning.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Cannot scan '{}': {source}", path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Scan root '{}' is not a directory", .0.display())]
    RootNotDirectory(PathBuf),
}

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository. Run aigen from inside a git working tree.")]
    NotARepository,

    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Failed to collect staged diff: {0}")]
    DiffFailed(#[source] git2::Error),

    #[error("Failed to walk commit history: {0}")]
    RevwalkError(#[source] git2::Error),

    #[error("Failed to create commit: {0}")]
    CommitFailed(#[source] git2::Error),

    #[error("Git config error (missing user.name or user.email): {0}")]
    ConfigError(#[source] git2::Error),

    #[error("Git task was interrupted: {0}")]
    TaskFailed(String),
}

/// Errors from the model gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error(
        "Gemini API key not found. Set it with:\n  aigen config <your-api-key>\nor export GEMINI_API_KEY"
    )]
    MissingCredential,

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Generation request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Generation failed ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Model returned an unreadable response: {0}")]
    InvalidResponse(String),

    #[error("Model returned no text")]
    EmptyResponse,
}

/// Errors from the persisted configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine the user configuration directory")]
    NoConfigDir,

    #[error("Failed to read config file '{}': {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config file '{}': {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[source] toml::ser::Error),
}

/// Errors from artifact pipelines.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(
        "No staged changes found. Stage your changes using:\n  git add <file>\n  git add ."
    )]
    NoStagedChanges,

    #[error("No commits found in the repository.")]
    NoCommits,

    #[error("Could not read '{}': {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File is empty: {}", .0.display())]
    EmptyFile(PathBuf),

    #[error("Failed to write '{}': {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Background task was interrupted: {0}")]
    TaskFailed(String),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
