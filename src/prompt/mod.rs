//! Prompt composition.
//!
//! Every builder is a pure function of the gathered data and an optional
//! user instruction. How an instruction combines with the default rules
//! depends on the artifact:
//!
//! - commit message: the instruction replaces the default rules
//! - README: the structural rules always apply, the instruction is appended
//! - changelog, pull request, review: the instruction is appended

pub mod changelog;
pub mod commit;
pub mod pull_request;
pub mod readme;
pub mod review;
pub mod sanitize;

pub use changelog::{build_changelog_prompt, format_commit_history};
pub use commit::build_commit_prompt;
pub use pull_request::{PullRequestInput, build_pull_request_prompt};
pub use readme::{build_project_overview, build_readme_prompt};
pub use review::build_review_prompt;
pub use sanitize::{MAX_DIFF_CHARS, sanitize_diff};

/// Trim a user instruction; blank instructions count as absent.
pub fn normalize_instruction(instruction: Option<&str>) -> Option<&str> {
    instruction.map(str::trim).filter(|text| !text.is_empty())
}
