//! Pull request prompt.

use crate::git::CommitRecord;

use super::changelog::format_commit_history;
use super::sanitize::sanitize_diff;

/// Data gathered for a pull request description.
#[derive(Debug, Clone, Copy)]
pub struct PullRequestInput<'a> {
    pub diff: &'a str,
    pub commits: &'a [CommitRecord],
    pub files: &'a [String],
}

/// Build the pull request prompt. The model is asked to put the title on the
/// first line so it can be split from the body.
pub fn build_pull_request_prompt(input: &PullRequestInput<'_>, instruction: Option<&str>) -> String {
    let files = if input.files.is_empty() {
        "(none)".to_string()
    } else {
        input
            .files
            .iter()
            .map(|f| format!("- {f}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let commits = if input.commits.is_empty() {
        "(no commits yet)".to_string()
    } else {
        format_commit_history(input.commits)
    };

    let extra = instruction
        .map(|text| format!("\nAdditional instructions: {text}\n"))
        .unwrap_or_default();

    let diff = sanitize_diff(input.diff);

    format!(
        r###"You are writing a pull request description for the staged changes below.

Output format:
- Line 1: a concise PR title (under 72 characters, no markdown, no "Title:" prefix)
- Line 2: empty
- Then the body in markdown with the sections "## Summary", "## Changes" and "## Testing"

Rules:
- Explain what changed and why, for a reviewer who has not seen the code
- Mention affected files or modules in "## Changes"
- Suggest concrete verification steps in "## Testing"
- Do not wrap the answer in a code fence
{extra}
Staged files:
{files}

Recent commits:
{commits}

Staged diff:
{diff}
"###
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_all_inputs() {
        let commits = vec![CommitRecord {
            short_hash: "abc1234".to_string(),
            date: "2024-03-01".to_string(),
            subject: "feat: add parser".to_string(),
            author: "Ada".to_string(),
        }];
        let files = vec!["src/parser.rs".to_string()];
        let input = PullRequestInput {
            diff: "+fn parse() {}\n",
            commits: &commits,
            files: &files,
        };

        let prompt = build_pull_request_prompt(&input, Some("mention the benchmark"));

        assert!(prompt.contains("- src/parser.rs"));
        assert!(prompt.contains("- abc1234 (2024-03-01): feat: add parser [Ada]"));
        assert!(prompt.contains("+fn parse() {}"));
        assert!(prompt.contains("Additional instructions: mention the benchmark"));
        assert!(prompt.contains("\"## Summary\", \"## Changes\" and \"## Testing\""));
        assert!(prompt.ends_with("Staged diff:\n+fn parse() {}\n\n"));
    }

    #[test]
    fn test_prompt_with_empty_history() {
        let input = PullRequestInput {
            diff: "+x\n",
            commits: &[],
            files: &[],
        };
        let prompt = build_pull_request_prompt(&input, None);
        assert!(prompt.contains("(no commits yet)"));
        assert!(prompt.contains("Staged files:\n(none)"));
    }
}
