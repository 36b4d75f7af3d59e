//! Changelog prompt.

use crate::git::CommitRecord;

/// One line per commit: `- <hash> (<date>): <subject> [<author>]`.
pub fn format_commit_history(commits: &[CommitRecord]) -> String {
    commits
        .iter()
        .map(|c| format!("- {} ({}): {} [{}]", c.short_hash, c.date, c.subject, c.author))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the changelog prompt from formatted history.
pub fn build_changelog_prompt(history: &str, instruction: Option<&str>) -> String {
    let extra = instruction
        .map(|text| format!("\nAdditional instructions: {text}\n"))
        .unwrap_or_default();

    format!(
        r###"You are a release manager writing a CHANGELOG.md for a software project.

Rules:
- Follow the Keep a Changelog style with a top-level "# Changelog" heading
- Group entries under "Added", "Changed", "Fixed" and "Removed" headings, omitting empty groups
- Write each entry for end users in one short line, in imperative mood
- Merge commits that describe the same change into one entry
- Skip commits with no user-facing effect (formatting, CI, merges)
- Reference the short commit hash at the end of each entry
- Output raw markdown only, without wrapping it in a code fence
{extra}
Commit history (newest first):
{history}
"###
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(hash: &str, subject: &str) -> CommitRecord {
        CommitRecord {
            short_hash: hash.to_string(),
            date: "2024-03-01".to_string(),
            subject: subject.to_string(),
            author: "Ada".to_string(),
        }
    }

    #[test]
    fn test_format_commit_history() {
        let commits = vec![record("abc1234", "feat: add parser"), record("def5678", "fix: typo")];
        assert_eq!(
            format_commit_history(&commits),
            "- abc1234 (2024-03-01): feat: add parser [Ada]\n- def5678 (2024-03-01): fix: typo [Ada]"
        );
    }

    #[test]
    fn test_format_empty_history() {
        assert_eq!(format_commit_history(&[]), "");
    }

    #[test]
    fn test_prompt_appends_instruction_to_rules() {
        let prompt = build_changelog_prompt("- abc1234 (2024-03-01): x [Ada]", Some("only 2024"));
        assert!(prompt.contains("Keep a Changelog"));
        assert!(prompt.contains("Additional instructions: only 2024"));
        assert!(prompt.contains("- abc1234 (2024-03-01): x [Ada]"));
    }

    #[test]
    fn test_prompt_without_instruction() {
        let prompt = build_changelog_prompt("- a", None);
        assert!(!prompt.contains("Additional instructions"));
    }

    #[test]
    fn test_prompt_keeps_quoted_heading_and_history() {
        let prompt = build_changelog_prompt("- abc1234 (2024-03-01): x [Ada]", None);
        assert!(prompt.contains("top-level \"# Changelog\" heading"));
        assert!(prompt.ends_with("Commit history (newest first):\n- abc1234 (2024-03-01): x [Ada]\n"));
    }
}
