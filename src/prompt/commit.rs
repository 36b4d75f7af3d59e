//! Commit message prompt.

use super::sanitize::sanitize_diff;

/// Build the prompt for a commit message.
///
/// A user instruction replaces the default rules entirely: the model then
/// sees only the instruction, the diff and the commit reference.
pub fn build_commit_prompt(diff: &str, short_sha: &str, instruction: Option<&str>) -> String {
    let diff = sanitize_diff(diff);

    if let Some(instruction) = instruction {
        return format!(
            "Generate a git commit message for the following changes. User instruction: {instruction}\n\nCode changes:\n{diff}\nCommit SHA: {short_sha}"
        );
    }

    format!(
        r#"Generate a clear, descriptive git commit message for the following code changes.

Rules:
- Use Conventional Commits format: type(scope): description
- Subject + body must be under 400 characters
- List all significant changes (major + minor)
- Mention affected files, features, or modules
- End with commit SHA in this format: (commit: {short_sha})
- Make the message fully understandable without seeing the diff
- Respond with the commit message only, without code fences

Code changes:
{diff}
"#
    )
}
