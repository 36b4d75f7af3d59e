//! Code review prompt.

use super::sanitize::{MAX_DIFF_CHARS, sanitize_with_limit};

/// Build the review prompt for one file.
pub fn build_review_prompt(path: &str, content: &str, instruction: Option<&str>) -> String {
    let extra = instruction
        .map(|text| format!("\nAdditional instructions: {text}\n"))
        .unwrap_or_default();

    let content = sanitize_with_limit(content, MAX_DIFF_CHARS);

    format!(
        r#"You are a senior software engineer performing a code review of the file `{path}`.

Review the code for:
- Bugs and incorrect edge-case handling
- Security issues
- Performance problems
- Readability and maintainability

Rules:
- Reference line numbers or identifiers for every finding
- Order findings by severity and suggest a concrete fix for each
- Say so plainly if the file looks good; do not invent problems
{extra}
File content:
{content}
"#
    )
}
