//! README prompt and project overview.

use crate::scan::ProjectFileMap;

use super::sanitize::{remove_ansi_escapes, remove_control_chars, truncate_chars};

/// Characters of a single file included in the overview.
pub const MAX_FILE_CHARS: usize = 8_000;

/// Characters of the whole overview.
pub const MAX_OVERVIEW_CHARS: usize = 200_000;

/// Render scanned files as `File: <path>` blocks.
///
/// Long files are cut at [`MAX_FILE_CHARS`]; once the overview reaches
/// [`MAX_OVERVIEW_CHARS`] the remaining files are listed by path only.
pub fn build_project_overview(files: &ProjectFileMap) -> String {
    build_overview_with_limits(files, MAX_FILE_CHARS, MAX_OVERVIEW_CHARS)
}

fn build_overview_with_limits(
    files: &ProjectFileMap,
    max_file_chars: usize,
    max_total_chars: usize,
) -> String {
    let mut overview = String::from("Project Overview:\n\n");
    let mut used = 0usize;
    let mut omitted = Vec::new();

    for (path, content) in files.iter() {
        if used >= max_total_chars {
            omitted.push(path);
            continue;
        }

        let content = remove_control_chars(&remove_ansi_escapes(content));
        let budget = max_file_chars.min(max_total_chars - used);
        let (body, truncated) = match truncate_chars(&content, budget) {
            Some(head) => (head, true),
            None => (content.as_str(), false),
        };
        used += body.chars().count();

        overview.push_str("File: ");
        overview.push_str(path);
        overview.push('\n');
        overview.push_str(body);
        if truncated {
            overview.push_str("\n... (truncated)");
        }
        overview.push_str("\n\n");
    }

    if !omitted.is_empty() {
        overview.push_str("Other files (content omitted):\n");
        for path in omitted {
            overview.push_str("- ");
            overview.push_str(path);
            overview.push('\n');
        }
    }

    overview
}

/// Build the README prompt.
///
/// The structural rules always apply; an instruction is added as extra
/// guidance on top of them.
pub fn build_readme_prompt(overview: &str, instruction: Option<&str>) -> String {
    let extra = instruction
        .map(|text| format!("\nExtra instructions from the user (follow them carefully):\n{text}\n"))
        .unwrap_or_default();

    format!(
        r#"You are an expert AI software engineer and technical writer.
I will provide you a project overview containing hints about file names, folders, and components.
Your task is to generate a **professional, complete, GitHub-ready README.md** file.

Follow these instructions **strictly**:

1. DO NOT include full source code of files.
2. DO NOT output file listings, folder structures, or summaries as the main content.
3. Focus on **what the project does**, **its components**, **features**, and **purpose**.
4. Write a **full project description**, explaining the problem it solves, the value it provides, and how it works at a high level.
5. Include these sections in the README:

   - Project title
   - Full description
   - Installation instructions (step-by-step, including dependencies)
   - Usage examples (commands, code snippets, or workflow examples)
   - Key features (bullet points with real value)
   - License information
   - A welcoming contribution section after the license, explaining the vibe of the project and encouraging contributions
   - Notes, tips, or important instructions for developers

6. Use a **professional, clear, enthusiastic, and friendly tone**.
7. Output raw markdown only, without wrapping it in a code fence.
{extra}
Project hints (analyze to understand the project, do not copy files or content):

{overview}
Do not include, display, or reference any project structure, file names, folders, or source code in the README; focus only on describing the project's purpose, features, usage, and value.
"#
    )
}
