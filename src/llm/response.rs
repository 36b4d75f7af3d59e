//! Cleanup of generated text.
//!
//! Models often wrap a whole document in a markdown code fence even when asked
//! for plain markdown. Only a fence that encloses the entire answer is removed;
//! fenced snippets inside a document are left alone.

/// Trim the response and strip a single fence wrapping all of it.
pub fn clean_response(response: &str) -> String {
    let trimmed = response.trim();

    if let Some(inner) = strip_wrapping_fence(trimmed) {
        return inner.trim().to_string();
    }

    trimmed.to_string()
}

/// Return the fenced body if `text` is exactly one fenced block.
fn strip_wrapping_fence(text: &str) -> Option<&str> {
    let body = text.strip_prefix("```")?.strip_suffix("```")?;

    // The opening line may carry an info string such as `markdown`.
    let newline = body.find('\n')?;
    let (info, inner) = body.split_at(newline);
    if info.trim().contains(char::is_whitespace) {
        return None;
    }

    // A bare fence that closes nothing means the outer markers belong to
    // separate blocks.
    let mut nested_open = false;
    for line in inner.lines() {
        let Some(rest) = line.trim_start().strip_prefix("```") else {
            continue;
        };
        if nested_open {
            nested_open = false;
        } else if rest.trim().is_empty() {
            return None;
        } else {
            nested_open = true;
        }
    }

    Some(inner)
}
