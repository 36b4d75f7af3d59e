//! Cleanup of untrusted text before it is embedded in a prompt.

use std::sync::LazyLock;

use regex_lite::Regex;

/// Maximum number of characters of diff text sent to the model.
pub const MAX_DIFF_CHARS: usize = 60_000;

/// CSI sequences (colors, cursor movement) and OSC sequences (titles, links).
static ANSI_ESCAPE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)").ok()
});

/// Sanitize diff text: strip terminal escapes and control characters, then
/// truncate to [`MAX_DIFF_CHARS`].
pub fn sanitize_diff(text: &str) -> String {
    sanitize_with_limit(text, MAX_DIFF_CHARS)
}

/// Like [`sanitize_diff`] with an explicit character limit.
///
/// A truncated result ends with a note telling the model the input was cut.
pub fn sanitize_with_limit(text: &str, max_chars: usize) -> String {
    // Escapes go first; stripping ESC alone would leave `[31m` behind.
    let cleaned = remove_control_chars(&remove_ansi_escapes(text));

    match truncate_chars(&cleaned, max_chars) {
        Some(truncated) => format!(
            "{truncated}\n\n[truncated: only the first {max_chars} characters are shown]"
        ),
        None => cleaned,
    }
}

/// Remove ANSI escape sequences.
pub fn remove_ansi_escapes(text: &str) -> String {
    match ANSI_ESCAPE.as_ref() {
        Some(re) => re.replace_all(text, "").into_owned(),
        None => text.to_string(),
    }
}

/// Remove control characters except newlines and tabs.
pub fn remove_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// The first `max_chars` characters of `text`, or `None` when it already fits.
pub fn truncate_chars(text: &str, max_chars: usize) -> Option<&str> {
    text.char_indices()
        .nth(max_chars)
        .map(|(byte_index, _)| &text[..byte_index])
}
