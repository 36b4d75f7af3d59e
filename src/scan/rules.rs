//! Hierarchical gitignore rule resolution.
//!
//! Rules declared in a nested ignore file apply relative to that file's
//! directory. Each rule is rewritten into an equivalent root-relative pattern
//! when it is read, so a [`RuleSet`] is always a flat, ordered sequence that
//! one matcher rooted at the scan root can evaluate. A child directory's set
//! is its parent's set with the child's own rules appended; later rules win,
//! which is what lets a nested `!pattern` re-include a path excluded higher up.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use tracing::{debug, warn};

/// Name of the per-directory ignore file.
pub const IGNORE_FILE_NAME: &str = ".gitignore";

/// Root every matcher is built against. Paths are always queried relative to
/// the scan root, so the matcher must never strip a prefix from them.
const MATCHER_ROOT: &str = ".";

/// An immutable, ordered sequence of root-relative gitignore patterns.
///
/// Cloning is cheap; deriving a child set never touches the parent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Arc<Vec<String>>,
}

impl RuleSet {
    /// An empty rule set (the chain inherited by the scan root).
    pub fn new() -> Self {
        Self::default()
    }

    /// The root-relative patterns, oldest first.
    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Derive a new set with the rules of an ignore file appended.
    ///
    /// `base` is the root-relative, forward-slash directory that declared the
    /// lines (`""` for the scan root). Blank lines, comments and patterns that
    /// fail to compile are dropped.
    pub fn extend<'a, I>(&self, base: &str, lines: I) -> RuleSet
    where
        I: IntoIterator<Item = &'a str>,
    {
        let additions: Vec<String> = lines
            .into_iter()
            .filter_map(|line| scope_rule(base, line))
            .filter(|rule| match GitignoreBuilder::new(MATCHER_ROOT).add_line(None, rule) {
                Ok(_) => true,
                Err(e) => {
                    warn!("Skipping invalid ignore pattern '{}': {}", rule, e);
                    false
                }
            })
            .collect();

        if additions.is_empty() {
            return self.clone();
        }

        let mut rules = Vec::with_capacity(self.rules.len() + additions.len());
        rules.extend(self.rules.iter().cloned());
        rules.extend(additions);

        RuleSet {
            rules: Arc::new(rules),
        }
    }

    /// Build a matcher over the whole sequence.
    pub fn matcher(&self) -> IgnoreMatcher {
        let mut builder = GitignoreBuilder::new(MATCHER_ROOT);
        for rule in self.rules.iter() {
            // Every rule was validated in `extend`.
            if let Err(e) = builder.add_line(None, rule) {
                warn!("Skipping invalid ignore pattern '{}': {}", rule, e);
            }
        }

        let inner = builder.build().unwrap_or_else(|e| {
            warn!("Failed to build ignore matcher: {}", e);
            Gitignore::empty()
        });

        IgnoreMatcher { inner }
    }
}

/// Answers "is this root-relative path excluded?".
#[derive(Debug, Clone)]
pub struct IgnoreMatcher {
    inner: Gitignore,
}

impl IgnoreMatcher {
    /// Whether `relative` (forward-slash, root-relative) is excluded.
    ///
    /// `is_dir` must be set for directories so that directory-only patterns
    /// (trailing `/`) apply.
    pub fn is_excluded(&self, relative: &str, is_dir: bool) -> bool {
        self.inner.matched(relative, is_dir).is_ignore()
    }
}

/// The effective rules of one directory.
#[derive(Debug, Clone)]
pub struct DirectoryRules {
    /// Matcher for this directory's entries.
    pub matcher: IgnoreMatcher,
    /// The chain handed down to child directories.
    pub rules: RuleSet,
}

/// Resolve the rules of `dir` from the chain inherited from its ancestors.
///
/// Reads at most one file (`dir/<ignore_file>`). A missing file adds nothing;
/// an unreadable one adds nothing and logs a warning.
pub fn resolve_directory(
    dir: &Path,
    relative_dir: &str,
    inherited: &RuleSet,
    ignore_file: &str,
) -> DirectoryRules {
    let ignore_path = dir.join(ignore_file);

    let rules = match fs::read_to_string(&ignore_path) {
        Ok(content) => {
            let rules = inherited.extend(relative_dir, content.lines());
            debug!(
                "Loaded {} ignore rule(s) from {}",
                rules.len() - inherited.len(),
                ignore_path.display()
            );
            rules
        }
        Err(e) if e.kind() == ErrorKind::NotFound => inherited.clone(),
        Err(e) => {
            warn!("Could not read {}: {}", ignore_path.display(), e);
            inherited.clone()
        }
    };

    DirectoryRules {
        matcher: rules.matcher(),
        rules,
    }
}

/// Rewrite one ignore-file line declared in `base` into a root-relative rule.
///
/// Returns `None` for blank lines and comments.
fn scope_rule(base: &str, line: &str) -> Option<String> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let line = trim_trailing_spaces(line);

    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    if base.is_empty() {
        return Some(line.to_string());
    }

    let (negated, body) = match line.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, line),
    };
    let (body, dir_only) = match body.strip_suffix('/') {
        Some(rest) => (rest, true),
        None => (body, false),
    };

    // A slash anywhere but the end anchors the pattern to its directory.
    let anchored = body.contains('/');
    let body = body.strip_prefix('/').unwrap_or(body);
    if body.is_empty() {
        return None;
    }

    let mut rule = String::with_capacity(base.len() + body.len() + 8);
    if negated {
        rule.push('!');
    }
    rule.push('/');
    rule.push_str(&escape_glob(base));
    rule.push('/');
    if !anchored {
        rule.push_str("**/");
    }
    rule.push_str(body);
    if dir_only {
        rule.push('/');
    }

    Some(rule)
}

/// Trailing spaces are insignificant unless escaped with a backslash.
fn trim_trailing_spaces(line: &str) -> &str {
    let trimmed = line.trim_end_matches(' ');
    if trimmed.len() < line.len() && trimmed.ends_with('\\') {
        &line[..trimmed.len() + 1]
    } else {
        trimmed
    }
}

/// Escape glob metacharacters in a literal directory path.
fn escape_glob(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for ch in path.chars() {
        if matches!(ch, '*' | '?' | '[' | ']' | '{' | '}' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
