//! Depth-first project walk producing a path → content map.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, DirEntry};
use std::io;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::ScanError;

use super::binary::read_if_text;
use super::rules::{IGNORE_FILE_NAME, RuleSet, resolve_directory};

/// Directory names pruned regardless of ignore rules.
pub const DEFAULT_SKIP_DIRECTORIES: &[&str] = &[
    ".git",
    "node_modules",
    ".next",
    ".expo",
    ".cache",
    ".turbo",
    "dist",
    "out",
    "target",
    "__pycache__",
    ".venv",
];

/// Options for [`scan`].
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Bare directory names that are never descended into.
    pub skip_directories: BTreeSet<String>,
    /// Name of the per-directory ignore file.
    pub ignore_file_name: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            skip_directories: DEFAULT_SKIP_DIRECTORIES
                .iter()
                .map(|name| name.to_string())
                .collect(),
            ignore_file_name: IGNORE_FILE_NAME.to_string(),
        }
    }
}

impl ScanOptions {
    /// Replace the skip list.
    pub fn with_skip_directories<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_directories = names.into_iter().map(Into::into).collect();
        self
    }
}

/// Relative path (forward slashes) → text content of every scanned file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFileMap {
    files: BTreeMap<String, String>,
}

impl ProjectFileMap {
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Paths in lexical order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// `(path, content)` pairs in lexical path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.files
    }
}

impl From<BTreeMap<String, String>> for ProjectFileMap {
    fn from(files: BTreeMap<String, String>) -> Self {
        Self { files }
    }
}

/// Scan `root` and return the text content of every included file.
///
/// Ignore files themselves are consumed as rules and left out of the result.
///
/// # Errors
///
/// Fails only when `root` itself cannot be listed. Unreadable ignore files,
/// subdirectories and files below the root are logged and skipped.
pub fn scan(root: &Path, options: &ScanOptions) -> Result<ProjectFileMap, ScanError> {
    let metadata = fs::metadata(root).map_err(|source| ScanError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(ScanError::RootNotDirectory(root.to_path_buf()));
    }

    let entries = read_sorted_entries(root).map_err(|source| ScanError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let walker = Walker { options };
    let mut files = BTreeMap::new();
    walker.visit(root, "", entries, &RuleSet::new(), &mut files);

    debug!("Scanned {} file(s) under {}", files.len(), root.display());

    Ok(ProjectFileMap { files })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Directory,
}

struct Walker<'a> {
    options: &'a ScanOptions,
}

impl Walker<'_> {
    fn visit(
        &self,
        dir: &Path,
        relative_dir: &str,
        entries: Vec<DirEntry>,
        inherited: &RuleSet,
        out: &mut BTreeMap<String, String>,
    ) {
        let resolved = resolve_directory(
            dir,
            relative_dir,
            inherited,
            &self.options.ignore_file_name,
        );

        for entry in entries {
            let name = entry.file_name().to_string_lossy().into_owned();
            let relative = join_relative(relative_dir, &name);
            let path = entry.path();

            let Some(kind) = entry_kind(&entry) else {
                debug!("Skipping special entry {}", relative);
                continue;
            };

            if resolved
                .matcher
                .is_excluded(&relative, kind == EntryKind::Directory)
            {
                debug!("Ignored by rules: {}", relative);
                continue;
            }

            match kind {
                EntryKind::Directory => {
                    if self.options.skip_directories.contains(&name) {
                        debug!("Skipping directory {}", relative);
                        continue;
                    }

                    match read_sorted_entries(&path) {
                        Ok(children) => {
                            self.visit(&path, &relative, children, &resolved.rules, out)
                        }
                        Err(e) => warn!("Could not read directory {}: {}", relative, e),
                    }
                }
                EntryKind::File => {
                    if name == self.options.ignore_file_name {
                        continue;
                    }
                    read_text_file(&path, relative, out)
                }
            }
        }
    }
}

/// Record a file's content unless it is binary; read failures only warn.
fn read_text_file(path: &Path, relative: String, out: &mut BTreeMap<String, String>) {
    match read_if_text(path) {
        Ok(Some(content)) => {
            out.insert(relative, content);
        }
        Ok(None) => debug!("Skipping binary file {}", relative),
        Err(e) => warn!("Could not read file {}: {}", relative, e),
    }
}

/// Classify an entry. Symlinked directories are not followed.
fn entry_kind(entry: &DirEntry) -> Option<EntryKind> {
    let file_type = entry.file_type().ok()?;

    if file_type.is_dir() {
        Some(EntryKind::Directory)
    } else if file_type.is_file() {
        Some(EntryKind::File)
    } else if file_type.is_symlink() {
        match fs::metadata(entry.path()) {
            Ok(target) if target.is_file() => Some(EntryKind::File),
            _ => None,
        }
    } else {
        None
    }
}

/// List a directory with entries sorted by name.
fn read_sorted_entries(dir: &Path) -> io::Result<Vec<DirEntry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        match entry {
            Ok(entry) => entries.push(entry),
            Err(e) => warn!("Could not read entry in {}: {}", dir.display(), e),
        }
    }
    entries.sort_by_key(DirEntry::file_name);
    Ok(entries)
}

fn join_relative(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}
