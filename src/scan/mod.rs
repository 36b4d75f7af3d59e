//! Project tree scanning with hierarchical gitignore semantics.

pub mod binary;
pub mod rules;
pub mod walker;

pub use rules::{DirectoryRules, IGNORE_FILE_NAME, IgnoreMatcher, RuleSet, resolve_directory};
pub use walker::{DEFAULT_SKIP_DIRECTORIES, ProjectFileMap, ScanOptions, scan};
