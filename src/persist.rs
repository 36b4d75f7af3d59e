//! Atomic file replacement.
//!
//! Content is written to a temporary file next to the destination and renamed
//! over it, so readers never observe a half-written artifact.

use std::fs::{self, Permissions};
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visibility {
    /// Keep the destination's permissions, or use the usual file mode.
    Shared,
    /// Owner read/write only.
    Private,
}

/// Atomically replace `path` with `contents`, creating parent directories.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    write_with(path, contents, Visibility::Shared)
}

/// Like [`write_atomic`], but the file is readable by its owner only.
pub fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    write_with(path, contents, Visibility::Private)
}

fn write_with(path: &Path, contents: &[u8], visibility: Visibility) -> io::Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let mut file = NamedTempFile::new_in(parent)?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;

    // Temporary files start owner-only.
    if visibility == Visibility::Shared {
        let permissions = match fs::metadata(path) {
            Ok(existing) => Some(existing.permissions()),
            Err(_) => default_permissions(),
        };
        if let Some(permissions) = permissions {
            file.as_file().set_permissions(permissions)?;
        }
    }

    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(unix)]
fn default_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<Permissions> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomic_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".github/nested/template.md");

        write_atomic(&path, b"hello\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_write_atomic_overwrites_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("README.md");
        fs::write(&path, "old content that is longer").unwrap();

        write_atomic(&path, b"new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let shared = dir.path().join("shared.md");
        let private = dir.path().join("private.toml");

        write_atomic(&shared, b"a").unwrap();
        write_private(&private, b"b").unwrap();

        let shared_mode = fs::metadata(&shared).unwrap().permissions().mode() & 0o777;
        let private_mode = fs::metadata(&private).unwrap().permissions().mode() & 0o777;
        assert_eq!(shared_mode, 0o644);
        assert_eq!(private_mode, 0o600);
    }
}
