//! Binary content detection.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Number of leading bytes inspected, matching git's heuristic window.
pub const SNIFF_LEN: usize = 8000;

/// Whether `bytes` look like binary content.
///
/// A NUL byte in the leading window, or a byte sequence there that can never
/// be valid UTF-8, marks the content as binary. A multi-byte character cut
/// off by the window boundary does not count.
pub fn looks_binary(bytes: &[u8]) -> bool {
    let sample = &bytes[..bytes.len().min(SNIFF_LEN)];

    if sample.contains(&0) {
        return true;
    }

    match std::str::from_utf8(sample) {
        Ok(_) => false,
        Err(e) => e.error_len().is_some(),
    }
}

/// Read `path` as text, or `Ok(None)` when its leading bytes look binary.
///
/// Only the sniff window is read for binary files.
pub fn read_if_text(path: &Path) -> io::Result<Option<String>> {
    let mut file = File::open(path)?;

    let mut bytes = Vec::with_capacity(SNIFF_LEN);
    file.by_ref().take(SNIFF_LEN as u64).read_to_end(&mut bytes)?;
    if looks_binary(&bytes) {
        return Ok(None);
    }

    file.read_to_end(&mut bytes)?;
    String::from_utf8(bytes)
        .map(Some)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_not_binary() {
        assert!(!looks_binary(b"fn main() {}\n"));
        assert!(!looks_binary("héllo wörld".as_bytes()));
        assert!(!looks_binary(b""));
    }

    #[test]
    fn test_nul_byte_is_binary() {
        assert!(looks_binary(&[0x89, b'P', b'N', b'G', 0x00, 0x01]));
    }

    #[test]
    fn test_invalid_utf8_is_binary() {
        assert!(looks_binary(&[b'a', 0xFF, 0xFE, b'b']));
    }

    #[test]
    fn test_char_split_at_window_edge_is_text() {
        let mut bytes = vec![b'a'; SNIFF_LEN - 1];
        bytes.extend("é".as_bytes());
        assert!(!looks_binary(&bytes));
    }

    #[test]
    fn test_nul_after_window_is_ignored() {
        let mut bytes = vec![b'a'; SNIFF_LEN];
        bytes.push(0);
        assert!(!looks_binary(&bytes));
    }

    #[test]
    fn test_read_if_text_reads_past_window() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.txt");
        let content = "line\n".repeat(SNIFF_LEN);
        std::fs::write(&path, &content).unwrap();

        assert_eq!(read_if_text(&path).unwrap(), Some(content));
    }

    #[test]
    fn test_read_if_text_skips_binary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("asset.bin");
        let mut bytes = vec![0u8, 1, 2];
        bytes.extend(std::iter::repeat_n(b'a', SNIFF_LEN * 4));
        std::fs::write(&path, &bytes).unwrap();

        assert_eq!(read_if_text(&path).unwrap(), None);
    }

    #[test]
    fn test_read_if_text_rejects_invalid_utf8_after_window() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.txt");
        let mut bytes = vec![b'a'; SNIFF_LEN + 10];
        bytes.push(0xFF);
        std::fs::write(&path, &bytes).unwrap();

        let err = read_if_text(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
