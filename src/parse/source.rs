use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::diagnostic::Location;
use crate::syntax::Span;

/// Raw contents of one input file, held for the duration of its pass.
#[derive(Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: Vec<u8>,
    /// Byte offsets where each line starts (0-indexed into content)
    line_starts: Vec<usize>,
}

impl SourceFile {
    /// Read a file from disk. The error is returned untouched so callers can
    /// tell a missing file from a permission failure.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read(path)?;
        Ok(Self::from_vec(path.to_path_buf(), content))
    }

    /// Create a SourceFile from a string, using the given path for display purposes.
    pub fn from_string(path: PathBuf, content: String) -> Self {
        Self::from_vec(path, content.into_bytes())
    }

    /// Create a SourceFile from raw bytes and a path.
    pub fn from_vec(path: PathBuf, content: Vec<u8>) -> Self {
        let line_starts = compute_line_starts(&content);
        Self {
            path,
            content,
            line_starts,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    /// Whole file as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }

    pub fn slice(&self, span: Span) -> Cow<'_, str> {
        span.text(&self.content)
    }

    /// Convert a byte offset into a (1-indexed line, 0-indexed column) pair.
    /// Column is a character offset (UTF-8 codepoint count) within the line.
    pub fn offset_to_line_col(&self, byte_offset: usize) -> (usize, usize) {
        let byte_offset = byte_offset.min(self.content.len());
        let line_idx = match self.line_starts.binary_search(&byte_offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        let line_bytes = &self.content[self.line_starts[line_idx]..byte_offset];
        // Count bytes that are NOT UTF-8 continuation bytes (0x80..0xBF).
        let col = line_bytes.iter().filter(|&&b| (b & 0xC0) != 0x80).count();
        (line_idx + 1, col)
    }

    pub fn location(&self, byte_offset: usize) -> Location {
        let (line, column) = self.offset_to_line_col(byte_offset);
        Location { line, column }
    }

    pub fn path_str(&self) -> &str {
        self.path.to_str().unwrap_or("<non-utf8 path>")
    }
}

fn compute_line_starts(content: &[u8]) -> Vec<usize> {
    let mut starts = vec![0];
    for (i, &byte) in content.iter().enumerate() {
        if byte == b'\n' && i + 1 < content.len() {
            starts.push(i + 1);
        }
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(s: &str) -> SourceFile {
        SourceFile::from_vec(PathBuf::from("steps.rb"), s.as_bytes().to_vec())
    }

    #[test]
    fn line_starts_multiple_lines() {
        let sf = source("abc\ndef\nghi");
        assert_eq!(sf.line_starts, vec![0, 4, 8]);
    }

    #[test]
    fn line_starts_trailing_newline() {
        let sf = source("abc\n");
        assert_eq!(sf.line_starts, vec![0]);
    }

    #[test]
    fn offset_to_line_col_second_line() {
        let sf = source("abc\ndef\nghi");
        assert_eq!(sf.offset_to_line_col(4), (2, 0));
        assert_eq!(sf.offset_to_line_col(9), (3, 1));
    }

    #[test]
    fn offset_past_end_is_clamped() {
        let sf = source("abc");
        assert_eq!(sf.offset_to_line_col(100), (1, 3));
    }

    #[test]
    fn multibyte_columns_count_chars() {
        let sf = source("é = 1");
        // 'é' is two bytes; offset 2 is the space after it
        assert_eq!(sf.offset_to_line_col(2), (1, 1));
    }

    #[test]
    fn slice_uses_span() {
        let sf = source("Given(/x/)");
        assert_eq!(sf.slice(Span::new(0, 5)), "Given");
    }

    #[test]
    fn from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("steps.rb");
        std::fs::write(&file, b"x = 1\n").unwrap();
        let sf = SourceFile::from_path(&file).unwrap();
        assert_eq!(sf.as_bytes(), b"x = 1\n");
        assert_eq!(sf.path, file);
    }

    #[test]
    fn from_path_nonexistent_is_not_found() {
        let err = SourceFile::from_path(Path::new("/nonexistent/steps.rb")).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn line_starts_follow_newlines(content in prop::collection::vec(any::<u8>(), 0..500)) {
                let starts = compute_line_starts(&content);
                prop_assert_eq!(starts[0], 0);
                for &start in &starts[1..] {
                    prop_assert!(start > 0 && content[start - 1] == b'\n');
                }
            }

            #[test]
            fn offset_to_line_col_is_monotonic(content in prop::collection::vec(any::<u8>(), 1..500)) {
                let sf = SourceFile::from_vec(PathBuf::from("t.rb"), content.clone());
                let mut prev = (0usize, 0usize);
                for offset in 0..content.len() {
                    let cur = sf.offset_to_line_col(offset);
                    prop_assert!(cur >= prev);
                    prev = cur;
                }
            }
        }
    }
}
