//! Line/column mapping for byte offsets.

use memchr::memchr_iter;
use serde::Serialize;

/// A zero-based line/character position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

/// Precomputed line start offsets for a source file.
///
/// Built once per file; `position` is a binary search over the starts.
#[derive(Clone, Debug)]
pub struct LineMap {
    line_starts: Vec<u32>,
}

impl LineMap {
    pub fn new(source: &str) -> Self {
        let mut line_starts = Vec::with_capacity(128);
        line_starts.push(0);
        for nl in memchr_iter(b'\n', source.as_bytes()) {
            line_starts.push((nl + 1) as u32);
        }
        LineMap { line_starts }
    }

    /// Convert a byte offset to a line/character position.
    ///
    /// The character column counts bytes from the line start, which
    /// matches offsets reported elsewhere in diagnostics.
    pub fn position(&self, offset: u32) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        Position {
            line: line as u32,
            character: offset - self.line_starts[line],
        }
    }

    /// Byte offset of the start of `line` (zero-based).
    pub fn line_start(&self, line: u32) -> Option<u32> {
        self.line_starts.get(line as usize).copied()
    }

    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }
}
