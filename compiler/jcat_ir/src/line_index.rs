//! Byte offset to `line:column` mapping.
//!
//! Diagnostics name locations the way editors do (1-based line and column),
//! while the tree only stores byte offsets. `LineIndex` is built once per
//! source file by whoever keeps the text around.

use std::fmt;

/// A 1-based line and column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Start offsets of every line in one source text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<u32>,
}

impl LineIndex {
    /// Build the index for `source`.
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .filter_map(|(i, _)| u32::try_from(i + 1).ok()),
        );
        LineIndex { line_starts }
    }

    /// Map a byte offset to its line and column.
    ///
    /// Columns count bytes, not characters. Offsets past the end land on the
    /// last line.
    pub fn line_col(&self, offset: u32) -> LineCol {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert_at) => insert_at - 1,
        };
        let line_start = self.line_starts[line];
        LineCol {
            line: u32::try_from(line + 1).unwrap_or(u32::MAX),
            column: offset - line_start + 1,
        }
    }
}
