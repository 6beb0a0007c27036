//! Byte offset to line/column mapping.

use std::fmt;
use std::sync::Arc;

use crate::Span;

/// File name reported for expressions parsed without an explicit name.
pub const DEFAULT_FILE_NAME: &str = "expression";

/// Line start table for one expression source.
#[derive(Clone, Debug)]
pub struct SourceMap {
    file: Arc<str>,
    line_starts: Vec<u32>,
}

impl SourceMap {
    pub fn new(file: impl Into<Arc<str>>, source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                // Sources longer than u32::MAX are rejected by the lexer first.
                line_starts.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            }
        }
        SourceMap {
            file: file.into(),
            line_starts,
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// 1-based line and byte column of `offset`.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        let col = offset - self.line_starts[line] + 1;
        // Line tables never exceed u32 entries because offsets are u32.
        (u32::try_from(line).unwrap_or(u32::MAX) + 1, col)
    }

    /// Resolve a span to a printable position range.
    pub fn position(&self, span: Span) -> Position {
        let (line, col) = self.line_col(span.start);
        let (end_line, end_col) = self.line_col(span.end);
        Position {
            file: Arc::clone(&self.file),
            line,
            col,
            end_line,
            end_col,
        }
    }
}

/// Resolved source position range of an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub file: Arc<str>,
    pub line: u32,
    pub col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn first_line_columns_are_one_based() {
        let map = SourceMap::new(DEFAULT_FILE_NAME, "a + b");
        assert_eq!(map.line_col(0), (1, 1));
        assert_eq!(map.line_col(4), (1, 5));
    }

    #[test]
    fn later_lines() {
        let map = SourceMap::new("f.expr", "a +\n  b\nc");
        assert_eq!(map.line_col(4), (2, 1));
        assert_eq!(map.line_col(6), (2, 3));
        assert_eq!(map.line_col(8), (3, 1));
    }

    #[test]
    fn position_display() {
        let map = SourceMap::new("f.expr", "x\n  y");
        let pos = map.position(Span::new(4, 5));
        assert_eq!(pos.to_string(), "f.expr:2:3");
        assert_eq!((pos.end_line, pos.end_col), (2, 4));
    }
}
