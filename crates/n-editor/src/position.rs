//! Cursor positions and column conversion.
//!
//! All coordinates are **0-indexed**. Editor columns count chars, while the
//! pattern engine and the mark engine work in byte offsets within a line.
//! [`char_to_byte`] and [`byte_to_char`] convert at that boundary and
//! nowhere else.

use std::fmt;

/// A position in a text buffer: (line, column), both 0-indexed.
///
/// `col` is a char offset from the start of the line. Ordering is line
/// first, then column.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    /// The origin — line 0, column 0.
    pub const ZERO: Self = Self { line: 0, col: 0 };

    #[inline]
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.line, self.col)
    }
}

/// 1-indexed `line:col`, the way the user types and reads it.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

/// Byte offset of char `char_offset` in `s` (`s.len()` when past the end).
#[must_use]
pub fn char_to_byte(s: &str, char_offset: usize) -> usize {
    s.char_indices()
        .nth(char_offset)
        .map_or(s.len(), |(b, _)| b)
}

/// Char offset of byte `byte_offset` in `s`.
///
/// A byte offset inside a multi-byte char maps to that char.
#[must_use]
pub fn byte_to_char(s: &str, byte_offset: usize) -> usize {
    let mut b = byte_offset.min(s.len());
    while !s.is_char_boundary(b) {
        b -= 1;
    }
    s[..b].chars().count()
}
