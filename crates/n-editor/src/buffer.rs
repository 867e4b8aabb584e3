//! Text buffer — the text every window looks at.
//!
//! A `Buffer` wraps a [`ropey::Rope`]. Marks never edit text, so the API
//! is read-only apart from loading: line access without line endings,
//! char lookup by [`Position`], and the file path it came from.
//!
//! **Columns are char offsets.** Byte offsets only appear at the pattern
//! boundary (see [`crate::position`]).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ropey::Rope;

use crate::position::Position;

/// A read-only text buffer backed by a rope.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    rope: Rope,
    path: Option<PathBuf>,
}

impl Buffer {
    /// An empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A scratch buffer holding `text`.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            path: None,
        }
    }

    /// Load a file.
    ///
    /// # Errors
    ///
    /// Any I/O error from reading the file, including invalid UTF-8.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self {
            rope: Rope::from_str(&text),
            path: Some(path.to_path_buf()),
        })
    }

    /// The file this buffer was loaded from.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// True if the buffer has no text at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Number of lines.
    ///
    /// A trailing line ending does not start another line, so `"a\nb\n"`
    /// has two lines. An empty buffer has none.
    #[must_use]
    pub fn line_count(&self) -> usize {
        let lines = self.rope.len_lines();
        if self.is_empty() {
            0
        } else if self.rope.line(lines - 1).len_chars() == 0 {
            lines - 1
        } else {
            lines
        }
    }

    /// Content of line `line` without its line ending.
    #[must_use]
    pub fn line(&self, line: usize) -> Option<String> {
        if line >= self.line_count() {
            return None;
        }
        let s: String = self.rope.line(line).chars().collect();
        Some(s.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Number of chars on `line`, excluding the line ending.
    #[must_use]
    pub fn line_content_len(&self, line: usize) -> Option<usize> {
        self.line(line).map(|s| s.chars().count())
    }

    /// The char at `pos`, or `None` past the end of the line's content.
    #[must_use]
    pub fn char_at(&self, pos: Position) -> Option<char> {
        self.line(pos.line)?.chars().nth(pos.col)
    }

    /// Move `pos` onto the nearest existing char.
    #[must_use]
    pub fn clamp_position(&self, pos: Position) -> Position {
        let count = self.line_count();
        if count == 0 {
            return Position::ZERO;
        }
        let line = pos.line.min(count - 1);
        let len = self.line_content_len(line).unwrap_or(0);
        Position::new(line, pos.col.min(len.saturating_sub(1)))
    }
}
