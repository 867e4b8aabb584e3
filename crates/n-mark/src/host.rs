//! Host editor interface.
//!
//! The engine never touches text, windows or a regex engine directly. A
//! host editor implements [`Host`] (and its supertrait [`Matcher`]) and
//! passes itself to every [`Marks`](crate::Marks) operation.
//!
//! # Offsets
//!
//! All columns crossing this boundary are **byte offsets** into a single
//! line. Hosts with char-based cursors convert on their side.
//!
//! # Views
//!
//! Highlight registration names its target view explicitly, so pushing a
//! change into every view never has to make another view current. The
//! host's layout and current view are left exactly as they were.

use std::ops::Range;

use crate::config::HistoryKind;

/// Identifier of an open view (window). Unique for the view's lifetime.
pub type ViewId = usize;

/// Name prefix of the highlight groups that define mark colors.
///
/// Slot `i` renders with group `MarkWord{i + 1}`. The number of
/// consecutive groups the host defines is the slot capacity.
pub const GROUP_PREFIX: &str = "MarkWord";

/// Highlight group name for a slot index.
#[must_use]
pub fn group_name(index: usize) -> String {
    format!("{GROUP_PREFIX}{}", index + 1)
}

/// Opaque handle for a registered highlight, as returned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchHandle(pub u64);

/// A cursor location: line index and byte column within that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct TextPos {
    pub line: usize,
    pub col: usize,
}

impl TextPos {
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// The host's pattern-matching engine.
pub trait Matcher {
    /// First match of `pattern` in `text` starting at or after byte `from`.
    ///
    /// Returns the byte range of the match. A pattern the engine cannot
    /// compile matches nothing.
    fn find_at(&self, text: &str, pattern: &str, from: usize) -> Option<Range<usize>>;
}

/// Everything the mark engine consumes from the editor.
pub trait Host: Matcher {
    // -- Capability --------------------------------------------------------

    /// How many `MarkWordN` groups currently exist (`MarkWord1`,
    /// `MarkWord2`, ... counted until the first gap).
    fn mark_group_count(&self) -> usize;

    /// Whether searches ignore case by default (`'ignorecase'`).
    fn ignore_case(&self) -> bool;

    // -- Views -------------------------------------------------------------

    /// Views in the current scope (the current tab page), in layout order.
    fn views(&self) -> Vec<ViewId>;

    /// The view holding the cursor.
    fn current_view(&self) -> ViewId;

    /// Register a highlight of `expr` in `view` with highlight `group`.
    fn add_match(&mut self, view: ViewId, group: &str, expr: &str, priority: i32) -> MatchHandle;

    /// Remove a highlight previously returned by [`add_match`](Self::add_match).
    fn delete_match(&mut self, view: ViewId, handle: MatchHandle);

    // -- Text and cursor ---------------------------------------------------

    /// Cursor position in the current view.
    fn cursor(&self) -> TextPos;

    /// Move the cursor in the current view.
    fn set_cursor(&mut self, pos: TextPos);

    /// Number of lines in the current view's buffer.
    fn line_count(&self) -> usize;

    /// Line content without its line ending.
    fn line(&self, line: usize) -> Option<String>;

    /// The word at (or right after) the cursor, if any.
    fn word_under_cursor(&self) -> Option<String>;

    // -- Registers ---------------------------------------------------------

    /// Write the last-search register (`@/`).
    fn set_last_search(&mut self, pattern: &str);

    /// Append an entry to one of the host's histories.
    fn add_history(&mut self, kind: HistoryKind, entry: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_names_are_one_based() {
        assert_eq!(group_name(0), "MarkWord1");
        assert_eq!(group_name(5), "MarkWord6");
    }

    #[test]
    fn text_pos_orders_by_line_then_col() {
        assert!(TextPos::new(0, 9) < TextPos::new(1, 0));
        assert!(TextPos::new(2, 1) < TextPos::new(2, 3));
    }
}
