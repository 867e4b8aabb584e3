// SPDX-License-Identifier: MIT
//
// The mark engine's view of the editor.
//
// `EditorHost` borrows the `Editor` for the duration of one mark operation
// and answers the engine's questions in its terms: windows are views,
// `matchadd()` entries are highlight registrations, and cursor columns are
// converted between the editor's char offsets and the engine's byte offsets.

use std::ops::Range;

use n_editor::Editor;
use n_editor::history::HistoryType;
use n_editor::position::{Position, byte_to_char, char_to_byte};
use n_mark::host::TextPos;
use n_mark::{HistoryKind, Host, MatchHandle, Matcher, ViewId};
use tracing::warn;

/// Adapter implementing the mark engine's host traits on an [`Editor`].
pub struct EditorHost<'a> {
    editor: &'a mut Editor,
}

impl<'a> EditorHost<'a> {
    pub const fn new(editor: &'a mut Editor) -> Self {
        Self { editor }
    }
}

const fn history_type(kind: HistoryKind) -> HistoryType {
    match kind {
        HistoryKind::Search => HistoryType::Search,
        HistoryKind::Command => HistoryType::Command,
        HistoryKind::Input => HistoryType::Input,
    }
}

impl Matcher for EditorHost<'_> {
    fn find_at(&self, text: &str, pattern: &str, from: usize) -> Option<Range<usize>> {
        self.editor.matcher().find_at(text, pattern, from)
    }
}

impl Host for EditorHost<'_> {
    fn mark_group_count(&self) -> usize {
        self.editor.groups().mark_group_count()
    }

    fn ignore_case(&self) -> bool {
        self.editor.options().ignorecase
    }

    fn views(&self) -> Vec<ViewId> {
        self.editor.tab_windows()
    }

    fn current_view(&self) -> ViewId {
        self.editor.current_window()
    }

    fn add_match(&mut self, view: ViewId, group: &str, expr: &str, priority: i32) -> MatchHandle {
        // Ids start at 1, so 0 never names a live match.
        let id = self
            .editor
            .match_add(view, group, expr, priority)
            .unwrap_or_else(|| {
                warn!(view, "highlight for unknown window dropped");
                0
            });
        MatchHandle(id)
    }

    fn delete_match(&mut self, view: ViewId, handle: MatchHandle) {
        if !self.editor.match_delete(view, handle.0) {
            warn!(view, handle = handle.0, "no such highlight");
        }
    }

    fn cursor(&self) -> TextPos {
        let pos = self.editor.cursor();
        let line = self.editor.buffer().line(pos.line).unwrap_or_default();
        TextPos::new(pos.line, char_to_byte(&line, pos.col))
    }

    fn set_cursor(&mut self, pos: TextPos) {
        let line = self.editor.buffer().line(pos.line).unwrap_or_default();
        self.editor
            .set_cursor(Position::new(pos.line, byte_to_char(&line, pos.col)));
    }

    fn line_count(&self) -> usize {
        self.editor.buffer().line_count()
    }

    fn line(&self, line: usize) -> Option<String> {
        self.editor.buffer().line(line)
    }

    fn word_under_cursor(&self) -> Option<String> {
        self.editor.word_under_cursor()
    }

    fn set_last_search(&mut self, pattern: &str) {
        self.editor.set_last_search(pattern);
    }

    fn add_history(&mut self, kind: HistoryKind, entry: &str) {
        self.editor.add_history(history_type(kind), entry);
    }
}
