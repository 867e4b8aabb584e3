//! The editor model — one buffer shown in windows across tab pages.
//!
//! [`Editor`] owns everything the mark engine needs from a host: the
//! buffer, every window with its cursor and pattern highlights, the tab
//! pages and their layouts, options, registers, histories and highlight
//! groups. It never calls back into anything; callers read the result of
//! each operation and react (for example by refreshing marks in a window
//! that just became current).
//!
//! # Windows
//!
//! | Operation | Vim | Current window afterwards |
//! |-----------|-----|---------------------------|
//! | [`split`](Editor::split) | `:split` / `:vsplit` | the new window |
//! | [`close`](Editor::close) | `:close` | the next one in the tab |
//! | [`cycle_window`](Editor::cycle_window) | `:wincmd w` / `W` | neighbour in layout order |
//! | [`tab_new`](Editor::tab_new) | `:tabnew` | the new tab's window |
//! | [`tab_cycle`](Editor::tab_cycle) | `:tabnext` / `:tabprev` | that tab's current window |
//!
//! A new window starts with the cursor of the window it was split from and
//! **no** pattern highlights; highlights are strictly per window.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use crate::buffer::Buffer;
use crate::highlight::{HighlightGroups, MatchTable};
use crate::history::{Histories, HistoryType};
use crate::options::{OptionError, OptionName, Options, SetDirective, SetOutcome};
use crate::position::Position;
use crate::register::Registers;
use crate::search::PatternMatcher;
use crate::split::{Orientation, Rect, TabPage, WinId};
use crate::word::word_under_cursor;

/// Screen size used for layout when none is given.
pub const DEFAULT_SCREEN: Rect = Rect::new(0, 0, 80, 24);

/// Window and tab operations that cannot be carried out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("E444: Cannot close last window")]
    LastWindow,
    #[error("E957: Invalid window number: {0}")]
    NoSuchWindow(WinId),
}

/// A window: a cursor and a set of pattern highlights over the buffer.
#[derive(Debug, Clone)]
pub struct Window {
    pub id: WinId,
    pub cursor: Position,
    pub matches: MatchTable,
}

impl Window {
    const fn new(id: WinId, cursor: Position) -> Self {
        Self {
            id,
            cursor,
            matches: MatchTable::new(),
        }
    }
}

/// The editor state.
#[derive(Debug)]
pub struct Editor {
    buffer: Buffer,
    windows: BTreeMap<WinId, Window>,
    tabs: Vec<TabPage>,
    current_tab: usize,
    next_win: WinId,
    next_match: u64,
    screen: Rect,
    options: Options,
    registers: Registers,
    histories: Histories,
    groups: HighlightGroups,
    matcher: PatternMatcher,
}

impl Editor {
    /// One tab page with one window at the top of `buffer`.
    #[must_use]
    pub fn new(buffer: Buffer, groups: HighlightGroups) -> Self {
        let first = 1;
        let mut windows = BTreeMap::new();
        windows.insert(first, Window::new(first, Position::ZERO));
        Self {
            buffer,
            windows,
            tabs: vec![TabPage::new(first)],
            current_tab: 0,
            next_win: first + 1,
            next_match: 1,
            screen: DEFAULT_SCREEN,
            options: Options::default(),
            registers: Registers::new(),
            histories: Histories::default(),
            groups,
            matcher: PatternMatcher::new(),
        }
    }

    // -- Accessors -----------------------------------------------------------

    #[must_use]
    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    #[must_use]
    pub const fn groups(&self) -> &HighlightGroups {
        &self.groups
    }

    pub const fn groups_mut(&mut self) -> &mut HighlightGroups {
        &mut self.groups
    }

    #[must_use]
    pub const fn matcher(&self) -> &PatternMatcher {
        &self.matcher
    }

    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    #[must_use]
    pub const fn registers(&self) -> &Registers {
        &self.registers
    }

    #[must_use]
    pub const fn histories(&self) -> &Histories {
        &self.histories
    }

    pub const fn set_screen(&mut self, screen: Rect) {
        self.screen = screen;
    }

    /// Set an option directly (config files, tests).
    pub const fn set_ignorecase(&mut self, on: bool) {
        self.options.ignorecase = on;
    }

    pub const fn set_number(&mut self, on: bool) {
        self.options.number = on;
    }

    /// Apply a `:set` directive.
    ///
    /// # Errors
    ///
    /// [`OptionError`] for unknown options or bad values.
    pub fn apply_option(&mut self, directive: &SetDirective) -> Result<SetOutcome, OptionError> {
        let outcome = self.options.apply(directive)?;
        if outcome == SetOutcome::Changed(OptionName::History) {
            self.histories.set_max(self.options.history);
        }
        Ok(outcome)
    }

    // -- Tabs and windows ----------------------------------------------------

    #[must_use]
    pub const fn current_tab(&self) -> usize {
        self.current_tab
    }

    #[must_use]
    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    fn tab(&self) -> &TabPage {
        &self.tabs[self.current_tab]
    }

    fn tab_mut(&mut self) -> &mut TabPage {
        &mut self.tabs[self.current_tab]
    }

    /// The window with the cursor.
    #[must_use]
    pub fn current_window(&self) -> WinId {
        self.tab().current
    }

    /// Windows of the current tab page, in layout order.
    #[must_use]
    pub fn tab_windows(&self) -> Vec<WinId> {
        self.tab().windows()
    }

    /// Every window in every tab page.
    pub fn all_windows(&self) -> impl Iterator<Item = WinId> + '_ {
        self.windows.keys().copied()
    }

    /// Screen rectangles of the current tab's windows.
    #[must_use]
    pub fn layout(&self) -> Vec<(WinId, Rect)> {
        self.tab().layout.layout(self.screen)
    }

    #[must_use]
    pub fn window(&self, id: WinId) -> Option<&Window> {
        self.windows.get(&id)
    }

    /// Split the current window; the new window becomes current.
    pub fn split(&mut self, orientation: Orientation) -> WinId {
        let id = self.next_win;
        self.next_win += 1;
        let from = self.current_window();
        let cursor = self.cursor();
        self.windows.insert(id, Window::new(id, cursor));
        let tab = self.tab_mut();
        tab.layout.split(from, id, orientation);
        tab.current = id;
        debug!(from, id, ?orientation, "split window");
        id
    }

    /// Close the current window.
    ///
    /// Closing the only window of a tab page closes the tab page. Returns
    /// the closed window's id.
    ///
    /// # Errors
    ///
    /// [`EditorError::LastWindow`] when it is the only window left.
    pub fn close(&mut self) -> Result<WinId, EditorError> {
        let id = self.current_window();
        let tab = self.tab_mut();
        let next = tab.layout.cycle(id, true);
        if tab.layout.remove(id) {
            tab.current = next;
        } else if self.tabs.len() > 1 {
            self.tabs.remove(self.current_tab);
            self.current_tab = self.current_tab.min(self.tabs.len() - 1);
        } else {
            return Err(EditorError::LastWindow);
        }
        self.windows.remove(&id);
        debug!(id, "closed window");
        Ok(id)
    }

    /// Make the next (or previous) window of the tab page current.
    pub fn cycle_window(&mut self, forward: bool) -> WinId {
        let tab = self.tab_mut();
        tab.current = tab.layout.cycle(tab.current, forward);
        tab.current
    }

    /// Make `id` current, switching tab pages if needed.
    ///
    /// # Errors
    ///
    /// [`EditorError::NoSuchWindow`] for an unknown id.
    pub fn goto_window(&mut self, id: WinId) -> Result<(), EditorError> {
        let tab = self
            .tabs
            .iter()
            .position(|t| t.layout.contains(id))
            .ok_or(EditorError::NoSuchWindow(id))?;
        self.current_tab = tab;
        self.tab_mut().current = id;
        Ok(())
    }

    /// Open a tab page after the current one with a fresh window.
    pub fn tab_new(&mut self) -> WinId {
        let id = self.next_win;
        self.next_win += 1;
        self.windows.insert(id, Window::new(id, Position::ZERO));
        self.current_tab += 1;
        self.tabs.insert(self.current_tab, TabPage::new(id));
        debug!(id, tab = self.current_tab, "new tab page");
        id
    }

    /// Go to the next (or previous) tab page, wrapping. Returns whether the
    /// current tab changed.
    pub fn tab_cycle(&mut self, forward: bool) -> bool {
        let n = self.tabs.len();
        if n <= 1 {
            return false;
        }
        self.current_tab = if forward {
            (self.current_tab + 1) % n
        } else {
            (self.current_tab + n - 1) % n
        };
        true
    }

    // -- Cursor --------------------------------------------------------------

    /// Cursor of the current window.
    #[must_use]
    pub fn cursor(&self) -> Position {
        self.windows
            .get(&self.current_window())
            .map_or(Position::ZERO, |w| w.cursor)
    }

    /// Move the cursor of the current window, clamped to the text.
    pub fn set_cursor(&mut self, pos: Position) {
        let pos = self.buffer.clamp_position(pos);
        let id = self.current_window();
        if let Some(win) = self.windows.get_mut(&id) {
            win.cursor = pos;
        }
    }

    /// The word under the current window's cursor.
    #[must_use]
    pub fn word_under_cursor(&self) -> Option<String> {
        word_under_cursor(&self.buffer, self.cursor())
    }

    // -- Pattern highlights --------------------------------------------------

    /// `matchadd()` in window `win`. Returns the match id, or `None` for an
    /// unknown window.
    pub fn match_add(&mut self, win: WinId, group: &str, pattern: &str, priority: i32) -> Option<u64> {
        let window = self.windows.get_mut(&win)?;
        let id = self.next_match;
        self.next_match += 1;
        window.matches.add(id, group, pattern, priority);
        Some(id)
    }

    /// `matchdelete()`. Returns whether the match existed.
    pub fn match_delete(&mut self, win: WinId, id: u64) -> bool {
        self.windows
            .get_mut(&win)
            .is_some_and(|w| w.matches.delete(id))
    }

    // -- Registers and history -----------------------------------------------

    pub fn set_last_search(&mut self, pattern: &str) {
        self.registers.set_search(pattern);
    }

    pub fn record_command(&mut self, line: &str) {
        self.registers.set_command(line);
        self.histories.add(HistoryType::Command, line);
    }

    pub fn add_history(&mut self, kind: HistoryType, entry: &str) {
        self.histories.add(kind, entry);
    }
}
