//! In-memory host used by the engine's unit tests.

use std::collections::HashMap;
use std::ops::Range;

use crate::config::HistoryKind;
use crate::host::{Host, MatchHandle, Matcher, TextPos, ViewId};
use crate::pattern::is_keyword_char;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub handle: MatchHandle,
    pub group: String,
    pub expr: String,
    pub priority: i32,
}

/// Records every highlight call per view. Patterns are matched literally,
/// honoring `\c`, `\<...\>` and backslash escapes. `^` is a zero-width
/// match at the start of the line.
#[derive(Debug, Default)]
pub struct FakeHost {
    pub groups: usize,
    pub ignore_case: bool,
    pub views: Vec<ViewId>,
    pub current: ViewId,
    pub matches: HashMap<ViewId, Vec<Registration>>,
    pub next_handle: u64,
    pub add_calls: usize,
    pub delete_calls: usize,
    pub lines: Vec<String>,
    pub cursor: TextPos,
    pub last_search: Option<String>,
    pub history: Vec<(HistoryKind, String)>,
}

impl FakeHost {
    pub fn with_views(groups: usize, views: &[ViewId]) -> Self {
        Self {
            groups,
            views: views.to_vec(),
            current: views.first().copied().unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.lines = text.lines().map(str::to_string).collect();
        self
    }

    pub fn at(mut self, line: usize, col: usize) -> Self {
        self.cursor = TextPos::new(line, col);
        self
    }

    /// `(group, expr, priority)` of every live registration, sorted by group.
    pub fn exprs(&self, view: ViewId) -> Vec<(String, String, i32)> {
        let mut out: Vec<_> = self
            .matches
            .get(&view)
            .map(|regs| {
                regs.iter()
                    .map(|r| (r.group.clone(), r.expr.clone(), r.priority))
                    .collect()
            })
            .unwrap_or_default();
        out.sort();
        out
    }
}

fn unescape(body: &str) -> String {
    let mut out = String::new();
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(ch);
        }
    }
    out
}

fn keyword_before(text: &str, at: usize) -> bool {
    text[..at].chars().next_back().is_some_and(is_keyword_char)
}

fn keyword_after(text: &str, at: usize) -> bool {
    text[at..].chars().next().is_some_and(is_keyword_char)
}

impl Matcher for FakeHost {
    fn find_at(&self, text: &str, pattern: &str, from: usize) -> Option<Range<usize>> {
        let (pattern, icase) = pattern
            .strip_prefix("\\c")
            .map_or((pattern, false), |rest| (rest, true));
        if pattern == "^" {
            return (from == 0).then_some(0..0);
        }
        let inner = pattern.strip_prefix("\\<").and_then(|p| p.strip_suffix("\\>"));
        let whole_word = inner.is_some();
        let mut needle = unescape(inner.unwrap_or(pattern));
        let mut hay = text.to_string();
        if icase {
            needle = needle.to_lowercase();
            hay = hay.to_lowercase();
        }
        if needle.is_empty() {
            return None;
        }
        let mut pos = from;
        while pos <= hay.len() {
            let start = pos + hay[pos..].find(&needle)?;
            let end = start + needle.len();
            if !whole_word || (!keyword_before(&hay, start) && !keyword_after(&hay, end)) {
                return Some(start..end);
            }
            pos = start + hay[start..].chars().next().map_or(1, char::len_utf8);
        }
        None
    }
}

impl Host for FakeHost {
    fn mark_group_count(&self) -> usize {
        self.groups
    }

    fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    fn views(&self) -> Vec<ViewId> {
        self.views.clone()
    }

    fn current_view(&self) -> ViewId {
        self.current
    }

    fn add_match(&mut self, view: ViewId, group: &str, expr: &str, priority: i32) -> MatchHandle {
        self.next_handle += 1;
        self.add_calls += 1;
        let handle = MatchHandle(self.next_handle);
        self.matches.entry(view).or_default().push(Registration {
            handle,
            group: group.to_string(),
            expr: expr.to_string(),
            priority,
        });
        handle
    }

    fn delete_match(&mut self, view: ViewId, handle: MatchHandle) {
        self.delete_calls += 1;
        let regs = self.matches.entry(view).or_default();
        let before = regs.len();
        regs.retain(|r| r.handle != handle);
        assert_eq!(regs.len() + 1, before, "deleted unknown handle {handle:?}");
    }

    fn cursor(&self) -> TextPos {
        self.cursor
    }

    fn set_cursor(&mut self, pos: TextPos) {
        self.cursor = pos;
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, line: usize) -> Option<String> {
        self.lines.get(line).cloned()
    }

    fn word_under_cursor(&self) -> Option<String> {
        let line = self.lines.get(self.cursor.line)?;
        let col = self.cursor.col;
        let ch = line[col..].chars().next()?;
        if ch.is_whitespace() {
            return None;
        }
        let same = |c: char| !c.is_whitespace() && is_keyword_char(c) == is_keyword_char(ch);
        let start = line[..col]
            .char_indices()
            .rev()
            .take_while(|&(_, c)| same(c))
            .last()
            .map_or(col, |(i, _)| i);
        let end = line[col..]
            .char_indices()
            .find(|&(_, c)| !same(c))
            .map_or(line.len(), |(i, _)| col + i);
        Some(line[start..end].to_string())
    }

    fn set_last_search(&mut self, pattern: &str) {
        self.last_search = Some(pattern.to_string());
    }

    fn add_history(&mut self, kind: HistoryKind, entry: &str) {
        self.history.push((kind, entry.to_string()));
    }
}
