//! Which mark covers the cursor.
//!
//! Slots are scanned from the highest index down, the same order in which
//! they are drawn on top of each other, so the mark the user sees under
//! the cursor is the one reported. Matches never span a line break.

use crate::host::Matcher;
use crate::pattern::adjust_for_case_sensitivity;
use crate::registry::SlotRegistry;

/// A mark occurrence covering the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentMark {
    /// Slot holding the pattern.
    pub index: usize,
    /// The pattern exactly as stored in the slot.
    pub pattern: String,
    /// Byte offset where the covering match starts.
    pub start: usize,
    /// Byte offset just past the covering match.
    pub end: usize,
}

/// Find the mark whose match in `line` covers byte `offset`.
///
/// For every assigned slot, matches are walked left to right until one
/// satisfies `start <= offset < end`. A slot's walk stops early when a
/// match begins past `offset`, or on a zero-width match (which could never
/// advance). Returns `None` when no slot covers the offset.
#[must_use]
pub fn find_current_mark<M: Matcher + ?Sized>(
    registry: &SlotRegistry,
    matcher: &M,
    ignore_case: bool,
    line: &str,
    offset: usize,
) -> Option<CurrentMark> {
    for (index, pattern) in registry.marks().rev() {
        let expr = adjust_for_case_sensitivity(pattern, ignore_case);
        let mut from = 0;
        while let Some(m) = matcher.find_at(line, &expr, from) {
            if m.start > offset || m.is_empty() {
                break;
            }
            if offset < m.end {
                return Some(CurrentMark {
                    index,
                    pattern: pattern.to_string(),
                    start: m.start,
                    end: m.end,
                });
            }
            from = m.end;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeHost;
    use pretty_assertions::assert_eq;

    fn registry(patterns: &[&str]) -> SlotRegistry {
        let mut reg = SlotRegistry::init(patterns.len().max(1)).unwrap();
        for (i, p) in patterns.iter().enumerate() {
            reg.set_pattern(i, *p).unwrap();
        }
        reg
    }

    fn lookup(reg: &SlotRegistry, line: &str, offset: usize) -> Option<(String, usize)> {
        let host = FakeHost::default();
        find_current_mark(reg, &host, false, line, offset).map(|m| (m.pattern, m.start))
    }

    #[test]
    fn inside_first_occurrence() {
        let reg = registry(&["foobar"]);
        assert_eq!(lookup(&reg, "foobar foobar", 3), Some(("foobar".into(), 0)));
    }

    #[test]
    fn inside_second_occurrence() {
        let reg = registry(&["foobar"]);
        assert_eq!(lookup(&reg, "foobar foobar", 7), Some(("foobar".into(), 7)));
    }

    #[test]
    fn between_occurrences() {
        let reg = registry(&["foobar"]);
        assert_eq!(lookup(&reg, "foobar foobar", 6), None);
    }

    #[test]
    fn match_end_is_exclusive() {
        let reg = registry(&["foo"]);
        assert_eq!(lookup(&reg, "foo bar", 2), Some(("foo".into(), 0)));
        assert_eq!(lookup(&reg, "foo bar", 3), None);
    }

    #[test]
    fn highest_slot_wins_on_overlap() {
        let reg = registry(&["foobar", "bar"]);
        let host = FakeHost::default();
        let m = find_current_mark(&reg, &host, false, "foobar", 4).unwrap();
        assert_eq!(m.index, 1);
        assert_eq!(m.pattern, "bar");
        assert_eq!((m.start, m.end), (3, 6));

        // Outside the higher slot's match the lower one is reported.
        let m = find_current_mark(&reg, &host, false, "foobar", 1).unwrap();
        assert_eq!(m.index, 0);
    }

    #[test]
    fn empty_slots_are_skipped() {
        let reg = registry(&["", "bar", ""]);
        assert_eq!(lookup(&reg, "a bar", 3), Some(("bar".into(), 2)));
    }

    #[test]
    fn no_marks() {
        let reg = SlotRegistry::init(3).unwrap();
        assert_eq!(lookup(&reg, "anything", 0), None);
    }

    #[test]
    fn zero_width_match_aborts_only_that_slot() {
        // Slot 1 (`^`) is scanned first and matches zero-width; the scan
        // must fall through to slot 0 instead of looping or giving up.
        let reg = registry(&["abc", "^"]);
        assert_eq!(lookup(&reg, "abc", 0), Some(("abc".into(), 0)));
    }

    #[test]
    fn ignore_case_applies_to_lookup() {
        let reg = registry(&["foo"]);
        let host = FakeHost::default();
        assert!(find_current_mark(&reg, &host, false, "FOO", 1).is_none());
        let m = find_current_mark(&reg, &host, true, "FOO", 1).unwrap();
        assert_eq!(m.pattern, "foo");
    }

    #[test]
    fn whole_word_pattern_skips_partial_words() {
        let reg = registry(&["\\<foo\\>"]);
        assert_eq!(lookup(&reg, "foobar foo", 1), None);
        assert_eq!(lookup(&reg, "foobar foo", 8), Some(("\\<foo\\>".into(), 7)));
    }
}
