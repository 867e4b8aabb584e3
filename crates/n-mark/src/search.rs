//! Searching the buffer for mark occurrences.
//!
//! Works line by line through the [`Host`], wrapping around the end (or
//! start) of the buffer like `'wrapscan'`. Only the start of a match
//! matters for jumping; zero-width matches are skipped.

use std::ops::Range;

use crate::host::{Host, Matcher, TextPos};

/// Search direction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Forward,
    Backward,
}

/// Where a search landed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SearchHit {
    /// Start of the match.
    pub pos: TextPos,
    /// Index into the searched expressions of the one that matched.
    pub expr: usize,
    /// The search went past the end (or start) of the buffer.
    pub wrapped: bool,
}

/// All non-overlapping, non-empty matches of `expr` in `line`.
#[must_use]
pub fn line_matches<M: Matcher + ?Sized>(matcher: &M, line: &str, expr: &str) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    let mut from = 0;
    while from <= line.len() {
        let Some(m) = matcher.find_at(line, expr, from) else {
            break;
        };
        if m.is_empty() {
            // Step over one char and try again.
            let Some(ch) = line.get(m.start..).and_then(|rest| rest.chars().next()) else {
                break;
            };
            from = m.start + ch.len_utf8();
            continue;
        }
        from = m.end;
        out.push(m);
    }
    out
}

/// Find the nearest match of any of `exprs` strictly after (forward) or
/// strictly before (backward) `from`, wrapping around the buffer.
///
/// When nothing else matches, a match at `from` itself is found again
/// after wrapping.
#[must_use]
pub fn find_next<H: Host + ?Sized>(
    host: &H,
    exprs: &[String],
    from: TextPos,
    direction: Direction,
) -> Option<SearchHit> {
    let line_count = host.line_count();
    if line_count == 0 || exprs.is_empty() {
        return None;
    }

    for step in 0..=line_count {
        let line_idx = match direction {
            Direction::Forward => (from.line + step) % line_count,
            Direction::Backward => (from.line + line_count - step % line_count) % line_count,
        };
        let Some(line) = host.line(line_idx) else {
            continue;
        };
        let starts = exprs.iter().enumerate().flat_map(|(i, expr)| {
            line_matches(host, &line, expr)
                .into_iter()
                .map(move |m| (m.start, i))
        });

        let first = step == 0;
        let wrapped_home = step == line_count;
        let best = match direction {
            Direction::Forward => starts
                .filter(|&(s, _)| {
                    if first {
                        s > from.col
                    } else if wrapped_home {
                        s <= from.col
                    } else {
                        true
                    }
                })
                .min(),
            Direction::Backward => starts
                .filter(|&(s, _)| {
                    if first {
                        s < from.col
                    } else if wrapped_home {
                        s >= from.col
                    } else {
                        true
                    }
                })
                .max(),
        };

        if let Some((col, expr)) = best {
            let wrapped = match direction {
                Direction::Forward => line_idx < from.line || wrapped_home,
                Direction::Backward => line_idx > from.line || wrapped_home,
            };
            return Some(SearchHit {
                pos: TextPos::new(line_idx, col),
                expr,
                wrapped,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeHost;
    use pretty_assertions::assert_eq;

    fn exprs(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    // -- line_matches --------------------------------------------------------

    #[test]
    fn line_matches_non_overlapping() {
        let host = FakeHost::default();
        assert_eq!(line_matches(&host, "aaaa", "aa"), vec![0..2, 2..4]);
    }

    #[test]
    fn line_matches_skips_zero_width() {
        let host = FakeHost::default();
        assert!(line_matches(&host, "abc", "^").is_empty());
    }

    // -- forward -------------------------------------------------------------

    #[test]
    fn forward_same_line() {
        let host = FakeHost::default().with_text("foo bar foo");
        let hit = find_next(&host, &exprs(&["foo"]), TextPos::new(0, 0), Direction::Forward).unwrap();
        assert_eq!(hit.pos, TextPos::new(0, 8));
        assert!(!hit.wrapped);
    }

    #[test]
    fn forward_next_line() {
        let host = FakeHost::default().with_text("foo\nx\nfoo");
        let hit = find_next(&host, &exprs(&["foo"]), TextPos::new(0, 0), Direction::Forward).unwrap();
        assert_eq!(hit.pos, TextPos::new(2, 0));
    }

    #[test]
    fn forward_wraps_to_top() {
        let host = FakeHost::default().with_text("foo\nbar\nbaz");
        let hit = find_next(&host, &exprs(&["foo"]), TextPos::new(1, 0), Direction::Forward).unwrap();
        assert_eq!(hit.pos, TextPos::new(0, 0));
        assert!(hit.wrapped);
    }

    #[test]
    fn forward_single_occurrence_finds_itself() {
        let host = FakeHost::default().with_text("a foo b");
        let hit = find_next(&host, &exprs(&["foo"]), TextPos::new(0, 2), Direction::Forward).unwrap();
        assert_eq!(hit.pos, TextPos::new(0, 2));
        assert!(hit.wrapped);
    }

    #[test]
    fn forward_picks_nearest_of_several() {
        let host = FakeHost::default().with_text("x beta alpha beta");
        let hit =
            find_next(&host, &exprs(&["alpha", "beta"]), TextPos::new(0, 2), Direction::Forward).unwrap();
        assert_eq!(hit.pos, TextPos::new(0, 7));
        assert_eq!(hit.expr, 0);
    }

    // -- backward ------------------------------------------------------------

    #[test]
    fn backward_same_line() {
        let host = FakeHost::default().with_text("foo bar foo");
        let hit = find_next(&host, &exprs(&["foo"]), TextPos::new(0, 8), Direction::Backward).unwrap();
        assert_eq!(hit.pos, TextPos::new(0, 0));
        assert!(!hit.wrapped);
    }

    #[test]
    fn backward_previous_line_takes_last_match() {
        let host = FakeHost::default().with_text("foo foo\nbar");
        let hit = find_next(&host, &exprs(&["foo"]), TextPos::new(1, 0), Direction::Backward).unwrap();
        assert_eq!(hit.pos, TextPos::new(0, 4));
    }

    #[test]
    fn backward_wraps_to_bottom() {
        let host = FakeHost::default().with_text("foo\nbar\nbaz");
        let hit = find_next(&host, &exprs(&["baz"]), TextPos::new(0, 0), Direction::Backward).unwrap();
        assert_eq!(hit.pos, TextPos::new(2, 0));
        assert!(hit.wrapped);
    }

    // -- misses --------------------------------------------------------------

    #[test]
    fn no_match_anywhere() {
        let host = FakeHost::default().with_text("foo\nbar");
        assert!(find_next(&host, &exprs(&["zzz"]), TextPos::new(0, 0), Direction::Forward).is_none());
    }

    #[test]
    fn empty_buffer() {
        let host = FakeHost::default();
        assert!(find_next(&host, &exprs(&["a"]), TextPos::new(0, 0), Direction::Forward).is_none());
    }
}
