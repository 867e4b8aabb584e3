//! Patterns — Vim-flavoured regular expressions over the `regex` crate.
//!
//! Mark patterns use Vim's *magic* dialect. [`translate`] rewrites one into
//! `regex` syntax, and [`PatternMatcher`] compiles and caches the result.
//!
//! # Dialect
//!
//! | Vim | Meaning | `regex` |
//! |-----|---------|---------|
//! | `\<` `\>` | start / end of word | `\b{start}` `\b{end}` |
//! | `\c` `\C` | ignore / match case (anywhere; `\c` wins) | builder flag |
//! | `.` `*` `[..]` | any char, repeat, class | same |
//! | `[[:alpha:]]` ... | POSIX classes inside brackets | same |
//! | `^` `$` | anchors, only at the start / end of a branch | same |
//! | `\+` `\?` `\=` `\{n,m}` `\{-n,m}` | repeats | `+` `?` `?` `{n,m}` `{n,m}?` |
//! | `\{,m}` `\{}` | repeats with no lower bound | `{0,m}` `{0,}` |
//! | `\(` `\)` `\|` | group, alternation | `(` `)` `\|` |
//! | `\s` `\S` `\d` `\D` `\w` `\W` `\t` | char classes | same |
//! | `\.` `\*` `\[` `\~` `\/` `\\` ... | literal char | escaped |
//!
//! Bare `+ ? ( ) { } |` are literal, as in Vim. Matching is case-sensitive
//! unless `\c` appears; `'ignorecase'` is applied by whoever builds the
//! pattern (the mark engine prepends `\c`).
//!
//! All offsets here are **byte** offsets within one line.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ops::Range;

use regex::{Regex, RegexBuilder};
use thiserror::Error;
use tracing::warn;

use crate::buffer::Buffer;
use crate::position::{byte_to_char, Position};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A pattern that cannot be turned into a regex.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("E16: unterminated \\{{ in pattern '{0}'")]
    UnterminatedBrace(String),

    #[error("E486: invalid pattern '{pattern}': {source}")]
    Invalid {
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },
}

// ---------------------------------------------------------------------------
// Translation
// ---------------------------------------------------------------------------

/// A pattern rewritten into `regex` syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translated {
    pub source: String,
    pub ignore_case: bool,
}

/// True when the rest of the input ends the current branch, so `$` anchors.
fn at_branch_end(rest: &str) -> bool {
    rest.is_empty() || rest.starts_with("\\|") || rest.starts_with("\\)")
}

/// Push `ch` as a literal.
fn push_literal(out: &mut String, ch: char) {
    let mut buf = [0; 4];
    out.push_str(&regex::escape(ch.encode_utf8(&mut buf)));
}

/// Rewrite a Vim magic pattern into `regex` syntax.
///
/// # Errors
///
/// [`PatternError::UnterminatedBrace`] for `\{` without a closing `}`.
pub fn translate(pattern: &str) -> Result<Translated, PatternError> {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut ignore_case = false;
    // At the start of a branch `^` anchors and `*` is literal.
    let mut branch_start = true;
    let mut i = 0;

    while let Some(ch) = pattern[i..].chars().next() {
        i += ch.len_utf8();
        let was_branch_start = branch_start;
        branch_start = false;
        match ch {
            '\\' => {
                let Some(next) = pattern[i..].chars().next() else {
                    // Trailing backslash matches itself.
                    out.push_str("\\\\");
                    break;
                };
                i += next.len_utf8();
                match next {
                    '<' => out.push_str("\\b{start}"),
                    '>' => out.push_str("\\b{end}"),
                    'c' => {
                        ignore_case = true;
                        branch_start = was_branch_start;
                    }
                    'C' => branch_start = was_branch_start,
                    '(' | '|' => {
                        out.push(next);
                        branch_start = true;
                    }
                    '+' | '?' | ')' => out.push(next),
                    '=' => out.push('?'),
                    's' | 'S' | 'd' | 'D' | 'w' | 'W' | 't' => {
                        out.push('\\');
                        out.push(next);
                    }
                    '{' => {
                        let close = pattern[i..]
                            .find('}')
                            .ok_or_else(|| PatternError::UnterminatedBrace(pattern.to_string()))?;
                        let body = pattern[i..i + close].trim_end_matches('\\');
                        i += close + 1;
                        let (lazy, counts) = body
                            .strip_prefix('-')
                            .map_or((false, body), |rest| (true, rest));
                        out.push('{');
                        if counts.is_empty() || counts.starts_with(',') {
                            out.push('0');
                        }
                        out.push_str(if counts.is_empty() { "," } else { counts });
                        out.push('}');
                        if lazy {
                            out.push('?');
                        }
                    }
                    other => push_literal(&mut out, other),
                }
            }
            '^' if was_branch_start => out.push('^'),
            '$' if at_branch_end(&pattern[i..]) => out.push('$'),
            '*' if was_branch_start => out.push_str("\\*"),
            '.' | '*' => out.push(ch),
            '[' => match class_end(&pattern[i..]) {
                Some(len) => {
                    out.push('[');
                    let body = &pattern[i..i + len];
                    let mut j = 0;
                    while let Some(c) = body[j..].chars().next() {
                        if let Some(class) = posix_class_len(&body[j..]) {
                            out.push_str(&body[j..j + class]);
                            j += class;
                            continue;
                        }
                        if c == '[' {
                            out.push_str("\\[");
                        } else {
                            out.push(c);
                        }
                        j += c.len_utf8();
                    }
                    out.push(']');
                    i += len + 1;
                }
                // An unterminated `[` is a literal, as in Vim.
                None => out.push_str("\\["),
            },
            other => push_literal(&mut out, other),
        }
    }

    Ok(Translated {
        source: out,
        ignore_case,
    })
}

/// Length of a bracket body (up to, not including, the closing `]`).
///
/// A `]` right after `[` or `[^` belongs to the class, and so do the
/// brackets of `[:alpha:]`-style classes.
fn class_end(rest: &str) -> Option<usize> {
    let skip = usize::from(rest.starts_with('^'));
    let mut off = skip + usize::from(rest[skip..].starts_with(']'));
    let mut escaped = false;
    while let Some(c) = rest[off..].chars().next() {
        if !escaped {
            if let Some(class) = posix_class_len(&rest[off..]) {
                off += class;
                continue;
            }
        }
        match c {
            '\\' if !escaped => escaped = true,
            ']' if !escaped => return Some(off),
            _ => escaped = false,
        }
        off += c.len_utf8();
    }
    None
}

/// Length of a `[:name:]` class at the start of `s`, if there is one.
fn posix_class_len(s: &str) -> Option<usize> {
    let name = s.strip_prefix("[:")?;
    let end = name.find(":]")?;
    let valid = end > 0 && name[..end].chars().all(|c| c.is_ascii_lowercase());
    valid.then_some(end + 4)
}

/// Translate and compile `pattern`.
///
/// # Errors
///
/// Any [`PatternError`].
pub fn compile(pattern: &str) -> Result<Regex, PatternError> {
    let translated = translate(pattern)?;
    RegexBuilder::new(&translated.source)
        .case_insensitive(translated.ignore_case)
        .build()
        .map_err(|source| PatternError::Invalid {
            pattern: pattern.to_string(),
            source: Box::new(source),
        })
}

// ---------------------------------------------------------------------------
// PatternMatcher
// ---------------------------------------------------------------------------

/// Compiles patterns on first use and keeps them.
///
/// A pattern that fails to compile is logged once and matches nothing.
#[derive(Debug, Default)]
pub struct PatternMatcher {
    cache: RefCell<HashMap<String, Option<Regex>>>,
}

impl PatternMatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// First match of `pattern` in `text` at or after byte `from`.
    #[must_use]
    pub fn find_at(&self, text: &str, pattern: &str, from: usize) -> Option<Range<usize>> {
        if pattern.is_empty() || from > text.len() {
            return None;
        }
        let mut cache = self.cache.borrow_mut();
        let regex = cache.entry(pattern.to_string()).or_insert_with(|| {
            compile(pattern)
                .inspect_err(|err| warn!(%err, "pattern matches nothing"))
                .ok()
        });
        regex.as_ref()?.find_at(text, from).map(|m| m.range())
    }

    /// Whether `pattern` compiles.
    #[must_use]
    pub fn is_valid(&self, pattern: &str) -> bool {
        compile(pattern).is_ok()
    }

    /// Number of cached patterns, valid or not.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }
}

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

/// A match in the buffer: start position and length in characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    /// Start position of the match (line, char col).
    pub start: Position,
    /// Length of the match in characters.
    pub len: usize,
}

/// All non-empty, non-overlapping matches of `pattern` in `lines`.
///
/// Used when painting windows. Returns matches in document order.
#[must_use]
pub fn find_all(
    matcher: &PatternMatcher,
    buf: &Buffer,
    pattern: &str,
    lines: Range<usize>,
) -> Vec<Match> {
    let mut matches = Vec::new();
    for line_idx in lines.start..lines.end.min(buf.line_count()) {
        let Some(line) = buf.line(line_idx) else {
            continue;
        };
        let mut from = 0;
        while let Some(m) = matcher.find_at(&line, pattern, from) {
            if m.is_empty() {
                let step = line[m.start..].chars().next().map_or(1, char::len_utf8);
                from = m.start + step;
                continue;
            }
            let start = byte_to_char(&line, m.start);
            matches.push(Match {
                start: Position::new(line_idx, start),
                len: byte_to_char(&line, m.end) - start,
            });
            from = m.end;
        }
    }
    matches
}
