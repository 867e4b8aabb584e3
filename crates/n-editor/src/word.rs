//! Words — character classes and the word under the cursor.
//!
//! A **word** is a run of word characters (letters, digits, underscore) or
//! a run of other non-blank characters (punctuation). Boundaries exist
//! between classes: `hello.world` contains three words (`hello`, `.`,
//! `world`). This is what `<cword>` expands to when marking.

use crate::buffer::Buffer;
use crate::position::Position;

// ---------------------------------------------------------------------------
// Character classification
// ---------------------------------------------------------------------------

/// Character class for word boundary detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Letters, digits, underscore.
    Word,
    /// Non-blank, non-word characters (operators, brackets, etc.).
    Punctuation,
    /// Whitespace within a line (space, tab).
    Blank,
}

/// Classify a character.
#[must_use]
pub fn classify(ch: char) -> CharClass {
    if ch.is_whitespace() {
        CharClass::Blank
    } else if ch.is_alphanumeric() || ch == '_' {
        CharClass::Word
    } else {
        CharClass::Punctuation
    }
}

// ---------------------------------------------------------------------------
// Word under cursor
// ---------------------------------------------------------------------------

/// The word the cursor sits on.
///
/// When the cursor is on a blank, the first word after it on the same line
/// is used, like Vim's `<cword>`. Keyword runs are preferred over
/// punctuation runs when both follow the cursor. Returns `None` on an
/// empty or all-blank tail.
#[must_use]
pub fn word_under_cursor(buf: &Buffer, pos: Position) -> Option<String> {
    let line: Vec<char> = buf.line(pos.line)?.chars().collect();
    if pos.col >= line.len() {
        return None;
    }

    let mut start = pos.col;
    if classify(line[start]) == CharClass::Blank {
        let rest = &line[start..];
        let keyword = rest.iter().position(|&c| classify(c) == CharClass::Word);
        let any = rest.iter().position(|&c| classify(c) != CharClass::Blank)?;
        // A keyword later in the tail beats punctuation right after the blank.
        start += keyword.unwrap_or(any);
    }

    let class = classify(line[start]);
    while start > 0 && classify(line[start - 1]) == class {
        start -= 1;
    }
    let mut end = start;
    while end < line.len() && classify(line[end]) == class {
        end += 1;
    }
    Some(line[start..end].iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cword(text: &str, line: usize, col: usize) -> Option<String> {
        word_under_cursor(&Buffer::from_text(text), Position::new(line, col))
    }

    // -- classify ------------------------------------------------------------

    #[test]
    fn classify_word_chars() {
        assert_eq!(classify('a'), CharClass::Word);
        assert_eq!(classify('Z'), CharClass::Word);
        assert_eq!(classify('5'), CharClass::Word);
        assert_eq!(classify('_'), CharClass::Word);
        assert_eq!(classify('é'), CharClass::Word);
    }

    #[test]
    fn classify_punctuation_and_blank() {
        assert_eq!(classify('.'), CharClass::Punctuation);
        assert_eq!(classify('('), CharClass::Punctuation);
        assert_eq!(classify(' '), CharClass::Blank);
        assert_eq!(classify('\t'), CharClass::Blank);
    }

    // -- word_under_cursor ---------------------------------------------------

    #[test]
    fn middle_of_word() {
        assert_eq!(cword("hello world", 0, 8).as_deref(), Some("world"));
        assert_eq!(cword("hello world", 0, 0).as_deref(), Some("hello"));
    }

    #[test]
    fn punctuation_run() {
        assert_eq!(cword("a -> b", 0, 3).as_deref(), Some("->"));
    }

    #[test]
    fn class_boundary() {
        assert_eq!(cword("foo.bar", 0, 2).as_deref(), Some("foo"));
        assert_eq!(cword("foo.bar", 0, 3).as_deref(), Some("."));
        assert_eq!(cword("foo.bar", 0, 4).as_deref(), Some("bar"));
    }

    #[test]
    fn blank_uses_following_keyword() {
        assert_eq!(cword("x   ( name", 0, 2).as_deref(), Some("name"));
        assert_eq!(cword("x   (", 0, 2).as_deref(), Some("("));
    }

    #[test]
    fn trailing_blank_is_none() {
        assert_eq!(cword("word   ", 0, 5), None);
        assert_eq!(cword("", 0, 0), None);
        assert_eq!(cword("abc", 0, 9), None);
        assert_eq!(cword("abc", 4, 0), None);
    }
}
