//! Pattern helpers.
//!
//! Marks use the host's search-pattern dialect (Vim "magic" syntax). The
//! engine only needs a handful of its pieces:
//!
//! | Piece      | Meaning                                  |
//! |------------|------------------------------------------|
//! | `\<`, `\>` | start / end of a keyword                 |
//! | `\c`       | ignore case for the whole pattern        |
//! | `\C`       | match case for the whole pattern         |
//! | `\x`       | literal `x` for a metacharacter `x`      |

/// Prepended to force case-insensitive matching.
pub const IGNORE_CASE_MARKER: &str = "\\c";

/// Characters that carry meaning in a magic pattern and are escaped when a
/// word is turned into a literal pattern.
const METACHARS: &[char] = &['/', '\\', '.', '*', '$', '^', '~', '['];

/// Whether `ch` is a keyword character: letter, digit or underscore.
#[inline]
#[must_use]
pub fn is_keyword_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Escape the metacharacters of `text` so it matches literally.
#[must_use]
pub fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if METACHARS.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Pattern for the word under the cursor, the way `*` builds it.
///
/// The word is escaped; whole-word boundaries are added only when every
/// character is a keyword character (`foo` → `\<foo\>`, `->` → `->`).
#[must_use]
pub fn word_pattern(word: &str) -> String {
    let escaped = escape_literal(word);
    if !word.is_empty() && word.chars().all(is_keyword_char) {
        format!("\\<{escaped}\\>")
    } else {
        escaped
    }
}

/// Pattern that matches `text` exactly, without word boundaries.
#[must_use]
pub fn literal_pattern(text: &str) -> String {
    escape_literal(text)
}

/// Make a mark pattern honor the editor's case default.
///
/// With `ignore_case` set, `\c` is prepended unless the pattern already
/// forces case with an unescaped `\C`. Mirrors what `/` does, so a mark
/// and a manual search of the same pattern light up the same text.
#[must_use]
pub fn adjust_for_case_sensitivity(expr: &str, ignore_case: bool) -> String {
    if ignore_case && !has_marker(expr, 'C') {
        format!("{IGNORE_CASE_MARKER}{expr}")
    } else {
        expr.to_string()
    }
}

/// Whether `expr` contains `\<marker>` with the backslash itself unescaped.
fn has_marker(expr: &str, marker: char) -> bool {
    let mut chars = expr.chars();
    while let Some(ch) = chars.next() {
        // The char after a backslash is consumed either way.
        if ch == '\\' && chars.next() == Some(marker) {
            return true;
        }
    }
    false
}
