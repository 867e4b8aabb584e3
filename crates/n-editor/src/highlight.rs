//! Highlight groups and per-window pattern matches.
//!
//! Two tables, modelled on Vim's `:highlight` and `matchadd()`:
//!
//! 1. [`HighlightGroups`] — named background colors. Mark colors live in
//!    `MarkWord1`, `MarkWord2`, ... and six are defined by default.
//! 2. [`MatchTable`] — one per window. Each entry pairs a group with a
//!    pattern and a priority, and gets an id for later deletion.
//!
//! # Painting
//!
//! [`MatchTable::paint_line`] computes one optional color per char of a
//! line. Entries are applied from lowest to highest priority (ties in
//! insertion order), so later entries override earlier ones for the same
//! char, and higher priorities always end up on top.

use std::fmt;

use crate::position::byte_to_char;
use crate::search::PatternMatcher;

// ---------------------------------------------------------------------------
// Rgb
// ---------------------------------------------------------------------------

/// A 24-bit color.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#RGB` or `#RRGGBB` (the `#` is optional).
    #[must_use]
    pub fn hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        let bytes = s.as_bytes();
        match bytes.len() {
            3 => {
                let r = parse_hex_digit(bytes[0])?;
                let g = parse_hex_digit(bytes[1])?;
                let b = parse_hex_digit(bytes[2])?;
                Some(Self(r << 4 | r, g << 4 | g, b << 4 | b))
            }
            6 => Some(Self(
                parse_hex_byte(&bytes[0..2])?,
                parse_hex_byte(&bytes[2..4])?,
                parse_hex_byte(&bytes[4..6])?,
            )),
            _ => None,
        }
    }
}

impl fmt::Debug for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[inline]
const fn parse_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[inline]
fn parse_hex_byte(bytes: &[u8]) -> Option<u8> {
    let hi = parse_hex_digit(bytes[0])?;
    let lo = parse_hex_digit(bytes[1])?;
    Some(hi << 4 | lo)
}

// ---------------------------------------------------------------------------
// HighlightGroups
// ---------------------------------------------------------------------------

/// Name prefix of the mark color groups.
pub const MARK_GROUP_PREFIX: &str = "MarkWord";

/// Default mark colors, `MarkWord1` through `MarkWord6`.
pub const DEFAULT_MARK_COLORS: [Rgb; 6] = [
    Rgb(0x8C, 0xCB, 0xEA),
    Rgb(0xA4, 0xE5, 0x7E),
    Rgb(0xFF, 0xDB, 0x72),
    Rgb(0xFF, 0x72, 0x72),
    Rgb(0xFF, 0xB3, 0xFF),
    Rgb(0x99, 0x99, 0xFF),
];

/// Named background colors, in definition order.
#[derive(Debug, Clone, Default)]
pub struct HighlightGroups {
    groups: Vec<(String, Rgb)>,
}

impl HighlightGroups {
    /// No groups at all.
    #[must_use]
    pub const fn empty() -> Self {
        Self { groups: Vec::new() }
    }

    /// `MarkWord1..` defined from `colors`.
    #[must_use]
    pub fn with_mark_colors(colors: &[Rgb]) -> Self {
        let mut groups = Self::empty();
        for (i, &color) in colors.iter().enumerate() {
            groups.define(&format!("{MARK_GROUP_PREFIX}{}", i + 1), color);
        }
        groups
    }

    /// Define or redefine `name`.
    pub fn define(&mut self, name: &str, color: Rgb) {
        match self.groups.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = color,
            None => self.groups.push((name.to_string(), color)),
        }
    }

    /// Remove `name` (`:highlight clear {name}`). Returns whether it existed.
    pub fn clear(&mut self, name: &str) -> bool {
        let before = self.groups.len();
        self.groups.retain(|(n, _)| n != name);
        self.groups.len() != before
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Rgb> {
        self.groups.iter().find(|(n, _)| n == name).map(|&(_, c)| c)
    }

    /// How many of `MarkWord1`, `MarkWord2`, ... exist before the first gap.
    #[must_use]
    pub fn mark_group_count(&self) -> usize {
        (1..)
            .take_while(|i| self.get(&format!("{MARK_GROUP_PREFIX}{i}")).is_some())
            .count()
    }

    /// All groups in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Rgb)> {
        self.groups.iter().map(|(n, c)| (n.as_str(), *c))
    }
}

// ---------------------------------------------------------------------------
// MatchTable
// ---------------------------------------------------------------------------

/// One `matchadd()` registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchEntry {
    pub id: u64,
    pub group: String,
    pub pattern: String,
    pub priority: i32,
}

/// The pattern highlights of one window.
#[derive(Debug, Clone, Default)]
pub struct MatchTable {
    entries: Vec<MatchEntry>,
}

impl MatchTable {
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Register a highlight under a caller-chosen `id`.
    pub fn add(&mut self, id: u64, group: &str, pattern: &str, priority: i32) {
        self.entries.push(MatchEntry {
            id,
            group: group.to_string(),
            pattern: pattern.to_string(),
            priority,
        });
    }

    /// Remove the registration with `id`. Returns whether it existed.
    pub fn delete(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    #[must_use]
    pub fn entries(&self) -> &[MatchEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Per-char background colors for `line`.
    ///
    /// Entries whose group is undefined are skipped.
    #[must_use]
    pub fn paint_line(
        &self,
        matcher: &PatternMatcher,
        groups: &HighlightGroups,
        line: &str,
    ) -> Vec<Option<Rgb>> {
        let mut colors = vec![None; line.chars().count()];
        let mut order: Vec<&MatchEntry> = self.entries.iter().collect();
        // Stable sort keeps insertion order among equal priorities.
        order.sort_by_key(|e| e.priority);

        for entry in order {
            let Some(color) = groups.get(&entry.group) else {
                continue;
            };
            let mut from = 0;
            while let Some(m) = matcher.find_at(line, &entry.pattern, from) {
                if m.is_empty() {
                    from = m.start + line[m.start..].chars().next().map_or(1, char::len_utf8);
                    continue;
                }
                let start = byte_to_char(line, m.start);
                let end = byte_to_char(line, m.end);
                for slot in &mut colors[start..end] {
                    *slot = Some(color);
                }
                from = m.end;
            }
        }
        colors
    }
}
