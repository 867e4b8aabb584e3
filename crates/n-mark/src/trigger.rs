//! Mark commands — the session object behind `:Mark`, `:MarkClear` and the
//! mark mappings.
//!
//! [`Marks`] owns the slot registry and the per-view records of one
//! editing session. Each command runs to completion: it mutates the
//! registry, then pushes the change into every view of the current scope
//! before returning.
//!
//! # Adding a pattern
//!
//! 1. Already marked → unmark it (mark twice = no mark).
//! 2. No registry yet → ask the host how many mark colors exist; none is
//!    the only error the commands report.
//! 3. A free slot exists → take it; the cycle pointer moves past it.
//! 4. Otherwise → overwrite the slot under the cycle pointer.
//!
//! So the `N` most recently added distinct patterns are always shown.
//!
//! Results come back as an [`Outcome`], whose `Display` is the message to
//! show the user.

use std::fmt;

use tracing::{debug, info, warn};

use crate::config::MarkConfig;
use crate::error::MarkError;
use crate::host::{group_name, Host, TextPos, ViewId};
use crate::lookup::{find_current_mark, CurrentMark};
use crate::pattern::{adjust_for_case_sensitivity, literal_pattern, word_pattern};
use crate::registry::SlotRegistry;
use crate::search::{find_next, Direction};
use crate::sync::{SlotChange, ViewSync};

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// What a mark command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// `pattern` now occupies slot `index`, replacing `evicted` if the
    /// registry was full.
    Marked {
        index: usize,
        pattern: String,
        evicted: Option<String>,
    },
    /// `pattern` was removed from slot `index`.
    Unmarked { index: usize, pattern: String },
    /// Marks are shown again; `count` slots are assigned.
    Enabled { count: usize },
    /// Marks are hidden (but kept).
    Disabled,
    /// Visibility already had the requested value.
    Unchanged { enabled: bool },
    /// `count` marks were removed.
    Cleared { count: usize },
    /// The cursor is not on a word.
    NoWord,
    /// An empty pattern was given; nothing changed.
    EmptyPattern,
    /// Marks cannot span lines.
    MultiLine,
    /// The cursor moved to an occurrence of `pattern`.
    Jumped {
        pattern: String,
        pos: TextPos,
        direction: Direction,
        wrapped: bool,
    },
    /// No mark under the cursor and none searched for before.
    NoCurrentMark,
    /// No marks are defined.
    NoMarks,
    /// `pattern` does not occur in the buffer.
    NotFound { pattern: String },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Marked {
                index,
                pattern,
                evicted: Some(old),
            } => write!(f, "Marked '{pattern}' as {} (replaced '{old}')", group_name(*index)),
            Self::Marked { index, pattern, .. } => {
                write!(f, "Marked '{pattern}' as {}", group_name(*index))
            }
            Self::Unmarked { pattern, .. } => write!(f, "Unmarked '{pattern}'"),
            Self::Enabled { count } => write!(f, "Enabled marks: {count} mark(s)"),
            Self::Disabled => f.write_str("Disabled marks"),
            Self::Unchanged { enabled: true } => f.write_str("Marks already enabled"),
            Self::Unchanged { enabled: false } => f.write_str("Marks already disabled"),
            Self::Cleared { count } => write!(f, "Cleared {count} mark(s)"),
            Self::NoWord => f.write_str("No word under cursor"),
            Self::EmptyPattern => f.write_str("E35: No previous regular expression"),
            Self::MultiLine => f.write_str("Cannot mark text spanning lines"),
            Self::Jumped {
                direction: Direction::Forward,
                wrapped: true,
                ..
            } => f.write_str("search hit BOTTOM, continuing at TOP"),
            Self::Jumped {
                direction: Direction::Backward,
                wrapped: true,
                ..
            } => f.write_str("search hit TOP, continuing at BOTTOM"),
            Self::Jumped {
                pattern,
                direction: Direction::Forward,
                ..
            } => write!(f, "/{pattern}"),
            Self::Jumped { pattern, .. } => write!(f, "?{pattern}"),
            Self::NoCurrentMark => f.write_str("No current mark"),
            Self::NoMarks => f.write_str("No marks defined"),
            Self::NotFound { pattern } => write!(f, "Pattern not found: {pattern}"),
        }
    }
}

/// A row of [`Marks::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkEntry {
    pub index: usize,
    pub group: String,
    pub pattern: String,
}

// ---------------------------------------------------------------------------
// Marks
// ---------------------------------------------------------------------------

/// Mark state of one editing session.
#[derive(Debug, Default)]
pub struct Marks {
    /// Created on first use, once the host reports at least one color.
    registry: Option<SlotRegistry>,
    sync: ViewSync,
    config: MarkConfig,
}

/// The registry, creating it from the host's color count if needed.
fn ensure_registry<'a, H: Host + ?Sized>(
    slot: &'a mut Option<SlotRegistry>,
    host: &H,
) -> Result<&'a mut SlotRegistry, MarkError> {
    if slot.is_none() {
        let capacity = host.mark_group_count();
        let registry = SlotRegistry::init(capacity).inspect_err(|_| {
            warn!("no MarkWordN highlight groups defined");
        })?;
        debug!(capacity, "mark registry initialised");
        *slot = Some(registry);
    }
    slot.as_mut().ok_or(MarkError::NoSlots)
}

impl Marks {
    #[must_use]
    pub fn new(config: MarkConfig) -> Self {
        Self {
            registry: None,
            sync: ViewSync::new(),
            config,
        }
    }

    /// Start a session with the registry created up front.
    ///
    /// # Errors
    ///
    /// [`MarkError::NoSlots`] when the host defines no mark colors.
    pub fn init<H: Host + ?Sized>(host: &H, config: MarkConfig) -> Result<Self, MarkError> {
        let mut marks = Self::new(config);
        ensure_registry(&mut marks.registry, host)?;
        Ok(marks)
    }

    /// The slot registry, once created.
    #[must_use]
    pub const fn registry(&self) -> Option<&SlotRegistry> {
        self.registry.as_ref()
    }

    /// The per-view records.
    #[must_use]
    pub const fn view_sync(&self) -> &ViewSync {
        &self.sync
    }

    #[must_use]
    pub const fn config(&self) -> &MarkConfig {
        &self.config
    }

    // -- Core protocol -------------------------------------------------------

    /// Mark `pattern`, or unmark it if it is already marked.
    ///
    /// # Errors
    ///
    /// [`MarkError::NoSlots`] when the host has no mark colors. Nothing is
    /// changed in that case.
    pub fn add_pattern<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        pattern: &str,
    ) -> Result<Outcome, MarkError> {
        // An empty slot reads as "", so "" must never be stored as a mark.
        if pattern.is_empty() {
            return Ok(Outcome::EmptyPattern);
        }
        if let Some(registry) = &mut self.registry {
            if let Some(index) = registry.find_index_of(pattern) {
                registry.set_pattern(index, "")?;
                self.sync
                    .apply_all_views(host, registry, SlotChange::Set { index, pattern: "" });
                debug!(index, pattern, "unmarked");
                return Ok(Outcome::Unmarked {
                    index,
                    pattern: pattern.to_string(),
                });
            }
        }

        let registry = ensure_registry(&mut self.registry, &*host)?;
        let (index, evicted) = if let Some(free) = registry.find_free_slot() {
            registry.advance_cycle_past(free);
            (free, None)
        } else {
            let index = registry.allocate_slot();
            let old = registry.pattern(index).unwrap_or_default().to_string();
            (index, Some(old).filter(|p| !p.is_empty()))
        };
        registry.set_pattern(index, pattern)?;

        if registry.is_enabled() {
            self.sync
                .apply_all_views(host, registry, SlotChange::Set { index, pattern });
        } else {
            registry.toggle_enabled(Some(true));
            self.sync.refresh_all(host, registry);
        }

        match &evicted {
            Some(old) => info!(index, pattern, evicted = %old, "marked, evicting oldest"),
            None => debug!(index, pattern, cycle = registry.cycle(), "marked"),
        }
        Ok(Outcome::Marked {
            index,
            pattern: pattern.to_string(),
            evicted,
        })
    }

    // -- User commands -------------------------------------------------------

    /// Mark the word under the cursor, or unmark the mark the cursor is on.
    ///
    /// A newly added word pattern is also written to the last-search
    /// register, so `n` continues with it.
    ///
    /// # Errors
    ///
    /// [`MarkError::NoSlots`] when the host has no mark colors.
    pub fn mark_current_word<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<Outcome, MarkError> {
        if let Some(current) = self.current_mark(&*host) {
            return self.add_pattern(host, &current.pattern);
        }
        let Some(word) = host.word_under_cursor() else {
            return Ok(Outcome::NoWord);
        };
        let pattern = word_pattern(&word);
        let outcome = self.add_pattern(host, &pattern)?;
        if matches!(outcome, Outcome::Marked { .. }) {
            host.set_last_search(&pattern);
        }
        Ok(outcome)
    }

    /// Mark `text` literally (a visual selection), without word boundaries.
    ///
    /// # Errors
    ///
    /// [`MarkError::NoSlots`] when the host has no mark colors.
    pub fn mark_literal<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        text: &str,
    ) -> Result<Outcome, MarkError> {
        if text.contains(['\n', '\r']) {
            return Ok(Outcome::MultiLine);
        }
        if text.is_empty() {
            return Ok(Outcome::NoWord);
        }
        self.add_pattern(host, &literal_pattern(text))
    }

    /// `:Mark {pattern}`. An empty pattern toggles visibility instead.
    ///
    /// The pattern is recorded in the configured histories.
    ///
    /// # Errors
    ///
    /// [`MarkError::NoSlots`] when the host has no mark colors.
    pub fn mark_explicit<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        pattern: &str,
    ) -> Result<Outcome, MarkError> {
        if pattern.is_empty() {
            return self.toggle_visibility(host);
        }
        let outcome = self.add_pattern(host, pattern)?;
        for &kind in &self.config.history_add {
            host.add_history(kind, pattern);
        }
        Ok(outcome)
    }

    /// Flip mark visibility.
    ///
    /// # Errors
    ///
    /// [`MarkError::NoSlots`] when the host has no mark colors.
    pub fn toggle_visibility<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<Outcome, MarkError> {
        self.set_visibility(host, None)
    }

    /// Show (`Some(true)`), hide (`Some(false)`) or flip (`None`) marks.
    ///
    /// # Errors
    ///
    /// [`MarkError::NoSlots`] when the host has no mark colors.
    pub fn set_visibility<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        explicit: Option<bool>,
    ) -> Result<Outcome, MarkError> {
        let registry = ensure_registry(&mut self.registry, &*host)?;
        if !registry.toggle_enabled(explicit) {
            return Ok(Outcome::Unchanged {
                enabled: registry.is_enabled(),
            });
        }
        if registry.is_enabled() {
            self.sync.refresh_all(host, registry);
            let count = registry.marked_count();
            debug!(count, "marks enabled");
            Ok(Outcome::Enabled { count })
        } else {
            let all: Vec<usize> = (0..registry.capacity()).collect();
            self.sync.apply_all_views(host, registry, SlotChange::Clear(&all));
            debug!("marks disabled");
            Ok(Outcome::Disabled)
        }
    }

    /// `:MarkClear` — remove every mark and make marks visible again.
    pub fn clear_all<H: Host + ?Sized>(&mut self, host: &mut H) -> Outcome {
        let Some(registry) = &mut self.registry else {
            return Outcome::Cleared { count: 0 };
        };
        let cleared = registry.clear_all();
        // Everything is blank, so re-enabling needs no refresh.
        registry.toggle_enabled(Some(true));
        self.sync
            .apply_all_views(host, registry, SlotChange::Clear(&cleared));
        debug!(count = cleared.len(), "cleared all marks");
        Outcome::Cleared {
            count: cleared.len(),
        }
    }

    // -- Queries -------------------------------------------------------------

    /// The mark covering the cursor, if any.
    #[must_use]
    pub fn current_mark<H: Host + ?Sized>(&self, host: &H) -> Option<CurrentMark> {
        let registry = self.registry.as_ref()?;
        let cursor = host.cursor();
        let line = host.line(cursor.line)?;
        find_current_mark(registry, host, host.ignore_case(), &line, cursor.col)
    }

    /// Every assigned slot, lowest first.
    #[must_use]
    pub fn list(&self) -> Vec<MarkEntry> {
        self.registry
            .iter()
            .flat_map(SlotRegistry::marks)
            .map(|(index, pattern)| MarkEntry {
                index,
                group: group_name(index),
                pattern: pattern.to_string(),
            })
            .collect()
    }

    // -- Search --------------------------------------------------------------

    /// Jump to the next/previous occurrence of the mark under the cursor.
    ///
    /// Off any mark, the mark searched for last is used again.
    pub fn search_current_mark<H: Host + ?Sized>(&mut self, host: &mut H, direction: Direction) -> Outcome {
        let current = self.current_mark(&*host);
        let Some(registry) = &mut self.registry else {
            return Outcome::NoCurrentMark;
        };
        let cursor = host.cursor();
        let (pattern, from) = if let Some(current) = current {
            registry.set_last_search(&current.pattern);
            (current.pattern, TextPos::new(cursor.line, current.start))
        } else if registry.last_search().is_empty() {
            return Outcome::NoCurrentMark;
        } else {
            (registry.last_search().to_string(), cursor)
        };

        let exprs = [adjust_for_case_sensitivity(&pattern, host.ignore_case())];
        match find_next(&*host, &exprs, from, direction) {
            Some(hit) => {
                host.set_cursor(hit.pos);
                Outcome::Jumped {
                    pattern,
                    pos: hit.pos,
                    direction,
                    wrapped: hit.wrapped,
                }
            }
            None => Outcome::NotFound { pattern },
        }
    }

    /// Jump to the nearest occurrence of any mark.
    pub fn search_any_mark<H: Host + ?Sized>(&mut self, host: &mut H, direction: Direction) -> Outcome {
        let Some(registry) = &self.registry else {
            return Outcome::NoMarks;
        };
        let patterns: Vec<&str> = registry.marks().map(|(_, p)| p).collect();
        if patterns.is_empty() {
            return Outcome::NoMarks;
        }
        let ignore_case = host.ignore_case();
        let exprs: Vec<String> = patterns
            .iter()
            .map(|p| adjust_for_case_sensitivity(p, ignore_case))
            .collect();

        match find_next(&*host, &exprs, host.cursor(), direction) {
            Some(hit) => {
                let pattern = patterns[hit.expr].to_string();
                host.set_cursor(hit.pos);
                Outcome::Jumped {
                    pattern,
                    pos: hit.pos,
                    direction,
                    wrapped: hit.wrapped,
                }
            }
            None => Outcome::NotFound {
                pattern: patterns.join("|"),
            },
        }
    }

    // -- View lifecycle ------------------------------------------------------

    /// The current view was (re)entered.
    pub fn on_view_entered<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(registry) = &self.registry {
            let view = host.current_view();
            self.sync.on_view_entered(host, view, registry);
        }
    }

    /// A different tab page became current.
    pub fn on_tab_entered<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(registry) = &self.registry {
            self.sync.on_tab_entered(host, registry);
        }
    }

    /// `view` was closed.
    pub fn on_view_closed(&mut self, view: ViewId) {
        self.sync.on_view_closed(view);
    }

    /// Highlight groups were redefined; rebuild every view in scope.
    pub fn on_color_scheme_changed<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(registry) = &self.registry {
            self.sync.refresh_all(host, registry);
        }
    }

    /// `'ignorecase'` changed. Registered expressions carry the case
    /// marker, so every view in scope is rebuilt.
    pub fn on_ignore_case_changed<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(registry) = &self.registry {
            debug!(ignore_case = host.ignore_case(), "re-registering marks");
            self.sync.refresh_all(host, registry);
        }
    }
}
