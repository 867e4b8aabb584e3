//! Slot registry — the fixed set of mark colors and what each one marks.
//!
//! A registry holds `N` slots, one per `MarkWordN` highlight group. Each
//! slot is either empty or holds exactly one pattern, and no pattern is
//! held by two slots. Slot `i + 1` is drawn above slot `i`.
//!
//! # Allocation
//!
//! Two independent reads decide where a new pattern goes:
//!
//! - [`find_free_slot`](SlotRegistry::find_free_slot) — first empty slot,
//!   so unused colors are handed out before any reuse.
//! - [`allocate_slot`](SlotRegistry::allocate_slot) — the round-robin
//!   cycle pointer, used once every slot is taken. It evicts the slot that
//!   was (re)assigned longest ago.
//!
//! ```text
//! N = 3     alpha → 0   beta → 1   gamma → 2   delta → 0 (evicts alpha)
//! cycle:    1           2          0           1
//! ```
//!
//! # Generation
//!
//! Every mutation that changes what a view should display bumps
//! [`generation`](SlotRegistry::generation). View records remember the
//! generation they were built from, which is how a view that missed some
//! updates is recognised as stale.

use crate::error::MarkError;

/// The mark slots of one editing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRegistry {
    /// One pattern per slot. Empty string = unassigned.
    slots: Vec<String>,
    /// Round-robin pointer. Always `< slots.len()`.
    cycle: usize,
    /// Global visibility. Disabling keeps the patterns.
    enabled: bool,
    /// Pattern last searched for through the mark search commands.
    last_search: String,
    generation: u64,
}

impl SlotRegistry {
    /// Create a registry with `capacity` empty slots.
    ///
    /// # Errors
    ///
    /// [`MarkError::NoSlots`] when `capacity` is zero: the host has no mark
    /// colors defined.
    pub fn init(capacity: usize) -> Result<Self, MarkError> {
        if capacity == 0 {
            return Err(MarkError::NoSlots);
        }
        Ok(Self {
            slots: vec![String::new(); capacity],
            cycle: 0,
            enabled: true,
            last_search: String::new(),
            generation: 0,
        })
    }

    // -- Queries -------------------------------------------------------------

    /// Number of slots. Fixed for the registry's lifetime.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Pattern held by slot `index` (empty if unassigned), or `None` when
    /// the index is out of range.
    #[must_use]
    pub fn pattern(&self, index: usize) -> Option<&str> {
        self.slots.get(index).map(String::as_str)
    }

    /// Every assigned slot with its pattern, lowest index first.
    pub fn marks(&self) -> impl DoubleEndedIterator<Item = (usize, &str)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_empty())
            .map(|(i, p)| (i, p.as_str()))
    }

    /// Number of assigned slots.
    #[must_use]
    pub fn marked_count(&self) -> usize {
        self.slots.iter().filter(|p| !p.is_empty()).count()
    }

    /// Current position of the round-robin pointer.
    #[inline]
    #[must_use]
    pub const fn cycle(&self) -> usize {
        self.cycle
    }

    /// Whether marks are currently rendered.
    #[inline]
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Change counter for view staleness checks.
    #[inline]
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// The pattern remembered by the last mark search (empty if none).
    #[must_use]
    pub fn last_search(&self) -> &str {
        &self.last_search
    }

    /// Slot holding exactly `pattern`. Empty patterns never match.
    #[must_use]
    pub fn find_index_of(&self, pattern: &str) -> Option<usize> {
        if pattern.is_empty() {
            return None;
        }
        self.slots.iter().position(|p| p == pattern)
    }

    /// First unassigned slot.
    #[must_use]
    pub fn find_free_slot(&self) -> Option<usize> {
        self.slots.iter().position(String::is_empty)
    }

    // -- Mutation ------------------------------------------------------------

    /// Return the slot under the cycle pointer and advance the pointer.
    ///
    /// The returned slot may be occupied; the caller overwrites it.
    pub fn allocate_slot(&mut self) -> usize {
        let index = self.cycle;
        self.advance_cycle_past(index);
        index
    }

    /// Point the cycle pointer just past `index`, wrapping at capacity.
    pub fn advance_cycle_past(&mut self, index: usize) {
        self.cycle = (index + 1) % self.slots.len();
    }

    /// Store `pattern` in slot `index` (empty string clears the slot).
    ///
    /// If the replaced pattern is the one remembered by the last mark
    /// search, that memory is dropped.
    ///
    /// # Errors
    ///
    /// [`MarkError::SlotOutOfRange`] for an index past capacity.
    pub fn set_pattern(&mut self, index: usize, pattern: impl Into<String>) -> Result<(), MarkError> {
        let capacity = self.capacity();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(MarkError::SlotOutOfRange { index, capacity })?;
        if !self.last_search.is_empty() && *slot == self.last_search {
            self.last_search.clear();
        }
        *slot = pattern.into();
        self.generation += 1;
        Ok(())
    }

    /// Remember `pattern` as the target of the mark search commands.
    pub fn set_last_search(&mut self, pattern: &str) {
        pattern.clone_into(&mut self.last_search);
    }

    /// Flip visibility, or set it to `explicit` when given.
    ///
    /// Returns whether the value actually changed.
    pub fn toggle_enabled(&mut self, explicit: Option<bool>) -> bool {
        let target = explicit.unwrap_or(!self.enabled);
        if target == self.enabled {
            return false;
        }
        self.enabled = target;
        self.generation += 1;
        true
    }

    /// Empty every assigned slot and forget the last mark search.
    ///
    /// Returns the indices that were assigned before the call.
    pub fn clear_all(&mut self) -> Vec<usize> {
        let cleared: Vec<usize> = self.marks().map(|(i, _)| i).collect();
        for &i in &cleared {
            self.slots[i].clear();
        }
        self.last_search.clear();
        if !cleared.is_empty() {
            self.generation += 1;
        }
        cleared
    }
}
