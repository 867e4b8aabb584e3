//! View sync — pushing registry state into every view's highlights.
//!
//! Each view carries a record mapping slot index → the host handle of the
//! highlight registered for that slot (or nothing). Records live in an
//! arena keyed by [`ViewId`], are created the first time a view is seen,
//! and are dropped when the host reports the view closed.
//!
//! # Incremental vs full
//!
//! After a command mutates the registry, [`ViewSync::apply_all_views`]
//! sends just the changed slots to every view in the current scope. A view
//! whose record missed an earlier change (it was in another tab page, or
//! is brand new) gets a full [`refresh_view`](ViewSync::refresh_view)
//! instead, so it never combines stale and fresh slots.
//!
//! # Priorities
//!
//! Slot `i` of `N` registers at priority `-(N - i)`: every mark sits below
//! the search highlight (priority 0) and higher slots win on overlap.

use std::collections::HashMap;

use tracing::trace;

use crate::host::{group_name, Host, MatchHandle, ViewId};
use crate::pattern::adjust_for_case_sensitivity;
use crate::registry::SlotRegistry;

/// Priority of the host's own search-match highlighting.
pub const SEARCH_HIGHLIGHT_PRIORITY: i32 = 0;

/// Highlight priority for slot `index` of a registry with `capacity` slots.
#[must_use]
pub fn slot_priority(index: usize, capacity: usize) -> i32 {
    let depth = capacity.saturating_sub(index).max(1);
    SEARCH_HIGHLIGHT_PRIORITY - i32::try_from(depth).unwrap_or(i32::MAX)
}

/// A change to push into views.
///
/// Only a single slot can receive a pattern per change; clearing may touch
/// any number of slots at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotChange<'a> {
    /// Replace whatever slot `index` shows with `pattern` (empty = clear).
    Set { index: usize, pattern: &'a str },
    /// Remove the highlights of these slots.
    Clear(&'a [usize]),
}

/// Registrations of one view.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ViewRecord {
    handles: Vec<Option<MatchHandle>>,
    /// Registry generation this record reflects.
    generation: u64,
}

impl ViewRecord {
    fn new(capacity: usize) -> Self {
        Self {
            handles: vec![None; capacity],
            generation: 0,
        }
    }

    fn clear_slot<H: Host + ?Sized>(&mut self, host: &mut H, view: ViewId, index: usize) {
        if let Some(handle) = self.handles.get_mut(index).and_then(Option::take) {
            trace!(view, index, ?handle, "delete mark highlight");
            host.delete_match(view, handle);
        }
    }

    fn register<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        view: ViewId,
        index: usize,
        pattern: &str,
    ) {
        let capacity = self.handles.len();
        let Some(slot) = self.handles.get_mut(index) else {
            return;
        };
        let expr = adjust_for_case_sensitivity(pattern, host.ignore_case());
        let handle = host.add_match(view, &group_name(index), &expr, slot_priority(index, capacity));
        trace!(view, index, %expr, ?handle, "add mark highlight");
        *slot = Some(handle);
    }
}

/// Per-view highlight registrations for one mark session.
#[derive(Debug, Default)]
pub struct ViewSync {
    records: HashMap<ViewId, ViewRecord>,
    /// Registry generation at the end of the last scope-wide propagation.
    propagated: u64,
}

impl ViewSync {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `view` has a record.
    #[must_use]
    pub fn is_tracked(&self, view: ViewId) -> bool {
        self.records.contains_key(&view)
    }

    /// Whether `view` is missing a record or lags behind `registry`.
    #[must_use]
    pub fn is_stale(&self, view: ViewId, registry: &SlotRegistry) -> bool {
        self.records
            .get(&view)
            .is_none_or(|r| r.generation != registry.generation())
    }

    /// Handle registered in `view` for slot `index`.
    #[must_use]
    pub fn handle(&self, view: ViewId, index: usize) -> Option<MatchHandle> {
        self.records.get(&view)?.handles.get(index).copied().flatten()
    }

    /// Apply `change` to a single view.
    ///
    /// Existing handles for the touched slots are always deleted first, so
    /// applying the same change twice is harmless.
    pub fn apply_one_view<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        view: ViewId,
        registry: &SlotRegistry,
        change: SlotChange<'_>,
    ) {
        let record = self
            .records
            .entry(view)
            .or_insert_with(|| ViewRecord::new(registry.capacity()));
        match change {
            SlotChange::Set { index, pattern } => {
                record.clear_slot(host, view, index);
                if !pattern.is_empty() {
                    record.register(host, view, index, pattern);
                }
            }
            SlotChange::Clear(indices) => {
                for &index in indices {
                    record.clear_slot(host, view, index);
                }
            }
        }
        record.generation = registry.generation();
    }

    /// Apply `change` to every view in the host's current scope.
    ///
    /// Views that missed an earlier change are rebuilt from `registry`
    /// instead. The host's current view and layout are not touched.
    pub fn apply_all_views<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        registry: &SlotRegistry,
        change: SlotChange<'_>,
    ) {
        for view in host.views() {
            let up_to_date = self
                .records
                .get(&view)
                .is_some_and(|r| r.generation == self.propagated);
            if up_to_date {
                self.apply_one_view(host, view, registry, change);
            } else {
                self.refresh_view(host, view, registry);
            }
        }
        self.propagated = registry.generation();
    }

    /// Rebuild all of `view`'s registrations from `registry`.
    ///
    /// When marks are disabled the view ends up with no registrations.
    pub fn refresh_view<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        view: ViewId,
        registry: &SlotRegistry,
    ) {
        let record = self
            .records
            .entry(view)
            .or_insert_with(|| ViewRecord::new(registry.capacity()));
        for index in 0..record.handles.len() {
            record.clear_slot(host, view, index);
        }
        if registry.is_enabled() {
            for (index, pattern) in registry.marks() {
                record.register(host, view, index, pattern);
            }
        }
        record.generation = registry.generation();
        trace!(view, generation = record.generation, "refreshed view");
    }

    /// Rebuild every view in the current scope.
    pub fn refresh_all<H: Host + ?Sized>(&mut self, host: &mut H, registry: &SlotRegistry) {
        for view in host.views() {
            self.refresh_view(host, view, registry);
        }
        self.propagated = registry.generation();
    }

    // -- View lifecycle ------------------------------------------------------

    /// A view became current. Builds its record if it has none or missed
    /// a change.
    pub fn on_view_entered<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        view: ViewId,
        registry: &SlotRegistry,
    ) {
        if self.is_stale(view, registry) {
            self.refresh_view(host, view, registry);
        }
    }

    /// A different tab page became current. Every stale view in the new
    /// scope is rebuilt.
    pub fn on_tab_entered<H: Host + ?Sized>(&mut self, host: &mut H, registry: &SlotRegistry) {
        for view in host.views() {
            self.on_view_entered(host, view, registry);
        }
    }

    /// A view closed. Its highlights died with it; only the record goes.
    pub fn on_view_closed(&mut self, view: ViewId) {
        self.records.remove(&view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeHost;
    use pretty_assertions::assert_eq;

    fn registry(patterns: &[&str]) -> SlotRegistry {
        let mut reg = SlotRegistry::init(patterns.len()).unwrap();
        for (i, p) in patterns.iter().enumerate() {
            reg.set_pattern(i, *p).unwrap();
        }
        reg
    }

    // -- priorities ----------------------------------------------------------

    #[test]
    fn priorities_below_search_and_ordered() {
        let cap = 6;
        let prios: Vec<i32> = (0..cap).map(|i| slot_priority(i, cap)).collect();
        assert_eq!(prios, vec![-6, -5, -4, -3, -2, -1]);
        assert!(prios.iter().all(|&p| p < SEARCH_HIGHLIGHT_PRIORITY));
    }

    // -- apply_one_view ------------------------------------------------------

    #[test]
    fn set_registers_one_highlight() {
        let mut host = FakeHost::with_views(3, &[1]);
        let reg = registry(&["foo", "", ""]);
        let mut sync = ViewSync::new();
        sync.apply_one_view(&mut host, 1, &reg, SlotChange::Set { index: 0, pattern: "foo" });

        assert_eq!(host.exprs(1), vec![("MarkWord1".to_string(), "foo".to_string(), -3)]);
        assert!(sync.handle(1, 0).is_some());
    }

    #[test]
    fn set_twice_replaces_previous_handle() {
        let mut host = FakeHost::with_views(2, &[1]);
        let reg = registry(&["foo", ""]);
        let mut sync = ViewSync::new();
        let change = SlotChange::Set { index: 0, pattern: "foo" };
        sync.apply_one_view(&mut host, 1, &reg, change);
        sync.apply_one_view(&mut host, 1, &reg, change);
        assert_eq!(host.exprs(1).len(), 1);
    }

    #[test]
    fn clear_removes_listed_slots_only() {
        let mut host = FakeHost::with_views(3, &[1]);
        let reg = registry(&["a", "b", "c"]);
        let mut sync = ViewSync::new();
        sync.refresh_view(&mut host, 1, &reg);
        sync.apply_one_view(&mut host, 1, &reg, SlotChange::Clear(&[0, 2]));

        assert_eq!(host.exprs(1), vec![("MarkWord2".to_string(), "b".to_string(), -2)]);
    }

    #[test]
    fn ignore_case_injects_marker() {
        let mut host = FakeHost::with_views(1, &[1]);
        host.ignore_case = true;
        let reg = registry(&["foo"]);
        let mut sync = ViewSync::new();
        sync.refresh_view(&mut host, 1, &reg);
        assert_eq!(host.exprs(1)[0].1, "\\cfoo");
    }

    // -- apply_all_views -----------------------------------------------------

    #[test]
    fn all_views_receive_change() {
        let mut host = FakeHost::with_views(2, &[1, 2, 3]);
        let mut reg = SlotRegistry::init(2).unwrap();
        let mut sync = ViewSync::new();
        sync.refresh_all(&mut host, &reg);

        reg.set_pattern(1, "x").unwrap();
        sync.apply_all_views(&mut host, &reg, SlotChange::Set { index: 1, pattern: "x" });
        for view in [1, 2, 3] {
            assert_eq!(host.exprs(view), vec![("MarkWord2".to_string(), "x".to_string(), -1)]);
        }
    }

    #[test]
    fn propagation_keeps_current_view() {
        let mut host = FakeHost::with_views(2, &[4, 7]);
        host.current = 7;
        let mut reg = SlotRegistry::init(2).unwrap();
        let mut sync = ViewSync::new();
        reg.set_pattern(0, "x").unwrap();
        sync.apply_all_views(&mut host, &reg, SlotChange::Set { index: 0, pattern: "x" });
        assert_eq!(host.current, 7);
        assert_eq!(host.views, vec![4, 7]);
    }

    #[test]
    fn untracked_view_gets_full_refresh() {
        let mut host = FakeHost::with_views(3, &[1]);
        let mut reg = registry(&["a", "b", ""]);
        let mut sync = ViewSync::new();
        reg.set_pattern(2, "c").unwrap();
        // View 1 has never been seen: it must end up with all three marks,
        // not just the changed one.
        sync.apply_all_views(&mut host, &reg, SlotChange::Set { index: 2, pattern: "c" });
        assert_eq!(host.exprs(1).len(), 3);
    }

    #[test]
    fn view_outside_scope_goes_stale_and_refreshes_on_enter() {
        let mut host = FakeHost::with_views(2, &[1]);
        let mut reg = SlotRegistry::init(2).unwrap();
        let mut sync = ViewSync::new();
        sync.refresh_view(&mut host, 1, &reg);
        sync.refresh_view(&mut host, 2, &reg);

        // View 2 is in another tab page while "x" is marked.
        reg.set_pattern(0, "x").unwrap();
        sync.apply_all_views(&mut host, &reg, SlotChange::Set { index: 0, pattern: "x" });
        assert!(host.exprs(2).is_empty());
        assert!(sync.is_stale(2, &reg));

        host.views = vec![2];
        sync.on_tab_entered(&mut host, &reg);
        assert_eq!(host.exprs(2), vec![("MarkWord1".to_string(), "x".to_string(), -2)]);
        assert!(!sync.is_stale(2, &reg));
    }

    #[test]
    fn stale_view_in_scope_is_not_patched_incrementally() {
        let mut host = FakeHost::with_views(2, &[1]);
        let mut reg = SlotRegistry::init(2).unwrap();
        let mut sync = ViewSync::new();
        sync.refresh_view(&mut host, 1, &reg);
        sync.refresh_view(&mut host, 2, &reg);

        reg.set_pattern(0, "x").unwrap();
        sync.apply_all_views(&mut host, &reg, SlotChange::Set { index: 0, pattern: "x" });

        // View 2 returns to scope without being entered; the next change
        // must bring it fully up to date.
        host.views = vec![1, 2];
        reg.set_pattern(1, "y").unwrap();
        sync.apply_all_views(&mut host, &reg, SlotChange::Set { index: 1, pattern: "y" });
        assert_eq!(host.exprs(2).len(), 2);
    }

    // -- refresh -------------------------------------------------------------

    #[test]
    fn refresh_when_disabled_leaves_view_blank() {
        let mut host = FakeHost::with_views(2, &[1]);
        let mut reg = registry(&["a", "b"]);
        let mut sync = ViewSync::new();
        sync.refresh_view(&mut host, 1, &reg);
        assert_eq!(host.exprs(1).len(), 2);

        reg.toggle_enabled(Some(false));
        sync.refresh_view(&mut host, 1, &reg);
        assert!(host.exprs(1).is_empty());
    }

    #[test]
    fn entering_fresh_view_does_nothing() {
        let mut host = FakeHost::with_views(1, &[1]);
        let reg = registry(&["a"]);
        let mut sync = ViewSync::new();
        sync.on_view_entered(&mut host, 1, &reg);
        let adds = host.add_calls;
        sync.on_view_entered(&mut host, 1, &reg);
        assert_eq!(host.add_calls, adds);
    }

    #[test]
    fn closed_view_forgets_record_without_host_calls() {
        let mut host = FakeHost::with_views(1, &[1]);
        let reg = registry(&["a"]);
        let mut sync = ViewSync::new();
        sync.refresh_view(&mut host, 1, &reg);
        let deletes = host.delete_calls;
        sync.on_view_closed(1);
        assert!(!sync.is_tracked(1));
        assert_eq!(host.delete_calls, deletes);
    }
}
