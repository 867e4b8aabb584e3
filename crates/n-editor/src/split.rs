//! Window layout — split trees and tab pages.
//!
//! Each tab page owns a binary split tree whose leaves are window ids:
//!
//! ```text
//! Vertical
//! ├── Leaf(1)        ← left
//! └── Horizontal
//!     ├── Leaf(2)    ← top right
//!     └── Leaf(3)    ← bottom right
//! ```
//!
//! [`Split::layout`] maps the tree to screen rectangles. Vertical splits
//! reserve one column for the separator; horizontal splits need none.
//!
//! Window ids are unique across all tab pages and never reused, so a
//! closed window's id can safely key stale per-window state elsewhere.

/// Unique window identifier. Monotonically increasing, never reused.
pub type WinId = usize;

/// A rectangle on screen: origin (x, y) and dimensions (width, height).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl Rect {
    #[must_use]
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }
}

/// Which way a window is divided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// `:split` — top/bottom.
    Horizontal,
    /// `:vsplit` — left/right.
    Vertical,
}

// ---------------------------------------------------------------------------
// Split
// ---------------------------------------------------------------------------

/// A node in the split tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Split {
    Leaf(WinId),
    Node {
        orientation: Orientation,
        first: Box<Self>,
        second: Box<Self>,
    },
}

impl Split {
    /// All window ids, depth-first, first child before second.
    #[must_use]
    pub fn leaves(&self) -> Vec<WinId> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut Vec<WinId>) {
        match self {
            Self::Leaf(id) => out.push(*id),
            Self::Node { first, second, .. } => {
                first.collect_leaves(out);
                second.collect_leaves(out);
            }
        }
    }

    #[must_use]
    pub fn contains(&self, id: WinId) -> bool {
        match self {
            Self::Leaf(w) => *w == id,
            Self::Node { first, second, .. } => first.contains(id) || second.contains(id),
        }
    }

    /// Screen rectangle of every window. The rectangles tile `area`.
    #[must_use]
    pub fn layout(&self, area: Rect) -> Vec<(WinId, Rect)> {
        let mut out = Vec::new();
        self.layout_into(area, &mut out);
        out
    }

    fn layout_into(&self, area: Rect, out: &mut Vec<(WinId, Rect)>) {
        match self {
            Self::Leaf(id) => out.push((*id, area)),
            Self::Node {
                orientation: Orientation::Horizontal,
                first,
                second,
            } => {
                let top_h = area.h / 2;
                first.layout_into(Rect { h: top_h, ..area }, out);
                second.layout_into(
                    Rect {
                        y: area.y + top_h,
                        h: area.h - top_h,
                        ..area
                    },
                    out,
                );
            }
            Self::Node {
                orientation: Orientation::Vertical,
                first,
                second,
            } => {
                if area.w < 3 {
                    // Too narrow: the second pane gets an empty rectangle.
                    first.layout_into(area, out);
                    second.layout_into(Rect { w: 0, ..area }, out);
                    return;
                }
                let left_w = area.w / 2;
                first.layout_into(Rect { w: left_w, ..area }, out);
                // Column `area.x + left_w` is the separator.
                second.layout_into(
                    Rect {
                        x: area.x + left_w + 1,
                        w: area.w - left_w - 1,
                        ..area
                    },
                    out,
                );
            }
        }
    }

    /// Split `target`: it keeps the first half, `new_id` takes the second.
    ///
    /// Returns `true` if the target was found.
    pub fn split(&mut self, target: WinId, new_id: WinId, orientation: Orientation) -> bool {
        match self {
            Self::Leaf(id) if *id == target => {
                *self = Self::Node {
                    orientation,
                    first: Box::new(Self::Leaf(target)),
                    second: Box::new(Self::Leaf(new_id)),
                };
                true
            }
            Self::Leaf(_) => false,
            Self::Node { first, second, .. } => {
                first.split(target, new_id, orientation) || second.split(target, new_id, orientation)
            }
        }
    }

    /// Remove `target`; its sibling takes the parent's place.
    ///
    /// The last window cannot be removed.
    pub fn remove(&mut self, target: WinId) -> bool {
        match self {
            Self::Leaf(_) => false,
            Self::Node { first, second, .. } => {
                if matches!(**first, Self::Leaf(id) if id == target) {
                    *self = std::mem::replace(second.as_mut(), Self::Leaf(target));
                    true
                } else if matches!(**second, Self::Leaf(id) if id == target) {
                    *self = std::mem::replace(first.as_mut(), Self::Leaf(target));
                    true
                } else {
                    first.remove(target) || second.remove(target)
                }
            }
        }
    }

    /// The window after (or before) `current` in leaf order, wrapping.
    #[must_use]
    pub fn cycle(&self, current: WinId, forward: bool) -> WinId {
        let leaves = self.leaves();
        let n = leaves.len();
        let Some(pos) = leaves.iter().position(|&id| id == current) else {
            return leaves.first().copied().unwrap_or(current);
        };
        if forward {
            leaves[(pos + 1) % n]
        } else {
            leaves[(pos + n - 1) % n]
        }
    }
}

// ---------------------------------------------------------------------------
// Tab pages
// ---------------------------------------------------------------------------

/// One tab page: a layout and the window that has focus in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabPage {
    pub layout: Split,
    pub current: WinId,
}

impl TabPage {
    /// A tab page with a single window.
    #[must_use]
    pub const fn new(win: WinId) -> Self {
        Self {
            layout: Split::Leaf(win),
            current: win,
        }
    }

    /// Windows of this tab page in layout order.
    #[must_use]
    pub fn windows(&self) -> Vec<WinId> {
        self.layout.leaves()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const AREA: Rect = Rect::new(0, 0, 80, 24);

    fn three_way() -> Split {
        let mut tree = Split::Leaf(1);
        tree.split(1, 2, Orientation::Vertical);
        tree.split(2, 3, Orientation::Horizontal);
        tree
    }

    // -- structure -----------------------------------------------------------

    #[test]
    fn leaves_in_order() {
        assert_eq!(three_way().leaves(), vec![1, 2, 3]);
    }

    #[test]
    fn split_unknown_target() {
        let mut tree = Split::Leaf(1);
        assert!(!tree.split(7, 2, Orientation::Vertical));
        assert_eq!(tree, Split::Leaf(1));
    }

    #[test]
    fn contains() {
        let tree = three_way();
        assert!(tree.contains(3));
        assert!(!tree.contains(4));
    }

    // -- layout --------------------------------------------------------------

    #[test]
    fn layout_single() {
        assert_eq!(Split::Leaf(1).layout(AREA), vec![(1, AREA)]);
    }

    #[test]
    fn layout_vertical_reserves_separator() {
        let mut tree = Split::Leaf(1);
        tree.split(1, 2, Orientation::Vertical);
        assert_eq!(
            tree.layout(AREA),
            vec![(1, Rect::new(0, 0, 40, 24)), (2, Rect::new(41, 0, 39, 24))]
        );
    }

    #[test]
    fn layout_nested() {
        assert_eq!(
            three_way().layout(AREA),
            vec![
                (1, Rect::new(0, 0, 40, 24)),
                (2, Rect::new(41, 0, 39, 12)),
                (3, Rect::new(41, 12, 39, 12)),
            ]
        );
    }

    #[test]
    fn layout_too_narrow() {
        let mut tree = Split::Leaf(1);
        tree.split(1, 2, Orientation::Vertical);
        let rects = tree.layout(Rect::new(0, 0, 2, 5));
        assert_eq!(rects[0].1, Rect::new(0, 0, 2, 5));
        assert_eq!(rects[1].1.w, 0);
    }

    // -- remove --------------------------------------------------------------

    #[test]
    fn remove_collapses_parent() {
        let mut tree = three_way();
        assert!(tree.remove(2));
        assert_eq!(tree.leaves(), vec![1, 3]);
        assert_eq!(
            tree.layout(AREA),
            vec![(1, Rect::new(0, 0, 40, 24)), (3, Rect::new(41, 0, 39, 24))]
        );
    }

    #[test]
    fn cannot_remove_last() {
        let mut tree = Split::Leaf(1);
        assert!(!tree.remove(1));
    }

    #[test]
    fn remove_missing() {
        let mut tree = three_way();
        assert!(!tree.remove(9));
        assert_eq!(tree.leaves(), vec![1, 2, 3]);
    }

    // -- cycle ---------------------------------------------------------------

    #[test]
    fn cycle_wraps() {
        let tree = three_way();
        assert_eq!(tree.cycle(1, true), 2);
        assert_eq!(tree.cycle(3, true), 1);
        assert_eq!(tree.cycle(1, false), 3);
        assert_eq!(Split::Leaf(5).cycle(5, true), 5);
    }

    // -- tab pages -----------------------------------------------------------

    #[test]
    fn tab_page_windows() {
        let mut tab = TabPage::new(4);
        tab.layout.split(4, 5, Orientation::Horizontal);
        assert_eq!(tab.windows(), vec![4, 5]);
        assert_eq!(tab.current, 4);
    }
}
