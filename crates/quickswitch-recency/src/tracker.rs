//! Event-sourced most-recently-used tab ordering.
//!
//! The tracker never polls. It only knows that a tab became active, closed,
//! or was swapped for another, and projects those facts onto an ordered list.
//! Membership is a hint: a tab whose removal event never arrived lingers
//! until a consumer cross-checks against a live tab query.

use std::collections::HashSet;

use quickswitch_ids::{TabId, WindowId};
use tracing::{debug, trace, warn};

use crate::store::StateStore;

/// Tab and window lifecycle events consumed by the tracker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TabEvent {
    /// `tab` became the active tab of `window`.
    Activated {
        /// Window owning the tab.
        window: WindowId,
        /// Newly active tab.
        tab: TabId,
    },
    /// The tab was closed.
    Removed(TabId),
    /// `removed` was swapped out for `added` (prerender / instant navigation).
    Replaced {
        /// Tab taking over the slot.
        added: TabId,
        /// Tab being discarded.
        removed: TabId,
    },
    /// Window focus moved; may carry [`WindowId::NONE`].
    WindowFocusChanged(WindowId),
}

/// Last real window focus and whether focus has since been lost.
///
/// Some window managers report "no window focused" immediately before every
/// switch between two browser windows, so losing focus is only remembered,
/// never acted upon.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowFocusState {
    /// Last non-sentinel window that received focus.
    pub window: Option<WindowId>,
    /// True after a [`WindowId::NONE`] report until a real window regains focus.
    pub focus_lost: bool,
}

/// Most-recently-used ordering of tab ids, most recent first, without duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecencyTracker {
    recent: Vec<TabId>,
    focus: WindowFocusState,
    /// Activations applied so far.
    activations: u64,
}

impl RecencyTracker {
    /// Empty tracker, as on first install.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the tracker with an ordered list. Later duplicates are dropped.
    pub fn from_list(list: impl IntoIterator<Item = TabId>) -> Self {
        Self {
            recent: dedup(list),
            ..Self::default()
        }
    }

    /// Restore from `store`, reconciling against the live tabs in browser order.
    ///
    /// A missing or unreadable snapshot falls back to `live` as-is.
    pub async fn restore(store: &dyn StateStore, live: &[TabId]) -> Self {
        match store.load().await {
            Ok(Some(saved)) => {
                let tracker = Self::from_list(reconcile(saved, live));
                debug!(restored = tracker.recent.len(), live = live.len(), "recency restored");
                tracker
            }
            Ok(None) => {
                debug!(live = live.len(), "no saved recency; using live tab order");
                Self::from_list(live.iter().copied())
            }
            Err(e) => {
                warn!(error = %e, "saved recency unreadable; using live tab order");
                Self::from_list(live.iter().copied())
            }
        }
    }

    /// Record `tab` as most recently used.
    pub fn on_tab_activated(&mut self, window: WindowId, tab: TabId) {
        trace!(%window, %tab, "tab activated");
        self.activations += 1;
        if self.recent.first() == Some(&tab) {
            return;
        }
        if let Some(pos) = self.position(tab) {
            self.recent.remove(pos);
        }
        self.recent.insert(0, tab);
    }

    /// Forget `tab`. No-op when it was never seen.
    pub fn on_tab_removed(&mut self, tab: TabId) {
        trace!(%tab, "tab removed");
        if let Some(pos) = self.position(tab) {
            self.recent.remove(pos);
        }
    }

    /// Put `added` in the slot held by `removed`, keeping its rank.
    pub fn on_tab_replaced(&mut self, added: TabId, removed: TabId) {
        trace!(%added, %removed, "tab replaced");
        if added == removed {
            return;
        }
        let Some(mut pos) = self.position(removed) else {
            return;
        };
        if let Some(dup) = self.position(added) {
            self.recent.remove(dup);
            if dup < pos {
                pos -= 1;
            }
        }
        self.recent[pos] = added;
    }

    /// Track window focus. Never reorders the list.
    pub fn on_window_focus_changed(&mut self, window: WindowId) {
        trace!(%window, "window focus changed");
        if window.is_none() {
            self.focus.focus_lost = true;
            return;
        }
        self.focus = WindowFocusState {
            window: Some(window),
            focus_lost: false,
        };
    }

    /// Activations applied so far. Taken as a mark when a focus change is
    /// applied, and checked again by [`Self::on_focus_lookup`].
    pub fn activations(&self) -> u64 {
        self.activations
    }

    /// Record `tab`, found active in the newly focused `window`, as most
    /// recently used.
    ///
    /// The lookup answer arrives after later events may have been applied.
    /// It is dropped when any activation happened since `mark`, or when
    /// `window` no longer holds focus. Returns whether it was applied.
    pub fn on_focus_lookup(&mut self, window: WindowId, tab: TabId, mark: u64) -> bool {
        if self.activations != mark {
            debug!(%window, %tab, "stale focus lookup; a later activation wins");
            return false;
        }
        if self.focus.window != Some(window) || self.focus.focus_lost {
            debug!(%window, %tab, "stale focus lookup; focus moved on");
            return false;
        }
        self.on_tab_activated(window, tab);
        true
    }

    /// Apply a single lifecycle event.
    pub fn apply(&mut self, event: TabEvent) {
        match event {
            TabEvent::Activated { window, tab } => self.on_tab_activated(window, tab),
            TabEvent::Removed(tab) => self.on_tab_removed(tab),
            TabEvent::Replaced { added, removed } => self.on_tab_replaced(added, removed),
            TabEvent::WindowFocusChanged(window) => self.on_window_focus_changed(window),
        }
    }

    /// Current ordering, most recent first.
    pub fn recent_tabs(&self) -> &[TabId] {
        &self.recent
    }

    /// Current focus bookkeeping.
    pub fn focus(&self) -> WindowFocusState {
        self.focus
    }

    /// Fold in a list restored after events already arrived.
    ///
    /// Entries already tracked are newer and keep their place in front;
    /// restored entries not yet tracked follow in their saved order.
    pub fn merge_restored(&mut self, restored: impl IntoIterator<Item = TabId>) {
        let mut seen: HashSet<TabId> = self.recent.iter().copied().collect();
        for tab in restored {
            if seen.insert(tab) {
                self.recent.push(tab);
            }
        }
    }

    fn position(&self, tab: TabId) -> Option<usize> {
        self.recent.iter().position(|t| *t == tab)
    }
}

/// Drop duplicates, keeping the first occurrence.
fn dedup(list: impl IntoIterator<Item = TabId>) -> Vec<TabId> {
    let mut seen = HashSet::new();
    list.into_iter().filter(|t| seen.insert(*t)).collect()
}

/// Keep only saved entries that are still open, in saved order.
pub fn reconcile(saved: Vec<TabId>, live: &[TabId]) -> Vec<TabId> {
    let live: HashSet<TabId> = live.iter().copied().collect();
    dedup(saved.into_iter().filter(|t| live.contains(t)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[i32]) -> Vec<TabId> {
        raw.iter().copied().map(TabId::new).collect()
    }

    fn tracker(raw: &[i32]) -> RecencyTracker {
        RecencyTracker::from_list(ids(raw))
    }

    const W1: WindowId = WindowId::new(1);
    const W2: WindowId = WindowId::new(2);

    #[test]
    fn activation_moves_to_front() {
        let mut t = tracker(&[1, 2, 3, 4]);
        t.on_tab_activated(W1, TabId::new(3));
        assert_eq!(t.recent_tabs(), ids(&[3, 1, 2, 4]));
        t.on_tab_activated(W1, TabId::new(9));
        assert_eq!(t.recent_tabs(), ids(&[9, 3, 1, 2, 4]));
    }

    #[test]
    fn removal_is_noop_when_absent() {
        let mut t = tracker(&[1, 2]);
        t.on_tab_removed(TabId::new(5));
        assert_eq!(t.recent_tabs(), ids(&[1, 2]));
        t.on_tab_removed(TabId::new(1));
        assert_eq!(t.recent_tabs(), ids(&[2]));
    }

    #[test]
    fn replacement_keeps_rank() {
        let mut t = tracker(&[1, 2, 3]);
        t.on_tab_replaced(TabId::new(7), TabId::new(2));
        assert_eq!(t.recent_tabs(), ids(&[1, 7, 3]));
    }

    #[test]
    fn replacement_with_known_id_stays_unique() {
        let mut t = tracker(&[1, 2, 3]);
        t.on_tab_replaced(TabId::new(1), TabId::new(3));
        assert_eq!(t.recent_tabs(), ids(&[2, 1]));
        let mut t = tracker(&[1, 2, 3]);
        t.on_tab_replaced(TabId::new(3), TabId::new(1));
        assert_eq!(t.recent_tabs(), ids(&[3, 2]));
    }

    #[test]
    fn replacement_of_unknown_tab_is_ignored() {
        let mut t = tracker(&[1, 2]);
        t.on_tab_replaced(TabId::new(8), TabId::new(9));
        assert_eq!(t.recent_tabs(), ids(&[1, 2]));
    }

    #[test]
    fn focus_none_is_deferred() {
        let mut t = tracker(&[1, 2]);
        t.on_window_focus_changed(W1);
        t.on_window_focus_changed(WindowId::NONE);
        assert_eq!(
            t.focus(),
            WindowFocusState {
                window: Some(W1),
                focus_lost: true
            }
        );
        assert_eq!(t.recent_tabs(), ids(&[1, 2]));
        t.on_window_focus_changed(W2);
        assert_eq!(
            t.focus(),
            WindowFocusState {
                window: Some(W2),
                focus_lost: false
            }
        );
        assert_eq!(t.recent_tabs(), ids(&[1, 2]));
    }

    #[test]
    fn from_list_dedups() {
        let t = tracker(&[3, 1, 3, 2, 1]);
        assert_eq!(t.recent_tabs(), ids(&[3, 1, 2]));
    }

    #[test]
    fn merge_restored_keeps_newer_entries_first() {
        let mut t = tracker(&[5, 2]);
        t.merge_restored(ids(&[1, 2, 3]));
        assert_eq!(t.recent_tabs(), ids(&[5, 2, 1, 3]));
    }

    #[test]
    fn reconcile_drops_closed_tabs() {
        assert_eq!(reconcile(ids(&[4, 1, 9, 2]), &ids(&[1, 2, 3, 4])), ids(&[4, 1, 2]));
    }

    #[test]
    fn focus_lookup_applies_when_nothing_happened_since() {
        let mut t = tracker(&[1, 2]);
        t.on_window_focus_changed(W2);
        let mark = t.activations();
        assert!(t.on_focus_lookup(W2, TabId::new(5), mark));
        assert_eq!(t.recent_tabs(), ids(&[5, 1, 2]));
    }

    #[test]
    fn focus_lookup_loses_to_a_later_activation() {
        let mut t = tracker(&[1, 2]);
        t.on_window_focus_changed(W2);
        let mark = t.activations();
        t.on_tab_activated(W2, TabId::new(6));
        assert!(!t.on_focus_lookup(W2, TabId::new(5), mark));
        assert_eq!(t.recent_tabs(), ids(&[6, 1, 2]));
    }

    #[test]
    fn focus_lookup_for_a_window_that_lost_focus_is_dropped() {
        let mut t = tracker(&[1]);
        t.on_window_focus_changed(W2);
        let mark = t.activations();
        t.on_window_focus_changed(W1);
        assert!(!t.on_focus_lookup(W2, TabId::new(5), mark));
        t.on_window_focus_changed(WindowId::NONE);
        assert!(!t.on_focus_lookup(W1, TabId::new(5), mark));
        assert_eq!(t.recent_tabs(), ids(&[1]));
    }
}
