//! Ordering invariants of the recency tracker under arbitrary event streams.

use std::collections::HashSet;

use proptest::prelude::*;
use quickswitch_ids::{TabId, WindowId};
use quickswitch_recency::{RecencyTracker, TabEvent};

fn arb_event() -> impl Strategy<Value = TabEvent> {
    let tab = (0..12i32).prop_map(TabId::new);
    let window = (-1..3i32).prop_map(WindowId::new);
    prop_oneof![
        4 => (1..3i32, tab.clone()).prop_map(|(w, t)| TabEvent::Activated {
            window: WindowId::new(w),
            tab: t
        }),
        2 => tab.clone().prop_map(TabEvent::Removed),
        1 => (tab.clone(), tab).prop_map(|(added, removed)| TabEvent::Replaced { added, removed }),
        1 => window.prop_map(TabEvent::WindowFocusChanged),
    ]
}

fn ids_mentioned(events: &[TabEvent]) -> HashSet<TabId> {
    let mut out = HashSet::new();
    for e in events {
        match *e {
            TabEvent::Activated { tab, .. } => {
                out.insert(tab);
            }
            TabEvent::Replaced { added, .. } => {
                out.insert(added);
            }
            TabEvent::Removed(_) | TabEvent::WindowFocusChanged(_) => {}
        }
    }
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn list_stays_unique_and_bounded(events in prop::collection::vec(arb_event(), 0..80)) {
        let mut tracker = RecencyTracker::new();
        for e in &events {
            tracker.apply(*e);
        }
        let list = tracker.recent_tabs();
        let unique: HashSet<TabId> = list.iter().copied().collect();
        prop_assert_eq!(unique.len(), list.len());
        let seen = ids_mentioned(&events);
        prop_assert!(list.len() <= seen.len());
        prop_assert!(list.iter().all(|t| seen.contains(t)));
    }

    #[test]
    fn reactivation_preserves_relative_order(
        events in prop::collection::vec(arb_event(), 1..60),
        pick in 0usize..64,
    ) {
        let mut tracker = RecencyTracker::new();
        for e in &events {
            tracker.apply(*e);
        }
        let before = tracker.recent_tabs().to_vec();
        prop_assume!(!before.is_empty());
        let target = before[pick % before.len()];
        tracker.on_tab_activated(WindowId::new(1), target);
        let after = tracker.recent_tabs();
        prop_assert_eq!(after[0], target);
        let rest_before: Vec<TabId> = before.iter().copied().filter(|t| *t != target).collect();
        prop_assert_eq!(&after[1..], rest_before.as_slice());
    }

    #[test]
    fn focus_blip_does_not_change_order(
        events in prop::collection::vec(arb_event(), 0..60),
        window in 1..5i32,
        tab in 0..12i32,
    ) {
        let mut with_blip = RecencyTracker::new();
        let mut without = RecencyTracker::new();
        for e in &events {
            with_blip.apply(*e);
            without.apply(*e);
        }
        with_blip.on_window_focus_changed(WindowId::NONE);
        with_blip.on_tab_activated(WindowId::new(window), TabId::new(tab));
        without.on_tab_activated(WindowId::new(window), TabId::new(tab));
        prop_assert_eq!(with_blip.recent_tabs(), without.recent_tabs());
    }
}
