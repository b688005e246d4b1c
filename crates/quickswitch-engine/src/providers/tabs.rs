use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use quickswitch_browser::{Browser, Tab};
use quickswitch_ids::TabId;
use quickswitch_protocol::{Suggestion, SuggestionKind};
use quickswitch_recency::RecencyView;
use tracing::trace;

use super::{Provider, SearchContext};
use crate::Result;

/// Order live tabs by recency and drop the invoking tab.
///
/// Tabs are stable-sorted by their position in `recent`; tabs that never
/// appear there sort after all ranked tabs and keep their platform order.
/// Tabs without an id cannot be activated and are dropped.
pub fn order_open_tabs(tabs: Vec<Tab>, recent: &[TabId], current: Option<TabId>) -> Vec<Tab> {
    let rank: HashMap<TabId, usize> = recent.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    let mut tabs: Vec<Tab> = tabs.into_iter().filter(|t| t.id.is_some()).collect();
    tabs.sort_by_key(|t| {
        t.id.and_then(|id| rank.get(&id).copied())
            .unwrap_or(usize::MAX)
    });

    let Some(current) = current else {
        return tabs;
    };
    // The invoking tab was just activated, so it is nearly always first.
    if tabs.first().and_then(|t| t.id) == Some(current) {
        tabs.remove(0);
    } else if let Some(pos) = tabs.iter().position(|t| t.id == Some(current)) {
        tabs.remove(pos);
    }
    tabs
}

/// Open tabs, most recently used first.
pub struct OpenTabs {
    browser: Arc<dyn Browser>,
    recency: Arc<dyn RecencyView>,
}

impl OpenTabs {
    /// Order tabs from `browser` by the recency list in `recency`.
    pub fn new(browser: Arc<dyn Browser>, recency: Arc<dyn RecencyView>) -> Self {
        Self { browser, recency }
    }
}

#[async_trait]
impl Provider for OpenTabs {
    fn kind(&self) -> SuggestionKind {
        SuggestionKind::OpenTab
    }

    async fn suggestions(&self, cx: &SearchContext) -> Result<Vec<Suggestion>> {
        let (tabs, recent) = futures::join!(self.browser.query_tabs(), self.recency.recent_tabs());
        let tabs = tabs?;
        trace!(live = tabs.len(), ranked = recent.len(), "ordering open tabs");
        Ok(order_open_tabs(tabs, &recent, cx.tab.id)
            .into_iter()
            .filter_map(|t| {
                Some(Suggestion::OpenTab {
                    tab_id: t.id?,
                    window_id: t.window_id,
                    title: t.title.unwrap_or_default(),
                    url: t.url.unwrap_or_default(),
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use quickswitch_ids::WindowId;

    use super::*;

    fn tab(id: i32) -> Tab {
        Tab::new(TabId::new(id), WindowId::new(1), 0)
    }

    fn ids(tabs: &[Tab]) -> Vec<i32> {
        tabs.iter().filter_map(|t| t.id.map(TabId::get)).collect()
    }

    #[test]
    fn ranked_first_then_invoker_dropped() {
        let live = vec![tab(1), tab(2), tab(3)];
        let recent = [TabId::new(3), TabId::new(1)];
        assert_eq!(ids(&order_open_tabs(live.clone(), &recent, None)), [3, 1, 2]);
        assert_eq!(ids(&order_open_tabs(live, &recent, Some(TabId::new(3)))), [1, 2]);
    }

    #[test]
    fn unranked_keep_platform_order() {
        let live = vec![tab(5), tab(4), tab(9), tab(2)];
        let recent = [TabId::new(9)];
        assert_eq!(ids(&order_open_tabs(live, &recent, None)), [9, 5, 4, 2]);
    }

    #[test]
    fn invoker_found_off_front() {
        let live = vec![tab(1), tab(2), tab(3)];
        let recent = [TabId::new(1), TabId::new(2)];
        assert_eq!(ids(&order_open_tabs(live, &recent, Some(TabId::new(2)))), [1, 3]);
    }

    #[test]
    fn stale_recency_entries_are_ignored() {
        let live = vec![tab(1), tab(2)];
        let recent = [TabId::new(7), TabId::new(2), TabId::new(8)];
        assert_eq!(ids(&order_open_tabs(live, &recent, None)), [2, 1]);
    }

    #[test]
    fn tabs_without_ids_are_dropped() {
        let live = vec![Tab::default(), tab(1)];
        assert_eq!(ids(&order_open_tabs(live, &[], None)), [1]);
    }
}
