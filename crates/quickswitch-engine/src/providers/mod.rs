//! Suggestion providers: one per data source.
//!
//! A provider turns a single browser query into a batch of [`Suggestion`]s.
//! Providers share nothing mutable; the open-tab provider reads a recency
//! snapshot and nothing else.

use std::sync::Arc;

use async_trait::async_trait;
use quickswitch_browser::{Browser, Tab};
use quickswitch_protocol::{Suggestion, SuggestionKind};
use quickswitch_recency::RecencyView;

use crate::Result;

mod library;
mod sessions;
mod tabs;

pub use library::{Bookmarks, Downloads, History, ReadingList, download_title};
pub use sessions::{ClosedTabs, SyncedTabs};
pub use tabs::{OpenTabs, order_open_tabs};

/// What a search was invoked with.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchContext {
    /// Tab the user invoked the switcher from.
    pub tab: Tab,
    /// Free-text query. Only history search consumes it.
    pub query: Option<String>,
}

impl SearchContext {
    /// Context for a search started from `tab`.
    pub fn new(tab: Tab) -> Self {
        Self { tab, query: None }
    }

    /// Attach a query.
    pub fn with_query(mut self, query: Option<String>) -> Self {
        self.query = query;
        self
    }
}

/// A source of suggestions.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Which kind of suggestion this provider yields.
    fn kind(&self) -> SuggestionKind;

    /// Produce one batch of suggestions. An empty source is an empty batch.
    async fn suggestions(&self, cx: &SearchContext) -> Result<Vec<Suggestion>>;
}

/// Every built-in provider, in the fixed merge order.
pub fn default_providers(
    browser: Arc<dyn Browser>,
    recency: Arc<dyn RecencyView>,
) -> Vec<Arc<dyn Provider>> {
    vec![
        Arc::new(OpenTabs::new(browser.clone(), recency)),
        Arc::new(ClosedTabs::new(browser.clone())),
        Arc::new(SyncedTabs::new(browser.clone())),
        Arc::new(Bookmarks::new(browser.clone())),
        Arc::new(ReadingList::new(browser.clone())),
        Arc::new(History::new(browser.clone())),
        Arc::new(Downloads::new(browser)),
    ]
}

#[cfg(test)]
mod tests {
    use quickswitch_browser::MockBrowser;
    use quickswitch_ids::TabId;

    use super::*;

    struct NoRecency;

    #[async_trait]
    impl RecencyView for NoRecency {
        async fn recent_tabs(&self) -> Vec<TabId> {
            Vec::new()
        }
    }

    #[test]
    fn defaults_follow_fixed_order() {
        let providers = default_providers(Arc::new(MockBrowser::new()), Arc::new(NoRecency));
        let kinds: Vec<_> = providers.iter().map(|p| p.kind()).collect();
        assert_eq!(kinds, SuggestionKind::ALL.to_vec());
    }
}
