//! quickswitch engine
//!
//! The engine coordinates one switcher invocation:
//! - fans a search out to every applicable [`Provider`] concurrently
//! - merges their batches in the fixed provider order
//! - renders the merged list through a [`LabelTemplate`] and hands it to a picker
//! - activates each picked [`Suggestion`] with the browser call its kind needs
//!
//! Providers are isolated from one another: each runs under its own deadline,
//! and a failed or stalled provider contributes nothing instead of sinking
//! the search.
use std::{sync::Arc, time::Duration};

use futures::future::join_all;
use quickswitch_browser::{Browser, CreateTab, Error as BrowserError, Tab};
use quickswitch_picker::{Picker, pick_items};
use tokio::time;
use tracing::{debug, info, trace, warn};

mod error;
mod label;
pub mod providers;

pub use error::{Error, Result};
pub use label::{DEFAULT_TEMPLATE, LabelTemplate};
pub use providers::{
    Bookmarks, ClosedTabs, Downloads, History, OpenTabs, Provider, ReadingList, SearchContext,
    SyncedTabs, default_providers, download_title, order_open_tabs,
};
pub use quickswitch_protocol::{SearchMode, Suggestion, SuggestionKind};

/// Deadline applied to each provider when none is configured.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_millis(1500);

/// Parameters of a single search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Which providers to consult.
    pub mode: SearchMode,
    /// Free-text query, consumed by history search only.
    pub query: Option<String>,
}

/// Merged output of one search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchResult {
    /// Suggestions in provider order, then each provider's own order.
    pub suggestions: Vec<Suggestion>,
    /// Providers that failed or timed out and contributed nothing.
    pub failed: Vec<SuggestionKind>,
}

/// Outcome of a search → pick → activate cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Items the user picked.
    pub selected: usize,
    /// Picks that were activated.
    pub activated: usize,
    /// Picks whose activation failed.
    pub failed: usize,
}

/// Search aggregation and activation over a [`Browser`].
///
/// Cheap to clone; clones share the browser and providers.
#[derive(Clone)]
pub struct Engine {
    /// Browser used for activation calls.
    browser: Arc<dyn Browser>,
    /// Providers, sorted into the fixed merge order.
    providers: Arc<[Arc<dyn Provider>]>,
    /// Per-provider deadline.
    timeout: Duration,
}

impl Engine {
    /// Create an engine over `providers`.
    ///
    /// Providers are stably sorted by kind, so results always merge in
    /// [`SuggestionKind::ALL`] order regardless of registration order.
    pub fn new(browser: Arc<dyn Browser>, mut providers: Vec<Arc<dyn Provider>>) -> Self {
        providers.sort_by_key(|p| p.kind());
        Self {
            browser,
            providers: providers.into(),
            timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    /// Replace the per-provider deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Per-provider deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Kinds of the registered providers, in merge order.
    pub fn kinds(&self) -> Vec<SuggestionKind> {
        self.providers.iter().map(|p| p.kind()).collect()
    }

    /// Run every provider selected by `options` concurrently and merge.
    ///
    /// Never fails as a whole: a provider that errors or misses its deadline
    /// is logged, listed in [`SearchResult::failed`] and contributes nothing.
    pub async fn search(&self, tab: &Tab, options: &SearchOptions) -> SearchResult {
        let cx = SearchContext::new(tab.clone()).with_query(options.query.clone());
        let active: Vec<&Arc<dyn Provider>> = self
            .providers
            .iter()
            .filter(|p| options.mode.includes(p.kind()))
            .collect();
        debug!(mode = %options.mode, providers = active.len(), "search");

        let batches = join_all(active.iter().map(|p| self.run_provider(Arc::as_ref(p), &cx))).await;

        let mut result = SearchResult::default();
        for (provider, batch) in active.iter().zip(batches) {
            let kind = provider.kind();
            match batch {
                Ok(items) => {
                    trace!(%kind, count = items.len(), "provider batch");
                    result.suggestions.extend(items);
                }
                Err(e) => {
                    warn!(%kind, error = %e, "provider degraded to empty");
                    result.failed.push(kind);
                }
            }
        }
        result
    }

    async fn run_provider(
        &self,
        provider: &dyn Provider,
        cx: &SearchContext,
    ) -> Result<Vec<Suggestion>> {
        match time::timeout(self.timeout, provider.suggestions(cx)).await {
            Ok(batch) => batch,
            Err(_) => Err(Error::Timeout {
                kind: provider.kind(),
                after: self.timeout,
            }),
        }
    }

    /// Activate `suggestion` on behalf of the user in `opener`.
    ///
    /// Resolves once every browser call for the activation has completed.
    pub async fn activate(&self, suggestion: &Suggestion, opener: &Tab) -> Result<()> {
        debug!(kind = %suggestion.kind(), url = suggestion.url(), "activate");
        match suggestion {
            Suggestion::OpenTab {
                tab_id, window_id, ..
            } => {
                self.browser.activate_tab(*tab_id).await?;
                self.browser.focus_window(*window_id).await?;
            }
            Suggestion::ClosedTab { session_id, .. } | Suggestion::SyncedTab { session_id, .. } => {
                self.browser.restore_session(session_id).await?;
            }
            Suggestion::Bookmark { url, .. }
            | Suggestion::ReadingList { url, .. }
            | Suggestion::History { url, .. } => {
                self.open_beside(url, opener).await?;
            }
            Suggestion::Download { download_id, .. } => {
                self.browser.show_download(*download_id).await?;
            }
        }
        Ok(())
    }

    /// Open `url` in a new active tab right of `opener`, in its group if any.
    async fn open_beside(&self, url: &str, opener: &Tab) -> Result<Tab> {
        let created = self
            .browser
            .create_tab(CreateTab {
                url: url.to_string(),
                window_id: opener.window_id,
                index: opener.index + 1,
                opener_tab_id: opener.id,
                active: true,
            })
            .await?;
        if !opener.group_id.is_none() {
            let id = created.id.ok_or(BrowserError::MissingTabId)?;
            self.browser.group_tabs(opener.group_id, &[id]).await?;
        }
        Ok(created)
    }

    /// Search, let the user pick through `picker`, then activate each pick.
    ///
    /// A picker failure aborts the cycle before anything is activated.
    /// Activation failures are logged and counted; remaining picks still run.
    pub async fn run_cycle<P>(
        &self,
        tab: &Tab,
        options: &SearchOptions,
        picker: &P,
        template: &LabelTemplate,
    ) -> Result<CycleReport>
    where
        P: Picker + ?Sized,
    {
        let result = self.search(tab, options).await;
        if result.suggestions.is_empty() {
            info!("no suggestions; picker not shown");
            return Ok(CycleReport::default());
        }
        let picks = pick_items(picker, &result.suggestions, |s, i, w| {
            template.render(s, i, w)
        })
        .await?;

        let mut report = CycleReport {
            selected: picks.len(),
            ..CycleReport::default()
        };
        for pick in &picks {
            match self.activate(pick, tab).await {
                Ok(()) => report.activated += 1,
                Err(e) => {
                    warn!(kind = %pick.kind(), url = pick.url(), error = %e, "activation failed");
                    report.failed += 1;
                }
            }
        }
        info!(
            selected = report.selected,
            activated = report.activated,
            failed = report.failed,
            "cycle finished"
        );
        Ok(report)
    }
}
