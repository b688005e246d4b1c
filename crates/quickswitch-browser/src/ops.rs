use async_trait::async_trait;
use quickswitch_ids::{DownloadId, GroupId, SessionId, TabId, WindowId};

use crate::{
    BookmarkNode, CreateTab, Device, DownloadItem, DownloadQuery, HistoryItem, ReadingListEntry,
    Result, Session, Tab,
};

/// Trait abstraction over browser operations to improve testability.
///
/// Queries return whatever the browser reports, in the browser's order.
/// Activation calls resolve once the browser has applied the change.
#[async_trait]
pub trait Browser: Send + Sync {
    /// All open tabs across all windows.
    async fn query_tabs(&self) -> Result<Vec<Tab>>;

    /// The active tab of `window`, if the window still exists.
    async fn active_tab(&self, window: WindowId) -> Result<Option<Tab>> {
        Ok(self
            .query_tabs()
            .await?
            .into_iter()
            .find(|t| t.active && t.window_id == window))
    }

    /// Recently closed tabs and windows, most recent first.
    async fn recently_closed(&self) -> Result<Vec<Session>>;

    /// Sessions from other devices signed into the same profile.
    async fn devices(&self) -> Result<Vec<Device>>;

    /// Roots of the bookmark tree.
    async fn bookmark_tree(&self) -> Result<Vec<BookmarkNode>>;

    /// Reading-list entries.
    async fn reading_list(&self) -> Result<Vec<ReadingListEntry>>;

    /// History entries matching `text`; an empty string matches everything.
    async fn search_history(&self, text: &str) -> Result<Vec<HistoryItem>>;

    /// Downloads matching `query`.
    async fn search_downloads(&self, query: DownloadQuery) -> Result<Vec<DownloadItem>>;

    /// Make `tab` the active tab of its window.
    async fn activate_tab(&self, tab: TabId) -> Result<()>;

    /// Raise and focus `window`.
    async fn focus_window(&self, window: WindowId) -> Result<()>;

    /// Reopen a recently closed or synced session.
    async fn restore_session(&self, session: &SessionId) -> Result<()>;

    /// Open a new tab, returning the created tab.
    async fn create_tab(&self, request: CreateTab) -> Result<Tab>;

    /// Add `tabs` to an existing group.
    async fn group_tabs(&self, group: GroupId, tabs: &[TabId]) -> Result<()>;

    /// Reveal a finished download in the file manager.
    async fn show_download(&self, download: DownloadId) -> Result<()>;
}
