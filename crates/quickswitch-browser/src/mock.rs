use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc,
        atomic::{AtomicI32, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use parking_lot::Mutex;
use quickswitch_ids::{DownloadId, GroupId, SessionId, TabId, WindowId};

use crate::{
    BookmarkNode, Browser, CreateTab, Device, DownloadItem, DownloadQuery, Error, HistoryItem,
    ReadingListEntry, Result, Session, Tab,
};

/// First id handed out to tabs created through the mock.
const FIRST_CREATED_TAB_ID: i32 = 1000;

/// Simple mock implementation for tests (enabled with `test-utils` feature).
///
/// Fixtures are returned verbatim; every call is recorded by method name and
/// can be forced to fail or stall.
#[derive(Clone)]
pub struct MockBrowser {
    calls: Arc<Mutex<Vec<String>>>,
    tabs: Arc<Mutex<Vec<Tab>>>,
    closed: Arc<Mutex<Vec<Session>>>,
    devices: Arc<Mutex<Vec<Device>>>,
    bookmarks: Arc<Mutex<Vec<BookmarkNode>>>,
    reading_list: Arc<Mutex<Vec<ReadingListEntry>>>,
    history: Arc<Mutex<Vec<HistoryItem>>>,
    downloads: Arc<Mutex<Vec<DownloadItem>>>,
    created: Arc<Mutex<Vec<CreateTab>>>,
    grouped: Arc<Mutex<Vec<(GroupId, Vec<TabId>)>>>,
    failing: Arc<Mutex<HashSet<String>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
    next_tab_id: Arc<AtomicI32>,
}

impl Default for MockBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBrowser {
    /// Empty browser with no tabs and no scripted failures.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            tabs: Arc::new(Mutex::new(Vec::new())),
            closed: Arc::new(Mutex::new(Vec::new())),
            devices: Arc::new(Mutex::new(Vec::new())),
            bookmarks: Arc::new(Mutex::new(Vec::new())),
            reading_list: Arc::new(Mutex::new(Vec::new())),
            history: Arc::new(Mutex::new(Vec::new())),
            downloads: Arc::new(Mutex::new(Vec::new())),
            created: Arc::new(Mutex::new(Vec::new())),
            grouped: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(Mutex::new(HashSet::new())),
            delays: Arc::new(Mutex::new(HashMap::new())),
            next_tab_id: Arc::new(AtomicI32::new(FIRST_CREATED_TAB_ID)),
        }
    }
    pub fn set_tabs(&self, tabs: Vec<Tab>) {
        *self.tabs.lock() = tabs;
    }
    pub fn set_recently_closed(&self, sessions: Vec<Session>) {
        *self.closed.lock() = sessions;
    }
    pub fn set_devices(&self, devices: Vec<Device>) {
        *self.devices.lock() = devices;
    }
    pub fn set_bookmarks(&self, roots: Vec<BookmarkNode>) {
        *self.bookmarks.lock() = roots;
    }
    pub fn set_reading_list(&self, entries: Vec<ReadingListEntry>) {
        *self.reading_list.lock() = entries;
    }
    pub fn set_history(&self, items: Vec<HistoryItem>) {
        *self.history.lock() = items;
    }
    pub fn set_downloads(&self, items: Vec<DownloadItem>) {
        *self.downloads.lock() = items;
    }
    /// Make every call to `method` fail.
    pub fn set_fail(&self, method: &str, v: bool) {
        let mut g = self.failing.lock();
        if v {
            g.insert(method.to_string());
        } else {
            g.remove(method);
        }
    }
    /// Delay every call to `method` by `delay` before answering.
    pub fn set_delay(&self, method: &str, delay: Duration) {
        self.delays.lock().insert(method.to_string(), delay);
    }
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
    pub fn calls_contains(&self, s: &str) -> bool {
        self.calls.lock().iter().any(|x| x == s)
    }
    /// Creation requests seen so far, in order.
    pub fn created(&self) -> Vec<CreateTab> {
        self.created.lock().clone()
    }
    /// Grouping requests seen so far, in order.
    pub fn grouped(&self) -> Vec<(GroupId, Vec<TabId>)> {
        self.grouped.lock().clone()
    }

    async fn enter(&self, method: &str, detail: String) -> Result<()> {
        let note = if detail.is_empty() {
            method.to_string()
        } else {
            format!("{method} {detail}")
        };
        self.calls.lock().push(note);
        let delay = self.delays.lock().get(method).copied();
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }
        if self.failing.lock().contains(method) {
            return Err(Error::call(method, "mock failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl Browser for MockBrowser {
    async fn query_tabs(&self) -> Result<Vec<Tab>> {
        self.enter("query_tabs", String::new()).await?;
        Ok(self.tabs.lock().clone())
    }
    async fn recently_closed(&self) -> Result<Vec<Session>> {
        self.enter("recently_closed", String::new()).await?;
        Ok(self.closed.lock().clone())
    }
    async fn devices(&self) -> Result<Vec<Device>> {
        self.enter("devices", String::new()).await?;
        Ok(self.devices.lock().clone())
    }
    async fn bookmark_tree(&self) -> Result<Vec<BookmarkNode>> {
        self.enter("bookmark_tree", String::new()).await?;
        Ok(self.bookmarks.lock().clone())
    }
    async fn reading_list(&self) -> Result<Vec<ReadingListEntry>> {
        self.enter("reading_list", String::new()).await?;
        Ok(self.reading_list.lock().clone())
    }
    async fn search_history(&self, text: &str) -> Result<Vec<HistoryItem>> {
        self.enter("search_history", text.to_string()).await?;
        let items = self.history.lock().clone();
        if text.is_empty() {
            return Ok(items);
        }
        Ok(items
            .into_iter()
            .filter(|h| {
                h.title.as_deref().is_some_and(|t| t.contains(text))
                    || h.url.as_deref().is_some_and(|u| u.contains(text))
            })
            .collect())
    }
    async fn search_downloads(&self, query: DownloadQuery) -> Result<Vec<DownloadItem>> {
        self.enter("search_downloads", String::new()).await?;
        Ok(self
            .downloads
            .lock()
            .iter()
            .filter(|d| query.matches(d))
            .cloned()
            .collect())
    }
    async fn activate_tab(&self, tab: TabId) -> Result<()> {
        self.enter("activate_tab", tab.to_string()).await
    }
    async fn focus_window(&self, window: WindowId) -> Result<()> {
        self.enter("focus_window", window.to_string()).await
    }
    async fn restore_session(&self, session: &SessionId) -> Result<()> {
        self.enter("restore_session", session.to_string()).await
    }
    async fn create_tab(&self, request: CreateTab) -> Result<Tab> {
        self.enter("create_tab", request.url.clone()).await?;
        let id = TabId::new(self.next_tab_id.fetch_add(1, Ordering::SeqCst));
        let tab = Tab {
            id: Some(id),
            window_id: request.window_id,
            index: request.index,
            active: request.active,
            url: Some(request.url.clone()),
            ..Tab::default()
        };
        self.created.lock().push(request);
        Ok(tab)
    }
    async fn group_tabs(&self, group: GroupId, tabs: &[TabId]) -> Result<()> {
        self.enter("group_tabs", group.to_string()).await?;
        self.grouped.lock().push((group, tabs.to_vec()));
        Ok(())
    }
    async fn show_download(&self, download: DownloadId) -> Result<()> {
        self.enter("show_download", download.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_active_tab_uses_query() {
        let mock = MockBrowser::new();
        let mut a = Tab::new(TabId::new(1), WindowId::new(1), 0);
        a.active = true;
        let mut b = Tab::new(TabId::new(2), WindowId::new(2), 0);
        b.active = true;
        mock.set_tabs(vec![a, b.clone()]);
        let got = mock.active_tab(WindowId::new(2)).await.unwrap();
        assert_eq!(got, Some(b));
        assert!(mock.active_tab(WindowId::new(9)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failures_are_per_method() {
        let mock = MockBrowser::new();
        mock.set_fail("devices", true);
        assert!(mock.devices().await.is_err());
        assert!(mock.recently_closed().await.is_ok());
        assert!(mock.calls_contains("devices"));
    }

    #[tokio::test]
    async fn created_tabs_get_fresh_ids() {
        let mock = MockBrowser::new();
        let req = CreateTab {
            url: "https://a.test".into(),
            window_id: WindowId::new(1),
            index: 3,
            opener_tab_id: None,
            active: true,
        };
        let t1 = mock.create_tab(req.clone()).await.unwrap();
        let t2 = mock.create_tab(req).await.unwrap();
        assert_ne!(t1.id, t2.id);
        assert_eq!(mock.created().len(), 2);
    }
}
