//! [`Browser`] implemented over the native-messaging pipe.
//!
//! Each call becomes an [`Outbound::Request`] carrying the browser API name
//! and its positional arguments; the extension performs the call and answers
//! with an `Inbound::Response` bearing the same id.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;
use parking_lot::Mutex;
use quickswitch_browser::{
    BookmarkNode, Browser, CreateTab, Device, DownloadItem, DownloadQuery, Error, HistoryItem,
    ReadingListEntry, Result, Session, Tab, decode_records,
};
use quickswitch_ids::{DownloadId, GroupId, SessionId, TabId, WindowId};
use quickswitch_protocol::{Outbound, method};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace, warn};

/// A request awaiting its response.
struct PendingCall {
    method: &'static str,
    respond: oneshot::Sender<Result<Value>>,
}

#[derive(Default)]
struct Pending {
    calls: HashMap<u64, PendingCall>,
    closed: bool,
}

/// Browser reached through request/response frames.
pub struct RemoteBrowser {
    out: mpsc::UnboundedSender<Outbound>,
    pending: Mutex<Pending>,
    next_id: AtomicU64,
}

impl RemoteBrowser {
    /// Browser whose requests are queued on `out`.
    pub fn new(out: mpsc::UnboundedSender<Outbound>) -> Self {
        Self {
            out,
            pending: Mutex::new(Pending::default()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of calls still waiting for a response.
    pub fn in_flight(&self) -> usize {
        self.pending.lock().calls.len()
    }

    /// Issue `method` with `params` and wait for the answer.
    async fn call(&self, method: &'static str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock();
            if pending.closed {
                return Err(Error::Disconnected);
            }
            pending.calls.insert(
                id,
                PendingCall {
                    method,
                    respond: tx,
                },
            );
        }
        trace!(id, method, "request");
        let request = Outbound::Request {
            id,
            method: method.to_string(),
            params,
        };
        if self.out.send(request).is_err() {
            self.pending.lock().calls.remove(&id);
            return Err(Error::Disconnected);
        }
        rx.await.unwrap_or(Err(Error::Disconnected))
    }

    async fn call_records<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Value,
    ) -> Result<Vec<T>> {
        let value = self.call(method, params).await?;
        decode_records(method, value)
    }

    /// Complete the request `id` with the extension's answer.
    pub fn resolve(&self, id: u64, result: Option<Value>, error: Option<String>) {
        let Some(call) = self.pending.lock().calls.remove(&id) else {
            warn!(id, "response for unknown request");
            return;
        };
        let outcome = match error {
            Some(message) => Err(Error::call(call.method, message)),
            None => Ok(result.unwrap_or(Value::Null)),
        };
        // The caller may have given up (e.g. a provider deadline passed).
        if call.respond.send(outcome).is_err() {
            debug!(id, method = call.method, "response arrived after caller left");
        }
    }

    /// Fail every pending and future call with [`Error::Disconnected`].
    pub fn close(&self) {
        let drained: Vec<PendingCall> = {
            let mut pending = self.pending.lock();
            pending.closed = true;
            pending.calls.drain().map(|(_, call)| call).collect()
        };
        if !drained.is_empty() {
            debug!(count = drained.len(), "failing pending requests");
        }
        for call in drained {
            let _ = call.respond.send(Err(Error::Disconnected));
        }
    }
}

#[async_trait]
impl Browser for RemoteBrowser {
    async fn query_tabs(&self) -> Result<Vec<Tab>> {
        self.call_records(method::TABS_QUERY, json!([{}])).await
    }

    async fn active_tab(&self, window: WindowId) -> Result<Option<Tab>> {
        let tabs: Vec<Tab> = self
            .call_records(
                method::TABS_QUERY,
                json!([{ "active": true, "windowId": window }]),
            )
            .await?;
        Ok(tabs.into_iter().find(|t| t.window_id == window))
    }

    async fn recently_closed(&self) -> Result<Vec<Session>> {
        self.call_records(method::SESSIONS_RECENTLY_CLOSED, json!([]))
            .await
    }

    async fn devices(&self) -> Result<Vec<Device>> {
        self.call_records(method::SESSIONS_DEVICES, json!([])).await
    }

    async fn bookmark_tree(&self) -> Result<Vec<BookmarkNode>> {
        self.call_records(method::BOOKMARKS_TREE, json!([])).await
    }

    async fn reading_list(&self) -> Result<Vec<ReadingListEntry>> {
        self.call_records(method::READING_LIST_QUERY, json!([{}]))
            .await
    }

    async fn search_history(&self, text: &str) -> Result<Vec<HistoryItem>> {
        self.call_records(method::HISTORY_SEARCH, json!([{ "text": text }]))
            .await
    }

    async fn search_downloads(&self, query: DownloadQuery) -> Result<Vec<DownloadItem>> {
        self.call_records(method::DOWNLOADS_SEARCH, json!([query]))
            .await
    }

    async fn activate_tab(&self, tab: TabId) -> Result<()> {
        self.call(method::TABS_UPDATE, json!([tab, { "active": true }]))
            .await
            .map(drop)
    }

    async fn focus_window(&self, window: WindowId) -> Result<()> {
        self.call(method::WINDOWS_UPDATE, json!([window, { "focused": true }]))
            .await
            .map(drop)
    }

    async fn restore_session(&self, session: &SessionId) -> Result<()> {
        self.call(method::SESSIONS_RESTORE, json!([session]))
            .await
            .map(drop)
    }

    async fn create_tab(&self, request: CreateTab) -> Result<Tab> {
        let value = self.call(method::TABS_CREATE, json!([request])).await?;
        serde_json::from_value(value).map_err(|source| Error::Decode {
            method: method::TABS_CREATE.to_string(),
            source,
        })
    }

    async fn group_tabs(&self, group: GroupId, tabs: &[TabId]) -> Result<()> {
        self.call(
            method::TABS_GROUP,
            json!([{ "groupId": group, "tabIds": tabs }]),
        )
        .await
        .map(drop)
    }

    async fn show_download(&self, download: DownloadId) -> Result<()> {
        self.call(method::DOWNLOADS_SHOW, json!([download]))
            .await
            .map(drop)
    }
}
