//! Records exchanged with the browser.
//!
//! Field names follow the browser's camelCase JSON. Anything a record may
//! legitimately omit is optional or defaulted, so a sparse record still
//! decodes; records that are unusable are dropped later by the consumer.

use quickswitch_ids::{DownloadId, GroupId, SessionId, TabId, WindowId};
use serde::{Deserialize, Serialize};

use crate::lenient::nested;

/// An open (or session-captured) browser tab.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    /// Absent for tabs that live outside the tab strip (devtools, some session records).
    #[serde(default)]
    pub id: Option<TabId>,
    #[serde(default)]
    pub window_id: WindowId,
    /// Zero-based position within the window's tab strip.
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub group_id: GroupId,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Present on tabs returned from session queries.
    #[serde(default)]
    pub session_id: Option<SessionId>,
}

impl Tab {
    /// Construct an open tab at `index` in `window`.
    pub fn new(id: TabId, window_id: WindowId, index: u32) -> Self {
        Self {
            id: Some(id),
            window_id,
            index,
            ..Self::default()
        }
    }

    /// Set the title and URL.
    #[must_use]
    pub fn with_page(mut self, title: &str, url: &str) -> Self {
        self.title = Some(title.to_string());
        self.url = Some(url.to_string());
        self
    }

    /// Place the tab in a group.
    #[must_use]
    pub fn with_group(mut self, group: GroupId) -> Self {
        self.group_id = group;
        self
    }

    /// Attach a restorable session id.
    #[must_use]
    pub fn with_session(mut self, session: SessionId) -> Self {
        self.session_id = Some(session);
        self
    }
}

/// Window captured by a session record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionWindow {
    #[serde(default)]
    pub session_id: Option<SessionId>,
    #[serde(default, deserialize_with = "nested")]
    pub tabs: Vec<Tab>,
}

/// A recently closed or synced session: either a single tab or a whole window.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Seconds since the epoch at which the session was last changed.
    #[serde(default)]
    pub last_modified: i64,
    #[serde(default)]
    pub tab: Option<Tab>,
    #[serde(default)]
    pub window: Option<SessionWindow>,
}

/// Another device signed into the same profile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub device_name: String,
    #[serde(default, deserialize_with = "nested")]
    pub sessions: Vec<Session>,
}

/// Node of the bookmark tree. Folders carry children and no URL.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkNode {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "nested")]
    pub children: Vec<BookmarkNode>,
}

impl BookmarkNode {
    /// Leaf bookmark.
    pub fn bookmark(title: &str, url: &str) -> Self {
        Self {
            title: title.to_string(),
            url: Some(url.to_string()),
            ..Self::default()
        }
    }

    /// Folder holding `children`.
    pub fn folder(title: &str, children: Vec<Self>) -> Self {
        Self {
            title: title.to_string(),
            children,
            ..Self::default()
        }
    }
}

/// Entry of the reading list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingListEntry {
    #[serde(default)]
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub has_been_read: bool,
}

/// Visited page from the history database.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Milliseconds since the epoch.
    #[serde(default)]
    pub last_visit_time: Option<f64>,
}

/// Lifecycle state of a download.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadState {
    #[default]
    InProgress,
    Interrupted,
    Complete,
}

/// Entry of the download list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadItem {
    pub id: DownloadId,
    /// Absolute local path of the downloaded file.
    #[serde(default)]
    pub filename: String,
    /// URL after all redirects.
    #[serde(default)]
    pub final_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub state: DownloadState,
    /// False once the file has been deleted from disk.
    #[serde(default)]
    pub exists: bool,
}

/// Filter for [`crate::Browser::search_downloads`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<DownloadState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exists: Option<bool>,
}

impl DownloadQuery {
    /// Finished downloads whose file is still on disk.
    pub fn completed() -> Self {
        Self {
            state: Some(DownloadState::Complete),
            exists: Some(true),
        }
    }

    /// Whether `item` passes this filter.
    pub fn matches(&self, item: &DownloadItem) -> bool {
        self.state.is_none_or(|s| s == item.state) && self.exists.is_none_or(|e| e == item.exists)
    }
}

/// Parameters for [`crate::Browser::create_tab`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTab {
    pub url: String,
    pub window_id: WindowId,
    pub index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opener_tab_id: Option<TabId>,
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_tab_decodes_with_defaults() {
        let tab: Tab = serde_json::from_str(r#"{"id": 4, "windowId": 2}"#).unwrap();
        assert_eq!(tab.id, Some(TabId::new(4)));
        assert_eq!(tab.index, 0);
        assert!(tab.group_id.is_none());
        assert!(tab.title.is_none());
    }

    #[test]
    fn download_query_filters() {
        let mut item = DownloadItem {
            id: DownloadId::new(1),
            filename: "/tmp/a.pdf".into(),
            final_url: None,
            url: None,
            state: DownloadState::Complete,
            exists: true,
        };
        let q = DownloadQuery::completed();
        assert!(q.matches(&item));
        item.exists = false;
        assert!(!q.matches(&item));
        assert!(DownloadQuery::default().matches(&item));
    }

    #[test]
    fn download_state_wire_names() {
        let s: DownloadState = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(s, DownloadState::InProgress);
    }
}
