//! Messages exchanged between the browser extension and the host.

use std::{fmt, str::FromStr};

use quickswitch_browser::Tab;
use quickswitch_ids::{TabId, WindowId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, SuggestionKind};

/// Browser API names used in [`Outbound::Request`].
pub mod method {
    pub const TABS_QUERY: &str = "tabs.query";
    pub const TABS_UPDATE: &str = "tabs.update";
    pub const TABS_CREATE: &str = "tabs.create";
    pub const TABS_GROUP: &str = "tabs.group";
    pub const WINDOWS_UPDATE: &str = "windows.update";
    pub const SESSIONS_RECENTLY_CLOSED: &str = "sessions.getRecentlyClosed";
    pub const SESSIONS_DEVICES: &str = "sessions.getDevices";
    pub const SESSIONS_RESTORE: &str = "sessions.restore";
    pub const BOOKMARKS_TREE: &str = "bookmarks.getTree";
    pub const READING_LIST_QUERY: &str = "readingList.query";
    pub const HISTORY_SEARCH: &str = "history.search";
    pub const DOWNLOADS_SEARCH: &str = "downloads.search";
    pub const DOWNLOADS_SHOW: &str = "downloads.show";
}

/// Which providers a search consults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SearchMode {
    /// Every enabled provider.
    #[default]
    Combined,
    /// A single provider.
    Only(SuggestionKind),
}

impl SearchMode {
    /// Whether `kind` takes part in a search in this mode.
    pub fn includes(self, kind: SuggestionKind) -> bool {
        match self {
            Self::Combined => true,
            Self::Only(k) => k == kind,
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Combined => f.write_str("combined"),
            Self::Only(kind) => kind.fmt(f),
        }
    }
}

impl FromStr for SearchMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "combined" {
            return Ok(Self::Combined);
        }
        s.parse().map(Self::Only)
    }
}

impl TryFrom<String> for SearchMode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SearchMode> for String {
    fn from(value: SearchMode) -> Self {
        value.to_string()
    }
}

/// Messages sent from the browser to the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Inbound {
    /// The extension's background worker started.
    Startup,
    /// The background worker is about to be suspended.
    Suspend,
    TabActivated {
        tab_id: TabId,
        window_id: WindowId,
    },
    TabRemoved {
        tab_id: TabId,
    },
    TabReplaced {
        added_tab_id: TabId,
        removed_tab_id: TabId,
    },
    /// Carries [`WindowId::NONE`] when every browser window lost focus.
    WindowFocusChanged {
        window_id: WindowId,
    },
    /// The user invoked the switcher from `tab`.
    Action {
        tab: Tab,
        #[serde(default)]
        mode: SearchMode,
        #[serde(default)]
        query: Option<String>,
    },
    /// A named long-lived channel was opened.
    Connect {
        name: String,
    },
    /// The picker options changed in extension storage.
    PickerChanged {
        command: String,
        #[serde(default)]
        args: Vec<String>,
    },
    /// Answer to an [`Outbound::Request`].
    Response {
        id: u64,
        #[serde(default)]
        result: Option<Value>,
        #[serde(default)]
        error: Option<String>,
    },
}

/// Messages sent from the host to the browser.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Outbound {
    /// Ask the extension to call a browser API.
    Request {
        id: u64,
        method: String,
        params: Value,
    },
    /// Report a problem to the extension.
    Error {
        message: String,
    },
    /// Current picker options, sent to an `options` channel.
    Options {
        command: String,
        args: Vec<String>,
    },
    /// Outcome of a search → pick → activate cycle.
    CycleFinished {
        selected: usize,
        activated: usize,
        failed: usize,
    },
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn inbound_events_decode() {
        let m: Inbound =
            serde_json::from_value(json!({"type": "tabActivated", "tabId": 4, "windowId": 1}))
                .unwrap();
        assert_eq!(
            m,
            Inbound::TabActivated {
                tab_id: TabId::new(4),
                window_id: WindowId::new(1)
            }
        );
        let m: Inbound = serde_json::from_value(json!({"type": "startup"})).unwrap();
        assert_eq!(m, Inbound::Startup);
    }

    #[test]
    fn action_defaults_to_combined() {
        let m: Inbound = serde_json::from_value(json!({
            "type": "action",
            "tab": {"id": 3, "windowId": 1, "index": 2}
        }))
        .unwrap();
        let Inbound::Action { mode, query, tab } = m else {
            panic!("expected action");
        };
        assert_eq!(mode, SearchMode::Combined);
        assert_eq!(query, None);
        assert_eq!(tab.index, 2);
    }

    #[test]
    fn search_mode_names() {
        assert_eq!("combined".parse::<SearchMode>().unwrap(), SearchMode::Combined);
        assert_eq!(
            "history".parse::<SearchMode>().unwrap(),
            SearchMode::Only(SuggestionKind::History)
        );
        assert!("everything".parse::<SearchMode>().is_err());
        let v = serde_json::to_value(SearchMode::Only(SuggestionKind::OpenTab)).unwrap();
        assert_eq!(v, json!("openTab"));
    }

    #[test]
    fn outbound_request_shape() {
        let v = serde_json::to_value(Outbound::Request {
            id: 7,
            method: method::TABS_QUERY.into(),
            params: json!({}),
        })
        .unwrap();
        assert_eq!(v, json!({"type": "request", "id": 7, "method": "tabs.query", "params": {}}));
    }
}
