//! Suggestion records produced by providers and consumed by activation.

use std::{fmt, str::FromStr};

use quickswitch_ids::{DownloadId, SessionId, TabId, WindowId};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Picker label template used when none is configured.
pub const DEFAULT_TEMPLATE: &str = "{index} {type} {title} {url}";

/// Source a suggestion came from. Also the fixed provider order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SuggestionKind {
    OpenTab,
    ClosedTab,
    SyncedTab,
    Bookmark,
    ReadingList,
    History,
    Download,
}

impl SuggestionKind {
    /// Every kind, in the order results are merged.
    pub const ALL: [Self; 7] = [
        Self::OpenTab,
        Self::ClosedTab,
        Self::SyncedTab,
        Self::Bookmark,
        Self::ReadingList,
        Self::History,
        Self::Download,
    ];

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenTab => "openTab",
            Self::ClosedTab => "closedTab",
            Self::SyncedTab => "syncedTab",
            Self::Bookmark => "bookmark",
            Self::ReadingList => "readingList",
            Self::History => "history",
            Self::Download => "download",
        }
    }

    /// Text shown to the user in picker labels.
    pub fn label(self) -> &'static str {
        match self {
            Self::OpenTab => "Open tab",
            Self::ClosedTab => "Recently closed",
            Self::SyncedTab => "Synced tab",
            Self::Bookmark => "Bookmark",
            Self::ReadingList => "Reading list",
            Self::History => "History",
            Self::Download => "Download",
        }
    }
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SuggestionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| Error::UnknownKind(s.to_string()))
    }
}

/// A navigation target, tagged by where it came from.
///
/// Each variant carries what its activation needs (tab, session, URL or
/// download) plus display text. Built fresh on every search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Suggestion {
    OpenTab {
        tab_id: TabId,
        window_id: WindowId,
        title: String,
        url: String,
    },
    ClosedTab {
        session_id: SessionId,
        title: String,
        url: String,
    },
    SyncedTab {
        device_name: String,
        session_id: SessionId,
        title: String,
        url: String,
    },
    Bookmark {
        title: String,
        url: String,
    },
    ReadingList {
        title: String,
        url: String,
    },
    History {
        title: String,
        url: String,
    },
    Download {
        download_id: DownloadId,
        title: String,
        url: String,
    },
}

impl Suggestion {
    /// Source of this suggestion.
    pub fn kind(&self) -> SuggestionKind {
        match self {
            Self::OpenTab { .. } => SuggestionKind::OpenTab,
            Self::ClosedTab { .. } => SuggestionKind::ClosedTab,
            Self::SyncedTab { .. } => SuggestionKind::SyncedTab,
            Self::Bookmark { .. } => SuggestionKind::Bookmark,
            Self::ReadingList { .. } => SuggestionKind::ReadingList,
            Self::History { .. } => SuggestionKind::History,
            Self::Download { .. } => SuggestionKind::Download,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::OpenTab { title, .. }
            | Self::ClosedTab { title, .. }
            | Self::SyncedTab { title, .. }
            | Self::Bookmark { title, .. }
            | Self::ReadingList { title, .. }
            | Self::History { title, .. }
            | Self::Download { title, .. } => title,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::OpenTab { url, .. }
            | Self::ClosedTab { url, .. }
            | Self::SyncedTab { url, .. }
            | Self::Bookmark { url, .. }
            | Self::ReadingList { url, .. }
            | Self::History { url, .. }
            | Self::Download { url, .. } => url,
        }
    }

    /// Originating device, for synced tabs.
    pub fn device_name(&self) -> Option<&str> {
        match self {
            Self::SyncedTab { device_name, .. } => Some(device_name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_round_trip_by_name() {
        for kind in SuggestionKind::ALL {
            assert_eq!(kind.as_str().parse::<SuggestionKind>().unwrap(), kind);
        }
        assert!("tab".parse::<SuggestionKind>().is_err());
    }

    #[test]
    fn suggestion_wire_shape() {
        let s = Suggestion::SyncedTab {
            device_name: "laptop".into(),
            session_id: SessionId::new("s1"),
            title: "T".into(),
            url: "https://t.test".into(),
        };
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["type"], "syncedTab");
        assert_eq!(v["deviceName"], "laptop");
        assert_eq!(v["sessionId"], "s1");
    }

    #[test]
    fn unknown_tags_are_rejected() {
        let res: Result<Suggestion, _> =
            serde_json::from_str(r#"{"type":"recentlyClosedTab","title":"x","url":"y"}"#);
        assert!(res.is_err());
    }
}
