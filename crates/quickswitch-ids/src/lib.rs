//! Shared identifiers for browser-managed objects.
#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

use std::fmt;

use serde::{Deserialize, Serialize};

/// Handle assigned by the browser to an open tab.
///
/// Unique among currently open tabs only; the browser may hand the same
/// value to a later tab once the original has closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(i32);

impl TabId {
    /// Wrap a raw browser tab id.
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw browser tab id.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

/// Handle assigned by the browser to a window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(i32);

impl WindowId {
    /// Sentinel reported when no browser window has focus.
    pub const NONE: Self = Self(-1);

    /// Wrap a raw browser window id.
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw browser window id.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// True for the "no window focused" sentinel.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }
}

impl Default for WindowId {
    fn default() -> Self {
        Self::NONE
    }
}

/// Handle for a tab group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(i32);

impl GroupId {
    /// Value carried by tabs that are not in any group.
    pub const NONE: Self = Self(-1);

    /// Wrap a raw group id.
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw group id.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// True when the tab carrying this value is ungrouped.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }
}

impl Default for GroupId {
    fn default() -> Self {
        Self::NONE
    }
}

/// Handle for an entry in the download list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DownloadId(i32);

impl DownloadId {
    /// Wrap a raw download id.
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw download id.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

/// Identifier of a restorable session (recently closed or synced from another device).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap a raw session id.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw session id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! display_raw {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        })*
    };
}

display_raw!(TabId, WindowId, GroupId, DownloadId, SessionId);

impl From<i32> for TabId {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

impl From<TabId> for i32 {
    fn from(value: TabId) -> Self {
        value.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels() {
        assert!(WindowId::NONE.is_none());
        assert!(!WindowId::new(3).is_none());
        assert!(GroupId::default().is_none());
        assert!(!GroupId::new(7).is_none());
    }

    #[test]
    fn ids_serialize_as_bare_values() {
        let tabs = vec![TabId::new(3), TabId::new(1)];
        assert_eq!(serde_json::to_string(&tabs).unwrap(), "[3,1]");
        let sid: SessionId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(sid.as_str(), "abc");
    }
}
