//! Browser platform boundary for quickswitch.
//!
//! Everything the switcher needs from the browser goes through the
//! [`Browser`] trait: tab, session, bookmark, reading-list, history and
//! download queries, plus the handful of calls used to activate a pick.
#![allow(missing_docs)]

mod error;
mod lenient;
#[cfg(any(test, feature = "test-utils"))]
mod mock;
pub mod ops;
mod types;

pub use error::{Error, Result};
pub use lenient::decode_records;
#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockBrowser;
pub use ops::Browser;
pub use types::{
    BookmarkNode, CreateTab, Device, DownloadItem, DownloadQuery, DownloadState, HistoryItem,
    ReadingListEntry, Session, SessionWindow, Tab,
};
