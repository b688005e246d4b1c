//! quickswitch-recency: most-recently-used tab ordering.
//!
//! The browser offers no "tabs in MRU order" query, so the order is rebuilt
//! from the stream of activation, removal, replacement and window-focus
//! events, and snapshotted to durable storage across host restarts.

mod actor;
mod error;
mod store;
mod tracker;

pub use actor::{Recency, RecencyHandle, RecencyView};
pub use error::{Error, Result};
pub use store::{JsonFileStore, MemoryStore, RECENT_TABS_KEY, StateStore};
pub use tracker::{RecencyTracker, TabEvent, WindowFocusState, reconcile};
