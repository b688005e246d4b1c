//! Durable snapshot of the recency list.
//!
//! The snapshot is a cache: it is written when the host is about to be torn
//! down and read once at startup. There is no schema version; anything that
//! does not parse is treated as absent by [`crate::RecencyTracker::restore`].

use std::{
    io::{self, ErrorKind},
    path::PathBuf,
};

use async_trait::async_trait;
use parking_lot::Mutex;
use quickswitch_ids::TabId;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::{Error, Result};

/// Key under which the list is stored.
pub const RECENT_TABS_KEY: &str = "recentTabs";

/// Durable storage for the recency list.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the last saved list, or `None` if nothing was saved.
    async fn load(&self) -> Result<Option<Vec<TabId>>>;

    /// Persist `recent`, replacing any previous snapshot.
    async fn save(&self, recent: &[TabId]) -> Result<()>;
}

/// On-disk layout.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    #[serde(rename = "recentTabs")]
    recent_tabs: Vec<TabId>,
}

/// JSON file store. Writes go to a sibling temp file and are renamed into place.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn io_err(&self, source: io::Error) -> Error {
        Error::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn load(&self) -> Result<Option<Vec<TabId>>> {
        let bytes = match fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_err(e)),
        };
        let snap: Snapshot = serde_json::from_slice(&bytes).map_err(|source| Error::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(snap.recent_tabs))
    }

    async fn save(&self, recent: &[TabId]) -> Result<()> {
        let body = serde_json::to_vec(&Snapshot {
            recent_tabs: recent.to_vec(),
        })
        .map_err(Error::Encode)?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_err(e))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).await.map_err(|e| self.io_err(e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_err(e))?;
        debug!(path = %self.path.display(), tabs = recent.len(), "recency saved");
        Ok(())
    }
}

/// In-memory store for tests and runs without a state path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: Mutex<Option<Vec<TabId>>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `recent`.
    pub fn with(recent: Vec<TabId>) -> Self {
        Self {
            saved: Mutex::new(Some(recent)),
        }
    }

    /// Current contents.
    pub fn contents(&self) -> Option<Vec<TabId>> {
        self.saved.lock().clone()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load(&self) -> Result<Option<Vec<TabId>>> {
        Ok(self.saved.lock().clone())
    }

    async fn save(&self, recent: &[TabId]) -> Result<()> {
        *self.saved.lock() = Some(recent.to_vec());
        Ok(())
    }
}
