use std::{io, path::PathBuf, result::Result as StdResult};

use thiserror::Error;

/// Convenient result type for the recency crate.
pub type Result<T> = StdResult<T, Error>;

/// Errors reading or writing the saved recency list.
#[derive(Debug, Error)]
pub enum Error {
    /// Filesystem failure on the state file.
    #[error("state file {path:?}: {source}")]
    Io {
        /// State file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The state file exists but does not hold a recency snapshot.
    #[error("state file {path:?} is corrupt: {source}")]
    Corrupt {
        /// State file path.
        path: PathBuf,
        /// Parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// The snapshot could not be serialized.
    #[error("failed to encode recency snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    /// The tracker task has shut down.
    #[error("recency tracker stopped")]
    Stopped,
}
