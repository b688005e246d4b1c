use std::{io, result::Result as StdResult};

use thiserror::Error;

/// Result alias for protocol operations.
pub type Result<T> = StdResult<T, Error>;

/// Errors from framing or naming protocol messages.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing the underlying stream failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A message body could not be encoded as JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A frame exceeds the size allowed in its direction.
    #[error("frame of {len} bytes exceeds limit of {max} bytes")]
    FrameTooLarge {
        /// Body length in bytes.
        len: usize,
        /// Limit for this direction.
        max: usize,
    },

    /// A suggestion kind or search mode name was not recognised.
    #[error("unknown suggestion kind: {0:?}")]
    UnknownKind(String),
}
