use std::{io, result::Result as StdResult, string::FromUtf8Error};

use thiserror::Error;

/// Convenient result type for picker invocations.
pub type Result<T> = StdResult<T, Error>;

/// Failure of a picker invocation.
#[derive(Debug, Error)]
pub enum Error {
    /// The picker program could not be started.
    #[error("failed to start picker `{command}`: {source}")]
    Spawn {
        /// Program that was run.
        command: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O failure talking to the picker.
    #[error("picker I/O error: {0}")]
    Io(#[from] io::Error),

    /// The picker exited unsuccessfully.
    #[error("picker `{command}` exited with {}", .code.map_or_else(|| "a signal".to_string(), |c| format!("status {c}")))]
    Exit {
        /// Program that was run.
        command: String,
        /// Exit code, `None` when killed by a signal.
        code: Option<i32>,
    },

    /// The picker wrote something that is not UTF-8.
    #[error("picker output is not UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}
