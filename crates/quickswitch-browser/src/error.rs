use std::result::Result as StdResult;

use thiserror::Error;

/// Convenient result type for browser operations.
pub type Result<T> = StdResult<T, Error>;

/// Failure of a single browser call.
#[derive(Debug, Error)]
pub enum Error {
    /// The browser rejected or failed the call.
    #[error("{method} failed: {message}")]
    Call {
        /// Platform method name, e.g. `tabs.query`.
        method: String,
        /// Error text reported by the browser.
        message: String,
    },

    /// The connection to the browser is gone.
    #[error("browser disconnected")]
    Disconnected,

    /// A response could not be decoded into the expected shape.
    #[error("failed to decode {method} response: {source}")]
    Decode {
        /// Platform method name.
        method: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A created tab came back without an id.
    #[error("created tab has no id")]
    MissingTabId,
}

impl Error {
    /// Shorthand for [`Error::Call`].
    pub fn call(method: &str, message: impl Into<String>) -> Self {
        Self::Call {
            method: method.to_string(),
            message: message.into(),
        }
    }
}
