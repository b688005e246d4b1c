use std::{result::Result as StdResult, time::Duration};

use quickswitch_protocol::SuggestionKind;
use thiserror::Error;

/// Convenient result type for the engine crate.
pub type Result<T> = StdResult<T, Error>;

/// Unified error type for the quickswitch engine.
#[derive(Debug, Error)]
pub enum Error {
    /// A browser call failed.
    #[error("Browser error: {0}")]
    Browser(#[from] quickswitch_browser::Error),

    /// The picker could not be run or failed.
    #[error("Picker error: {0}")]
    Picker(#[from] quickswitch_picker::Error),

    /// A provider did not answer in time.
    #[error("{kind} provider timed out after {after:?}")]
    Timeout {
        /// Provider that stalled.
        kind: SuggestionKind,
        /// Deadline that elapsed.
        after: Duration,
    },
}
