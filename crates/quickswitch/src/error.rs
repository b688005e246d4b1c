use std::result::Result as StdResult;

use thiserror::Error;

/// Errors that end a host run.
#[derive(Debug, Error)]
pub enum Error {
    /// The native-messaging stream failed.
    #[error(transparent)]
    Protocol(#[from] quickswitch_protocol::Error),
}

pub type Result<T> = StdResult<T, Error>;
