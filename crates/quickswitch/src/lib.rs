//! The quickswitch native-messaging host.
//!
//! The browser extension launches this process and talks to it over
//! stdin/stdout with length-prefixed JSON frames. The host keeps the
//! most-recently-used tab list, answers switcher requests by gathering
//! suggestions and handing them to an external picker, and drives the
//! browser through requests that the extension carries out.
#![allow(missing_docs)]

mod error;
pub mod host;
pub mod remote;

pub use error::{Error, Result};
pub use host::{Host, HostOptions, run};
pub use remote::RemoteBrowser;
