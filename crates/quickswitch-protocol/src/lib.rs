//! quickswitch-protocol: suggestion types and the browser/host wire format.
//!
//! The host speaks the browser native-messaging protocol on stdio: each
//! message is a JSON document preceded by its length as a 32-bit unsigned
//! integer in native byte order. [`NativeCodec`] implements that framing for
//! `tokio_util::codec`, and [`Inbound`]/[`Outbound`] are the messages carried
//! in each direction.
#![allow(missing_docs)]

mod codec;
mod error;
mod suggestion;
mod wire;

pub use codec::{
    BrowserCodec, HostCodec, MAX_FROM_BROWSER, MAX_TO_BROWSER, NativeCodec, browser_codec,
    host_codec,
};
pub use error::{Error, Result};
pub use suggestion::{DEFAULT_TEMPLATE, Suggestion, SuggestionKind};
pub use wire::{Inbound, Outbound, SearchMode, method};
