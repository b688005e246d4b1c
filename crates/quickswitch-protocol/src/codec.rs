//! Native-messaging framing: a `u32` native-endian length, then a JSON body.

use std::{fmt, marker::PhantomData, result::Result as StdResult};

use bytes::{Buf, BufMut, BytesMut};
use serde::{Serialize, de::DeserializeOwned};
use tokio_util::codec::{Decoder, Encoder};

use crate::{Error, Inbound, Outbound, Result};

/// Largest message the browser will deliver to a host.
pub const MAX_FROM_BROWSER: usize = 64 * 1024 * 1024;

/// Largest message the browser accepts from a host.
pub const MAX_TO_BROWSER: usize = 1024 * 1024;

/// Bytes in the length prefix.
const PREFIX: usize = 4;

/// Codec decoding `D` and encoding `E`, each direction with its own size cap.
///
/// A frame whose body is not a valid `D` decodes to `Some(Err(..))` rather
/// than failing the stream, so one bad message does not end the session.
/// Oversized frames do fail the stream.
pub struct NativeCodec<D, E> {
    max_decode: usize,
    max_encode: usize,
    _marker: PhantomData<fn() -> (D, E)>,
}

/// Codec for the host side of the pipe.
pub type HostCodec = NativeCodec<Inbound, Outbound>;

/// Codec for the extension side of the pipe.
pub type BrowserCodec = NativeCodec<Outbound, Inbound>;

/// Host-side codec with the browser's size limits.
pub fn host_codec() -> HostCodec {
    NativeCodec::new(MAX_FROM_BROWSER, MAX_TO_BROWSER)
}

/// Extension-side codec, the mirror of [`host_codec`].
pub fn browser_codec() -> BrowserCodec {
    NativeCodec::new(MAX_TO_BROWSER, MAX_FROM_BROWSER)
}

impl<D, E> NativeCodec<D, E> {
    /// Codec with explicit per-direction body limits.
    pub fn new(max_decode: usize, max_encode: usize) -> Self {
        Self {
            max_decode,
            max_encode,
            _marker: PhantomData,
        }
    }
}

impl<D, E> Clone for NativeCodec<D, E> {
    fn clone(&self) -> Self {
        Self::new(self.max_decode, self.max_encode)
    }
}

impl<D, E> fmt::Debug for NativeCodec<D, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeCodec")
            .field("max_decode", &self.max_decode)
            .field("max_encode", &self.max_encode)
            .finish()
    }
}

impl<D: DeserializeOwned, E> Decoder for NativeCodec<D, E> {
    type Item = StdResult<D, serde_json::Error>;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        if src.len() < PREFIX {
            return Ok(None);
        }
        let mut prefix = [0u8; PREFIX];
        prefix.copy_from_slice(&src[..PREFIX]);
        let len = u32::from_ne_bytes(prefix) as usize;
        if len > self.max_decode {
            return Err(Error::FrameTooLarge {
                len,
                max: self.max_decode,
            });
        }
        let total = PREFIX + len;
        if src.len() < total {
            src.reserve(total - src.len());
            return Ok(None);
        }
        src.advance(PREFIX);
        let body = src.split_to(len);
        Ok(Some(serde_json::from_slice(&body)))
    }
}

impl<D, E: Serialize> Encoder<E> for NativeCodec<D, E> {
    type Error = Error;

    fn encode(&mut self, item: E, dst: &mut BytesMut) -> Result<()> {
        let body = serde_json::to_vec(&item)?;
        let too_large = || Error::FrameTooLarge {
            len: body.len(),
            max: self.max_encode,
        };
        if body.len() > self.max_encode {
            return Err(too_large());
        }
        let len = u32::try_from(body.len()).map_err(|_| too_large())?;
        dst.reserve(PREFIX + body.len());
        dst.put_slice(&len.to_ne_bytes());
        dst.put_slice(&body);
        Ok(())
    }
}
