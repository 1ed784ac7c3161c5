// (c) 2026 ftpc contributors

//! Common definitions shared by the control and ephemeral channel protocols
//!
//! Structured messages (at present, only the [directory listing](super::listing))
//! are encoded using [BARE] via [serde_bare].
//! They are not framed; the sender closes the ephemeral channel after the message,
//! so the receiver reads until end of stream, up to a fixed limit.
//!
//! [BARE]: https://www.ietf.org/archive/id/draft-devault-bare-11.html
//! [serde_bare]: https://docs.rs/serde_bare/latest/serde_bare/

use std::future::Future;

use serde_bare::error::Error as sbError;
use tokio::io::{AsyncRead, AsyncReadExt as _, AsyncWrite, AsyncWriteExt as _};

use crate::{Error, Result};

/////////////////////////////////////////////////////////////////////////////////////////////
// STREAM TYPEDEFS

/// Marker trait for the bidirectional byte streams we run the protocol over
pub trait Channel: AsyncRead + AsyncWrite + Send + Unpin {}
impl Channel for tokio::net::TcpStream {}

#[cfg(test)]
impl Channel for tokio::io::DuplexStream {}

/////////////////////////////////////////////////////////////////////////////////////////////
// STRUCTURED MESSAGES

/// Provides I/O functions for the structured messages in our protocol.
///
/// N.B. Message structs are not expected to override the provided implementations.
pub trait ProtocolMessage
where
    Self: serde::Serialize + serde::de::DeserializeOwned + Sync,
{
    /// Specifies an absolute limit on the wire encoding of this type.
    ///
    /// This protects against excessive memory consumption in the event of bugs or network corruption.
    const WIRE_ENCODING_LIMIT: usize = 1_048_576;

    /// Checks a size against this type's [`WIRE_ENCODING_LIMIT`](Self::WIRE_ENCODING_LIMIT)
    fn check_size(size: usize) -> Result<()> {
        if size > Self::WIRE_ENCODING_LIMIT {
            return Err(Error::desync(format!(
                "wire message size {size} was too long for {} (limit: {})",
                std::any::type_name::<Self>(),
                Self::WIRE_ENCODING_LIMIT
            )));
        }
        Ok(())
    }

    /// Creates this struct from a slice of bytes
    fn from_slice(slice: &[u8]) -> Result<Self, sbError> {
        serde_bare::from_slice(slice)
    }

    /// Serializes this struct into a vector of bytes
    fn to_vec(&self) -> Result<Vec<u8>, sbError> {
        serde_bare::to_vec(&self)
    }

    /// Deserializes this struct from an async reader, reading until the peer closes.
    ///
    /// This function checks the struct's [`WIRE_ENCODING_LIMIT`](Self::WIRE_ENCODING_LIMIT).
    fn from_reader_until_closed<R>(reader: &mut R) -> impl Future<Output = Result<Self>> + Send
    where
        R: AsyncRead + Unpin + Send,
    {
        async move {
            let mut buffer = Vec::new();
            let limit = Self::WIRE_ENCODING_LIMIT as u64 + 1;
            let _ = reader.take(limit).read_to_end(&mut buffer).await?;
            Self::check_size(buffer.len())?;
            Ok(Self::from_slice(&buffer)?)
        }
    }

    /// Serializes this struct into an async writer, without any framing
    fn to_writer_async<W>(&self, writer: &mut W) -> impl Future<Output = Result<()>> + Send
    where
        W: AsyncWrite + Unpin + Send,
    {
        async move {
            let vec = self.to_vec()?;
            Self::check_size(vec.len())?;
            writer.write_all(&vec).await?;
            Ok(writer.flush().await?)
        }
    }
}
