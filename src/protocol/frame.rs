// (c) 2026 ftpc contributors

//! Length-prefixed framing for file transfers
//!
//! # On-Wire Framing
//!
//! A frame is a header of exactly [`HEADER_DIGITS`] ASCII decimal digits, zero padded,
//! immediately followed by the payload. The header states the payload length in
//! characters (or in bytes, under [`Encoding::Binary`]).
//! Header and payload both pass through the wire [`Encoding`], so under the default
//! UTF-32 encoding the 13-character file `hello world!!` goes out as the 23 characters
//! `0000000013hello world!!`, i.e. 92 bytes.
//!
//! There is no trailer. The sender closes the ephemeral channel after one frame.

use tokio::io::{AsyncRead, AsyncReadExt as _, AsyncWrite, AsyncWriteExt as _};
use tracing::trace;

use super::Encoding;
use crate::{Error, Result};

/// Width of the frame header, in characters
pub const HEADER_DIGITS: usize = 10;

/// The largest payload length a header can express
pub const MAX_PAYLOAD_UNITS: u64 = 9_999_999_999;

/// Upper bound on the size of a single receive call
const RECEIVE_CHUNK: usize = 65_536;

/// Renders a frame header
pub fn format_header(units: u64) -> Result<String> {
    if units > MAX_PAYLOAD_UNITS {
        return Err(Error::Encoding(format!(
            "payload of {units} units is too large for a frame (limit {MAX_PAYLOAD_UNITS})"
        )));
    }
    Ok(format!("{units:0>width$}", width = HEADER_DIGITS))
}

/// Parses a frame header
pub fn parse_header(header: &str) -> Result<u64> {
    if header.len() != HEADER_DIGITS || !header.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::desync(format!("malformed frame header {header:?}")));
    }
    header
        .parse()
        .map_err(|e| Error::desync(format!("malformed frame header {header:?}: {e}")))
}

/// Wraps local content in a frame, returning the bytes to put on the wire
pub fn encode(payload: &[u8], encoding: Encoding) -> Result<Vec<u8>> {
    let (units, wire_payload) = encoding.encode_payload(payload)?;
    let mut frame = encoding.encode_str(&format_header(units)?)?;
    frame.extend_from_slice(&wire_payload);
    Ok(frame)
}

/// Receives exactly `n` bytes from the channel, unless the peer closes first.
///
/// If the peer closes early this returns whatever had arrived, which may be nothing.
/// It never returns more than `n` bytes and it never waits past a zero-length read.
pub async fn decode_exact<R>(channel: &mut R, n: usize) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut received = Vec::with_capacity(n.min(RECEIVE_CHUNK));
    let mut chunk = vec![0u8; n.min(RECEIVE_CHUNK)];
    while received.len() < n {
        let want = (n - received.len()).min(chunk.len());
        let got = channel.read(&mut chunk[..want]).await?;
        if got == 0 {
            trace!("peer closed after {} of {n} bytes", received.len());
            break;
        }
        received.extend_from_slice(&chunk[..got]);
    }
    Ok(received)
}

/// Reads one frame and returns its payload as local content.
///
/// Returns `None` if the peer closed the channel without sending anything.
/// A partial header or a short payload is a protocol error.
pub async fn read_frame<R>(channel: &mut R, encoding: Encoding) -> Result<Option<Vec<u8>>>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let width = encoding.unit_width();
    let header_len = HEADER_DIGITS * width;
    let mut raw = decode_exact(channel, header_len).await?;
    if raw.is_empty() {
        return Ok(None);
    }
    if encoding.starts_with_bom(&raw) {
        trace!("skipping byte-order mark");
        let _ = raw.drain(..width);
        raw.extend(decode_exact(channel, width).await?);
    }
    if raw.len() < header_len {
        return Err(Error::desync(format!(
            "short frame header ({} of {header_len} bytes)",
            raw.len()
        )));
    }
    let units = parse_header(&encoding.decode_str(&raw)?)?;
    trace!("frame header declares {units} units");

    let wire_len = usize::try_from(units)
        .ok()
        .and_then(|u| u.checked_mul(width))
        .ok_or_else(|| Error::desync(format!("frame of {units} units is too large")))?;
    let payload = decode_exact(channel, wire_len).await?;
    if payload.len() < wire_len {
        return Err(Error::desync(format!(
            "truncated frame: expected {wire_len} bytes, received {}",
            payload.len()
        )));
    }
    Ok(Some(encoding.decode_payload(&payload)?))
}

/// Frames local content and sends all of it.
///
/// Returns the number of bytes put on the wire, including the header.
pub async fn write_frame<W>(channel: &mut W, payload: &[u8], encoding: Encoding) -> Result<u64>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let frame = encode(payload, encoding)?;
    // write_all loops over partial sends
    channel.write_all(&frame).await?;
    channel.flush().await?;
    Ok(frame.len() as u64)
}
