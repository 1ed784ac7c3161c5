//! Control channel management
// (c) 2026 ftpc contributors

use std::time::Duration;

use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};
use tokio::net::TcpStream;
use tracing::{debug, info, trace};

use crate::protocol::{frame::decode_exact, Channel, Encoding};
use crate::{Error, Result};

/// How much we read when waiting for an ephemeral port number.
/// Port replies are not framed; whatever arrives in one receive is the reply.
pub const RECEIVE_BUFFER_SIZE: usize = 4096;

const STATUS_SUCCESS: &str = "1";
const STATUS_FAILURE: &str = "0";

/// The long-lived connection to the server.
///
/// Everything sent and received passes through the wire [`Encoding`].
#[derive(Debug)]
pub struct ControlChannel<S: Channel> {
    stream: S,
    encoding: Encoding,
}

impl ControlChannel<TcpStream> {
    /// Connects to the server
    pub async fn connect(
        host: &str,
        port: u16,
        encoding: Encoding,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let stream = super::ephemeral::connect(host, port, timeout).await?;
        debug!("control channel connected to {host}:{port}");
        Ok(Self::new(stream, encoding))
    }
}

impl<S: Channel> ControlChannel<S> {
    /// Wraps an existing stream
    pub fn new(stream: S, encoding: Encoding) -> Self {
        Self { stream, encoding }
    }

    /// The wire encoding in use
    #[must_use]
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Sends a command line, as typed
    pub async fn send_command_line(&mut self, line: &str) -> Result<()> {
        trace!("sending command line {line:?}");
        let wire = self.encoding.encode_str(line)?;
        self.stream.write_all(&wire).await?;
        Ok(self.stream.flush().await?)
    }

    /// Receives an ephemeral port number.
    ///
    /// This is whatever arrives in a single receive, decoded and trimmed.
    /// If that receive ends part way through a character, the rest of the character is awaited.
    pub async fn receive_port_number(&mut self) -> Result<String> {
        let mut buf = vec![0u8; RECEIVE_BUFFER_SIZE];
        let n = self.stream.read(&mut buf).await?;
        if n == 0 {
            return Err(Error::desync(
                "server closed the control channel instead of sending a port number",
            ));
        }
        buf.truncate(n);
        let ragged = n % self.encoding.unit_width();
        if ragged != 0 {
            let wanted = self.encoding.unit_width() - ragged;
            let rest = decode_exact(&mut self.stream, wanted).await?;
            if rest.len() < wanted {
                return Err(Error::desync("port number ended part way through a character"));
            }
            buf.extend(rest);
        }
        let reply = self.encoding.decode_str(&buf)?;
        let port = reply.trim_matches(|c: char| c.is_whitespace() || c == '\0');
        info!("Received ephemeral port #{port}");
        Ok(port.to_string())
    }

    /// Receives the server's verdict on an upload: `true` if it sent `1`
    pub async fn receive_status_byte(&mut self) -> Result<bool> {
        let mut raw = self.receive_unit().await?;
        if self.encoding.starts_with_bom(&raw) {
            trace!("skipping byte-order mark before status");
            raw = self.receive_unit().await?;
        }
        let status = self.encoding.decode_str(&raw)?;
        trace!("received status {status:?}");
        Ok(status == STATUS_SUCCESS)
    }

    /// Receives exactly one character
    async fn receive_unit(&mut self) -> Result<Vec<u8>> {
        let width = self.encoding.unit_width();
        let raw = decode_exact(&mut self.stream, width).await?;
        if raw.len() < width {
            return Err(Error::desync(
                "server closed the control channel instead of sending a status",
            ));
        }
        Ok(raw)
    }

    /// Tells the server whether a download succeeded
    pub async fn send_status_byte(&mut self, success: bool) -> Result<()> {
        let status = if success {
            STATUS_SUCCESS
        } else {
            STATUS_FAILURE
        };
        trace!("sending status {status}");
        let wire = self.encoding.encode_str(status)?;
        self.stream.write_all(&wire).await?;
        Ok(self.stream.flush().await?)
    }

    /// Shuts down the channel
    pub async fn close(mut self) -> Result<()> {
        debug!("closing control channel");
        self.stream.shutdown().await?;
        Ok(())
    }
}
