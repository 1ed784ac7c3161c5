//! GET command
// (c) 2026 ftpc contributors

use tokio::io::AsyncWriteExt as _;
use tracing::info;

use super::{Direction, TransferCommand};
use crate::protocol::{frame::read_frame, Channel, Encoding};
use crate::{Error, Result};

/// Downloads one remote file over an ephemeral channel.
///
/// The local file is only created once a complete frame has arrived.
#[derive(Debug)]
pub struct Get<C: Channel> {
    channel: C,
    filename: String,
    encoding: Encoding,
}

impl<C: Channel> Get<C> {
    /// Constructor
    pub fn new(channel: C, filename: &str, encoding: Encoding) -> Self {
        Self {
            channel,
            filename: filename.to_string(),
            encoding,
        }
    }
}

impl<C: Channel> TransferCommand for Get<C> {
    /// Number of bytes written to the local file
    type Output = u64;

    fn direction(&self) -> Direction {
        Direction::Download
    }

    async fn run(self) -> Result<u64> {
        let Self {
            mut channel,
            filename,
            encoding,
        } = self;

        let payload = read_frame(&mut channel, encoding)
            .await?
            .ok_or(Error::NoDataReceived)?;
        drop(channel);
        info!("The file size is {} bytes", payload.len());

        let mut file = tokio::fs::File::create(&filename).await?;
        file.write_all(&payload).await?;
        file.flush().await?;
        Ok(payload.len() as u64)
    }
}
