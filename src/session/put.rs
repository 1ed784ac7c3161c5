//! PUT command
// (c) 2026 ftpc contributors

use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};
use tracing::{debug, info, trace, warn};

use super::{Direction, TransferCommand};
use crate::protocol::{frame::write_frame, Channel, Encoding};
use crate::{Error, Result};

/// Uploads one local file over an ephemeral channel
#[derive(Debug)]
pub struct Put<C: Channel> {
    channel: C,
    filename: String,
    encoding: Encoding,
}

impl<C: Channel> Put<C> {
    /// Constructor
    pub fn new(channel: C, filename: &str, encoding: Encoding) -> Self {
        Self {
            channel,
            filename: filename.to_string(),
            encoding,
        }
    }
}

impl<C: Channel> TransferCommand for Put<C> {
    /// Number of payload bytes read from the local file and sent
    type Output = u64;

    fn direction(&self) -> Direction {
        Direction::Upload
    }

    async fn run(self) -> Result<u64> {
        let Self {
            mut channel,
            filename,
            encoding,
        } = self;

        let mut file = match tokio::fs::File::open(&filename).await {
            Ok(f) => f,
            Err(source) => {
                // The server has no way to learn of this. It sees the channel close with no
                // frame, and may still send a status on the control channel.
                warn!("{filename}: cannot open, abandoning upload with nothing sent");
                if let Err(e) = channel.shutdown().await {
                    trace!("ephemeral shutdown: {e}");
                }
                return Err(Error::FileOpen {
                    path: filename,
                    source,
                });
            }
        };

        let mut content = Vec::new();
        let _ = file.read_to_end(&mut content).await?;
        drop(file);

        if content.is_empty() {
            debug!("{filename} is empty, sending no frame");
        } else {
            let wire = write_frame(&mut channel, &content, encoding).await?;
            info!("Sent {wire} bytes");
            debug!("{filename}: {} payload bytes", content.len());
        }
        channel.shutdown().await?;
        Ok(content.len() as u64)
    }
}
