//! List Contents command (remote directory listing)
// (c) 2026 ftpc contributors

use tracing::debug;

use super::{Direction, TransferCommand};
use crate::protocol::{Channel, Listing, ProtocolMessage as _};
use crate::Result;

/// Receives a remote directory listing over an ephemeral channel
#[derive(Debug)]
pub struct List<C: Channel> {
    channel: C,
}

impl<C: Channel> List<C> {
    /// Constructor
    pub fn new(channel: C) -> Self {
        Self { channel }
    }
}

impl<C: Channel> TransferCommand for List<C> {
    /// The filenames, in the order the server sent them
    type Output = Vec<String>;

    fn direction(&self) -> Direction {
        Direction::Listing
    }

    async fn run(self) -> Result<Vec<String>> {
        let mut channel = self.channel;
        // The server closes the channel to mark the end of the listing
        let listing = Listing::from_reader_until_closed(&mut channel).await?;
        drop(channel);
        let names = listing.into_names();
        debug!("listing has {} entries", names.len());
        Ok(names)
    }
}
