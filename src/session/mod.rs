//! Transfer executors: the exchanges that run over an ephemeral channel
// (c) 2026 ftpc contributors

mod get;
mod ls;
mod put;

pub use {get::Get, ls::List, put::Put};

use std::future::Future;

use crate::Result;

/// Which way data flows over an ephemeral channel
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    /// Local file to server
    Upload,
    /// Server file to local
    Download,
    /// Directory listing from server
    Listing,
}

/// Common structure for the exchanges on an ephemeral channel.
///
/// An executor owns its channel. Running it consumes the executor, so the channel
/// is closed on every path out of [`run`](Self::run), successful or not.
pub trait TransferCommand: Send {
    /// What a successful exchange produces
    type Output;

    /// Which way the data goes
    fn direction(&self) -> Direction;

    /// Performs the exchange. Does not return until completion (or error).
    fn run(self) -> impl Future<Output = Result<Self::Output>> + Send;
}
