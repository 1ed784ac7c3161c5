//! Protocol engine error type
// (c) 2026 ftpc contributors

/// Things that can go wrong during a single exchange with the server.
///
/// None of these are fatal to the session: a failed exchange is reported and the
/// dispatcher returns to its idle state.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A port number could not be parsed, or a connection attempt failed
    #[error("connection to {target} failed: {reason}")]
    Connection {
        /// What we were trying to reach, as `host:port`
        target: String,
        /// Human-readable detail
        reason: String,
    },

    /// The local file to upload could not be opened
    #[error("{path} cannot open: {source}")]
    FileOpen {
        /// The filename as given by the user
        path: String,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// The server closed the ephemeral channel without sending a length header
    #[error("nothing received")]
    NoDataReceived,

    /// The peer did something outside of the protocol contract, or an exchange was abandoned part way through
    #[error("protocol desync: {0}")]
    ProtocolDesync(String),

    /// Content cannot be represented in the wire encoding
    #[error("encoding error: {0}")]
    Encoding(String),

    /// A directory listing could not be decoded
    #[error("malformed directory listing: {0}")]
    Listing(#[from] serde_bare::error::Error),

    /// Any other I/O failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type used throughout the protocol engine
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn desync<S: Into<String>>(what: S) -> Self {
        Self::ProtocolDesync(what.into())
    }

    pub(crate) fn connection<T: std::fmt::Display, R: std::fmt::Display>(
        target: T,
        reason: R,
    ) -> Self {
        Self::Connection {
            target: target.to_string(),
            reason: reason.to_string(),
        }
    }
}
