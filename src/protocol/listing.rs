//! Directory listing message
// (c) 2026 ftpc contributors
//!
//! The server replies to `ls` by sending one [`Listing`] over the ephemeral channel,
//! then closing it.
//!
//! ```text
//! Listing = union { V1: ListingV1 }
//! ListingV1 = struct { names: list<string> }
//! ```
//!
//! On the wire this is the union tag (a uvarint, 0 for `V1`), then the number of names
//! (uvarint), then each name as a uvarint length and its UTF-8 bytes.

use serde::{Deserialize, Serialize};

use super::common::ProtocolMessage;

/// A remote directory listing
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub enum Listing {
    /// First version of the listing
    V1(ListingV1),
}

/// The entries in a remote directory, in the order the server sent them
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Default)]
pub struct ListingV1 {
    /// Filenames, without any further formatting
    pub names: Vec<String>,
}

impl ProtocolMessage for Listing {}

impl Listing {
    /// Constructor
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::V1(ListingV1 {
            names: names.into_iter().map(Into::into).collect(),
        })
    }

    /// Consumes the listing, returning the filenames in order
    #[must_use]
    pub fn into_names(self) -> Vec<String> {
        match self {
            Listing::V1(v1) => v1.names,
        }
    }
}
