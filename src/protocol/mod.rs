// (c) 2026 ftpc contributors

//! Wire protocol definitions
//!
//! The protocol runs over two kinds of TCP connection:
//!
//! * One long-lived **control channel**, which carries command lines from client to
//!   server, and ephemeral port numbers and status characters back.
//! * A fresh **ephemeral channel** per transfer, opened by the client to a port the
//!   server advertised on the control channel. Exactly one [frame](frame) (or one
//!   [listing](listing)) crosses it, then it is closed.
//!
//! All text passes through the configured wire [`Encoding`].

pub mod command;
pub mod common;
pub mod encoding;
pub mod frame;
pub mod listing;

pub use command::{Command, InvalidCommand};
pub use common::{Channel, ProtocolMessage};
pub use encoding::Encoding;
pub use listing::Listing;
