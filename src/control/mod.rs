//! Channel management: the control channel, and the factory for ephemeral channels
// (c) 2026 ftpc contributors

mod channel;
mod ephemeral;

pub use channel::{ControlChannel, RECEIVE_BUFFER_SIZE};
pub use ephemeral::EphemeralFactory;
