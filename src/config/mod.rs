// (c) 2026 ftpc contributors
//! # Configuration management
//!
//! ftpc obtains run-time configuration from the following sources, in order:
//! 1. Command-line options
//! 2. Environment variables, named for the field in upper case with an `FTPC_` prefix
//!    (for example `FTPC_HOST`, `FTPC_CONNECT_TIMEOUT`)
//! 3. Hard-wired defaults
//!
//! Each option may appear in multiple places, but only the first match is used.
//!
//! Run `ftpc --show-config` to see the working configuration and where each value came from.
//!
//! The available fields are described in [`Configuration`].

mod manager;
mod structure;
mod sysdefault;

pub use manager::{Manager, ENV_PREFIX};
pub use structure::{Configuration, ConfigurationOverrides};
use sysdefault::SystemDefault;
