// (c) 2026 ftpc contributors

//! `ftpc` is an interactive client for a minimal file-transfer protocol.
//!
//! ## Overview
//!
//! A persistent **control channel** carries command lines to the server.
//! For each transfer the server opens an **ephemeral port** and tells the client its number;
//! the client connects to it, exactly one frame (a file, or a directory listing) crosses it,
//! and it is closed. Then the session returns to the prompt.
//!
//! ```text
//! ftp> put report.txt        uploads report.txt
//! ftp> get data.txt          downloads data.txt
//! ftp> ls                    lists the files on the server
//! ftp> quit                  ends the session
//! ```
//!
//! ## Usage
//!
//! `ftpc [OPTIONS] <PORT>` connects to the control channel on `localhost:<PORT>`.
//! Use `--host` (or `FTPC_HOST`) to connect elsewhere; see [config] for the other options.
//!
//! #### Limitations
//! - There is no authentication or encryption.
//! - The default wire encoding (UTF-32) treats files as text. Files that are not valid UTF-8
//!   are refused. See [`protocol::Encoding`] for the byte-transparent alternative.
//! - One transfer at a time.
//!
//! ## Structure
//!
//! * [`protocol`]: framing, wire encodings, command parsing, listing format
//! * [`control`]: the control channel and the ephemeral channel factory
//! * [`session`]: the upload, download and listing exchanges
//! * [`client`]: the command dispatcher and main loop

pub(crate) mod cli;
pub use cli::cli as main;
pub use cli::styles;

pub mod client;
pub use client::{client_main, Parameters};

pub mod config;
pub use config::Configuration;

pub mod control;
mod error;
pub use error::{Error, Result};
pub mod protocol;
pub mod session;
pub mod util;
