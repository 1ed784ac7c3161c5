//! Command Line Interface for ftpc
// (c) 2026 ftpc contributors
mod args;
mod cli_main;
pub mod repl;
pub mod styles;
pub use cli_main::cli;
