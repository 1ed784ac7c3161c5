//! General utility code that didn't fit anywhere else
// (c) 2026 ftpc contributors

mod tracing;
pub(crate) use tracing::{install as setup_tracing, is_installed as tracing_is_initialised, LogSettings};
pub use tracing::TimeFormat;

#[cfg(test)]
pub(crate) use tracing::capture;
#[cfg(test)]
pub(crate) mod test_server;
