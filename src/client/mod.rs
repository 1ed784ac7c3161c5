//! client-side main loop and supporting structures
// (c) 2026 ftpc contributors

mod options;
pub use options::Parameters;

mod dispatcher;
pub use dispatcher::{Dispatcher, Outcome, Report, State};

mod main_loop;
pub use main_loop::client_main;
