//! ftpc utility - main entrypoint
// (c) 2026 ftpc contributors

use std::process::ExitCode;

fn main() -> ExitCode {
    ftpc::main(std::env::args_os())
}
