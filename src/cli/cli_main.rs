//! Main CLI for ftpc
// (c) 2026 ftpc contributors

use std::ffi::OsString;
use std::process::ExitCode;

use super::args::CliArgs;
use crate::{
    cli::styles::{configure_colours, error, use_colours, RESET},
    client::Parameters,
    config::{Configuration, Manager},
};

use anyhow::Result;
use tokio::io::BufReader;

/// Main CLI entrypoint
///
/// Call this from `main`, passing the arguments to use.
/// Normally you will call `cli(std::env::args_os())` but you can pass in alternate arguments for CLI testing.
///
/// This function may start a tokio runtime and perform work in it.
#[must_use]
#[allow(clippy::match_bool)]
pub fn cli<I, T>(args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    cli_inner(args)
        .inspect_err(|e| {
            if crate::util::tracing_is_initialised() {
                tracing::error!("{e:#}");
            } else {
                anstream::eprintln!("{ERROR}Error:{RESET} {e:#}", ERROR = error());
            }
        })
        .map_or(ExitCode::FAILURE, |success| match success {
            true => ExitCode::SUCCESS,
            false => ExitCode::FAILURE,
        })
}

/// Inner CLI logic
///
/// # Return
/// true indicates success. false indicates a failure where the callee has output to stderr.
fn cli_inner<I, T>(args: I) -> Result<bool>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let Some(args) = parse_args(args)? else {
        return Ok(true); // help/version shown; exit
    };

    let mut manager = Manager::standard();
    manager.merge_provider(args.config.clone());
    setup_colours(&manager);

    if args.modes.show_config {
        return show_config(&manager);
    }
    run_client(&manager, args.client)
}

fn parse_args<I, T>(args: I) -> Result<Option<CliArgs>>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    use clap::error::ErrorKind::{DisplayHelp, DisplayVersion};
    match CliArgs::custom_parse(args) {
        Ok(args) => Ok(Some(args)),
        Err(e) if matches!(e.kind(), DisplayHelp | DisplayVersion) => {
            let message = e.render();
            if use_colours() {
                println!("{}", message.ansi());
            } else {
                println!("{message}");
            }
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn setup_colours(manager: &Manager) {
    // An invalid configuration is reported later; colour choice falls back to autodetection.
    let colour_mode = manager.get::<Configuration>().ok().map(|c| c.color);
    configure_colours(colour_mode);
}

fn show_config(manager: &Manager) -> Result<bool> {
    anstream::println!("{}", show_config_data(manager));
    let _ = manager.configuration()?;
    Ok(true)
}

fn show_config_data(manager: &Manager) -> String {
    format!("Client configuration:\n{}", manager.describe())
}

#[tokio::main(flavor = "current_thread")]
async fn run_client(manager: &Manager, client_params: Parameters) -> Result<bool> {
    let input = BufReader::new(tokio::io::stdin());
    crate::client_main(manager, client_params, input, tokio::io::stdout()).await
}

#[cfg(test)]
mod tests {
    use super::{cli_inner, show_config_data};
    use crate::config::Manager;
    use assertables::assert_contains;

    #[test]
    fn show_config() {
        let data = show_config_data(&Manager::without_env());
        assert_contains!(data, "Client configuration");
        assert_contains!(data, "connect_timeout");
        assert_contains!(data, "utf-32");
    }

    #[test]
    fn help_is_success() {
        assert!(cli_inner(["ftpc", "--help"]).unwrap());
    }

    #[test]
    fn bad_option() {
        let _ = cli_inner(["ftpc", "--no-such-option", "21"]).unwrap_err();
    }
}
