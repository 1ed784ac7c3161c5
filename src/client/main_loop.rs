//! Main client mode event loop
// (c) 2026 ftpc contributors

use anyhow::{Context as _, Result};
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{debug, info};

use super::{Dispatcher, Parameters};
use crate::cli::{repl, styles::use_colours};
use crate::config::{Configuration, Manager};
use crate::control::{ControlChannel, EphemeralFactory};
use crate::util;

fn setup_tracing(parameters: &Parameters, config: &Configuration) -> Result<()> {
    // an invalid RUST_LOG fails here
    util::setup_tracing(&util::LogSettings::for_client(
        parameters,
        config.time_format,
        use_colours(),
    ))
}

/// Main client mode event loop
///
/// Connects the control channel, then runs the prompt loop over `input` and `output`
/// until the user quits or input ends.
///
/// # Return value
/// `true` if the session ended normally.
pub async fn client_main<I, O>(
    manager: &Manager,
    parameters: Parameters,
    input: I,
    output: O,
) -> Result<bool>
where
    I: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let config = manager.configuration()?;
    setup_tracing(&parameters, &config)?;
    debug!("working configuration: {config:?}");

    let port = parameters
        .port
        .context("the server's control channel port is required")?;
    let timeout = config.connect_timeout_duration();

    let control = ControlChannel::connect(&config.host, port, config.encoding, timeout)
        .await
        .with_context(|| format!("could not establish the control channel to {}", config.host))?;
    info!("Connected to {}:{port}", config.host);

    let mut dispatcher = Dispatcher::new(control, EphemeralFactory::new(&config.host, timeout));
    repl::run(&mut dispatcher, input, output).await?;
    Ok(true)
}
