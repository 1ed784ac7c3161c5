//! Command-line argument definition and processing
// (c) 2026 ftpc contributors

use std::ffi::OsString;

use clap::{error::ErrorKind, CommandFactory as _, Parser};

use crate::{client::Parameters, config::ConfigurationOverrides};

/// Options that switch us into another mode i.e. which don't require a server
#[derive(Debug, Parser, Clone, Copy, Default)]
pub(crate) struct ModeSwitches {
    /// Outputs the configuration, then exits.
    ///
    /// This shows each setting and where it came from (default, environment or command line).
    #[arg(long, help_heading("Configuration"), display_order(0))]
    pub show_config: bool,
}

/// Interactive client for a simple control-channel file transfer server
///
/// Connects to the server's control channel and offers an `ftp>` prompt accepting
/// `put FILE`, `get FILE`, `ls` and `quit`.
#[derive(Debug, Parser, Clone, Default)]
#[command(
    author,
    version,
    about,
    long_about = None,
    infer_long_args(true),
    styles(super::styles::CLAP_STYLES)
)]
pub(crate) struct CliArgs {
    #[command(flatten)]
    pub modes: ModeSwitches,

    #[command(flatten)]
    pub client: Parameters,

    #[command(flatten)]
    pub config: ConfigurationOverrides,
}

impl CliArgs {
    /// Parses the arguments, enforcing the requirements clap cannot express on its own
    pub(crate) fn custom_parse<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args = Self::try_parse_from(args)?;
        if args.client.port.is_none() && !args.modes.show_config {
            return Err(Self::command().error(
                ErrorKind::MissingRequiredArgument,
                "the server's control channel <PORT> is required",
            ));
        }
        Ok(args)
    }
}

#[cfg(test)]
mod test {
    use super::CliArgs;
    use crate::protocol::Encoding;
    use clap::error::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn verify_command() {
        use clap::CommandFactory as _;
        CliArgs::command().debug_assert();
    }

    #[test]
    fn port_and_options() {
        let args = CliArgs::custom_parse(["ftpc", "--encoding", "latin1", "-H", "srv", "2121"])
            .unwrap();
        assert_eq!(args.client.port, Some(2121));
        assert_eq!(args.config.encoding, Some(Encoding::Latin1));
        assert_eq!(args.config.host.as_deref(), Some("srv"));
    }

    #[test]
    fn port_required() {
        let e = CliArgs::custom_parse(["ftpc"]).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn show_config_without_port() {
        let args = CliArgs::custom_parse(["ftpc", "--show-config"]).unwrap();
        assert!(args.modes.show_config);
        assert_eq!(args.client.port, None);
    }

    #[test]
    fn help() {
        let e = CliArgs::custom_parse(["ftpc", "--help"]).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::DisplayHelp);
    }
}
